//! Search overlay
//!
//! Renders the query input, a suggestion row, and the result dropdown on top
//! of the current screen.

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::{release_year, truncate_text, TvShow};
use crate::search::{SearchBox, SearchState, MAX_VISIBLE_RESULTS};
use crate::ui::centered_rect;

/// Renders the search overlay
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let width = 70.min(area.width);
    let height = (MAX_VISIBLE_RESULTS as u16 + 8).min(area.height);
    let overlay_area = centered_rect(width, height, area);

    frame.render_widget(Clear, overlay_area);
    let block = Block::default()
        .title(" Search TV Shows ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Input
            Constraint::Length(1), // Suggestions
            Constraint::Length(1),
            Constraint::Min(1), // Results
        ])
        .split(inner);

    let search = &app.search;
    let input = Line::from(vec![
        Span::styled("\u{1F50D} ", Style::default().fg(Color::Cyan)),
        Span::styled(search.query().to_string(), Style::default().fg(Color::White)),
        Span::styled("\u{2588}", Style::default().fg(Color::Cyan)),
    ]);
    frame.render_widget(Paragraph::new(input), chunks[0]);
    frame.render_widget(Paragraph::new(suggestion_line(search)), chunks[1]);
    frame.render_widget(Paragraph::new(result_lines(search, inner.width as usize)), chunks[3]);
}

fn suggestion_line(search: &SearchBox) -> Line<'static> {
    if search.suggestions().is_empty() {
        return Line::from("");
    }
    let mut spans = vec![Span::styled("Tab ", Style::default().fg(Color::Yellow))];
    for (index, suggestion) in search.suggestions().iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(" \u{00B7} ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(suggestion.clone(), Style::default().fg(Color::Gray)));
    }
    Line::from(spans)
}

fn result_lines(search: &SearchBox, width: usize) -> Vec<Line<'static>> {
    let hint = |text: &str, color: Color| {
        vec![Line::from(Span::styled(
            text.to_string(),
            Style::default().fg(color),
        ))]
    };

    match search.state() {
        SearchState::Idle => hint("Type at least 3 characters to search.", Color::DarkGray),
        SearchState::Querying => hint("Searching...", Color::Cyan),
        SearchState::Empty => hint(
            &format!("No shows found for \"{}\".", search.query().trim()),
            Color::Gray,
        ),
        SearchState::Error(message) => hint(message, Color::Red),
        SearchState::Results(_) => {
            let mut lines: Vec<Line> = search
                .visible_results()
                .iter()
                .enumerate()
                .map(|(index, show)| {
                    result_line(show, search.selected() == Some(index), width)
                })
                .collect();
            if search.is_truncated() {
                lines.push(Line::from(Span::styled(
                    format!("Showing first {} results", MAX_VISIBLE_RESULTS),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            lines
        }
    }
}

fn result_line(show: &TvShow, is_selected: bool, width: usize) -> Line<'static> {
    let cursor = if is_selected { "\u{25B8} " } else { "  " };
    let style = if is_selected {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let year = release_year(&show.first_air_date)
        .map(|year| format!(" ({})", year))
        .unwrap_or_default();

    Line::from(vec![
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
        Span::styled(truncate_text(&show.name, width.saturating_sub(12)), style),
        Span::styled(year, Style::default().fg(Color::Gray)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::StartScreen;
    use crate::data::ShowPage;
    use crate::fetch::FetchOutcome;
    use crate::ui::test_support::{create_test_app, render_to_string, show};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::time::Instant;

    fn open_with_query(query: &str) -> App {
        let mut app = create_test_app(StartScreen::Home);
        let now = Instant::now();
        app.handle_key(KeyEvent::new(KeyCode::Char('/'), KeyModifiers::NONE), now);
        for c in query.chars() {
            app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE), now);
        }
        app
    }

    fn page(shows: Vec<TvShow>) -> ShowPage<TvShow> {
        ShowPage {
            page: 1,
            total_results: shows.len() as u32,
            total_pages: 1,
            results: shows,
        }
    }

    #[test]
    fn test_idle_hint() {
        let app = open_with_query("ab");

        let content = render_to_string(&app, 100, 30);

        assert!(content.contains("Search TV Shows"));
        assert!(content.contains("Type at least 3 characters"));
    }

    #[test]
    fn test_querying_then_results() {
        let mut app = open_with_query("breaking");
        assert!(render_to_string(&app, 100, 30).contains("Searching..."));

        app.apply(FetchOutcome::Search(Ok(page(vec![show(1396, "Breaking Bad")]))));
        app.apply(FetchOutcome::Suggest(Ok(page(vec![show(1396, "Breaking Bad")]))));

        let content = render_to_string(&app, 100, 30);
        assert!(content.contains("Breaking Bad (2008)"));
        assert!(content.contains("Tab"));
    }

    #[test]
    fn test_empty_message_names_query() {
        let mut app = open_with_query("zzzz");
        app.apply(FetchOutcome::Search(Ok(page(Vec::new()))));

        let content = render_to_string(&app, 100, 30);

        assert!(content.contains("No shows found for \"zzzz\"."));
    }

    #[test]
    fn test_error_message() {
        let mut app = open_with_query("lost");
        app.apply(FetchOutcome::Search(Err("Failed to search shows".to_string())));

        let content = render_to_string(&app, 100, 30);

        assert!(content.contains("Failed to search shows"));
    }

    #[test]
    fn test_truncated_results_note() {
        let mut app = open_with_query("the");
        let shows = (1..=12).map(|i| show(i, &format!("The Show {}", i))).collect();
        app.apply(FetchOutcome::Search(Ok(page(shows))));

        let content = render_to_string(&app, 100, 30);

        assert!(content.contains("The Show 8"));
        assert!(!content.contains("The Show 9"));
        assert!(content.contains("Showing first 8 results"));
    }
}
