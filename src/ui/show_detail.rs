//! Show detail screen rendering
//!
//! Renders a single show: title line with year, rating and favorite marker,
//! tagline, facts, overview, then a season selector and the episodes of the
//! selected season.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Loadable};
use crate::data::{format_date, format_rating, release_year, Episode, ShowDetails};
use crate::ui::ready_or_placeholder;

/// Renders the detail screen for `show_id`
pub fn render(frame: &mut Frame, app: &App, show_id: u64, area: Rect) {
    let state = app.details.get(&show_id);
    let title = state
        .and_then(Loadable::ready)
        .map(|details| format!(" {} ", details.name))
        .unwrap_or_default();
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(details) = ready_or_placeholder(frame, inner, state, "show") else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9), // Summary
            Constraint::Length(2), // Season tabs
            Constraint::Min(3),    // Episodes
        ])
        .split(inner);

    render_summary(frame, app, details, chunks[0]);
    render_season_tabs(frame, app, details, chunks[1]);
    render_episodes(frame, app, chunks[2]);
}

fn label(text: &str) -> Span<'static> {
    Span::styled(format!("{:<12}", text), Style::default().fg(Color::Gray))
}

fn render_summary(frame: &mut Frame, app: &App, details: &ShowDetails, area: Rect) {
    let mut title = vec![Span::styled(
        details.name.clone(),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(year) = release_year(&details.first_air_date) {
        title.push(Span::styled(format!(" ({})", year), Style::default().fg(Color::Gray)));
    }
    title.push(Span::styled(
        format!("  \u{2605} {}", format_rating(details.vote_average)),
        Style::default().fg(Color::Yellow),
    ));
    if app.favorites.is_favorite(details.id) {
        title.push(Span::styled(
            "  \u{2665} Bookmarked",
            Style::default().fg(Color::Red),
        ));
    }

    let mut lines = vec![Line::from(title)];
    if !details.tagline.is_empty() {
        lines.push(Line::from(Span::styled(
            details.tagline.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    let genres: Vec<&str> = details.genres.iter().map(|g| g.name.as_str()).collect();
    let seasons = details
        .number_of_seasons
        .map(|n| n.to_string())
        .unwrap_or_else(|| details.seasons.len().to_string());

    lines.push(Line::from(vec![
        label("First aired"),
        Span::raw(format_date(&details.first_air_date)),
        Span::raw("   "),
        label("Seasons"),
        Span::raw(seasons),
    ]));
    if !genres.is_empty() {
        lines.push(Line::from(vec![label("Genres"), Span::raw(genres.join(", "))]));
    }
    if !details.origin_country.is_empty() {
        lines.push(Line::from(vec![
            label("Country"),
            Span::raw(details.origin_country.join(", ")),
        ]));
    }
    if !details.status.is_empty() {
        lines.push(Line::from(vec![label("Status"), Span::raw(details.status.clone())]));
    }
    lines.push(Line::from(vec![
        label("Poster"),
        Span::styled(
            app.images.poster(details.poster_path.as_deref()),
            Style::default().fg(Color::DarkGray),
        ),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(if details.overview.is_empty() {
        "No overview available.".to_string()
    } else {
        details.overview.clone()
    }));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

fn render_season_tabs(frame: &mut Frame, app: &App, details: &ShowDetails, area: Rect) {
    let numbers = details.season_numbers();
    if numbers.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled("No seasons listed.", Style::default().fg(Color::DarkGray))),
            area,
        );
        return;
    }

    let mut spans = vec![Span::styled("Season ", Style::default().fg(Color::Gray))];
    for (index, number) in numbers.iter().enumerate() {
        let text = if *number == 0 {
            " Specials ".to_string()
        } else {
            format!(" {} ", number)
        };
        let style = if index == app.season_index {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(text, style));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::TOP)),
        area,
    );
}

fn render_episodes(frame: &mut Frame, app: &App, area: Rect) {
    let state = app.current_season();
    if state.is_none() && app.current_season_number().is_none() {
        return;
    }
    let Some(season) = ready_or_placeholder(frame, area, state, "episodes") else {
        return;
    };
    if season.episodes.is_empty() {
        frame.render_widget(Paragraph::new("No episodes listed yet."), area);
        return;
    }

    let lines: Vec<Line> = season.episodes.iter().flat_map(episode_lines).collect();
    let max_scroll = (lines.len() as u16).saturating_sub(area.height);
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .scroll((app.episode_scroll.min(max_scroll), 0));
    frame.render_widget(paragraph, area);
}

fn episode_lines(episode: &Episode) -> Vec<Line<'static>> {
    let mut meta = Vec::new();
    if let Some(date) = &episode.air_date {
        meta.push(format_date(date));
    }
    if let Some(runtime) = episode.runtime {
        meta.push(format!("{} min", runtime));
    }
    if episode.vote_average > 0.0 {
        meta.push(format!("\u{2605} {}", format_rating(episode.vote_average)));
    }

    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("{:>3}. ", episode.episode_number),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(
            episode.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  {}", meta.join(" \u{00B7} ")), Style::default().fg(Color::Gray)),
    ])];
    if !episode.overview.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("     {}", episode.overview),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::StartScreen;
    use crate::data::SeasonDetails;
    use crate::fetch::FetchOutcome;
    use crate::ui::test_support::{create_test_app, render_to_string};
    use std::time::Instant;

    fn sample_details() -> ShowDetails {
        serde_json::from_value(serde_json::json!({
            "id": 1396,
            "name": "Breaking Bad",
            "tagline": "Change the equation.",
            "overview": "A chemistry teacher turns to crime.",
            "first_air_date": "2008-01-20",
            "vote_average": 8.9,
            "number_of_seasons": 2,
            "status": "Ended",
            "origin_country": ["US"],
            "genres": [{"id": 18, "name": "Drama"}],
            "poster_path": "/ggFHVNu6YYI5L9pCfOacjizRGt.jpg",
            "seasons": [
                {"id": 1, "season_number": 0, "name": "Specials"},
                {"id": 2, "season_number": 1, "name": "Season 1"},
                {"id": 3, "season_number": 2, "name": "Season 2"}
            ]
        }))
        .unwrap()
    }

    fn sample_season() -> SeasonDetails {
        serde_json::from_value(serde_json::json!({
            "id": 2,
            "season_number": 1,
            "episodes": [
                {"id": 10, "episode_number": 1, "name": "Pilot", "air_date": "2008-01-20", "runtime": 58},
                {"id": 11, "episode_number": 2, "name": "Cat's in the Bag..."}
            ]
        }))
        .unwrap()
    }

    fn detail_app() -> App {
        let mut app = create_test_app(StartScreen::Show(1396));
        app.apply(FetchOutcome::ShowDetails(1396, Ok(sample_details())));
        app.take_requests();
        app
    }

    #[test]
    fn test_loading_before_details() {
        let app = create_test_app(StartScreen::Show(1396));

        let content = render_to_string(&app, 100, 30);
        assert!(content.contains("Loading show..."));
    }

    #[test]
    fn test_error_replaces_loading() {
        let mut app = create_test_app(StartScreen::Show(7));
        app.apply(FetchOutcome::ShowDetails(
            7,
            Err("Failed to fetch show details".to_string()),
        ));

        let content = render_to_string(&app, 100, 30);
        assert!(content.contains("Failed to fetch show details"));
    }

    #[test]
    fn test_summary_is_rendered() {
        let app = detail_app();

        let content = render_to_string(&app, 120, 36);

        assert!(content.contains("Breaking Bad"));
        assert!(content.contains("(2008)"));
        assert!(content.contains("Change the equation."));
        assert!(content.contains("January 20, 2008"));
        assert!(content.contains("Drama"));
        assert!(content.contains("w500/ggFHVNu6YYI5L9pCfOacjizRGt.jpg"));
        assert!(content.contains("Specials"));
    }

    #[test]
    fn test_episodes_are_rendered() {
        let mut app = detail_app();
        app.apply(FetchOutcome::Season {
            show_id: 1396,
            season_number: 1,
            result: Ok(sample_season()),
        });

        let content = render_to_string(&app, 120, 36);

        assert!(content.contains("Pilot"));
        assert!(content.contains("58 min"));
        assert!(content.contains("Cat's in the Bag..."));
    }

    #[test]
    fn test_bookmark_marker() {
        let mut app = detail_app();
        app.toggle_favorite(Instant::now());
        app.toast = None;

        let content = render_to_string(&app, 120, 36);

        assert!(content.contains("Bookmarked"));
    }
}
