//! Show list screen rendering
//!
//! Renders the trending, top rated, popular, genre and favorites screens: a
//! titled list of shows with year, rating and a favorite marker per line.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Screen};
use crate::data::{format_rating, release_year, truncate_text, TrendingWindow, TvShow};
use crate::ui::ready_or_placeholder;

/// Color for a rating (higher = greener)
fn rating_color(rating: f64) -> Color {
    if rating >= 8.0 {
        Color::Green
    } else if rating >= 6.5 {
        Color::Yellow
    } else if rating > 0.0 {
        Color::LightRed
    } else {
        Color::Gray
    }
}

/// Title for the list block
fn list_title(app: &App) -> String {
    match app.screen {
        Screen::Trending => match app.trending_window {
            TrendingWindow::Day => "Trending Today".to_string(),
            TrendingWindow::Week => "Trending This Week".to_string(),
        },
        screen => screen.title(),
    }
}

/// Renders the list screen for the current application state
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(format!(" {} ", list_title(app)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.screen == Screen::Favorites {
        let shows = app.current_list();
        if shows.is_empty() {
            let paragraph = Paragraph::new(vec![
                Line::from("No favorites yet."),
                Line::from(Span::styled(
                    "Press f on any show to bookmark it. Favorites are kept for 2 hours.",
                    Style::default().fg(Color::DarkGray),
                )),
            ]);
            frame.render_widget(paragraph, inner);
        } else {
            render_lines(frame, app, &shows, inner);
        }
        return;
    }

    let Some(shows) = ready_or_placeholder(frame, inner, app.list_state(), "shows") else {
        return;
    };
    if shows.is_empty() {
        frame.render_widget(Paragraph::new("No shows found."), inner);
        return;
    }
    render_lines(frame, app, shows, inner);
}

/// Renders one line per show, scrolled so the selection stays visible
fn render_lines(frame: &mut Frame, app: &App, shows: &[TvShow], area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(area);

    let height = chunks[0].height as usize;
    let start = (app.list_index + 1).saturating_sub(height);
    let name_width = (area.width as usize).saturating_sub(20).clamp(10, 48);

    let lines: Vec<Line> = shows
        .iter()
        .enumerate()
        .skip(start)
        .take(height)
        .map(|(index, show)| {
            show_line(
                show,
                index == app.list_index,
                app.favorites.is_favorite(show.id),
                name_width,
            )
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), chunks[0]);

    if let Some(selected) = shows.get(app.list_index) {
        render_overview(frame, selected, chunks[1]);
    }
}

fn show_line(
    show: &TvShow,
    is_selected: bool,
    is_favorite: bool,
    name_width: usize,
) -> Line<'static> {
    let cursor = if is_selected { "\u{25B8} " } else { "  " }; // ▸ or space
    let name_style = if is_selected {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let name = truncate_text(&show.name, name_width);
    let year = release_year(&show.first_air_date).unwrap_or("----").to_string();

    Line::from(vec![
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
        Span::styled(format!("{:<width$}", name, width = name_width + 1), name_style),
        Span::styled(year, Style::default().fg(Color::Gray)),
        Span::raw("  "),
        Span::styled(
            format!("\u{2605} {:>4}", format_rating(show.vote_average)),
            Style::default().fg(rating_color(show.vote_average)),
        ),
        Span::styled(
            if is_favorite { "  \u{2665}" } else { "" },
            Style::default().fg(Color::Red),
        ),
    ])
}

/// Renders the overview of the selected show under the list
fn render_overview(frame: &mut Frame, show: &TvShow, area: Rect) {
    let text = if show.overview.is_empty() {
        "No overview available.".to_string()
    } else {
        truncate_text(&show.overview, (area.width as usize).saturating_mul(2))
    };
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::TOP))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
