//! Home screen rendering
//!
//! A featured show on top, then one row each for trending today, top rated and
//! popular shows. Rows scroll horizontally so the selected show stays visible.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Loadable, HOME_ROWS};
use crate::data::{format_rating, release_year, truncate_text, TvShow};

/// Width given to each show in a row
const CARD_WIDTH: usize = 24;

/// Renders the home screen into `area`
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Hero
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Min(0),
        ])
        .split(area);

    render_hero(frame, app, chunks[0]);

    for (index, row) in HOME_ROWS.iter().enumerate() {
        let selected = (app.home_row == index).then_some(app.home_column);
        render_row(frame, row.title(), app.home_row_state(*row), selected, chunks[index + 1]);
    }
}

fn render_hero(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let lines = match (app.hero(), &app.trending_day) {
        (Some(show), _) => hero_lines(show, app.favorites.is_favorite(show.id)),
        (None, Loadable::Failed(message)) => vec![Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Red),
        ))],
        (None, Loadable::Ready(_)) => vec![Line::from("Nothing is trending right now.")],
        (None, _) => vec![Line::from(Span::styled(
            "Loading featured show...",
            Style::default().fg(Color::Cyan),
        ))],
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn hero_lines(show: &TvShow, is_favorite: bool) -> Vec<Line<'static>> {
    let mut title = vec![Span::styled(
        show.name.clone(),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(year) = release_year(&show.first_air_date) {
        title.push(Span::styled(format!("  {}", year), Style::default().fg(Color::Gray)));
    }
    title.push(Span::styled(
        format!("  \u{2605} {}", format_rating(show.vote_average)),
        Style::default().fg(Color::Yellow),
    ));
    if is_favorite {
        title.push(Span::styled("  \u{2665}", Style::default().fg(Color::Red)));
    }

    vec![
        title,
        vec![Span::styled(
            truncate_text(&show.overview, 200),
            Style::default().fg(Color::Gray),
        )],
    ]
    .into_iter()
    .map(Line::from)
    .collect()
}

/// Renders a row of show names with the selected one highlighted
fn render_row(
    frame: &mut Frame,
    title: &str,
    state: &Loadable<Vec<TvShow>>,
    selected: Option<usize>,
    area: Rect,
) {
    let title_style = if selected.is_some() {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let block = Block::default()
        .title(Span::styled(format!(" {} ", title), title_style))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let line = match state {
        Loadable::Ready(shows) if shows.is_empty() => Line::from("No shows found."),
        Loadable::Ready(shows) => {
            let visible = (area.width as usize).saturating_sub(2) / CARD_WIDTH;
            row_line(shows, selected, visible.max(1))
        }
        Loadable::Failed(message) => Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Red),
        )),
        Loadable::Loading | Loadable::Idle => Line::from(Span::styled(
            "Loading...",
            Style::default().fg(Color::Cyan),
        )),
    };

    frame.render_widget(Paragraph::new(vec![line]).block(block), area);
}

fn row_line(shows: &[TvShow], selected: Option<usize>, visible: usize) -> Line<'static> {
    let cursor = selected.unwrap_or(0);
    let start = (cursor + 1).saturating_sub(visible);

    let spans: Vec<Span> = shows
        .iter()
        .enumerate()
        .skip(start)
        .take(visible)
        .flat_map(|(index, show)| {
            let is_selected = selected == Some(index);
            let marker = if is_selected { "\u{25B8} " } else { "  " };
            let style = if is_selected {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let name = truncate_text(&show.name, CARD_WIDTH - 4);
            [
                Span::styled(marker, Style::default().fg(Color::Cyan)),
                Span::styled(format!("{:<width$}", name, width = CARD_WIDTH - 2), style),
            ]
        })
        .collect();

    Line::from(spans)
}
