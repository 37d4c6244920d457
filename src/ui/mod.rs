//! UI rendering module for tvdeck
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components. Every screen shares the same
//! frame: a navigation header, the screen body, and a key hint line. The
//! search and help overlays and the toast are drawn on top.

pub mod help_overlay;
pub mod home;
pub mod search;
pub mod show_detail;
pub mod show_list;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, Loadable, Screen};

pub use help_overlay::render as render_help_overlay;
pub use home::render as render_home;
pub use search::render as render_search_overlay;
pub use show_detail::render as render_show_detail;
pub use show_list::render as render_show_list;

/// Navigation tabs: key and label
const TABS: [(&str, &str); 6] = [
    ("1", "Home"),
    ("2", "Trending"),
    ("3", "Top Rated"),
    ("4", "Popular"),
    ("5", "Genres"),
    ("6", "Favorites"),
];

/// Renders the whole UI for the current application state
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(3),    // Screen body
            Constraint::Length(1), // Key hints
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);

    match app.screen {
        Screen::Home => home::render(frame, app, chunks[1]),
        Screen::ShowDetail(show_id) => show_detail::render(frame, app, show_id, chunks[1]),
        _ => show_list::render(frame, app, chunks[1]),
    }

    render_key_hints(frame, app, chunks[2]);

    if app.search_open {
        search::render(frame, app);
    }
    if app.show_help {
        help_overlay::render(frame);
    }
    if let Some(toast) = &app.toast {
        render_toast(frame, &toast.message);
    }
}

fn active_tab(screen: Screen) -> Option<usize> {
    match screen {
        Screen::Home => Some(0),
        Screen::Trending => Some(1),
        Screen::TopRated => Some(2),
        Screen::Popular => Some(3),
        Screen::Genre(_) => Some(4),
        Screen::Favorites => Some(5),
        Screen::ShowDetail(_) => None,
    }
}

/// Renders the app name, navigation tabs and favorites count
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let active = active_tab(app.screen);

    let mut spans = vec![
        Span::styled(
            "TVDECK",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
    ];
    for (index, (key, label)) in TABS.iter().enumerate() {
        let style = if active == Some(index) {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(format!("{} ", key), Style::default().fg(Color::Yellow)));
        spans.push(Span::styled(label.to_string(), style));
        spans.push(Span::raw("  "));
    }
    spans.push(Span::styled(
        format!("\u{2665} {}", app.favorites.len()),
        Style::default().fg(Color::Red),
    ));

    let separator = "─".repeat(area.width as usize);
    let lines = vec![
        Line::from(spans),
        Line::from(Span::styled(separator, Style::default().fg(Color::DarkGray))),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

/// Renders the key hints for the current screen at the bottom
fn render_key_hints(frame: &mut Frame, app: &App, area: Rect) {
    let mut hints: Vec<(&str, &str)> = vec![("↑/↓", "Navigate"), ("Enter", "Open")];
    match app.screen {
        Screen::Home => hints.push(("←/→", "Browse row")),
        Screen::Trending => hints.push(("t", "Today/This week")),
        Screen::Genre(_) => hints.push(("←/→", "Genre")),
        Screen::ShowDetail(_) => {
            hints = vec![("←/→", "Season"), ("↑/↓", "Episodes")];
        }
        _ => {}
    }
    hints.extend([
        ("f", "Favorite"),
        ("/", "Search"),
        ("r", "Refresh"),
        ("?", "Help"),
        ("q", "Quit"),
    ]);

    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, label) in hints {
        spans.push(Span::styled(key, Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(format!(" {}  ", label)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

/// Renders a toast in the bottom-right corner
fn render_toast(frame: &mut Frame, message: &str) {
    let area = frame.area();
    let width = (message.chars().count() as u16 + 4).min(area.width);
    let height = 3.min(area.height);
    let toast_area = Rect {
        x: area.width.saturating_sub(width),
        y: area.height.saturating_sub(height + 1),
        width,
        height,
    };

    frame.render_widget(Clear, toast_area);
    let paragraph = Paragraph::new(message.to_string())
        .style(Style::default().fg(Color::Green))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        );
    frame.render_widget(paragraph, toast_area);
}

/// Renders the placeholder for a resource that is not ready
///
/// Returns the ready value, or `None` after drawing a loading or error message.
pub(crate) fn ready_or_placeholder<'a, T>(
    frame: &mut Frame,
    area: Rect,
    state: Option<&'a Loadable<T>>,
    what: &str,
) -> Option<&'a T> {
    let (text, color) = match state {
        Some(Loadable::Ready(value)) => return Some(value),
        Some(Loadable::Failed(message)) => (message.clone(), Color::Red),
        Some(Loadable::Loading) | Some(Loadable::Idle) | None => {
            (format!("Loading {}...", what), Color::Cyan)
        }
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(1),
            Constraint::Percentage(45),
        ])
        .split(area);
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(color))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, chunks[1]);
    None
}

/// Helper function to create a centered rect
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::app::App;
    use crate::cache::MemoryStore;
    use crate::cli::{StartScreen, StartupConfig};
    use crate::clock::ManualClock;
    use crate::data::{ImageUrls, TvShow};
    use crate::events::ChangeBus;
    use crate::favorites::FavoritesStore;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    /// Helper to create a test app on `screen` with its requests drained
    pub fn create_test_app(screen: StartScreen) -> App {
        let favorites = FavoritesStore::new(
            Arc::new(MemoryStore::new()),
            ChangeBus::new(),
            Arc::new(ManualClock::starting_now()),
        );
        let mut app = App::new(
            favorites,
            ImageUrls::new("https://image.tmdb.org/t/p"),
            StartupConfig {
                start_screen: screen,
                ..Default::default()
            },
        );
        app.take_requests();
        app
    }

    pub fn show(id: u64, name: &str) -> TvShow {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": name,
            "vote_average": 8.46,
            "first_air_date": "2008-01-20",
            "overview": "A chemistry teacher turns to crime.",
        }))
        .unwrap()
    }

    /// Draws the full UI and returns the buffer as one string
    pub fn render_to_string(app: &App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| super::render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }
}
