//! Application state management for tvdeck
//!
//! This module contains the main application state: which screen is showing,
//! what each screen has loaded, keyboard handling, and the fetch requests the
//! event loop should dispatch. Nothing here awaits; network work is queued as
//! `FetchRequest`s and results come back through `apply`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::cli::{StartScreen, StartupConfig};
use crate::data::genres::{genre_name, next_genre, previous_genre, TV_GENRES};
use crate::data::{ImageUrls, SeasonDetails, ShowDetails, TrendingWindow, TvShow};
use crate::events::StorageChange;
use crate::favorites::FavoritesStore;
use crate::fetch::{FetchOutcome, FetchRequest};
use crate::search::{SearchBox, SearchRequest};

/// How long a toast stays on screen
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

/// Rows on the home screen, top to bottom
pub const HOME_ROWS: [HomeRow; 3] = [HomeRow::TrendingToday, HomeRow::TopRated, HomeRow::Popular];

/// Screen currently shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Trending,
    TopRated,
    Popular,
    Genre(u32),
    Favorites,
    ShowDetail(u64),
}

impl Screen {
    /// Title shown in the header
    pub fn title(&self) -> String {
        match self {
            Screen::Home => "Home".to_string(),
            Screen::Trending => "Trending".to_string(),
            Screen::TopRated => "Top Rated".to_string(),
            Screen::Popular => "Popular Shows".to_string(),
            Screen::Genre(id) => format!("{} Shows", genre_name(*id)),
            Screen::Favorites => "My Favorites".to_string(),
            Screen::ShowDetail(_) => "Show".to_string(),
        }
    }
}

/// A row of shows on the home screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeRow {
    TrendingToday,
    TopRated,
    Popular,
}

impl HomeRow {
    pub fn title(&self) -> &'static str {
        match self {
            HomeRow::TrendingToday => "Trending Today",
            HomeRow::TopRated => "Top Rated",
            HomeRow::Popular => "Popular Shows",
        }
    }
}

/// State of a resource a screen depends on
#[derive(Debug, Clone, PartialEq)]
pub enum Loadable<T> {
    /// Never requested
    Idle,
    Loading,
    Ready(T),
    /// Request failed; holds the user-facing message
    Failed(String),
}

impl<T> Default for Loadable<T> {
    fn default() -> Self {
        Loadable::Idle
    }
}

impl<T> Loadable<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Loadable::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Loadable::Loading)
    }

    /// Whether a plain (non-forced) visit should request it
    fn needs_request(&self) -> bool {
        matches!(self, Loadable::Idle | Loadable::Failed(_))
    }
}

impl<T> From<Result<T, String>> for Loadable<T> {
    fn from(result: Result<T, String>) -> Self {
        match result {
            Ok(value) => Loadable::Ready(value),
            Err(message) => Loadable::Failed(message),
        }
    }
}

/// Short-lived confirmation message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    expires_at: Instant,
}

/// Main application struct managing state and data
pub struct App {
    /// Current screen
    pub screen: Screen,
    /// Screens to return to with Esc
    history: Vec<Screen>,
    /// Window used by the trending screen
    pub trending_window: TrendingWindow,
    pub trending_day: Loadable<Vec<TvShow>>,
    pub trending_week: Loadable<Vec<TvShow>>,
    pub top_rated: Loadable<Vec<TvShow>>,
    pub popular: Loadable<Vec<TvShow>>,
    pub genre_shows: HashMap<u32, Loadable<Vec<TvShow>>>,
    pub details: HashMap<u64, Loadable<ShowDetails>>,
    pub seasons: HashMap<(u64, u32), Loadable<SeasonDetails>>,
    /// Index into the current show's season numbers
    pub season_index: usize,
    /// Scroll offset of the episode list
    pub episode_scroll: u16,
    /// Selected row on the home screen
    pub home_row: usize,
    /// Selected show within the home row
    pub home_column: usize,
    /// Selected show on list screens
    pub list_index: usize,
    pub favorites: FavoritesStore,
    pub search: SearchBox,
    /// Whether the search overlay has focus
    pub search_open: bool,
    pub toast: Option<Toast>,
    pub images: ImageUrls,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Requests waiting to be dispatched
    pending: Vec<FetchRequest>,
}

impl App {
    /// Creates the app on the screen picked at startup and queues its loads
    pub fn new(favorites: FavoritesStore, images: ImageUrls, config: StartupConfig) -> Self {
        let screen = match config.start_screen {
            StartScreen::Home => Screen::Home,
            StartScreen::Genre(id) => Screen::Genre(id),
            StartScreen::Show(id) => Screen::ShowDetail(id),
            StartScreen::Favorites => Screen::Favorites,
        };

        let mut app = Self {
            screen,
            history: Vec::new(),
            trending_window: config.trending_window,
            trending_day: Loadable::Idle,
            trending_week: Loadable::Idle,
            top_rated: Loadable::Idle,
            popular: Loadable::Idle,
            genre_shows: HashMap::new(),
            details: HashMap::new(),
            seasons: HashMap::new(),
            season_index: 0,
            episode_scroll: 0,
            home_row: 0,
            home_column: 0,
            list_index: 0,
            favorites,
            search: SearchBox::new(),
            search_open: false,
            toast: None,
            images,
            show_help: false,
            should_quit: false,
            pending: Vec::new(),
        };
        app.load_screen(false);
        app
    }

    /// Drains the requests queued since the last call
    pub fn take_requests(&mut self) -> Vec<FetchRequest> {
        std::mem::take(&mut self.pending)
    }

    /// Trending shows for `window`
    pub fn trending(&self, window: TrendingWindow) -> &Loadable<Vec<TvShow>> {
        match window {
            TrendingWindow::Day => &self.trending_day,
            TrendingWindow::Week => &self.trending_week,
        }
    }

    fn trending_mut(&mut self, window: TrendingWindow) -> &mut Loadable<Vec<TvShow>> {
        match window {
            TrendingWindow::Day => &mut self.trending_day,
            TrendingWindow::Week => &mut self.trending_week,
        }
    }

    /// Load state of the shows behind a home row
    pub fn home_row_state(&self, row: HomeRow) -> &Loadable<Vec<TvShow>> {
        match row {
            HomeRow::TrendingToday => &self.trending_day,
            HomeRow::TopRated => &self.top_rated,
            HomeRow::Popular => &self.popular,
        }
    }

    fn home_row_shows(&self, row: usize) -> &[TvShow] {
        HOME_ROWS
            .get(row)
            .and_then(|row| self.home_row_state(*row).ready())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// First trending show, featured at the top of the home screen
    pub fn hero(&self) -> Option<&TvShow> {
        self.trending_day.ready().and_then(|shows| shows.first())
    }

    /// Load state of the list on the current list screen
    pub fn list_state(&self) -> Option<&Loadable<Vec<TvShow>>> {
        match self.screen {
            Screen::Trending => Some(self.trending(self.trending_window)),
            Screen::TopRated => Some(&self.top_rated),
            Screen::Popular => Some(&self.popular),
            Screen::Genre(id) => self.genre_shows.get(&id),
            _ => None,
        }
    }

    /// Shows listed on the current screen
    pub fn current_list(&self) -> Vec<TvShow> {
        match self.screen {
            Screen::Favorites => self.favorites.list().into_iter().map(TvShow::from).collect(),
            _ => self
                .list_state()
                .and_then(Loadable::ready)
                .cloned()
                .unwrap_or_default(),
        }
    }

    /// Show under the cursor, if the screen has one
    pub fn selected_show(&self) -> Option<TvShow> {
        match self.screen {
            Screen::Home => self.home_row_shows(self.home_row).get(self.home_column).cloned(),
            Screen::ShowDetail(_) => None,
            _ => self.current_list().get(self.list_index).cloned(),
        }
    }

    /// Details of the show on the detail screen
    pub fn current_details(&self) -> Option<&Loadable<ShowDetails>> {
        match self.screen {
            Screen::ShowDetail(id) => self.details.get(&id),
            _ => None,
        }
    }

    /// Season number selected on the detail screen
    pub fn current_season_number(&self) -> Option<u32> {
        let details = self.current_details()?.ready()?;
        details.season_numbers().get(self.season_index).copied()
    }

    /// Episodes state for the selected season
    pub fn current_season(&self) -> Option<&Loadable<SeasonDetails>> {
        let Screen::ShowDetail(id) = self.screen else {
            return None;
        };
        let number = self.current_season_number()?;
        self.seasons.get(&(id, number))
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q` / `Ctrl-c`: Quit
    /// - `?`: Toggle help
    /// - `/`: Open search
    /// - `Esc`: Go back (quits from the first screen)
    /// - `1`-`6`: Home, Trending, Top Rated, Popular, Genres, Favorites
    /// - `Up`/`k`, `Down`/`j`: Move selection
    /// - `Enter`: Open the selected show
    /// - `f`: Toggle favorite on the selected or open show
    /// - `r`: Request the current screen's data again
    /// - `t` (Trending): Switch between today and this week
    /// - `Left`/`h`, `Right`/`l`: Home columns, genres, seasons
    pub fn handle_key(&mut self, key_event: KeyEvent, now: Instant) {
        if key_event.modifiers.contains(KeyModifiers::CONTROL)
            && key_event.code == KeyCode::Char('c')
        {
            self.should_quit = true;
            return;
        }

        // Help overlay intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        if self.search_open {
            self.handle_search_key(key_event, now);
            return;
        }

        match key_event.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            KeyCode::Char('/') => {
                self.search_open = true;
            }
            KeyCode::Esc => {
                self.go_back();
            }
            KeyCode::Char('r') => {
                self.refresh();
            }
            KeyCode::Char('f') => {
                self.toggle_favorite(now);
            }
            KeyCode::Char('1') => self.go_to(Screen::Home),
            KeyCode::Char('2') => self.go_to(Screen::Trending),
            KeyCode::Char('3') => self.go_to(Screen::TopRated),
            KeyCode::Char('4') => self.go_to(Screen::Popular),
            KeyCode::Char('5') => self.go_to(Screen::Genre(TV_GENRES[0].0)),
            KeyCode::Char('6') => self.go_to(Screen::Favorites),
            _ => self.handle_screen_key(key_event),
        }
    }

    fn handle_screen_key(&mut self, key_event: KeyEvent) {
        match self.screen {
            Screen::Home => match key_event.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    self.home_row = self.home_row.saturating_sub(1);
                    self.clamp_home_column();
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.home_row = (self.home_row + 1).min(HOME_ROWS.len() - 1);
                    self.clamp_home_column();
                }
                KeyCode::Left | KeyCode::Char('h') => {
                    self.home_column = self.home_column.saturating_sub(1);
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    self.home_column += 1;
                    self.clamp_home_column();
                }
                KeyCode::Enter => self.open_selected(),
                _ => {}
            },
            Screen::ShowDetail(_) => match key_event.code {
                KeyCode::Left | KeyCode::Char('h') => self.change_season(-1),
                KeyCode::Right | KeyCode::Char('l') => self.change_season(1),
                KeyCode::Down | KeyCode::Char('j') => {
                    self.episode_scroll = self.episode_scroll.saturating_add(1);
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.episode_scroll = self.episode_scroll.saturating_sub(1);
                }
                KeyCode::Char('g') => {
                    self.episode_scroll = 0;
                }
                _ => {}
            },
            screen => match key_event.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    self.list_index = self.list_index.saturating_sub(1);
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    let count = self.current_list().len();
                    if count > 0 {
                        self.list_index = (self.list_index + 1).min(count - 1);
                    }
                }
                KeyCode::Enter => self.open_selected(),
                KeyCode::Char('t') if screen == Screen::Trending => {
                    self.trending_window = self.trending_window.toggled();
                    self.list_index = 0;
                    self.load_screen(false);
                }
                KeyCode::Left | KeyCode::Char('h') => {
                    if let Screen::Genre(id) = screen {
                        self.switch_genre(previous_genre(id));
                    }
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    if let Screen::Genre(id) = screen {
                        self.switch_genre(next_genre(id));
                    }
                }
                _ => {}
            },
        }
    }

    fn handle_search_key(&mut self, key_event: KeyEvent, now: Instant) {
        match key_event.code {
            KeyCode::Esc => self.close_search(),
            KeyCode::Down => self.search.select_next(),
            KeyCode::Up => self.search.select_previous(),
            KeyCode::Enter => {
                if let Some(show) = self.search.selected_show() {
                    let id = show.id;
                    self.close_search();
                    self.go_to(Screen::ShowDetail(id));
                }
            }
            KeyCode::Tab => {
                if let Some(suggestion) = self.search.suggestions().first().cloned() {
                    self.search.set_query(&suggestion, now);
                }
            }
            KeyCode::Backspace => self.search.pop_char(now),
            KeyCode::Char(c) => self.search.push_char(c, now),
            _ => {}
        }
    }

    fn close_search(&mut self) {
        self.search.clear();
        self.search_open = false;
    }

    /// Advances timers: due search requests and toast expiry
    pub fn tick(&mut self, now: Instant) {
        for request in self.search.poll(now) {
            self.pending.push(match request {
                SearchRequest::Search(query) => FetchRequest::Search(query),
                SearchRequest::Suggest(query) => FetchRequest::Suggest(query),
            });
        }

        if self.toast.as_ref().is_some_and(|toast| toast.expires_at <= now) {
            self.toast = None;
        }
    }

    /// Stores a finished fetch
    pub fn apply(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Trending(window, result) => {
                *self.trending_mut(window) = result.into();
                self.clamp_selection();
            }
            FetchOutcome::TopRated(result) => {
                self.top_rated = result.into();
                self.clamp_selection();
            }
            FetchOutcome::Popular(result) => {
                self.popular = result.into();
                self.clamp_selection();
            }
            FetchOutcome::Genre(genre_id, result) => {
                self.genre_shows.insert(genre_id, result.into());
                self.clamp_selection();
            }
            FetchOutcome::ShowDetails(show_id, result) => {
                self.details.insert(show_id, result.into());
                if self.screen == Screen::ShowDetail(show_id) {
                    self.request_season(false);
                }
            }
            FetchOutcome::Season {
                show_id,
                season_number,
                result,
            } => {
                self.seasons.insert((show_id, season_number), result.into());
            }
            FetchOutcome::Search(result) => self.search.apply_results(result),
            FetchOutcome::Suggest(result) => self.search.apply_suggestions(result),
        }
    }

    /// Reacts to a storage change announced on the bus
    pub fn handle_change(&mut self, change: &StorageChange) {
        self.favorites.handle_change(change);
        self.clamp_selection();
    }

    /// Opens `screen`, remembering the current one for Esc
    pub fn go_to(&mut self, screen: Screen) {
        if screen == self.screen {
            return;
        }
        self.history.push(self.screen);
        self.enter(screen);
    }

    /// Returns to the previous screen, or quits from the first one
    pub fn go_back(&mut self) {
        match self.history.pop() {
            Some(screen) => self.enter(screen),
            None => self.should_quit = true,
        }
    }

    fn enter(&mut self, screen: Screen) {
        self.screen = screen;
        self.list_index = 0;
        self.home_row = 0;
        self.home_column = 0;
        self.season_index = 0;
        self.episode_scroll = 0;
        self.load_screen(false);
    }

    fn switch_genre(&mut self, genre_id: u32) {
        self.screen = Screen::Genre(genre_id);
        self.list_index = 0;
        self.load_screen(false);
    }

    fn open_selected(&mut self) {
        if let Some(show) = self.selected_show() {
            self.go_to(Screen::ShowDetail(show.id));
        }
    }

    /// Requests everything on the current screen again
    pub fn refresh(&mut self) {
        tracing::debug!(screen = ?self.screen, "Refresh requested");
        self.load_screen(true);
    }

    /// Queues the requests the current screen needs
    ///
    /// Genre lists are requested on every visit; everything else only when it
    /// was never loaded or failed, unless `force` is set.
    fn load_screen(&mut self, force: bool) {
        match self.screen {
            Screen::Home => {
                self.request_trending(TrendingWindow::Day, force);
                self.request_top_rated(force);
                self.request_popular(force);
            }
            Screen::Trending => self.request_trending(self.trending_window, force),
            Screen::TopRated => self.request_top_rated(force),
            Screen::Popular => self.request_popular(force),
            Screen::Genre(genre_id) => {
                self.genre_shows.insert(genre_id, Loadable::Loading);
                self.pending.push(FetchRequest::Genre(genre_id));
            }
            Screen::Favorites => {
                if force {
                    self.favorites.reload();
                    self.clamp_selection();
                }
            }
            Screen::ShowDetail(show_id) => {
                let details = self.details.entry(show_id).or_default();
                if force || details.needs_request() {
                    *details = Loadable::Loading;
                    self.pending.push(FetchRequest::ShowDetails(show_id));
                } else {
                    self.request_season(force);
                }
            }
        }
    }

    fn request_trending(&mut self, window: TrendingWindow, force: bool) {
        if force || self.trending(window).needs_request() {
            *self.trending_mut(window) = Loadable::Loading;
            self.pending.push(FetchRequest::Trending(window));
        }
    }

    fn request_top_rated(&mut self, force: bool) {
        if force || self.top_rated.needs_request() {
            self.top_rated = Loadable::Loading;
            self.pending.push(FetchRequest::TopRated);
        }
    }

    fn request_popular(&mut self, force: bool) {
        if force || self.popular.needs_request() {
            self.popular = Loadable::Loading;
            self.pending.push(FetchRequest::Popular);
        }
    }

    fn request_season(&mut self, force: bool) {
        let Screen::ShowDetail(show_id) = self.screen else {
            return;
        };
        let Some(season_number) = self.current_season_number() else {
            return;
        };
        let state = self.seasons.entry((show_id, season_number)).or_default();
        if force || state.needs_request() {
            *state = Loadable::Loading;
            self.pending.push(FetchRequest::Season {
                show_id,
                season_number,
            });
        }
    }

    fn change_season(&mut self, delta: isize) {
        let count = self
            .current_details()
            .and_then(Loadable::ready)
            .map(|details| details.season_numbers().len())
            .unwrap_or(0);
        if count == 0 {
            return;
        }
        let next = self.season_index.saturating_add_signed(delta).min(count - 1);
        if next != self.season_index {
            self.season_index = next;
            self.episode_scroll = 0;
            self.request_season(false);
        }
    }

    /// Adds or removes the selected (or open) show and shows a toast
    pub fn toggle_favorite(&mut self, now: Instant) {
        let favorite = match self.current_details().and_then(Loadable::ready) {
            Some(details) => Some(details.to_favorite()),
            None => self.selected_show().map(|show| show.to_favorite()),
        };
        let Some(favorite) = favorite else {
            return;
        };

        let name = favorite.name.clone();
        let message = if self.favorites.toggle(favorite) {
            format!("Successfully bookmarked {}", name)
        } else {
            format!("Removed bookmark for {}", name)
        };
        self.toast = Some(Toast {
            message,
            expires_at: now + TOAST_DURATION,
        });
        self.clamp_selection();
    }

    fn clamp_home_column(&mut self) {
        let count = self.home_row_shows(self.home_row).len();
        self.home_column = self.home_column.min(count.saturating_sub(1));
    }

    fn clamp_selection(&mut self) {
        match self.screen {
            Screen::Home => self.clamp_home_column(),
            Screen::ShowDetail(_) => {}
            _ => {
                let count = self.current_list().len();
                self.list_index = self.list_index.min(count.saturating_sub(1));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{KeyValueStore, MemoryStore};
    use crate::clock::ManualClock;
    use crate::data::ShowPage;
    use crate::events::ChangeBus;
    use crate::favorites::FAVORITES_KEY;
    use std::sync::Arc;

    fn key_event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn show(id: u64, name: &str) -> TvShow {
        serde_json::from_value(serde_json::json!({"id": id, "name": name})).unwrap()
    }

    fn details(id: u64, name: &str, seasons: &[u32]) -> ShowDetails {
        let seasons: Vec<_> = seasons
            .iter()
            .map(|n| serde_json::json!({"id": 100 + n, "season_number": n}))
            .collect();
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": name,
            "seasons": seasons,
        }))
        .unwrap()
    }

    fn page(shows: Vec<TvShow>) -> ShowPage<TvShow> {
        ShowPage {
            page: 1,
            total_results: shows.len() as u32,
            total_pages: 1,
            results: shows,
        }
    }

    fn favorites_on(store: Arc<MemoryStore>) -> FavoritesStore {
        FavoritesStore::new(store, ChangeBus::new(), Arc::new(ManualClock::starting_now()))
    }

    fn create_app(config: StartupConfig) -> App {
        App::new(
            favorites_on(Arc::new(MemoryStore::new())),
            ImageUrls::new("https://image.tmdb.org/t/p"),
            config,
        )
    }

    fn app_on(screen: StartScreen) -> App {
        let mut app = create_app(StartupConfig {
            start_screen: screen,
            ..Default::default()
        });
        app.take_requests();
        app
    }

    #[test]
    fn test_home_requests_its_rows() {
        let mut app = create_app(StartupConfig::default());

        assert_eq!(app.screen, Screen::Home);
        assert_eq!(
            app.take_requests(),
            vec![
                FetchRequest::Trending(TrendingWindow::Day),
                FetchRequest::TopRated,
                FetchRequest::Popular,
            ]
        );
        assert!(app.take_requests().is_empty());
        assert!(app.top_rated.is_loading());
    }

    #[test]
    fn test_start_on_show_requests_details() {
        let mut app = create_app(StartupConfig {
            start_screen: StartScreen::Show(42),
            ..Default::default()
        });

        assert_eq!(app.screen, Screen::ShowDetail(42));
        assert_eq!(app.take_requests(), vec![FetchRequest::ShowDetails(42)]);
    }

    #[test]
    fn test_details_arrival_requests_first_season() {
        let mut app = app_on(StartScreen::Show(42));

        app.apply(FetchOutcome::ShowDetails(42, Ok(details(42, "Lost", &[0, 1, 2]))));

        assert_eq!(app.current_season_number(), Some(1));
        assert_eq!(
            app.take_requests(),
            vec![FetchRequest::Season {
                show_id: 42,
                season_number: 1
            }]
        );
    }

    #[test]
    fn test_season_navigation_clamps_and_requests() {
        let mut app = app_on(StartScreen::Show(42));
        app.apply(FetchOutcome::ShowDetails(42, Ok(details(42, "Lost", &[1, 2]))));
        app.take_requests();

        app.handle_key(key_event(KeyCode::Right), Instant::now());
        assert_eq!(app.current_season_number(), Some(2));
        assert_eq!(app.take_requests().len(), 1);

        app.handle_key(key_event(KeyCode::Right), Instant::now());
        assert_eq!(app.current_season_number(), Some(2));
        assert!(app.take_requests().is_empty());

        app.handle_key(key_event(KeyCode::Left), Instant::now());
        assert_eq!(app.current_season_number(), Some(1));
        // Season 1 is already loading
        assert!(app.take_requests().is_empty());
    }

    #[test]
    fn test_failed_fetch_shows_message() {
        let mut app = app_on(StartScreen::Home);

        app.apply(FetchOutcome::TopRated(Err(
            "Failed to fetch top rated shows".to_string()
        )));

        assert_eq!(
            app.top_rated,
            Loadable::Failed("Failed to fetch top rated shows".to_string())
        );
    }

    #[test]
    fn test_list_navigation_and_enter_opens_detail() {
        let mut app = app_on(StartScreen::Home);
        app.handle_key(key_event(KeyCode::Char('3')), Instant::now());
        app.apply(FetchOutcome::TopRated(Ok(vec![show(1, "A"), show(2, "B")])));

        app.handle_key(key_event(KeyCode::Down), Instant::now());
        app.handle_key(key_event(KeyCode::Down), Instant::now());
        assert_eq!(app.list_index, 1);

        app.handle_key(key_event(KeyCode::Enter), Instant::now());
        assert_eq!(app.screen, Screen::ShowDetail(2));

        app.handle_key(key_event(KeyCode::Esc), Instant::now());
        assert_eq!(app.screen, Screen::TopRated);
        app.handle_key(key_event(KeyCode::Esc), Instant::now());
        assert_eq!(app.screen, Screen::Home);
        app.handle_key(key_event(KeyCode::Esc), Instant::now());
        assert!(app.should_quit);
    }

    #[test]
    fn test_home_cursor_moves_across_rows() {
        let mut app = app_on(StartScreen::Home);
        app.apply(FetchOutcome::Trending(
            TrendingWindow::Day,
            Ok(vec![show(1, "A"), show(2, "B")]),
        ));
        app.apply(FetchOutcome::TopRated(Ok(vec![show(3, "C")])));

        app.handle_key(key_event(KeyCode::Right), Instant::now());
        assert_eq!(app.selected_show().map(|s| s.id), Some(2));
        assert_eq!(app.hero().map(|s| s.id), Some(1));

        app.handle_key(key_event(KeyCode::Down), Instant::now());
        assert_eq!(app.home_column, 0);
        assert_eq!(app.selected_show().map(|s| s.id), Some(3));
    }

    #[test]
    fn test_trending_toggle_requests_other_window() {
        let mut app = app_on(StartScreen::Home);
        app.handle_key(key_event(KeyCode::Char('2')), Instant::now());
        // Day was already requested by the home screen
        assert!(app.take_requests().is_empty());

        app.handle_key(key_event(KeyCode::Char('t')), Instant::now());

        assert_eq!(app.trending_window, TrendingWindow::Week);
        assert_eq!(
            app.take_requests(),
            vec![FetchRequest::Trending(TrendingWindow::Week)]
        );
    }

    #[test]
    fn test_genre_requested_on_every_visit() {
        let mut app = app_on(StartScreen::Genre(16));
        app.apply(FetchOutcome::Genre(16, Ok(vec![show(1, "A")])));

        app.handle_key(key_event(KeyCode::Right), Instant::now());
        assert_eq!(app.screen, Screen::Genre(35));
        app.handle_key(key_event(KeyCode::Left), Instant::now());
        assert_eq!(app.screen, Screen::Genre(16));

        assert_eq!(
            app.take_requests(),
            vec![FetchRequest::Genre(35), FetchRequest::Genre(16)]
        );
    }

    #[test]
    fn test_refresh_forces_requests() {
        let mut app = app_on(StartScreen::Home);
        app.apply(FetchOutcome::Popular(Ok(vec![show(1, "A")])));

        app.handle_key(key_event(KeyCode::Char('r')), Instant::now());

        assert_eq!(app.take_requests().len(), 3);
        assert!(app.popular.is_loading());
    }

    #[test]
    fn test_toggle_favorite_shows_toast() {
        let mut app = app_on(StartScreen::Home);
        app.apply(FetchOutcome::Trending(
            TrendingWindow::Day,
            Ok(vec![show(42, "Breaking Bad")]),
        ));
        let now = Instant::now();

        app.handle_key(key_event(KeyCode::Char('f')), now);
        assert!(app.favorites.is_favorite(42));
        assert_eq!(
            app.toast.as_ref().map(|t| t.message.as_str()),
            Some("Successfully bookmarked Breaking Bad")
        );

        app.handle_key(key_event(KeyCode::Char('f')), now);
        assert!(!app.favorites.is_favorite(42));
        assert_eq!(
            app.toast.as_ref().map(|t| t.message.as_str()),
            Some("Removed bookmark for Breaking Bad")
        );

        app.tick(now + TOAST_DURATION);
        assert!(app.toast.is_none());
    }

    #[test]
    fn test_toggle_favorite_on_detail_screen() {
        let mut app = app_on(StartScreen::Show(7));
        app.apply(FetchOutcome::ShowDetails(7, Ok(details(7, "Dark", &[1]))));

        app.handle_key(key_event(KeyCode::Char('f')), Instant::now());

        assert!(app.favorites.is_favorite(7));
    }

    #[test]
    fn test_favorites_screen_lists_favorites() {
        let mut app = app_on(StartScreen::Favorites);
        assert!(app.current_list().is_empty());

        app.favorites.add(show(3, "Dark").to_favorite());
        app.favorites.add(show(1, "Lost").to_favorite());

        let names: Vec<String> = app.current_list().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Lost", "Dark"]);
    }

    #[test]
    fn test_external_change_reloads_favorites() {
        let store = Arc::new(MemoryStore::new());
        let mut app = App::new(
            favorites_on(store.clone()),
            ImageUrls::new("https://image.tmdb.org/t/p"),
            StartupConfig {
                start_screen: StartScreen::Favorites,
                ..Default::default()
            },
        );
        let mut other = favorites_on(store.clone());

        other.add(show(9, "Fargo").to_favorite());
        assert!(!app.favorites.is_favorite(9));

        app.handle_change(&StorageChange::external(FAVORITES_KEY));
        assert!(app.favorites.is_favorite(9));

        store.remove(FAVORITES_KEY).unwrap();
        app.handle_change(&StorageChange::external(FAVORITES_KEY));
        assert!(app.favorites.is_empty());
    }

    #[test]
    fn test_search_overlay_debounces_requests() {
        let mut app = app_on(StartScreen::Home);
        let start = Instant::now();

        app.handle_key(key_event(KeyCode::Char('/')), start);
        assert!(app.search_open);
        for c in "lost".chars() {
            app.handle_key(key_event(KeyCode::Char(c)), start);
        }

        app.tick(start + Duration::from_millis(100));
        assert!(app.take_requests().is_empty());

        app.tick(start + Duration::from_millis(200));
        assert_eq!(
            app.take_requests(),
            vec![FetchRequest::Suggest("lost".to_string())]
        );

        app.tick(start + Duration::from_millis(300));
        assert_eq!(
            app.take_requests(),
            vec![FetchRequest::Search("lost".to_string())]
        );
    }

    #[test]
    fn test_search_short_query_issues_nothing() {
        let mut app = app_on(StartScreen::Home);
        let start = Instant::now();

        app.handle_key(key_event(KeyCode::Char('/')), start);
        app.handle_key(key_event(KeyCode::Char('o')), start);
        app.handle_key(key_event(KeyCode::Char('z')), start);
        app.tick(start + Duration::from_secs(5));

        assert!(app.take_requests().is_empty());
    }

    #[test]
    fn test_search_enter_opens_selected_result() {
        let mut app = app_on(StartScreen::Home);
        let start = Instant::now();
        app.handle_key(key_event(KeyCode::Char('/')), start);
        for c in "dark".chars() {
            app.handle_key(key_event(KeyCode::Char(c)), start);
        }
        app.apply(FetchOutcome::Search(Ok(page(vec![show(5, "Dark"), show(6, "Dark Matter")]))));

        app.handle_key(key_event(KeyCode::Down), start);
        app.handle_key(key_event(KeyCode::Down), start);
        app.handle_key(key_event(KeyCode::Enter), start);

        assert!(!app.search_open);
        assert_eq!(app.search.query(), "");
        assert_eq!(app.screen, Screen::ShowDetail(6));
    }

    #[test]
    fn test_search_keys_do_not_navigate() {
        let mut app = app_on(StartScreen::Home);
        app.handle_key(key_event(KeyCode::Char('/')), Instant::now());

        app.handle_key(key_event(KeyCode::Char('q')), Instant::now());
        app.handle_key(key_event(KeyCode::Char('3')), Instant::now());

        assert!(!app.should_quit);
        assert_eq!(app.screen, Screen::Home);
        assert_eq!(app.search.query(), "q3");

        app.handle_key(key_event(KeyCode::Esc), Instant::now());
        assert!(!app.search_open);
        assert_eq!(app.search.query(), "");
    }

    #[test]
    fn test_help_overlay_intercepts_keys() {
        let mut app = app_on(StartScreen::Home);

        app.handle_key(key_event(KeyCode::Char('?')), Instant::now());
        assert!(app.show_help);

        app.handle_key(key_event(KeyCode::Char('3')), Instant::now());
        assert_eq!(app.screen, Screen::Home);

        app.handle_key(key_event(KeyCode::Esc), Instant::now());
        assert!(!app.show_help);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits_from_search() {
        let mut app = app_on(StartScreen::Home);
        app.handle_key(key_event(KeyCode::Char('/')), Instant::now());

        app.handle_key(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Instant::now(),
        );

        assert!(app.should_quit);
    }

    #[test]
    fn test_screen_titles() {
        assert_eq!(Screen::Genre(16).title(), "Animation Shows");
        assert_eq!(Screen::Favorites.title(), "My Favorites");
        assert_eq!(HomeRow::Popular.title(), "Popular Shows");
    }
}
