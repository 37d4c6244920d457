//! Type-ahead search box
//!
//! Keystrokes only move deadlines: a full search fires 300 ms after the last
//! edit and a suggestion lookup 200 ms after it. Each edit replaces both
//! pending deadlines, so a burst of typing yields one request per kind.
//! Requests already handed out are never cancelled and their responses are
//! applied whenever they arrive.
//!
//! ```text
//! Idle -> Querying -> Results | Empty | Error
//!            ^------------- further input
//! any state -- clear --> Idle
//! ```

use std::time::{Duration, Instant};

use crate::data::{ShowPage, TvShow};

/// Quiet period before a full search is issued
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Quiet period before suggestions are looked up
pub const SUGGEST_DEBOUNCE: Duration = Duration::from_millis(200);

/// Queries must be longer than this (trimmed, in characters) to be sent
pub const MIN_QUERY_LEN: usize = 2;

/// Number of suggested names kept from a response
pub const MAX_SUGGESTIONS: usize = 6;

/// Number of results shown in the dropdown
pub const MAX_VISIBLE_RESULTS: usize = 8;

/// Where the search box is in its lifecycle
#[derive(Debug, Clone, PartialEq)]
pub enum SearchState {
    Idle,
    Querying,
    Results(Vec<TvShow>),
    Empty,
    Error(String),
}

/// Request the box wants issued
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchRequest {
    /// Full search whose response fills the result list
    Search(String),
    /// Lookup whose response fills the suggestion row
    Suggest(String),
}

#[derive(Debug, Clone)]
struct Pending {
    due: Instant,
    query: String,
}

/// Search input, its pending deadlines and the latest results
#[derive(Debug, Clone)]
pub struct SearchBox {
    query: String,
    state: SearchState,
    suggestions: Vec<String>,
    selected: Option<usize>,
    search: Option<Pending>,
    suggest: Option<Pending>,
}

impl Default for SearchBox {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchBox {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            state: SearchState::Idle,
            suggestions: Vec::new(),
            selected: None,
            search: None,
            suggest: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Whether the query is long enough to search
    pub fn is_active(&self) -> bool {
        is_searchable(&self.query)
    }

    /// Whether any request is still waiting for its deadline
    pub fn has_pending(&self) -> bool {
        self.search.is_some() || self.suggest.is_some()
    }

    pub fn push_char(&mut self, c: char, now: Instant) {
        self.query.push(c);
        self.on_input(now);
    }

    pub fn pop_char(&mut self, now: Instant) {
        if self.query.pop().is_some() {
            self.on_input(now);
        }
    }

    /// Replaces the whole query, as picking a suggestion does
    pub fn set_query(&mut self, query: &str, now: Instant) {
        self.query = query.to_string();
        self.on_input(now);
    }

    /// Explicit clear: empty query, nothing pending, back to `Idle`
    pub fn clear(&mut self) {
        self.query.clear();
        self.reset();
    }

    fn reset(&mut self) {
        self.state = SearchState::Idle;
        self.suggestions.clear();
        self.selected = None;
        self.search = None;
        self.suggest = None;
    }

    fn on_input(&mut self, now: Instant) {
        if !is_searchable(&self.query) {
            self.reset();
            return;
        }

        let query = self.query.trim().to_string();
        self.selected = None;
        self.state = SearchState::Querying;
        self.search = Some(Pending {
            due: now + SEARCH_DEBOUNCE,
            query: query.clone(),
        });
        self.suggest = Some(Pending {
            due: now + SUGGEST_DEBOUNCE,
            query,
        });
    }

    /// Hands out every request whose deadline has passed by `now`
    pub fn poll(&mut self, now: Instant) -> Vec<SearchRequest> {
        let mut requests = Vec::new();
        if let Some(pending) = take_due(&mut self.suggest, now) {
            requests.push(SearchRequest::Suggest(pending.query));
        }
        if let Some(pending) = take_due(&mut self.search, now) {
            requests.push(SearchRequest::Search(pending.query));
        }
        requests
    }

    /// Applies a search response
    ///
    /// Responses land even if the query has moved on; only a box that was
    /// reset to `Idle` ignores them.
    pub fn apply_results(&mut self, result: Result<ShowPage<TvShow>, String>) {
        if self.state == SearchState::Idle {
            return;
        }
        self.selected = None;
        self.state = match result {
            Ok(page) if page.results.is_empty() => SearchState::Empty,
            Ok(page) => SearchState::Results(page.results),
            Err(message) => SearchState::Error(message),
        };
    }

    /// Applies a suggestion response: the first few non-empty names
    pub fn apply_suggestions(&mut self, result: Result<ShowPage<TvShow>, String>) {
        if self.state == SearchState::Idle {
            return;
        }
        match result {
            Ok(page) => {
                self.suggestions = page
                    .results
                    .into_iter()
                    .map(|show| show.name)
                    .filter(|name| !name.is_empty())
                    .take(MAX_SUGGESTIONS)
                    .collect();
            }
            Err(message) => {
                tracing::debug!(%message, "Suggestions unavailable");
                self.suggestions.clear();
            }
        }
    }

    /// Results currently shown in the dropdown
    pub fn visible_results(&self) -> &[TvShow] {
        match &self.state {
            SearchState::Results(results) => &results[..results.len().min(MAX_VISIBLE_RESULTS)],
            _ => &[],
        }
    }

    /// Whether results were cut to fit the dropdown
    pub fn is_truncated(&self) -> bool {
        matches!(&self.state, SearchState::Results(results) if results.len() > MAX_VISIBLE_RESULTS)
    }

    /// Moves the highlight down, stopping at the last visible result
    pub fn select_next(&mut self) {
        let count = self.visible_results().len();
        if count == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            None => 0,
            Some(i) => (i + 1).min(count - 1),
        });
    }

    /// Moves the highlight up; moving up from the first result clears it
    pub fn select_previous(&mut self) {
        self.selected = match self.selected {
            None | Some(0) => None,
            Some(i) => Some(i - 1),
        };
    }

    pub fn selected_show(&self) -> Option<&TvShow> {
        self.selected.and_then(|i| self.visible_results().get(i))
    }
}

fn is_searchable(query: &str) -> bool {
    query.trim().chars().count() > MIN_QUERY_LEN
}

fn take_due(slot: &mut Option<Pending>, now: Instant) -> Option<Pending> {
    match slot {
        Some(pending) if pending.due <= now => slot.take(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn type_text(search: &mut SearchBox, text: &str, start: Instant, gap: Duration) -> Instant {
        let mut now = start;
        for c in text.chars() {
            search.push_char(c, now);
            now += gap;
        }
        now - gap
    }

    fn page(names: &[&str]) -> ShowPage<TvShow> {
        let results = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                serde_json::from_value(serde_json::json!({"id": i as u64 + 1, "name": name}))
                    .unwrap()
            })
            .collect();
        ShowPage {
            page: 1,
            results,
            total_pages: 1,
            total_results: names.len() as u32,
        }
    }

    fn count_searches(requests: &[SearchRequest]) -> usize {
        requests
            .iter()
            .filter(|r| matches!(r, SearchRequest::Search(_)))
            .count()
    }

    #[test]
    fn test_short_input_never_requests() {
        let start = Instant::now();
        let mut search = SearchBox::new();

        type_text(&mut search, "ab", start, ms(50));

        assert!(search.poll(start + ms(5_000)).is_empty());
        assert_eq!(search.state(), &SearchState::Idle);
        assert!(!search.is_active());
    }

    #[test]
    fn test_padded_short_input_never_requests() {
        let start = Instant::now();
        let mut search = SearchBox::new();

        search.set_query("  ab  ", start);

        assert!(search.poll(start + ms(1_000)).is_empty());
    }

    #[test]
    fn test_burst_of_typing_yields_one_search() {
        let start = Instant::now();
        let mut search = SearchBox::new();

        let last = type_text(&mut search, "breaking", start, ms(100));

        // Nothing fires while the user keeps typing within the window
        let mut requests = Vec::new();
        let mut now = start;
        while now < last + SEARCH_DEBOUNCE - ms(1) {
            requests.extend(search.poll(now));
            now += ms(10);
        }
        assert_eq!(count_searches(&requests), 0);

        requests.extend(search.poll(last + SEARCH_DEBOUNCE));
        requests.extend(search.poll(last + ms(10_000)));
        assert_eq!(count_searches(&requests), 1);
        assert!(requests.contains(&SearchRequest::Search("breaking".to_string())));
    }

    #[test]
    fn test_suggestions_fire_before_search() {
        let start = Instant::now();
        let mut search = SearchBox::new();
        search.set_query("lost", start);

        assert!(search.poll(start + ms(199)).is_empty());
        assert_eq!(
            search.poll(start + SUGGEST_DEBOUNCE),
            vec![SearchRequest::Suggest("lost".to_string())]
        );
        assert_eq!(
            search.poll(start + SEARCH_DEBOUNCE),
            vec![SearchRequest::Search("lost".to_string())]
        );
        assert!(!search.has_pending());
    }

    #[test]
    fn test_separate_windows_each_search_once() {
        let start = Instant::now();
        let mut search = SearchBox::new();

        search.set_query("lost", start);
        let first = search.poll(start + ms(400));
        search.push_char('!', start + ms(1_000));
        let second = search.poll(start + ms(1_400));

        assert_eq!(count_searches(&first), 1);
        assert_eq!(count_searches(&second), 1);
        assert!(second.contains(&SearchRequest::Search("lost!".to_string())));
    }

    #[test]
    fn test_state_transitions() {
        let start = Instant::now();
        let mut search = SearchBox::new();
        assert_eq!(search.state(), &SearchState::Idle);

        search.set_query("dark", start);
        assert_eq!(search.state(), &SearchState::Querying);

        search.apply_results(Ok(page(&["Dark"])));
        assert!(matches!(search.state(), SearchState::Results(r) if r.len() == 1));

        search.push_char('e', start + ms(10));
        assert_eq!(search.state(), &SearchState::Querying);

        search.apply_results(Ok(page(&[])));
        assert_eq!(search.state(), &SearchState::Empty);

        search.push_char('r', start + ms(20));
        search.apply_results(Err("Failed to search shows".to_string()));
        assert_eq!(
            search.state(),
            &SearchState::Error("Failed to search shows".to_string())
        );

        search.clear();
        assert_eq!(search.state(), &SearchState::Idle);
        assert!(search.query().is_empty());
        assert!(!search.has_pending());
    }

    #[test]
    fn test_late_response_after_clear_is_ignored() {
        let start = Instant::now();
        let mut search = SearchBox::new();
        search.set_query("dark", start);
        search.clear();

        search.apply_results(Ok(page(&["Dark"])));

        assert_eq!(search.state(), &SearchState::Idle);
    }

    #[test]
    fn test_out_of_order_response_is_applied() {
        let start = Instant::now();
        let mut search = SearchBox::new();
        search.set_query("the office", start);
        search.set_query("the wire", start + ms(500));

        // Response for the older query arrives last and still lands
        search.apply_results(Ok(page(&["The Office"])));

        assert_eq!(search.visible_results()[0].name, "The Office");
    }

    #[test]
    fn test_suggestions_are_capped_and_skip_blank_names() {
        let start = Instant::now();
        let mut search = SearchBox::new();
        search.set_query("star", start);

        search.apply_suggestions(Ok(page(&["Star Trek", "", "Stargate", "A", "B", "C", "D", "E"])));

        assert_eq!(search.suggestions().len(), MAX_SUGGESTIONS);
        assert_eq!(search.suggestions()[1], "Stargate");
    }

    #[test]
    fn test_short_input_clears_suggestions() {
        let start = Instant::now();
        let mut search = SearchBox::new();
        search.set_query("star", start);
        search.apply_suggestions(Ok(page(&["Star Trek"])));

        search.set_query("st", start + ms(10));

        assert!(search.suggestions().is_empty());
    }

    #[test]
    fn test_dropdown_shows_first_eight_results() {
        let start = Instant::now();
        let mut search = SearchBox::new();
        search.set_query("show", start);
        let names: Vec<String> = (0..12).map(|i| format!("Show {}", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();

        search.apply_results(Ok(page(&refs)));

        assert_eq!(search.visible_results().len(), MAX_VISIBLE_RESULTS);
        assert!(search.is_truncated());
    }

    #[test]
    fn test_selection_is_clamped() {
        let start = Instant::now();
        let mut search = SearchBox::new();
        search.set_query("dark", start);
        search.apply_results(Ok(page(&["Dark", "Dark Matter"])));

        search.select_next();
        search.select_next();
        search.select_next();
        assert_eq!(search.selected(), Some(1));
        assert_eq!(search.selected_show().map(|s| s.name.as_str()), Some("Dark Matter"));

        search.select_previous();
        search.select_previous();
        assert_eq!(search.selected(), None);
    }

    #[test]
    fn test_selection_without_results_is_noop() {
        let mut search = SearchBox::new();
        search.select_next();
        assert_eq!(search.selected(), None);
    }
}
