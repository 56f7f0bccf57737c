use std::fmt;
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::models::{Listing, ViewMode};
use crate::query::criteria::FilterCriteria;
use crate::query::filter::filter_listings;
use crate::query::paginate::{Window, DEFAULT_PAGE_SIZE};
use crate::query::sort::{sort_in_place, SortKey};
use crate::query::url_state::{self, UrlState};

/// Where a search session currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    /// Nothing searched yet
    Idle,
    /// A search was dispatched and its results are pending
    Loading,
    /// Results are on screen; `more` says whether "load more" applies
    Displaying { more: bool },
    /// The last search matched nothing
    NoResults,
}

/// Snapshot of the criteria a search was dispatched with
#[derive(Debug, Clone)]
pub struct SearchTicket {
    generation: u64,
    criteria: FilterCriteria,
    sort: SortKey,
}

impl SearchTicket {
    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }
}

/// Listings to hand to the renderer
#[derive(Debug, Clone, Copy)]
pub struct Batch<'a> {
    pub listings: &'a [Listing],
    /// Replace what is on screen rather than append
    pub replace: bool,
    pub view: ViewMode,
}

/// Result counter shown above the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultCount {
    pub displayed: usize,
    pub total: usize,
}

impl fmt::Display for ResultCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = if self.total > 1 { "s" } else { "" };
        if self.total == 0 {
            f.write_str("No results found")
        } else if self.displayed >= self.total {
            write!(f, "{} listing{plural} found", self.total)
        } else {
            write!(f, "{} of {} listings shown", self.displayed, self.total)
        }
    }
}

/// Owns the catalog and all filter/sort/pagination state of one search page
///
/// State only changes through the operations below. `filtered` is recomputed
/// in full on every search; what is displayed is always a prefix of it.
#[derive(Debug)]
pub struct QueryEngine {
    catalog: Catalog,
    criteria: FilterCriteria,
    sort: SortKey,
    view: ViewMode,
    filtered: Vec<Listing>,
    window: Window,
    state: SearchState,
    generation: u64,
}

impl QueryEngine {
    pub fn new(catalog: Catalog) -> Self {
        Self::with_page_size(catalog, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(catalog: Catalog, page_size: usize) -> Self {
        Self {
            catalog,
            criteria: FilterCriteria::default(),
            sort: SortKey::default(),
            view: ViewMode::default(),
            filtered: Vec::new(),
            window: Window::new(page_size),
            state: SearchState::Idle,
            generation: 0,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn filtered(&self) -> &[Listing] {
        &self.filtered
    }

    pub fn displayed(&self) -> &[Listing] {
        &self.filtered[..self.window.displayed()]
    }

    /// Next page to fetch
    pub fn page(&self) -> usize {
        self.window.page()
    }

    pub fn page_size(&self) -> usize {
        self.window.page_size()
    }

    pub fn load_more_visible(&self) -> bool {
        matches!(self.state, SearchState::Displaying { more: true })
    }

    pub fn result_count(&self) -> ResultCount {
        ResultCount {
            displayed: self.window.displayed(),
            total: self.filtered.len(),
        }
    }

    /// Current state as a URL query string
    pub fn query_string(&self) -> String {
        url_state::serialize(&self.criteria, self.sort)
    }

    /// Replace criteria and sort with what a URL carries
    pub fn apply_url(&mut self, query: &str) {
        let UrlState { criteria, sort } = url_state::parse(query);
        self.criteria = criteria;
        self.sort = sort;
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
    }

    /// Snapshot the current criteria and mark the session as loading
    ///
    /// Any ticket handed out earlier becomes stale.
    pub fn begin_search(&mut self) -> SearchTicket {
        self.generation += 1;
        self.state = SearchState::Loading;
        SearchTicket {
            generation: self.generation,
            criteria: self.criteria.clone(),
            sort: self.sort,
        }
    }

    /// Run the search for `ticket` and issue its first page
    ///
    /// Returns `None` when a newer search was dispatched in the meantime.
    pub fn complete_search(&mut self, ticket: SearchTicket) -> Option<Batch<'_>> {
        if ticket.generation != self.generation {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale search results"
            );
            return None;
        }
        Some(self.run(&ticket.criteria, ticket.sort))
    }

    /// Dispatch and complete a search on the current criteria in one step
    pub fn search(&mut self) -> Batch<'_> {
        let ticket = self.begin_search();
        self.run(&ticket.criteria, ticket.sort)
    }

    /// Append the next page to the displayed set
    ///
    /// Does nothing before the first search or while one is in flight.
    pub fn load_more(&mut self) -> Batch<'_> {
        if matches!(self.state, SearchState::Idle | SearchState::Loading) {
            debug!(state = ?self.state, "ignoring load more");
            return Batch {
                listings: &[],
                replace: false,
                view: self.view,
            };
        }
        self.next_batch()
    }

    fn next_batch(&mut self) -> Batch<'_> {
        let replace = self.window.page() == 1;
        let listings = self.window.advance(&self.filtered);
        self.state = if self.filtered.is_empty() {
            SearchState::NoResults
        } else {
            SearchState::Displaying {
                more: self.window.has_more(self.filtered.len()),
            }
        };
        debug!(
            shown = self.window.displayed(),
            total = self.filtered.len(),
            page = self.window.page(),
            "page loaded"
        );
        Batch {
            listings,
            replace,
            view: self.view,
        }
    }

    /// Switch between grid and list, re-issuing the first page
    ///
    /// Filtering is not re-run. Returns `None` when there is nothing to show;
    /// before the first search the view is only remembered.
    pub fn set_view(&mut self, view: ViewMode) -> Option<Batch<'_>> {
        self.view = view;
        if self.filtered.is_empty()
            || matches!(self.state, SearchState::Idle | SearchState::Loading)
        {
            return None;
        }
        self.window.reset();
        Some(self.next_batch())
    }

    /// Clear every filter, restore the default sort and search again
    pub fn reset(&mut self) -> Batch<'_> {
        self.criteria = FilterCriteria::default();
        self.sort = SortKey::default();
        self.search()
    }

    fn run(&mut self, criteria: &FilterCriteria, sort: SortKey) -> Batch<'_> {
        let mut filtered = filter_listings(self.catalog.listings(), criteria);
        sort_in_place(&mut filtered, sort);
        info!(
            results = filtered.len(),
            catalog = self.catalog.len(),
            sort = %sort,
            "search completed"
        );
        self.filtered = filtered;
        self.window.reset();
        self.next_batch()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::listing;

    fn engine_with(count: u64) -> QueryEngine {
        let listings = (1..=count).map(|i| listing(i, i * 1000)).collect();
        QueryEngine::new(Catalog::new(listings).unwrap())
    }

    #[test]
    fn starts_idle() {
        let engine = engine_with(3);
        assert_eq!(engine.state(), SearchState::Idle);
        assert!(engine.displayed().is_empty());
        assert_eq!(engine.page(), 1);
        assert!(!engine.load_more_visible());
    }

    #[test]
    fn search_issues_first_page() {
        let mut engine = engine_with(20);
        let batch = engine.search();
        assert_eq!(batch.listings.len(), 9);
        assert!(batch.replace);
        assert_eq!(engine.state(), SearchState::Displaying { more: true });
        assert_eq!(engine.page(), 2);
        assert_eq!(engine.result_count().to_string(), "9 of 20 listings shown");
    }

    #[test]
    fn load_more_until_exhausted() {
        let mut engine = engine_with(20);
        engine.search();
        let second = engine.load_more();
        assert!(!second.replace);
        assert_eq!(second.listings.len(), 9);
        assert_eq!(engine.displayed().len(), 18);
        assert!(engine.load_more_visible());

        let third = engine.load_more();
        assert_eq!(third.listings.len(), 2);
        assert_eq!(engine.displayed().len(), 20);
        assert!(!engine.load_more_visible());
        assert_eq!(engine.result_count().to_string(), "20 listings found");

        assert!(engine.load_more().listings.is_empty());
        assert_eq!(engine.page(), 4);
    }

    #[test]
    fn empty_results_hide_load_more() {
        let mut engine = engine_with(5);
        engine.set_criteria(FilterCriteria {
            min_price: 1_000_000,
            ..FilterCriteria::default()
        });
        let batch = engine.search();
        assert!(batch.listings.is_empty());
        assert_eq!(engine.state(), SearchState::NoResults);
        assert!(!engine.load_more_visible());
        assert_eq!(engine.result_count().to_string(), "No results found");
    }

    #[test]
    fn stale_ticket_is_dropped() {
        let mut engine = engine_with(5);
        let first = engine.begin_search();
        engine.set_criteria(FilterCriteria {
            max_price: Some(2000),
            ..FilterCriteria::default()
        });
        let second = engine.begin_search();

        assert!(engine.complete_search(first).is_none());
        assert_eq!(engine.state(), SearchState::Loading);

        let batch = engine.complete_search(second).unwrap();
        assert_eq!(batch.listings.len(), 2);
    }

    #[test]
    fn ticket_snapshots_criteria_at_dispatch() {
        let mut engine = engine_with(5);
        let ticket = engine.begin_search();
        assert!(ticket.criteria().is_default());
        // edits after dispatch do not leak into the running search
        engine.set_criteria(FilterCriteria {
            min_price: 4000,
            ..FilterCriteria::default()
        });
        assert_eq!(engine.complete_search(ticket).unwrap().listings.len(), 5);
    }

    #[test]
    fn view_change_rewindows_without_refiltering() {
        let mut engine = engine_with(20);
        engine.search();
        engine.load_more();
        let batch = engine.set_view(ViewMode::List).unwrap();
        assert!(batch.replace);
        assert_eq!(batch.view, ViewMode::List);
        assert_eq!(batch.listings.len(), 9);
        assert_eq!(engine.displayed().len(), 9);
        assert_eq!(engine.page(), 2);
    }

    #[test]
    fn load_more_waits_for_pending_search() {
        let mut engine = engine_with(20);
        assert!(engine.load_more().listings.is_empty());
        assert_eq!(engine.state(), SearchState::Idle);

        engine.search();
        let ticket = engine.begin_search();
        let batch = engine.load_more();
        assert!(batch.listings.is_empty());
        assert_eq!(engine.state(), SearchState::Loading);
        assert_eq!(engine.displayed().len(), 9);

        engine.complete_search(ticket).unwrap();
        assert_eq!(engine.load_more().listings.len(), 9);
        assert_eq!(engine.displayed().len(), 18);
    }

    #[test]
    fn view_chosen_before_first_search() {
        let mut engine = engine_with(3);
        assert!(engine.set_view(ViewMode::List).is_none());
        assert_eq!(engine.state(), SearchState::Idle);

        let batch = engine.search();
        assert_eq!(batch.view, ViewMode::List);
        assert_eq!(batch.listings.len(), 3);
    }

    #[test]
    fn view_change_with_nothing_filtered() {
        let mut engine = engine_with(0);
        engine.search();
        assert!(engine.set_view(ViewMode::List).is_none());
        assert_eq!(engine.view(), ViewMode::List);
    }

    #[test]
    fn reset_restores_defaults_and_url() {
        let mut engine = engine_with(12);
        engine.apply_url("minPrice=5000&sort=recent");
        assert_eq!(engine.query_string(), "minPrice=5000&sort=recent");
        engine.search();
        assert_eq!(engine.filtered().len(), 8);

        let batch = engine.reset();
        assert_eq!(batch.listings[0].id, 1);
        assert_eq!(engine.filtered().len(), 12);
        assert_eq!(engine.query_string(), "");
    }
}
