//! The search pipeline: filter, sort, paginate and URL state.

pub mod criteria;
pub mod engine;
pub mod filter;
pub mod paginate;
pub mod sort;
pub mod url_state;

pub use criteria::{CountFilter, FilterCriteria, FilterInput};
pub use engine::{Batch, QueryEngine, ResultCount, SearchState, SearchTicket};
pub use filter::{filter_listings, matches};
pub use paginate::{next_page, Window, DEFAULT_PAGE_SIZE};
pub use sort::{sort_listings, SortKey};
pub use url_state::UrlState;
