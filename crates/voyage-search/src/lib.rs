//! Search state engine for Voyage.
//!
//! Turns the query string of the search page into a filtered, paginated
//! view of points of interest and writes user interactions back into it,
//! so a search survives reloads and can be shared as a link.
//!
//! The pure pieces (`state`, `actions`, `refine`, `pagination`) carry no
//! I/O; `engine` composes them with the directory, the query store, the
//! name debouncer and cancellable fetches.

pub mod actions;
pub mod debounce;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod pagination;
pub mod params;
pub mod refine;
pub mod state;
pub mod store;
pub mod vocabulary;

#[cfg(test)]
pub(crate) mod test_support;

pub use actions::Transition;
pub use debounce::Debouncer;
pub use engine::{SearchEngine, SearchSettings, SearchView};
pub use error::FetchError;
pub use fetch::{build_poi_query, fetch_pois};
pub use pagination::{page_numbers, total_pages, PageLabel, ResultRange, PAGE_SIZE};
pub use params::QueryParams;
pub use state::{compute_query_state, FilterState};
pub use store::{HistoryMode, MemoryQueryStore, QueryStore};
pub use vocabulary::FilterVocabulary;
