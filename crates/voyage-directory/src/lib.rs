//! Travel directory client for Voyage.
//!
//! Wire types for points of interest and the filter vocabularies, the
//! `PoiDirectory` seam the search engine depends on, and an HTTP
//! implementation of it.

pub mod client;
pub mod error;
pub mod types;

pub use client::{DirectoryClient, PoiDirectory};
pub use error::DirectoryError;
pub use types::{City, Country, Poi, PoiQuery, Tag};
