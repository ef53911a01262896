//! Static reference datasets: stops, route shapes, and route stop sequences.
//!
//! The datasets are produced offline from the GTFS feed and served as JSON
//! files. They are loaded on first use and kept for the rest of the session.

mod cache;
mod error;
mod fetcher;
mod types;

pub use cache::{DatasetCache, DatasetConfig, DatasetKind, RouteShapes, RouteStopSequences};
pub use error::DatasetError;
pub use fetcher::{DatasetFetcher, DatasetSource};
