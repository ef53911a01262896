//! Bus tracker server.
//!
//! Answers "where is my bus?" against TheBus live data: route search,
//! vehicle tracking, stop arrivals, and nearest stops from the static
//! datasets.

pub mod datasets;
pub mod domain;
pub mod nearby;
pub mod service;
pub mod thebus;
pub mod web;
