//! Web layer for the bus tracker.
//!
//! Exposes the transit queries as JSON endpoints and serves the static
//! datasets.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, BusService};
