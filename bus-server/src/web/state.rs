//! Application state for the web layer.

use std::sync::Arc;

use crate::datasets::DatasetSource;
use crate::service::TransitService;
use crate::thebus::ReqwestTransport;

/// The service as deployed: real HTTP transport and a configured dataset source.
pub type BusService = TransitService<ReqwestTransport, DatasetSource>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Transit queries and cached datasets
    pub service: Arc<BusService>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(service: BusService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}
