//! Session-scoped entry point for every transit query.
//!
//! `TransitService` owns the request client and the dataset cache. It is
//! built once at startup and shared; callers get normalized records or a
//! [`QueryError`].

use tracing::{debug, warn};

use crate::datasets::{DatasetCache, DatasetConfig, DatasetError, DatasetFetcher};
use crate::domain::{LatLon, Route, RouteShape, RouteStopSequence, StopArrivals, VehicleReport};
use crate::nearby::{DEFAULT_NEAREST, NearbyStop, find_nearest};
use crate::thebus::{TransitClient, TransitError, Transport};

/// Errors surfaced by [`TransitService`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Transit(#[from] TransitError),

    /// Detail stays in the source error and the log.
    #[error("reference data unavailable")]
    Dataset(#[from] DatasetError),

    #[error("location unavailable; allow location access or enter coordinates")]
    GeolocationUnavailable,

    #[error("{0} not found")]
    NotFound(String),
}

/// Transit queries over one client and one dataset cache.
pub struct TransitService<T, F> {
    client: TransitClient<T>,
    datasets: DatasetCache<F>,
}

impl<T: Transport, F: DatasetFetcher> TransitService<T, F> {
    pub fn new(client: TransitClient<T>, fetcher: F, config: DatasetConfig) -> Self {
        Self {
            client,
            datasets: DatasetCache::new(fetcher, config),
        }
    }

    /// The dataset cache, for warm-up and inspection.
    pub fn datasets(&self) -> &DatasetCache<F> {
        &self.datasets
    }

    /// Search routes by number, optionally narrowed to a headsign.
    ///
    /// Long names come from the route shapes dataset. If that dataset cannot
    /// be loaded the routes are returned without them.
    pub async fn search_routes(
        &self,
        credential: &str,
        route: &str,
        headsign: Option<&str>,
    ) -> Result<Vec<Route>, QueryError> {
        let mut routes = self.client.search_routes(credential, route, headsign).await?;

        match self.datasets.route_shapes().await {
            Ok(shapes) => {
                for route in routes.iter_mut().filter(|r| r.long_name.is_none()) {
                    route.long_name = shapes
                        .get(&route.display_name)
                        .map(|shape| shape.long_name.clone())
                        .filter(|name| !name.is_empty());
                }
            }
            Err(e) => warn!(error = %e, "route names unavailable, returning routes without them"),
        }

        debug!(count = routes.len(), "route search complete");
        Ok(routes)
    }

    /// Live position and status of one vehicle.
    pub async fn track_vehicle(
        &self,
        credential: &str,
        number: &str,
    ) -> Result<VehicleReport, QueryError> {
        Ok(self.client.track_vehicle(credential, number).await?)
    }

    /// Upcoming arrivals at a stop.
    pub async fn get_arrivals(
        &self,
        credential: &str,
        stop: &str,
    ) -> Result<StopArrivals, QueryError> {
        Ok(self.client.get_arrivals(credential, stop).await?)
    }

    /// The `k` stops nearest to a caller-supplied location.
    ///
    /// A missing coordinate means the caller could not determine its
    /// position. `k` defaults to [`DEFAULT_NEAREST`].
    pub async fn find_nearest_stops(
        &self,
        lat: Option<f64>,
        lon: Option<f64>,
        k: Option<usize>,
    ) -> Result<Vec<NearbyStop>, QueryError> {
        let origin = LatLon::from_parts(lat, lon).ok_or(QueryError::GeolocationUnavailable)?;
        let stops = self.datasets.stops().await.map_err(load_failed)?;
        Ok(find_nearest(origin, &stops, k.unwrap_or(DEFAULT_NEAREST)))
    }

    /// Drawable shape variants of a route, by short name.
    pub async fn route_shape(&self, route_name: &str) -> Result<RouteShape, QueryError> {
        let shapes = self.datasets.route_shapes().await.map_err(load_failed)?;
        shapes
            .get(route_name)
            .cloned()
            .ok_or_else(|| QueryError::NotFound(format!("route {route_name}")))
    }

    /// Ordered stops of a route, by route id.
    pub async fn route_stops(&self, route_id: &str) -> Result<RouteStopSequence, QueryError> {
        let sequences = self.datasets.route_stops().await.map_err(load_failed)?;
        sequences
            .get(route_id)
            .cloned()
            .ok_or_else(|| QueryError::NotFound(format!("route {route_id}")))
    }
}

fn load_failed(err: DatasetError) -> QueryError {
    warn!(resource = err.resource(), error = %err, "dataset load failed");
    QueryError::Dataset(err)
}
