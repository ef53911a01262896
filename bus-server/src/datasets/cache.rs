//! Session-lifetime cache for the static datasets.
//!
//! Each dataset is fetched at most once: concurrent first requests share a
//! single in-flight load, and the result is kept until the cache is dropped.
//! A failed load is not stored, so the next request tries again.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use moka::future::Cache as MokaCache;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::domain::{RouteShape, RouteStopSequence, Stop};

use super::error::DatasetError;
use super::fetcher::DatasetFetcher;
use super::types::{self, RouteShapeRecord, RouteStopsRecord, StopRecord};

/// Route shapes keyed by route short name.
pub type RouteShapes = HashMap<String, RouteShape>;

/// Stop sequences keyed by route id.
pub type RouteStopSequences = HashMap<String, RouteStopSequence>;

/// The three bulk datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    Stops,
    RouteShapes,
    RouteStops,
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DatasetKind::Stops => "stops",
            DatasetKind::RouteShapes => "route shapes",
            DatasetKind::RouteStops => "route stops",
        })
    }
}

/// Resource names of the datasets.
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    pub stops: String,
    pub route_shapes: String,
    pub route_stops: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            stops: "stops.json".to_string(),
            route_shapes: "routes-shapes.json".to_string(),
            route_stops: "route-stops.json".to_string(),
        }
    }
}

impl DatasetConfig {
    pub fn resource(&self, kind: DatasetKind) -> &str {
        match kind {
            DatasetKind::Stops => &self.stops,
            DatasetKind::RouteShapes => &self.route_shapes,
            DatasetKind::RouteStops => &self.route_stops,
        }
    }
}

/// Lazily loaded, memoized static datasets.
///
/// Values are handed out as `Arc`s and never mutated after loading.
pub struct DatasetCache<F> {
    fetcher: F,
    config: DatasetConfig,
    stops: MokaCache<DatasetKind, Arc<Vec<Stop>>>,
    route_shapes: MokaCache<DatasetKind, Arc<RouteShapes>>,
    route_stops: MokaCache<DatasetKind, Arc<RouteStopSequences>>,
}

impl<F: DatasetFetcher> DatasetCache<F> {
    /// Create an empty cache. Nothing is fetched until first use.
    pub fn new(fetcher: F, config: DatasetConfig) -> Self {
        // No capacity bound and no expiry: entries live as long as the cache.
        Self {
            fetcher,
            config,
            stops: MokaCache::builder().build(),
            route_shapes: MokaCache::builder().build(),
            route_stops: MokaCache::builder().build(),
        }
    }

    /// All stops.
    pub async fn stops(&self) -> Result<Arc<Vec<Stop>>, DatasetError> {
        let kind = DatasetKind::Stops;
        self.stops
            .try_get_with(kind, async {
                let records: Vec<StopRecord> = self.load(kind).await?;
                let stops: Vec<Stop> = records.into_iter().map(Into::into).collect();
                info!(count = stops.len(), "loaded stops");
                Ok::<_, DatasetError>(Arc::new(stops))
            })
            .await
            .map_err(unshare)
    }

    /// Route shapes keyed by route short name.
    pub async fn route_shapes(&self) -> Result<Arc<RouteShapes>, DatasetError> {
        let kind = DatasetKind::RouteShapes;
        self.route_shapes
            .try_get_with(kind, async {
                let records: HashMap<String, RouteShapeRecord> = self.load(kind).await?;
                let shapes = types::route_shapes(records);
                info!(count = shapes.len(), "loaded route shapes");
                Ok::<_, DatasetError>(Arc::new(shapes))
            })
            .await
            .map_err(unshare)
    }

    /// Stop sequences keyed by route id.
    pub async fn route_stops(&self) -> Result<Arc<RouteStopSequences>, DatasetError> {
        let kind = DatasetKind::RouteStops;
        self.route_stops
            .try_get_with(kind, async {
                let records: HashMap<String, RouteStopsRecord> = self.load(kind).await?;
                let sequences = types::route_stop_sequences(records);
                info!(count = sequences.len(), "loaded route stop sequences");
                Ok::<_, DatasetError>(Arc::new(sequences))
            })
            .await
            .map_err(unshare)
    }

    /// Load all three datasets concurrently.
    pub async fn warm(&self) -> Result<(), DatasetError> {
        futures::try_join!(self.stops(), self.route_shapes(), self.route_stops())?;
        Ok(())
    }

    /// Whether `kind` has already been loaded.
    pub fn is_loaded(&self, kind: DatasetKind) -> bool {
        match kind {
            DatasetKind::Stops => self.stops.contains_key(&kind),
            DatasetKind::RouteShapes => self.route_shapes.contains_key(&kind),
            DatasetKind::RouteStops => self.route_stops.contains_key(&kind),
        }
    }

    async fn load<T: DeserializeOwned>(&self, kind: DatasetKind) -> Result<T, DatasetError> {
        let resource = self.config.resource(kind);
        let text = self.fetcher.fetch(resource).await?;
        serde_json::from_str(&text).map_err(|e| DatasetError::parse(resource, e.to_string()))
    }
}

fn unshare(err: Arc<DatasetError>) -> DatasetError {
    (*err).clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const STOPS: &str = r#"[
        {"id": "1", "code": "1", "name": "ALAKEA ST + HOTEL ST", "lat": 21.3102, "lon": -157.8621},
        {"id": "2", "code": "2", "name": "KING ST + BISHOP ST", "lat": 21.3095, "lon": -157.8617}
    ]"#;

    const SHAPES: &str = r#"{
        "2": {"id": "R2", "name": "2", "long_name": "Waikiki - School Street", "color": "",
              "shapes": {"20059": [[21.30, -157.86], [21.28, -157.83]]}}
    }"#;

    const ROUTE_STOPS: &str = r#"{
        "R2": {"name": "2", "long_name": "Waikiki - School Street",
               "shapes": {"20059": [{"id": "1", "code": "1", "name": "A", "lat": 21.3, "lon": -157.8, "sequence": 1}]}}
    }"#;

    /// Fetcher that serves fixed bodies and counts calls per resource.
    struct CountingFetcher {
        bodies: Mutex<HashMap<String, Result<String, DatasetError>>>,
        calls: AtomicUsize,
    }

    impl CountingFetcher {
        fn new() -> Self {
            let mut bodies = HashMap::new();
            bodies.insert("stops.json".to_string(), Ok(STOPS.to_string()));
            bodies.insert("routes-shapes.json".to_string(), Ok(SHAPES.to_string()));
            bodies.insert("route-stops.json".to_string(), Ok(ROUTE_STOPS.to_string()));
            Self {
                bodies: Mutex::new(bodies),
                calls: AtomicUsize::new(0),
            }
        }

        fn set(&self, resource: &str, body: Result<String, DatasetError>) {
            self.bodies.lock().unwrap().insert(resource.to_string(), body);
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl DatasetFetcher for CountingFetcher {
        async fn fetch(&self, resource: &str) -> Result<String, DatasetError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // Yield so concurrent callers overlap with the in-flight load.
            tokio::task::yield_now().await;
            self.bodies
                .lock()
                .unwrap()
                .get(resource)
                .cloned()
                .unwrap_or_else(|| Err(DatasetError::fetch(resource, "not found")))
        }
    }

    fn cache() -> DatasetCache<CountingFetcher> {
        DatasetCache::new(CountingFetcher::new(), DatasetConfig::default())
    }

    #[tokio::test]
    async fn sequential_loads_fetch_once() {
        let cache = cache();

        let first = cache.stops().await.unwrap();
        let second = cache.stops().await.unwrap();

        assert_eq!(first.len(), 2);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.fetcher.calls(), 1);
        assert!(cache.is_loaded(DatasetKind::Stops));
        assert!(!cache.is_loaded(DatasetKind::RouteShapes));
    }

    #[tokio::test]
    async fn concurrent_loads_share_one_fetch() {
        let cache = cache();

        let (a, b, c) = tokio::join!(cache.stops(), cache.stops(), cache.stops());

        assert!(Arc::ptr_eq(&a.unwrap(), &b.unwrap()));
        assert!(c.is_ok());
        assert_eq!(cache.fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn failed_load_is_not_cached() {
        let cache = cache();
        cache
            .fetcher
            .set("stops.json", Err(DatasetError::fetch("stops.json", "HTTP 503")));

        let err = cache.stops().await.unwrap_err();
        assert_eq!(err, DatasetError::fetch("stops.json", "HTTP 503"));

        cache.fetcher.set("stops.json", Ok(STOPS.to_string()));
        let stops = cache.stops().await.unwrap();
        assert_eq!(stops.len(), 2);
        assert_eq!(cache.fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn invalid_json_is_parse_error() {
        let cache = cache();
        cache.fetcher.set("routes-shapes.json", Ok("[1, 2".to_string()));

        let err = cache.route_shapes().await.unwrap_err();
        assert!(matches!(err, DatasetError::Parse { .. }));
        assert_eq!(err.resource(), "routes-shapes.json");
    }

    #[tokio::test]
    async fn loaders_are_independent() {
        let cache = cache();

        let shapes = cache.route_shapes().await.unwrap();
        let route = &shapes["2"];
        assert_eq!(route.route_id, "R2");
        assert_eq!(route.color_hex, None);
        assert_eq!(route.shapes["20059"].len(), 2);

        let sequences = cache.route_stops().await.unwrap();
        assert_eq!(sequences["R2"].shapes["20059"][0].sequence, 1);

        assert_eq!(cache.fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn warm_loads_everything_once() {
        let cache = cache();

        cache.warm().await.unwrap();
        cache.warm().await.unwrap();

        assert_eq!(cache.fetcher.calls(), 3);
        assert!(cache.is_loaded(DatasetKind::RouteStops));
    }
}
