//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use tower_http::services::ServeDir;
use tracing::warn;

use crate::domain::{RouteShape, RouteStopSequence};
use crate::service::QueryError;
use crate::thebus::TransitError;

use super::dto::*;
use super::state::AppState;

/// Header that may carry the credential instead of the `key` parameter.
const CREDENTIAL_HEADER: &str = "x-api-key";

/// Create the application router.
///
/// `data_dir` is served under `/data` so pages can fetch the datasets.
pub fn create_router(state: AppState, data_dir: &str) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/routes", get(search_routes))
        .route("/api/routes/:route/shape", get(route_shape))
        .route("/api/routes/:route/stops", get(route_stops))
        .route("/api/vehicles", get(track_vehicle))
        .route("/api/arrivals", get(get_arrivals))
        .route("/api/stops/nearby", get(nearby_stops))
        .nest_service("/data", ServeDir::new(data_dir))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// The caller's credential, from the query string or the header.
///
/// Missing is passed on as empty so validation reports it.
fn credential(headers: &HeaderMap, param: CredentialParam) -> String {
    param
        .key
        .or_else(|| {
            headers
                .get(CREDENTIAL_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        })
        .unwrap_or_default()
}

/// A query parameter the handler cannot do without.
fn required(value: Option<String>, name: &str) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest {
            message: format!("missing required parameter: {name}"),
        })
}

/// Search routes by number and optional headsign.
async fn search_routes(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(key): Query<CredentialParam>,
    Query(req): Query<RouteSearchRequest>,
) -> Result<Json<RouteSearchResult>, AppError> {
    let route = required(req.route, "route")?;
    let credential = credential(&headers, key);
    let routes = state
        .service
        .search_routes(&credential, &route, req.headsign.as_deref())
        .await?;
    Ok(Json(routes.into()))
}

/// Track one vehicle.
async fn track_vehicle(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(key): Query<CredentialParam>,
    Query(req): Query<VehicleRequest>,
) -> Result<Json<VehicleResult>, AppError> {
    let num = required(req.num, "num")?;
    let credential = credential(&headers, key);
    let report = state.service.track_vehicle(&credential, &num).await?;
    Ok(Json(report.into()))
}

/// Upcoming arrivals at a stop.
async fn get_arrivals(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(key): Query<CredentialParam>,
    Query(req): Query<ArrivalsRequest>,
) -> Result<Json<ArrivalsResult>, AppError> {
    let stop = required(req.stop, "stop")?;
    let credential = credential(&headers, key);
    let arrivals = state.service.get_arrivals(&credential, &stop).await?;
    Ok(Json(arrivals.into()))
}

/// Stops nearest to the caller's location.
async fn nearby_stops(
    State(state): State<AppState>,
    Query(req): Query<NearbyRequest>,
) -> Result<Json<NearbyResult>, AppError> {
    let stops = state
        .service
        .find_nearest_stops(req.lat, req.lon, req.k)
        .await?;
    Ok(Json(NearbyResult { stops }))
}

/// Shape variants of a route, by short name.
async fn route_shape(
    State(state): State<AppState>,
    Path(route): Path<String>,
) -> Result<Json<RouteShape>, AppError> {
    Ok(Json(state.service.route_shape(&route).await?))
}

/// Ordered stops of a route, by route id.
async fn route_stops(
    State(state): State<AppState>,
    Path(route): Path<String>,
) -> Result<Json<RouteStopSequence>, AppError> {
    Ok(Json(state.service.route_stops(&route).await?))
}

/// Application error type.
#[derive(Debug, PartialEq)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Unprocessable { message: String },
    BadGateway { message: String },
}

impl From<QueryError> for AppError {
    fn from(e: QueryError) -> Self {
        let message = e.to_string();
        match e {
            QueryError::Transit(TransitError::CredentialInvalid(_))
            | QueryError::GeolocationUnavailable => AppError::BadRequest { message },
            QueryError::Transit(TransitError::LogicalServiceError(_)) => {
                AppError::Unprocessable { message }
            }
            QueryError::Transit(
                TransitError::TransportFailure { .. } | TransitError::MalformedResponse { .. },
            )
            | QueryError::Dataset(_) => AppError::BadGateway { message },
            QueryError::NotFound(_) => AppError::NotFound { message },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Unprocessable { message } => (StatusCode::UNPROCESSABLE_ENTITY, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
        };

        warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
