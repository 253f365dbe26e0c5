//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;

use super::AppState;
use super::types::{DataStatus, ErrorResponse, RangeQuery, StatusResponse};
use crate::aggregate::{DateRange, FlowPoint, RangeSummary};
use crate::dashboard::{DateBounds, Dataset};
use crate::readings::CleanedReading;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn ready(state: &AppState) -> Result<&Dataset, ApiError> {
    state.dashboard.dataset().ok_or_else(|| {
        error(
            StatusCode::SERVICE_UNAVAILABLE,
            "processed data not available yet: run the pipeline first",
        )
    })
}

fn range_for<'a>(state: &'a AppState, query: &RangeQuery) -> Result<(&'a Dataset, DateRange), ApiError> {
    let dataset = ready(state)?;
    let range = dataset
        .resolve_range(query.start, query.end)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "processed table holds no rows"))?;
    Ok((dataset, range))
}

/// `GET /status` → 200 + `StatusResponse`, pending or ready.
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let body = match state.dashboard.dataset() {
        Some(ds) => StatusResponse {
            status: DataStatus::Ready,
            rows: ds.rows().len(),
        },
        None => StatusResponse {
            status: DataStatus::Pending,
            rows: 0,
        },
    };
    Json(body)
}

/// Date span for the range selector.
///
/// `GET /bounds` → 200 + `DateBounds`, 503 while pending, 404 if empty.
pub async fn get_bounds(State(state): State<Arc<AppState>>) -> Result<Json<DateBounds>, ApiError> {
    let dataset = ready(&state)?;
    dataset
        .bounds()
        .map(Json)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "processed table holds no rows"))
}

/// Summary metrics for the requested range.
///
/// `GET /summary` → default range (last 7 days of data)
/// `GET /summary?start=2024-01-01&end=2024-01-07` → that range, inclusive.
/// An inverted range is valid and yields the all-zero summary.
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<RangeSummary>, ApiError> {
    let (dataset, range) = range_for(&state, &query)?;
    Ok(Json(dataset.summary(range)))
}

/// `GET /power-flow` → consumption and solar series for the range.
pub async fn get_power_flow(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<FlowPoint>>, ApiError> {
    let (dataset, range) = range_for(&state, &query)?;
    Ok(Json(dataset.power_flow(range)))
}

/// `GET /readings` → cleaned rows inside the range.
pub async fn get_readings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<CleanedReading>>, ApiError> {
    let (dataset, range) = range_for(&state, &query)?;
    let rows = dataset
        .rows()
        .iter()
        .filter(|r| range.contains(&r.timestamp))
        .cloned()
        .collect();
    Ok(Json(rows))
}
