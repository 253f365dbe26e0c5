//! Read-only JSON API over the processed table.
//!
//! Routes:
//! - `/status` reports whether the processed file has been produced
//! - `/bounds` is the date span for a range selector
//! - `/summary` returns the range metrics and grouped views
//! - `/power-flow` and `/readings` return the in-range series
//!
//! Range endpoints take optional `start`/`end` dates (`YYYY-MM-DD`) and
//! default to the last seven days of data.

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

use crate::dashboard::DashboardState;

pub use types::{DataStatus, ErrorResponse, RangeQuery, StatusResponse};

/// Immutable application state shared across all request handlers.
///
/// Loaded once at startup and wrapped in `Arc`; handlers only read it.
pub struct AppState {
    pub dashboard: DashboardState,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/status", get(handlers::get_status))
        .route("/bounds", get(handlers::get_bounds))
        .route("/summary", get(handlers::get_summary))
        .route("/power-flow", get(handlers::get_power_flow))
        .route("/readings", get(handlers::get_readings))
        .with_state(state)
}

/// Binds to `addr` and serves the API until the process is stopped.
///
/// # Errors
///
/// Returns the bind or accept-loop I/O error.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "dashboard API listening");
    axum::serve(listener, app).await
}
