//! Query and response types for the API endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Optional inclusive date range, `?start=YYYY-MM-DD&end=YYYY-MM-DD`.
///
/// Missing ends fall back to the default dashboard range.
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Whether the processed table has been produced yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataStatus {
    Pending,
    Ready,
}

/// `GET /status` body.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: DataStatus,
    /// Rows in the loaded table; 0 while pending.
    pub rows: usize,
}

/// Error body for non-2xx responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
