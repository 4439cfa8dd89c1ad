//! API response and query types.
//!
//! Snapshot and plant bodies reuse the JSON export shapes from
//! [`crate::io::records`].

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::sim::report::RecoveryReport;

/// Blackout instant and KPIs of the run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub blackout: Option<NaiveDateTime>,
    pub report: RecoveryReport,
}

/// Optional range query parameters for the snapshots endpoint.
#[derive(Debug, Deserialize)]
pub struct SnapshotQuery {
    /// First minute index (inclusive).
    pub from: Option<usize>,
    /// Last minute index (inclusive).
    pub to: Option<usize>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
