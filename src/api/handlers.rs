//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{ErrorResponse, ReportResponse, SnapshotQuery};
use crate::io::records::{PlantRecord, SnapshotRecord};

/// `GET /plants` → 200 + `Vec<PlantRecord>` JSON
pub async fn get_plants(State(state): State<Arc<AppState>>) -> Json<Vec<PlantRecord>> {
    Json(state.plants.clone())
}

/// Returns minute snapshots, optionally filtered by minute index.
///
/// `GET /snapshots` → 200 + `Vec<SnapshotRecord>` JSON
/// `GET /snapshots?from=N&to=M` → filtered range (inclusive)
/// `GET /snapshots?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_snapshots(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SnapshotQuery>,
) -> impl IntoResponse {
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(usize::MAX);

    if from > to {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("`from` ({from}) must be <= `to` ({to})"),
            }),
        ));
    }

    let records: Vec<SnapshotRecord> = state
        .snapshots
        .iter()
        .enumerate()
        .filter(|(minute, _)| (from..=to).contains(minute))
        .map(|(_, r)| r.clone())
        .collect();

    Ok(Json(records))
}

/// `GET /report` → 200 + `ReportResponse` JSON
pub async fn get_report(State(state): State<Arc<AppState>>) -> Json<ReportResponse> {
    Json(ReportResponse {
        blackout: state.blackout,
        report: state.report.clone(),
    })
}
