//! REST API for a finished recovery run.
//!
//! Provides three GET endpoints:
//! - `/plants`: roster as it stood at the last simulated minute
//! - `/snapshots`: minute snapshots with optional range filtering
//! - `/report`: blackout instant and recovery KPIs

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use chrono::NaiveDateTime;
use tracing::info;

use crate::io::records::{PlantRecord, SnapshotRecord, plant_records, snapshot_records};
use crate::sim::engine::RecoveryEngine;
use crate::sim::report::RecoveryReport;

pub use types::{ErrorResponse, ReportResponse, SnapshotQuery};

/// Immutable application state shared across all request handlers.
///
/// Constructed once after the run completes and wrapped in `Arc`; no locks
/// are needed since all data is read-only.
pub struct AppState {
    /// Blackout instant of the run.
    pub blackout: Option<NaiveDateTime>,
    /// Aggregate recovery KPIs.
    pub report: RecoveryReport,
    /// Per-minute results, in time order.
    pub snapshots: Vec<SnapshotRecord>,
    /// Roster in identity order.
    pub plants: Vec<PlantRecord>,
}

impl AppState {
    /// Captures the outcome of the engine's last run.
    pub fn from_engine(engine: &RecoveryEngine) -> Self {
        Self {
            blackout: engine.blackout(),
            report: RecoveryReport::from_snapshots(engine.snapshots()),
            snapshots: snapshot_records(engine.snapshots()),
            plants: plant_records(engine.plants()),
        }
    }
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/plants", get(handlers::get_plants))
        .route("/snapshots", get(handlers::get_snapshots))
        .route("/report", get(handlers::get_report))
        .with_state(state)
}

/// Binds to the given address and serves the API until the server stops.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind to `addr` or the
/// server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
