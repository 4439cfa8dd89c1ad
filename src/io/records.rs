//! Serializable views of snapshots and plants, in the JSON shapes consumed by
//! presentation layers.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::plants::{Plant, PlantId, PlantState};
use crate::sim::types::MinuteSnapshot;

/// One minute of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRecord {
    pub time: NaiveDateTime,
    #[serde(rename = "expectedDemandMW")]
    pub expected_demand_mw: f64,
    #[serde(rename = "generatedMW")]
    pub generated_mw: f64,
    pub average_stability: f64,
    #[serde(rename = "generatedByTypeMW")]
    pub generated_by_type_mw: BTreeMap<String, f64>,
}

impl From<&MinuteSnapshot> for SnapshotRecord {
    fn from(s: &MinuteSnapshot) -> Self {
        Self {
            time: s.timestamp(),
            expected_demand_mw: s.demand_mw(),
            generated_mw: s.generated_mw(),
            average_stability: s.stability(),
            generated_by_type_mw: s.generated_by_family().clone(),
        }
    }
}

/// One plant as shown on a map or list view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantRecord {
    pub id: PlantId,
    pub name: String,
    #[serde(rename = "type")]
    pub family: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    #[serde(rename = "maxCapacityMW")]
    pub max_capacity_mw: f64,
    #[serde(rename = "assignedOutputMW")]
    pub assigned_output_mw: f64,
    pub icon: String,
    pub state: PlantState,
    /// Renewables only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub efficiency: Option<f64>,
    /// Thermal families only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<String>,
}

impl From<&Plant> for PlantRecord {
    fn from(p: &Plant) -> Self {
        Self {
            id: p.id(),
            name: p.name().to_string(),
            family: p.family().label().to_string(),
            latitude: p.latitude(),
            longitude: p.longitude(),
            city: p.city().to_string(),
            max_capacity_mw: p.max_capacity_mw(),
            assigned_output_mw: p.assigned_mw(),
            icon: p.icon().to_string(),
            state: p.state(),
            efficiency: p.family().is_renewable().then(|| p.efficiency()),
            fuel_type: p.fuel().map(|f| f.to_string()),
        }
    }
}

pub fn snapshot_records(snapshots: &[MinuteSnapshot]) -> Vec<SnapshotRecord> {
    snapshots.iter().map(SnapshotRecord::from).collect()
}

pub fn plant_records(plants: &[Plant]) -> Vec<PlantRecord> {
    plants.iter().map(PlantRecord::from).collect()
}

/// Writes `value` as pretty-printed JSON to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if serialization or writing fails.
pub fn write_json<T: Serialize + ?Sized>(value: &T, mut writer: impl Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()
}

/// Writes the snapshot sequence as a JSON array to `path`.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_results_json(snapshots: &[MinuteSnapshot], path: &Path) -> io::Result<()> {
    let file = BufWriter::new(File::create(path)?);
    write_json(&snapshot_records(snapshots), file)
}

/// Writes the roster as a JSON array to `path`.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_roster_json(plants: &[Plant], path: &Path) -> io::Result<()> {
    let file = BufWriter::new(File::create(path)?);
    write_json(&plant_records(plants), file)
}
