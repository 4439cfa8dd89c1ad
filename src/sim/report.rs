//! Post-hoc recovery KPIs computed from a snapshot sequence.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use super::types::{MIN_GRID_STABILITY, MinuteSnapshot};

/// Generation within this margin of demand counts as full supply (MW).
const SUPPLY_TOLERANCE_MW: f64 = 1e-6;

/// Each snapshot covers one minute.
const HOURS_PER_MINUTE: f64 = 1.0 / 60.0;

/// Aggregate indicators of one recovery run.
///
/// Computed post-hoc from the snapshot sequence so the report can never
/// disagree with the per-minute data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryReport {
    /// Number of simulated minutes.
    pub minutes: usize,
    /// Highest expected demand over the run (MW).
    pub peak_demand_mw: f64,
    /// Energy demanded over the run (MWh).
    pub demanded_mwh: f64,
    /// Energy served over the run (MWh).
    pub served_mwh: f64,
    /// Energy not served over the run (MWh).
    pub unmet_mwh: f64,
    /// Served share of demanded energy (%); 100 when the snapshots demand
    /// nothing, 0 for an empty snapshot sequence.
    pub served_pct: f64,
    pub min_stability: f64,
    pub mean_stability: f64,
    /// Minutes whose stability ended below the curtailment threshold.
    pub minutes_below_threshold: usize,
    /// First minute at which generation met demand.
    pub first_full_supply: Option<NaiveDateTime>,
    /// First minute from which demand was met until the end of the run.
    pub sustained_full_supply: Option<NaiveDateTime>,
    /// Energy served per family label (MWh).
    pub energy_by_family_mwh: BTreeMap<String, f64>,
}

impl RecoveryReport {
    /// Computes the report from a complete snapshot sequence.
    ///
    /// # Arguments
    ///
    /// * `snapshots` - Snapshots of one run, in time order
    ///
    /// # Returns
    ///
    /// A `RecoveryReport`; all-zero when `snapshots` is empty.
    pub fn from_snapshots(snapshots: &[MinuteSnapshot]) -> Self {
        if snapshots.is_empty() {
            return Self {
                minutes: 0,
                peak_demand_mw: 0.0,
                demanded_mwh: 0.0,
                served_mwh: 0.0,
                unmet_mwh: 0.0,
                served_pct: 0.0,
                min_stability: 0.0,
                mean_stability: 0.0,
                minutes_below_threshold: 0,
                first_full_supply: None,
                sustained_full_supply: None,
                energy_by_family_mwh: BTreeMap::new(),
            };
        }

        let n = snapshots.len();
        let mut peak_demand = 0.0_f64;
        let mut demanded = 0.0;
        let mut served = 0.0;
        let mut unmet = 0.0;
        let mut min_stability = 1.0_f64;
        let mut stability_sum = 0.0;
        let mut below = 0;
        let mut first_full = None;
        let mut sustained_full = None;
        let mut by_family: BTreeMap<String, f64> = BTreeMap::new();

        for snap in snapshots {
            peak_demand = peak_demand.max(snap.demand_mw());
            demanded += snap.demand_mw() * HOURS_PER_MINUTE;
            served += snap.generated_mw().min(snap.demand_mw()) * HOURS_PER_MINUTE;
            unmet += snap.unmet_mw() * HOURS_PER_MINUTE;

            min_stability = min_stability.min(snap.stability());
            stability_sum += snap.stability();
            if snap.stability() < MIN_GRID_STABILITY {
                below += 1;
            }

            let full = snap.unmet_mw() <= SUPPLY_TOLERANCE_MW;
            if full {
                first_full.get_or_insert(snap.timestamp());
                sustained_full.get_or_insert(snap.timestamp());
            } else {
                sustained_full = None;
            }

            for (family, mw) in snap.generated_by_family() {
                *by_family.entry(family.clone()).or_insert(0.0) += mw * HOURS_PER_MINUTE;
            }
        }

        let served_pct = if demanded > 0.0 {
            100.0 * served / demanded
        } else {
            100.0
        };

        Self {
            minutes: n,
            peak_demand_mw: peak_demand,
            demanded_mwh: demanded,
            served_mwh: served,
            unmet_mwh: unmet,
            served_pct,
            min_stability,
            mean_stability: stability_sum / n as f64,
            minutes_below_threshold: below,
            first_full_supply: first_full,
            sustained_full_supply: sustained_full,
            energy_by_family_mwh: by_family,
        }
    }
}

fn fmt_instant(instant: Option<NaiveDateTime>) -> String {
    instant.map_or_else(|| "never".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string())
}

impl fmt::Display for RecoveryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Recovery Report ---")?;
        writeln!(f, "Minutes simulated:     {}", self.minutes)?;
        writeln!(f, "Peak demand:           {:.1} MW", self.peak_demand_mw)?;
        writeln!(
            f,
            "Energy served:         {:.1} / {:.1} MWh ({:.1}%)",
            self.served_mwh, self.demanded_mwh, self.served_pct
        )?;
        writeln!(f, "Energy not served:     {:.1} MWh", self.unmet_mwh)?;
        writeln!(
            f,
            "Stability:             min {:.3}, mean {:.3}",
            self.min_stability, self.mean_stability
        )?;
        writeln!(
            f,
            "Minutes below {:.1}:     {}",
            MIN_GRID_STABILITY, self.minutes_below_threshold
        )?;
        writeln!(
            f,
            "First full supply:     {}",
            fmt_instant(self.first_full_supply)
        )?;
        write!(
            f,
            "Sustained full supply: {}",
            fmt_instant(self.sustained_full_supply)
        )?;
        for (family, mwh) in &self.energy_by_family_mwh {
            write!(f, "\n  {family:<16} {mwh:>12.1} MWh")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn t(minute: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 4, 28)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + Duration::minutes(minute)
    }

    fn snap(minute: i64, demand: f64, generated: f64, stability: f64) -> MinuteSnapshot {
        let mut by_family = BTreeMap::new();
        if generated > 0.0 {
            by_family.insert("Nuclear".to_string(), generated);
        }
        MinuteSnapshot::new(t(minute), demand, stability, generated, by_family).unwrap()
    }

    #[test]
    fn empty_input_yields_zeroed_report() {
        let report = RecoveryReport::from_snapshots(&[]);
        assert_eq!(report.minutes, 0);
        assert_eq!(report.served_pct, 0.0);
        assert!(report.first_full_supply.is_none());
    }

    #[test]
    fn zero_demand_counts_as_fully_served() {
        let r = RecoveryReport::from_snapshots(&[snap(0, 0.0, 0.0, 1.0)]);
        assert_eq!(r.minutes, 1);
        assert_eq!(r.served_pct, 100.0);
    }

    #[test]
    fn energy_accounting() {
        let snaps = vec![
            snap(0, 60.0, 0.0, 1.0),
            snap(1, 60.0, 30.0, 0.5),
            snap(2, 60.0, 60.0, 1.0),
            snap(3, 60.0, 60.0, 1.0),
        ];
        let r = RecoveryReport::from_snapshots(&snaps);
        assert_eq!(r.minutes, 4);
        assert_eq!(r.peak_demand_mw, 60.0);
        assert!((r.demanded_mwh - 4.0).abs() < 1e-9);
        assert!((r.served_mwh - 2.5).abs() < 1e-9);
        assert!((r.unmet_mwh - 1.5).abs() < 1e-9);
        assert!((r.served_pct - 62.5).abs() < 1e-9);
        assert_eq!(r.min_stability, 0.5);
        assert!((r.mean_stability - 0.875).abs() < 1e-12);
        assert_eq!(r.minutes_below_threshold, 1);
        assert!((r.energy_by_family_mwh["Nuclear"] - 2.5).abs() < 1e-9);
    }

    #[test]
    fn sustained_supply_resets_on_a_shortfall() {
        let snaps = vec![
            snap(0, 10.0, 10.0, 1.0),
            snap(1, 10.0, 5.0, 1.0),
            snap(2, 10.0, 10.0, 1.0),
            snap(3, 10.0, 10.0, 1.0),
        ];
        let r = RecoveryReport::from_snapshots(&snaps);
        assert_eq!(r.first_full_supply, Some(t(0)));
        assert_eq!(r.sustained_full_supply, Some(t(2)));
    }

    #[test]
    fn never_supplied_run() {
        let snaps = vec![snap(0, 10.0, 0.0, 1.0), snap(1, 10.0, 0.0, 1.0)];
        let r = RecoveryReport::from_snapshots(&snaps);
        assert_eq!(r.first_full_supply, None);
        assert_eq!(r.sustained_full_supply, None);
        assert_eq!(r.served_pct, 0.0);
        assert!(r.to_string().contains("never"));
    }
}
