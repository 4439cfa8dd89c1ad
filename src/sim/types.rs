//! Run constants and the per-minute result record.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;

use crate::error::SnapshotError;

/// Length of one recovery run: 36 hours.
pub const RUN_DURATION_MINUTES: usize = 2160;

/// Grid stability below which renewables are curtailed.
pub const MIN_GRID_STABILITY: f64 = 0.7;

/// Immutable record of one simulated minute.
///
/// Built once per minute by the engine and never mutated afterwards.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use chrono::NaiveDate;
/// use grid_recovery::sim::types::MinuteSnapshot;
///
/// let t = NaiveDate::from_ymd_opt(2025, 4, 28).unwrap().and_hms_opt(12, 0, 0).unwrap();
/// let snap = MinuteSnapshot::new(t, 500.0, 1.0, 0.0, BTreeMap::new()).unwrap();
/// assert_eq!(snap.unmet_mw(), 500.0);
/// assert!(MinuteSnapshot::new(t, -1.0, 1.0, 0.0, BTreeMap::new()).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MinuteSnapshot {
    timestamp: NaiveDateTime,
    demand_mw: f64,
    stability: f64,
    generated_mw: f64,
    generated_by_family: BTreeMap<String, f64>,
}

impl MinuteSnapshot {
    /// Creates a snapshot after validating its ranges.
    ///
    /// # Errors
    ///
    /// Returns a `SnapshotError` for negative or non-finite demand or
    /// generation, or stability outside `[0, 1]`.
    pub fn new(
        timestamp: NaiveDateTime,
        demand_mw: f64,
        stability: f64,
        generated_mw: f64,
        generated_by_family: BTreeMap<String, f64>,
    ) -> Result<Self, SnapshotError> {
        if !demand_mw.is_finite() || demand_mw < 0.0 {
            return Err(SnapshotError::Demand(demand_mw));
        }
        if !(0.0..=1.0).contains(&stability) {
            return Err(SnapshotError::Stability(stability));
        }
        if !generated_mw.is_finite() || generated_mw < 0.0 {
            return Err(SnapshotError::Generation(generated_mw));
        }
        Ok(Self {
            timestamp,
            demand_mw,
            stability,
            generated_mw,
            generated_by_family,
        })
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// Expected demand from the forecast (MW).
    pub fn demand_mw(&self) -> f64 {
        self.demand_mw
    }

    /// Capacity-weighted grid stability (0.0 to 1.0).
    pub fn stability(&self) -> f64 {
        self.stability
    }

    /// Total generation fed to the grid (MW).
    pub fn generated_mw(&self) -> f64 {
        self.generated_mw
    }

    /// Generation per family label; families with no output are absent.
    pub fn generated_by_family(&self) -> &BTreeMap<String, f64> {
        &self.generated_by_family
    }

    /// Demand left unserved this minute (MW, >= 0).
    pub fn unmet_mw(&self) -> f64 {
        (self.demand_mw - self.generated_mw).max(0.0)
    }
}

impl fmt::Display for MinuteSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | demand={:>10.1} MW  generated={:>10.1} MW  unmet={:>10.1} MW | stability={:.3}",
            self.timestamp.format("%Y-%m-%d %H:%M"),
            self.demand_mw,
            self.generated_mw,
            self.unmet_mw(),
            self.stability,
        )?;
        for (family, mw) in &self.generated_by_family {
            write!(f, "  {family}={mw:.1}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn t0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 4, 28)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn valid_snapshot_exposes_its_fields() {
        let mut by_family = BTreeMap::new();
        by_family.insert("Nuclear".to_string(), 420.0);
        by_family.insert("Solar".to_string(), 80.0);
        let snap = MinuteSnapshot::new(t0(), 500.0, 0.856, 500.0, by_family).unwrap();
        assert_eq!(snap.timestamp(), t0());
        assert_eq!(snap.generated_mw(), 500.0);
        assert_eq!(snap.unmet_mw(), 0.0);
        assert_eq!(snap.generated_by_family().get("Solar"), Some(&80.0));
    }

    #[test]
    fn rejects_out_of_range_fields() {
        let empty = BTreeMap::new;
        assert_eq!(
            MinuteSnapshot::new(t0(), -0.1, 1.0, 0.0, empty()),
            Err(SnapshotError::Demand(-0.1))
        );
        assert_eq!(
            MinuteSnapshot::new(t0(), 1.0, 1.01, 0.0, empty()),
            Err(SnapshotError::Stability(1.01))
        );
        assert_eq!(
            MinuteSnapshot::new(t0(), 1.0, -0.5, 0.0, empty()),
            Err(SnapshotError::Stability(-0.5))
        );
        assert_eq!(
            MinuteSnapshot::new(t0(), 1.0, 1.0, -3.0, empty()),
            Err(SnapshotError::Generation(-3.0))
        );
    }

    #[test]
    fn display_does_not_panic() {
        let mut by_family = BTreeMap::new();
        by_family.insert("Wind".to_string(), 12.5);
        let snap = MinuteSnapshot::new(t0(), 20.0, 0.2, 12.5, by_family).unwrap();
        let s = format!("{snap}");
        assert!(s.contains("Wind=12.5"));
        assert!(s.starts_with("2025-04-28 12:00"));
    }
}
