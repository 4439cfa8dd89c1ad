use rand::{Rng, SeedableRng, rngs::StdRng};

use super::{DemandForecast, MINUTES_PER_DAY};
use crate::error::ForecastError;

/// A synthetic daily demand curve for scenarios without a forecast file.
///
/// `DailyProfile` combines a baseline, a sinusoidal daily swing and seeded
/// Gaussian noise into one value per minute of the day.
///
/// # Examples
///
/// ```
/// use grid_recovery::forecast::DailyProfile;
///
/// let forecast = DailyProfile::new(
///     28_000.0, // base_mw - average demand
///     5_000.0,  // amp_mw - daily swing
///     -1.6,     // phase_rad - trough before dawn
///     0.0,      // noise_std_mw - no noise
///     42,       // seed
/// )
/// .into_forecast()
/// .unwrap();
///
/// assert_eq!(forecast.samples().len(), 1440);
/// ```
#[derive(Debug, Clone)]
pub struct DailyProfile {
    /// Average demand in MW.
    pub base_mw: f64,

    /// Amplitude of the daily sinusoid in MW.
    pub amp_mw: f64,

    /// Phase offset of the sinusoid in radians.
    pub phase_rad: f64,

    /// Standard deviation of the Gaussian noise in MW.
    pub noise_std_mw: f64,

    rng: StdRng,
}

impl DailyProfile {
    /// Creates a profile generator.
    ///
    /// # Arguments
    ///
    /// * `base_mw` - Average demand in MW
    /// * `amp_mw` - Amplitude of the daily sinusoid in MW
    /// * `phase_rad` - Phase offset in radians (0 = rising through the mean at midnight)
    /// * `noise_std_mw` - Standard deviation of Gaussian noise in MW
    /// * `seed` - Random seed for reproducible noise
    pub fn new(base_mw: f64, amp_mw: f64, phase_rad: f64, noise_std_mw: f64, seed: u64) -> Self {
        Self {
            base_mw,
            amp_mw,
            phase_rad,
            noise_std_mw,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Demand for one minute of the day, floored at zero.
    pub fn demand_mw(&mut self, minute: usize) -> f64 {
        let day_pos = (minute % MINUTES_PER_DAY) as f64 / MINUTES_PER_DAY as f64; // [0,1)
        let angle = 2.0 * std::f64::consts::PI * day_pos + self.phase_rad;

        let noise = if self.noise_std_mw > 0.0 {
            // Box-Muller
            let u1: f64 = self.rng.random::<f64>().clamp(1e-12, 1.0);
            let u2: f64 = self.rng.random::<f64>();
            let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
            z0 * self.noise_std_mw
        } else {
            0.0
        };

        (self.base_mw + self.amp_mw * angle.sin() + noise).max(0.0)
    }

    /// Samples the whole day into a validated forecast.
    ///
    /// # Errors
    ///
    /// Returns `ForecastError::InvalidDemand` if a parameter is not finite.
    pub fn into_forecast(mut self) -> Result<DemandForecast, ForecastError> {
        let samples = (0..MINUTES_PER_DAY).map(|m| self.demand_mw(m)).collect();
        DemandForecast::from_samples(samples)
    }
}
