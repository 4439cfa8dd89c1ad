use chrono::{Duration, NaiveDateTime, Timelike};

/// Truncates `instant` to whole-minute resolution.
pub fn truncate_to_minute(instant: NaiveDateTime) -> NaiveDateTime {
    instant
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(instant)
}

/// A simulation clock that walks a fixed number of whole minutes.
///
/// The clock starts at the given instant truncated to the minute and yields
/// each minute's index together with its absolute timestamp.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use grid_recovery::sim::clock::MinuteClock;
///
/// let start = NaiveDate::from_ymd_opt(2025, 4, 28)
///     .unwrap()
///     .and_hms_opt(12, 33, 20)
///     .unwrap();
/// let minutes: Vec<_> = MinuteClock::new(start, 3)
///     .map(|(i, t)| (i, t.format("%H:%M").to_string()))
///     .collect();
/// assert_eq!(minutes[0], (0, "12:33".to_string()));
/// assert_eq!(minutes[2], (2, "12:35".to_string()));
/// ```
pub struct MinuteClock {
    /// First simulated minute
    start: NaiveDateTime,
    /// Index of the next minute to yield
    current: usize,
    /// Total minutes to run
    total: usize,
}

impl MinuteClock {
    /// Creates a clock of `total` minutes starting at `start` truncated to the minute.
    pub fn new(start: NaiveDateTime, total: usize) -> Self {
        Self {
            start: truncate_to_minute(start),
            current: 0,
            total,
        }
    }

    /// First minute the clock yields.
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Advances the clock by one minute.
    ///
    /// # Returns
    ///
    /// * `Some((index, instant))` - The minute just reached, counting from 0
    /// * `None` - If the clock has run all its minutes
    pub fn tick(&mut self) -> Option<(usize, NaiveDateTime)> {
        if self.current < self.total {
            let index = self.current;
            self.current += 1;
            Some((index, self.start + Duration::minutes(index as i64)))
        } else {
            None
        }
    }
}

impl Iterator for MinuteClock {
    type Item = (usize, NaiveDateTime);

    fn next(&mut self) -> Option<Self::Item> {
        self.tick()
    }
}
