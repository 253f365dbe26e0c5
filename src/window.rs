use chrono::{Duration, NaiveDateTime, Timelike};

use crate::error::{PipelineError, Result};

/// Longest trailing window accepted, in days (ten years).
pub const MAX_WINDOW_DAYS: u32 = 3650;

/// A trailing sampling window that yields hour-aligned timestamps.
///
/// The window covers `[end - window_days, end]` inclusive, where `end` is
/// the supplied instant truncated to the hour.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use energy_pipeline::window::SamplingWindow;
///
/// let now = NaiveDate::from_ymd_opt(2024, 3, 2)
///     .and_then(|d| d.and_hms_opt(9, 41, 7))
///     .unwrap();
/// let mut window = SamplingWindow::trailing(now, 1, 1).unwrap();
/// assert_eq!(window.len(), 25);
///
/// let mut stamps = Vec::new();
/// window.run(|ts| stamps.push(ts));
/// assert_eq!(stamps.last().map(|t| t.to_string()), Some("2024-03-02 09:00:00".to_string()));
/// ```
pub struct SamplingWindow {
    /// First timestamp of the window.
    start: NaiveDateTime,
    /// Spacing between samples.
    step: Duration,
    /// Next sample index to emit.
    current: usize,
    /// Total samples in the window.
    total: usize,
}

impl SamplingWindow {
    /// Builds the trailing window ending at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Configuration`] when the window would hold
    /// no samples (`window_days == 0` or `interval_hours == 0`), is longer
    /// than [`MAX_WINDOW_DAYS`] or starts before the earliest representable
    /// timestamp.
    pub fn trailing(now: NaiveDateTime, window_days: u32, interval_hours: u32) -> Result<Self> {
        if window_days == 0 || interval_hours == 0 {
            return Err(PipelineError::Configuration(format!(
                "generation window of {window_days} day(s) at {interval_hours} h intervals produces no rows"
            )));
        }
        if window_days > MAX_WINDOW_DAYS {
            return Err(PipelineError::Configuration(format!(
                "generation window of {window_days} days exceeds the {MAX_WINDOW_DAYS}-day limit"
            )));
        }

        let end = truncate_to_hour(now);
        let window_hours = i64::from(window_days) * 24;
        let start = end
            .checked_sub_signed(Duration::hours(window_hours))
            .ok_or_else(|| {
                PipelineError::Configuration(format!(
                    "generation window of {window_days} days starts before the earliest supported date"
                ))
            })?;
        let total = (window_hours / i64::from(interval_hours)) as usize + 1;

        Ok(Self {
            start,
            step: Duration::hours(i64::from(interval_hours)),
            current: 0,
            total,
        })
    }

    /// Total number of samples the window yields.
    pub fn len(&self) -> usize {
        self.total
    }

    /// Whether the window yields no samples. Always `false` once built.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Advances to the next sample.
    ///
    /// # Returns
    ///
    /// * `Some(timestamp)` - The next sample time
    /// * `None` - If every sample has been emitted
    pub fn tick(&mut self) -> Option<NaiveDateTime> {
        if self.current < self.total {
            let ts = self.start + self.step * self.current as i32;
            self.current += 1;
            Some(ts)
        } else {
            None
        }
    }

    /// Runs a function for each remaining sample time.
    pub fn run(&mut self, mut f: impl FnMut(NaiveDateTime)) {
        while let Some(ts) = self.tick() {
            f(ts);
        }
    }
}

/// Drops minutes, seconds and sub-second precision.
pub fn truncate_to_hour(ts: NaiveDateTime) -> NaiveDateTime {
    ts.date().and_hms_opt(ts.hour(), 0, 0).unwrap_or(ts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 30)
            .and_then(|d| d.and_hms_opt(h, m, 13))
            .unwrap()
    }

    #[test]
    fn thirty_day_window_has_721_hours() {
        let window = SamplingWindow::trailing(at(10, 30), 30, 1).ok();
        assert_eq!(window.map(|w| w.len()), Some(721));
    }

    #[test]
    fn tick_is_hour_aligned_and_strictly_increasing() {
        let Ok(mut window) = SamplingWindow::trailing(at(10, 30), 2, 1) else {
            panic!("window should build");
        };
        let mut stamps = Vec::new();
        window.run(|ts| stamps.push(ts));

        assert_eq!(stamps.len(), 49);
        let end = truncate_to_hour(at(10, 30));
        assert_eq!(stamps.first().copied(), Some(end - Duration::hours(48)));
        assert_eq!(stamps.last().copied(), Some(end));
        for pair in stamps.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::hours(1));
        }
        for ts in &stamps {
            assert_eq!(ts.minute(), 0);
            assert_eq!(ts.second(), 0);
        }
    }

    #[test]
    fn coarser_interval_thins_samples() {
        let window = SamplingWindow::trailing(at(0, 0), 1, 6).ok();
        assert_eq!(window.map(|w| w.len()), Some(5));
    }

    #[test]
    fn exhausted_window_returns_none() {
        let Ok(mut window) = SamplingWindow::trailing(at(0, 0), 1, 24) else {
            panic!("window should build");
        };
        assert!(window.tick().is_some());
        assert!(window.tick().is_some());
        assert_eq!(window.tick(), None);
    }

    #[test]
    fn zero_window_is_configuration_error() {
        let err = SamplingWindow::trailing(at(0, 0), 0, 1).err();
        assert!(matches!(err, Some(PipelineError::Configuration(_))));
        let err = SamplingWindow::trailing(at(0, 0), 30, 0).err();
        assert!(matches!(err, Some(PipelineError::Configuration(_))));
    }

    #[test]
    fn oversized_window_is_configuration_error() {
        let err = SamplingWindow::trailing(at(0, 0), 200_000_000, 1).err();
        assert!(matches!(err, Some(PipelineError::Configuration(_))));
        let err = SamplingWindow::trailing(at(0, 0), MAX_WINDOW_DAYS + 1, 1).err();
        assert!(matches!(err, Some(PipelineError::Configuration(_))));
    }

    #[test]
    fn window_reaching_before_min_datetime_is_configuration_error() {
        let near_min = NaiveDateTime::MIN + Duration::days(2);
        let err = SamplingWindow::trailing(near_min, 30, 1).err();
        assert!(matches!(err, Some(PipelineError::Configuration(_))));
    }

    #[test]
    fn longest_window_builds() {
        let window = SamplingWindow::trailing(at(0, 0), MAX_WINDOW_DAYS, 24).unwrap();
        assert_eq!(window.len(), MAX_WINDOW_DAYS as usize + 1);
    }
}
