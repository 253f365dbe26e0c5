//! Synthetic raw series generation with a single injected temperature gap.

use chrono::{NaiveDateTime, Timelike};
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::debug;

use crate::config::GenerationConfig;
use crate::error::{PipelineError, Result};
use crate::profiles::{ConsumptionProfile, Profile, SolarProfile, TemperatureProfile};
use crate::readings::RawReading;
use crate::window::SamplingWindow;

/// Seed offset for the solar cloud stream.
const SOLAR_SEED_OFFSET: u64 = 1;
/// Seed offset for the temperature noise stream.
const TEMPERATURE_SEED_OFFSET: u64 = 2;
/// Seed offset for picking the row whose temperature is blanked.
const GAP_SEED_OFFSET: u64 = 3;

/// Produces the raw hourly series for the trailing window ending at `now`.
///
/// Each signal draws from its own seeded stream, so the same `seed` and
/// `now` always give the same batch. After the rows are built, exactly one
/// row chosen uniformly at random gets its temperature blanked to exercise
/// imputation downstream.
///
/// # Errors
///
/// Returns [`PipelineError::Configuration`] when the window holds no rows
/// or the daylight/cloud parameters are inverted or out of range.
pub fn generate(cfg: &GenerationConfig, now: NaiveDateTime, seed: u64) -> Result<Vec<RawReading>> {
    let mut window = SamplingWindow::trailing(now, cfg.window_days, cfg.interval_hours)?;

    if cfg.sunrise_hour >= cfg.sunset_hour || !cfg.cloud_range_is_valid() {
        return Err(PipelineError::Configuration(format!(
            "invalid solar window {}..={} or cloud range {}..={}",
            cfg.sunrise_hour, cfg.sunset_hour, cfg.cloud_factor_min, cfg.cloud_factor_max
        )));
    }

    let mut load = ConsumptionProfile::new(
        cfg.base_load_kwh,
        cfg.load_amplitude_kwh,
        cfg.load_noise_std,
        seed,
    );
    let mut pv = SolarProfile::new(
        cfg.solar_peak_kwh,
        cfg.sunrise_hour,
        cfg.sunset_hour,
        cfg.cloud_factor_min,
        cfg.cloud_factor_max,
        seed.wrapping_add(SOLAR_SEED_OFFSET),
    );
    let mut temperature = TemperatureProfile::new(
        cfg.temperature_base_c,
        cfg.temperature_amplitude_c,
        cfg.temperature_noise_std,
        seed.wrapping_add(TEMPERATURE_SEED_OFFSET),
    );

    let mut rows = Vec::with_capacity(window.len());
    window.run(|timestamp| {
        let hour = timestamp.hour();
        rows.push(RawReading {
            timestamp,
            consumption_kwh: load.sample(hour),
            solar_generation_kwh: pv.sample(hour),
            temperature_c: Some(temperature.sample(hour)),
        });
    });

    let mut gap_rng = StdRng::seed_from_u64(seed.wrapping_add(GAP_SEED_OFFSET));
    let gap = gap_rng.random_range(0..rows.len());
    rows[gap].temperature_c = None;

    debug!(
        rows = rows.len(),
        gap_index = gap,
        profiles = ?[load.name(), pv.name(), temperature.name()],
        "generated raw series"
    );

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 20)
            .and_then(|d| d.and_hms_opt(14, 25, 0))
            .unwrap()
    }

    #[test]
    fn default_window_has_721_rows_and_one_gap() {
        let rows = generate(&GenerationConfig::default(), now(), 42).unwrap();
        assert_eq!(rows.len(), 721);
        assert_eq!(rows.iter().filter(|r| r.temperature_c.is_none()).count(), 1);
    }

    #[test]
    fn night_solar_is_exactly_zero() {
        let rows = generate(&GenerationConfig::default(), now(), 7).unwrap();
        for r in &rows {
            let h = r.timestamp.hour();
            if !(6..=18).contains(&h) {
                assert_eq!(r.solar_generation_kwh, 0.0, "solar at hour {h}");
            } else {
                assert!(r.solar_generation_kwh <= 40.0);
                assert!(r.solar_generation_kwh >= 0.0);
            }
        }
    }

    #[test]
    fn same_seed_same_batch() {
        let a = generate(&GenerationConfig::default(), now(), 11).unwrap();
        let b = generate(&GenerationConfig::default(), now(), 11).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seed_different_batch() {
        let a = generate(&GenerationConfig::default(), now(), 11).unwrap();
        let b = generate(&GenerationConfig::default(), now(), 12).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn timestamps_end_at_truncated_now() {
        let rows = generate(&GenerationConfig::default(), now(), 1).unwrap();
        let last = rows.last().map(|r| r.timestamp);
        let expected = NaiveDate::from_ymd_opt(2024, 5, 20).and_then(|d| d.and_hms_opt(14, 0, 0));
        assert_eq!(last, expected);
    }

    #[test]
    fn zero_window_fails_loudly() {
        let cfg = GenerationConfig {
            window_days: 0,
            ..GenerationConfig::default()
        };
        let err = generate(&cfg, now(), 1).err();
        assert!(matches!(err, Some(PipelineError::Configuration(_))));
    }

    #[test]
    fn inverted_daylight_is_configuration_error() {
        let cfg = GenerationConfig {
            sunrise_hour: 20,
            sunset_hour: 5,
            ..GenerationConfig::default()
        };
        let err = generate(&cfg, now(), 1).err();
        assert!(matches!(err, Some(PipelineError::Configuration(_))));
    }

    #[test]
    fn nan_cloud_bound_is_configuration_error() {
        let cfg = GenerationConfig {
            cloud_factor_max: f64::NAN,
            ..GenerationConfig::default()
        };
        let err = generate(&cfg, now(), 1).err();
        assert!(matches!(err, Some(PipelineError::Configuration(_))));

        let cfg = GenerationConfig {
            cloud_factor_min: f64::NAN,
            ..GenerationConfig::default()
        };
        let err = generate(&cfg, now(), 1).err();
        assert!(matches!(err, Some(PipelineError::Configuration(_))));
    }

    #[test]
    fn oversized_window_is_configuration_error() {
        let cfg = GenerationConfig {
            window_days: 200_000_000,
            ..GenerationConfig::default()
        };
        let err = generate(&cfg, now(), 1).err();
        assert!(matches!(err, Some(PipelineError::Configuration(_))));
    }
}
