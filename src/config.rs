//! TOML-based pipeline configuration.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::window::MAX_WINDOW_DAYS;

/// Top-level pipeline configuration parsed from TOML.
///
/// Every section is optional and falls back to the defaults of the daily
/// energy ETL. Load from TOML with [`PipelineConfig::from_toml_file`] or use
/// [`PipelineConfig::default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Handoff file locations.
    #[serde(default)]
    pub paths: PathsConfig,
    /// Synthetic series parameters.
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Price and emission constants.
    #[serde(default)]
    pub tariff: TariffConfig,
    /// Retry policy applied around each pipeline step.
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

/// Handoff file locations.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Raw CSV written by the generator.
    pub raw: PathBuf,
    /// Processed Parquet written by the transformer.
    pub processed: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            raw: PathBuf::from("data/raw/energy_data_raw.csv"),
            processed: PathBuf::from("data/processed/energy_data.parquet"),
        }
    }
}

/// Synthetic series parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    /// Trailing window length in days (must be > 0).
    pub window_days: u32,
    /// Sampling interval in hours (must be > 0).
    pub interval_hours: u32,
    /// Master random seed. Drawn at random when absent.
    pub seed: Option<u64>,
    /// Minimum consumption before the diurnal term (kWh).
    pub base_load_kwh: f64,
    /// Diurnal consumption amplitude (kWh).
    pub load_amplitude_kwh: f64,
    /// Gaussian consumption noise standard deviation (kWh).
    pub load_noise_std: f64,
    /// Solar output at the envelope peak under clear sky (kWh).
    pub solar_peak_kwh: f64,
    /// First daylight hour (inclusive).
    pub sunrise_hour: u32,
    /// Last daylight hour (inclusive).
    pub sunset_hour: u32,
    /// Lower bound of the per-hour cloud attenuation.
    pub cloud_factor_min: f64,
    /// Upper bound of the per-hour cloud attenuation.
    pub cloud_factor_max: f64,
    /// Mean temperature (°C).
    pub temperature_base_c: f64,
    /// Diurnal temperature amplitude (°C).
    pub temperature_amplitude_c: f64,
    /// Gaussian temperature noise standard deviation (°C).
    pub temperature_noise_std: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            window_days: 30,
            interval_hours: 1,
            seed: None,
            base_load_kwh: 50.0,
            load_amplitude_kwh: 30.0,
            load_noise_std: 5.0,
            solar_peak_kwh: 40.0,
            sunrise_hour: 6,
            sunset_hour: 18,
            cloud_factor_min: 0.2,
            cloud_factor_max: 1.0,
            temperature_base_c: 20.0,
            temperature_amplitude_c: 10.0,
            temperature_noise_std: 2.0,
        }
    }
}

impl GenerationConfig {
    /// Whether both cloud bounds are finite, within `[0, 1]` and ordered.
    ///
    /// NaN bounds fail every comparison, so the ordering is checked as
    /// `min <= max` rather than rejecting `min > max`.
    pub fn cloud_range_is_valid(&self) -> bool {
        let unit = 0.0..=1.0;
        unit.contains(&self.cloud_factor_min)
            && unit.contains(&self.cloud_factor_max)
            && self.cloud_factor_min <= self.cloud_factor_max
    }
}

/// Price and emission constants.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TariffConfig {
    /// Grid import price per kWh.
    pub unit_price: f64,
    /// Avoided CO2 per solar kWh (kg).
    pub emission_factor_kg_per_kwh: f64,
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            unit_price: 0.15,
            emission_factor_kg_per_kwh: 0.4,
        }
    }
}

/// Retry policy applied around each pipeline step.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScheduleConfig {
    /// Extra attempts after the first failure.
    pub retries: u32,
    /// Delay between attempts (seconds).
    pub retry_delay_secs: u64,
}

impl ScheduleConfig {
    /// Retry delay as a [`Duration`].
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            retries: 1,
            retry_delay_secs: 300,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"generation.window_days"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl PipelineConfig {
    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let g = &self.generation;

        if g.window_days == 0 || g.window_days > MAX_WINDOW_DAYS {
            errors.push(ConfigError {
                field: "generation.window_days".into(),
                message: format!("must be in [1, {MAX_WINDOW_DAYS}]"),
            });
        }
        if g.interval_hours == 0 {
            errors.push(ConfigError {
                field: "generation.interval_hours".into(),
                message: "must be > 0".into(),
            });
        }
        if g.sunrise_hour >= g.sunset_hour {
            errors.push(ConfigError {
                field: "generation.sunrise_hour".into(),
                message: "must be < generation.sunset_hour".into(),
            });
        }
        if g.sunset_hour > 23 {
            errors.push(ConfigError {
                field: "generation.sunset_hour".into(),
                message: "must be <= 23".into(),
            });
        }
        if !g.cloud_range_is_valid() {
            errors.push(ConfigError {
                field: "generation.cloud_factor_min".into(),
                message: "cloud factors must lie in [0.0, 1.0] with min <= max".into(),
            });
        }
        let non_negative = |x: f64| x.is_finite() && x >= 0.0;
        if !non_negative(g.load_noise_std) || !non_negative(g.temperature_noise_std) {
            errors.push(ConfigError {
                field: "generation.noise_std".into(),
                message: "noise standard deviations must be >= 0".into(),
            });
        }

        let t = &self.tariff;
        if t.unit_price < 0.0 {
            errors.push(ConfigError {
                field: "tariff.unit_price".into(),
                message: "must be >= 0".into(),
            });
        }
        if t.emission_factor_kg_per_kwh < 0.0 {
            errors.push(ConfigError {
                field: "tariff.emission_factor_kg_per_kwh".into(),
                message: "must be >= 0".into(),
            });
        }

        if self.paths.raw == self.paths.processed {
            errors.push(ConfigError {
                field: "paths.processed".into(),
                message: "must differ from paths.raw".into(),
            });
        }

        errors
    }
}
