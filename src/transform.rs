//! Cleaning and feature derivation for the raw series.

use tracing::debug;

use crate::config::TariffConfig;
use crate::error::{PipelineError, Result};
use crate::readings::{CleanedReading, RawReading};

/// Cleans a raw batch and derives the grid features.
///
/// Steps run in order, since each depends on the previous correction:
/// 1. Missing temperatures are replaced by the mean of the observed ones.
///    Non-finite readings (`NaN`, infinities) count as missing.
/// 2. Consumption that is not strictly positive is set to zero.
/// 3. `net_grid_load`, `is_self_sufficient` and `estimated_cost` are derived.
///
/// Row count and ordering are preserved. The input is not modified.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidInput`] when the batch is non-empty and
/// every temperature is missing, leaving nothing to impute from.
pub fn clean(raw: &[RawReading], tariff: &TariffConfig) -> Result<Vec<CleanedReading>> {
    let missing = raw.iter().filter(|r| observed(r).is_none()).count();
    let fill = if missing > 0 {
        let mean = observed_temperature_mean(raw).ok_or_else(|| {
            PipelineError::InvalidInput(
                "temperature_c has no observed values to impute from".to_string(),
            )
        })?;
        debug!(missing, mean, "imputing missing temperatures");
        mean
    } else {
        0.0
    };

    let cleaned = raw
        .iter()
        .map(|r| {
            let consumption_kwh = floor_consumption(r.consumption_kwh);
            let net_grid_load = consumption_kwh - r.solar_generation_kwh;
            CleanedReading {
                timestamp: r.timestamp,
                consumption_kwh,
                solar_generation_kwh: r.solar_generation_kwh,
                temperature_c: observed(r).unwrap_or(fill),
                net_grid_load,
                is_self_sufficient: is_self_sufficient(net_grid_load),
                estimated_cost: estimated_cost(net_grid_load, tariff.unit_price),
            }
        })
        .collect();

    Ok(cleaned)
}

/// Arithmetic mean of the observed finite temperatures, or `None` if there
/// are none.
pub fn observed_temperature_mean(raw: &[RawReading]) -> Option<f64> {
    let (sum, count) = raw
        .iter()
        .filter_map(observed)
        .fold((0.0_f64, 0_usize), |(s, n), t| (s + t, n + 1));
    (count > 0).then(|| sum / count as f64)
}

fn observed(r: &RawReading) -> Option<f64> {
    r.temperature_c.filter(|t| t.is_finite())
}

/// Errors-as-zero: negative (or NaN) consumption becomes 0.
pub fn floor_consumption(kwh: f64) -> f64 {
    if kwh > 0.0 { kwh } else { 0.0 }
}

/// Solar covers the hour when the net load is at or below zero.
pub fn is_self_sufficient(net_grid_load: f64) -> bool {
    net_grid_load <= 0.0
}

/// Only grid imports are billed; surplus hours cost nothing.
pub fn estimated_cost(net_grid_load: f64, unit_price: f64) -> f64 {
    if net_grid_load > 0.0 {
        net_grid_load * unit_price
    } else {
        0.0
    }
}
