//! Row types handed between the pipeline stages.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One hourly sample as produced by the generator.
///
/// Field names double as the raw CSV column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawReading {
    /// Hour-aligned sample time.
    pub timestamp: NaiveDateTime,
    /// Consumption (kWh). May be negative before cleaning.
    pub consumption_kwh: f64,
    /// Solar generation (kWh). Zero outside daylight hours.
    pub solar_generation_kwh: f64,
    /// Ambient temperature (°C). `None` marks the injected gap.
    pub temperature_c: Option<f64>,
}

/// One hourly sample after cleaning and feature derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedReading {
    /// Hour-aligned sample time.
    pub timestamp: NaiveDateTime,
    /// Consumption (kWh), floored at zero.
    pub consumption_kwh: f64,
    /// Solar generation (kWh).
    pub solar_generation_kwh: f64,
    /// Ambient temperature (°C), gaps imputed.
    pub temperature_c: f64,
    /// `consumption_kwh - solar_generation_kwh`; negative means surplus.
    pub net_grid_load: f64,
    /// `true` when solar covers consumption for this hour.
    pub is_self_sufficient: bool,
    /// Cost of the grid import for this hour.
    pub estimated_cost: f64,
}

impl fmt::Display for CleanedReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | load={:>6.2} kWh  solar={:>6.2} kWh  net={:>7.2} kWh | \
             temp={:>5.1} C  cost={:.3}  self_sufficient={}",
            self.timestamp.format("%Y-%m-%d %H:%M"),
            self.consumption_kwh,
            self.solar_generation_kwh,
            self.net_grid_load,
            self.temperature_c,
            self.estimated_cost,
            self.is_self_sufficient,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn cleaned_reading_display_does_not_panic() {
        let r = CleanedReading {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 15)
                .and_then(|d| d.and_hms_opt(12, 0, 0))
                .unwrap(),
            consumption_kwh: 80.0,
            solar_generation_kwh: 35.0,
            temperature_c: 29.5,
            net_grid_load: 45.0,
            is_self_sufficient: false,
            estimated_cost: 6.75,
        };
        let s = format!("{r}");
        assert!(s.starts_with("2024-01-15 12:00"));
    }
}
