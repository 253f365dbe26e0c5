//! Range aggregation over the cleaned table for the dashboard views.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::config::TariffConfig;
use crate::readings::CleanedReading;

/// Closed calendar-date range `[start, end]`.
///
/// A range with `start > end` is valid and simply matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Whether the timestamp's calendar date lies inside the range.
    pub fn contains(&self, ts: &NaiveDateTime) -> bool {
        let date = ts.date();
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Mean consumption and solar for one hour of day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HourlyAverage {
    pub hour: u32,
    pub consumption_kwh: f64,
    pub solar_generation_kwh: f64,
}

/// Split of the consumed energy between grid import and solar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SourceMix {
    /// Energy drawn from the grid: sum of `max(consumption - solar, 0)`.
    pub grid_import: f64,
    /// Solar energy generated over the range.
    pub solar_gen: f64,
}

impl SourceMix {
    /// Solar share of `grid_import + solar_gen`, 0 when both are zero.
    pub fn solar_share(&self) -> f64 {
        let total = self.grid_import + self.solar_gen;
        if total > 0.0 {
            self.solar_gen / total
        } else {
            0.0
        }
    }
}

/// Summary metrics and grouped views for one date range.
///
/// Computed from a read-only slice, so repeated calls over the same table
/// are independent and yield identical results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeSummary {
    /// Range the summary was computed for.
    pub range: DateRange,
    /// Number of hourly rows inside the range.
    pub rows: usize,
    /// Total consumption (kWh).
    pub total_consumption: f64,
    /// Total solar generation (kWh).
    pub total_solar: f64,
    /// `total_solar / total_consumption`, 0 when consumption is 0.
    pub solar_mix_ratio: f64,
    /// `solar_mix_ratio × 100`.
    pub self_sufficiency_pct: f64,
    /// CO2 avoided by the solar generation (kg).
    pub carbon_offset_kg: f64,
    /// Per hour-of-day means, ascending by hour, only hours present in range.
    pub hourly_profile: Vec<HourlyAverage>,
    /// Grid import versus solar generation.
    pub source_mix: SourceMix,
}

impl RangeSummary {
    /// Aggregates the rows whose date falls inside `range`.
    ///
    /// Bounds outside the data's span are clipped implicitly; an empty
    /// selection yields zeros and an empty hourly profile.
    ///
    /// # Arguments
    ///
    /// * `table` - Cleaned hourly rows
    /// * `range` - Inclusive calendar-date range
    /// * `tariff` - Supplies the emission factor for the carbon offset
    pub fn from_readings(table: &[CleanedReading], range: DateRange, tariff: &TariffConfig) -> Self {
        let mut rows = 0_usize;
        let mut total_consumption = 0.0_f64;
        let mut total_solar = 0.0_f64;
        let mut grid_import = 0.0_f64;
        // (consumption sum, solar sum, count) per hour of day
        let mut by_hour = [(0.0_f64, 0.0_f64, 0_u32); 24];

        for r in table.iter().filter(|r| range.contains(&r.timestamp)) {
            rows += 1;
            total_consumption += r.consumption_kwh;
            total_solar += r.solar_generation_kwh;
            grid_import += (r.consumption_kwh - r.solar_generation_kwh).max(0.0);

            let slot = &mut by_hour[r.timestamp.hour() as usize % 24];
            slot.0 += r.consumption_kwh;
            slot.1 += r.solar_generation_kwh;
            slot.2 += 1;
        }

        let solar_mix_ratio = if total_consumption > 0.0 {
            total_solar / total_consumption
        } else {
            0.0
        };

        let hourly_profile = by_hour
            .iter()
            .enumerate()
            .filter(|(_, (_, _, n))| *n > 0)
            .map(|(hour, &(c, s, n))| HourlyAverage {
                hour: hour as u32,
                consumption_kwh: c / f64::from(n),
                solar_generation_kwh: s / f64::from(n),
            })
            .collect();

        Self {
            range,
            rows,
            total_consumption,
            total_solar,
            solar_mix_ratio,
            self_sufficiency_pct: solar_mix_ratio * 100.0,
            carbon_offset_kg: total_solar * tariff.emission_factor_kg_per_kwh,
            hourly_profile,
            source_mix: SourceMix {
                grid_import,
                solar_gen: total_solar,
            },
        }
    }
}

impl fmt::Display for RangeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Energy Summary ({}) ---", self.range)?;
        writeln!(f, "Hours in range:        {}", self.rows)?;
        writeln!(f, "Grid consumption:      {:.0} kWh", self.total_consumption)?;
        writeln!(
            f,
            "Solar generation:      {:.0} kWh ({:.1}% mix)",
            self.total_solar,
            self.solar_mix_ratio * 100.0
        )?;
        writeln!(f, "Self sufficiency:      {:.1} %", self.self_sufficiency_pct)?;
        writeln!(f, "Carbon offset:         {:.0} kg", self.carbon_offset_kg)?;
        write!(
            f,
            "Source mix:            grid {:.0} kWh / solar {:.0} kWh",
            self.source_mix.grid_import, self.source_mix.solar_gen
        )
    }
}

/// One point of the power-flow chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlowPoint {
    pub timestamp: NaiveDateTime,
    pub consumption_kwh: f64,
    pub solar_generation_kwh: f64,
}

/// In-range consumption and solar series, in table order.
pub fn power_flow(table: &[CleanedReading], range: DateRange) -> Vec<FlowPoint> {
    table
        .iter()
        .filter(|r| range.contains(&r.timestamp))
        .map(|r| FlowPoint {
            timestamp: r.timestamp,
            consumption_kwh: r.consumption_kwh,
            solar_generation_kwh: r.solar_generation_kwh,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
    }

    fn make_row(day: u32, hour: u32, consumption: f64, solar: f64) -> CleanedReading {
        let net = consumption - solar;
        CleanedReading {
            timestamp: date(day).and_hms_opt(hour, 0, 0).unwrap(),
            consumption_kwh: consumption,
            solar_generation_kwh: solar,
            temperature_c: 20.0,
            net_grid_load: net,
            is_self_sufficient: net <= 0.0,
            estimated_cost: if net > 0.0 { net * 0.15 } else { 0.0 },
        }
    }

    #[test]
    fn two_row_scenario() {
        let table = vec![make_row(10, 0, 55.0, 0.0), make_row(10, 12, 80.0, 35.0)];
        let s = RangeSummary::from_readings(
            &table,
            DateRange::new(date(10), date(10)),
            &TariffConfig::default(),
        );

        assert_eq!(s.rows, 2);
        assert_eq!(s.total_consumption, 135.0);
        assert_eq!(s.total_solar, 35.0);
        assert!((s.solar_mix_ratio - 35.0 / 135.0).abs() < 1e-12);
        assert!((s.self_sufficiency_pct - 3500.0 / 135.0).abs() < 1e-9);
        assert!((s.carbon_offset_kg - 14.0).abs() < 1e-9);
        assert_eq!(
            s.hourly_profile,
            vec![
                HourlyAverage {
                    hour: 0,
                    consumption_kwh: 55.0,
                    solar_generation_kwh: 0.0
                },
                HourlyAverage {
                    hour: 12,
                    consumption_kwh: 80.0,
                    solar_generation_kwh: 35.0
                },
            ]
        );
        assert_eq!(s.source_mix.grid_import, 100.0);
        assert_eq!(s.source_mix.solar_gen, 35.0);
    }

    #[test]
    fn empty_range_is_all_zero() {
        let table = vec![make_row(10, 0, 55.0, 0.0), make_row(10, 12, 80.0, 35.0)];
        let s = RangeSummary::from_readings(
            &table,
            DateRange::new(date(1), date(5)),
            &TariffConfig::default(),
        );
        assert_eq!(s.rows, 0);
        assert_eq!(s.total_consumption, 0.0);
        assert_eq!(s.total_solar, 0.0);
        assert_eq!(s.solar_mix_ratio, 0.0);
        assert_eq!(s.self_sufficiency_pct, 0.0);
        assert_eq!(s.carbon_offset_kg, 0.0);
        assert!(s.hourly_profile.is_empty());
        assert_eq!(s.source_mix, SourceMix::default());
    }

    #[test]
    fn inverted_range_is_empty() {
        let table = vec![make_row(10, 0, 55.0, 0.0)];
        let s = RangeSummary::from_readings(
            &table,
            DateRange::new(date(12), date(8)),
            &TariffConfig::default(),
        );
        assert_eq!(s.rows, 0);
        assert!(s.hourly_profile.is_empty());
    }

    #[test]
    fn zero_consumption_guards_ratio() {
        let table = vec![make_row(10, 12, 0.0, 20.0)];
        let s = RangeSummary::from_readings(
            &table,
            DateRange::new(date(10), date(10)),
            &TariffConfig::default(),
        );
        assert_eq!(s.solar_mix_ratio, 0.0);
        assert_eq!(s.self_sufficiency_pct, 0.0);
        assert!(s.solar_mix_ratio.is_finite());
        assert!((s.carbon_offset_kg - 8.0).abs() < 1e-12);
        assert_eq!(s.source_mix.grid_import, 0.0);
    }

    #[test]
    fn range_is_inclusive_and_clipped() {
        let table = vec![
            make_row(9, 23, 10.0, 0.0),
            make_row(10, 0, 20.0, 0.0),
            make_row(11, 23, 30.0, 0.0),
            make_row(12, 0, 40.0, 0.0),
        ];
        let s = RangeSummary::from_readings(
            &table,
            DateRange::new(date(10), date(11)),
            &TariffConfig::default(),
        );
        assert_eq!(s.rows, 2);
        assert_eq!(s.total_consumption, 50.0);

        // Bounds far outside the data span select everything
        let all = RangeSummary::from_readings(
            &table,
            DateRange::new(date(1), date(30)),
            &TariffConfig::default(),
        );
        assert_eq!(all.rows, 4);
    }

    #[test]
    fn hourly_profile_averages_across_days() {
        let table = vec![
            make_row(10, 12, 80.0, 30.0),
            make_row(11, 12, 60.0, 10.0),
            make_row(11, 13, 50.0, 5.0),
        ];
        let s = RangeSummary::from_readings(
            &table,
            DateRange::new(date(10), date(11)),
            &TariffConfig::default(),
        );
        assert_eq!(s.hourly_profile.len(), 2);
        assert_eq!(s.hourly_profile[0].hour, 12);
        assert_eq!(s.hourly_profile[0].consumption_kwh, 70.0);
        assert_eq!(s.hourly_profile[0].solar_generation_kwh, 20.0);
        assert_eq!(s.hourly_profile[1].hour, 13);
    }

    #[test]
    fn aggregation_is_idempotent_and_non_mutating() {
        let table = vec![make_row(10, 0, 55.0, 0.0), make_row(10, 12, 80.0, 35.0)];
        let before = table.clone();
        let range = DateRange::new(date(10), date(10));
        let a = RangeSummary::from_readings(&table, range, &TariffConfig::default());
        let b = RangeSummary::from_readings(&table, range, &TariffConfig::default());
        assert_eq!(a, b);
        assert_eq!(a.total_consumption.to_bits(), b.total_consumption.to_bits());
        assert_eq!(table, before);
    }

    #[test]
    fn power_flow_filters_range() {
        let table = vec![make_row(9, 12, 1.0, 0.0), make_row(10, 12, 2.0, 1.0)];
        let flow = power_flow(&table, DateRange::new(date(10), date(10)));
        assert_eq!(flow.len(), 1);
        assert_eq!(flow[0].consumption_kwh, 2.0);
    }

    #[test]
    fn source_mix_share() {
        let mix = SourceMix {
            grid_import: 75.0,
            solar_gen: 25.0,
        };
        assert_eq!(mix.solar_share(), 0.25);
        assert_eq!(SourceMix::default().solar_share(), 0.0);
    }

    #[test]
    fn summary_display_does_not_panic() {
        let s = RangeSummary::from_readings(
            &[],
            DateRange::new(date(1), date(2)),
            &TariffConfig::default(),
        );
        assert!(format!("{s}").contains("Energy Summary"));
    }
}
