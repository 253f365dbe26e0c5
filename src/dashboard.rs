//! Read-only view of the processed table for the presentation surfaces.

use std::path::Path;
use std::sync::Arc;

use chrono::{Days, NaiveDate};
use serde::Serialize;
use tracing::info;

use crate::aggregate::{DateRange, FlowPoint, RangeSummary, power_flow};
use crate::config::TariffConfig;
use crate::error::Result;
use crate::io::read_processed;
use crate::readings::CleanedReading;

/// Days covered by the range shown before the user picks one.
pub const DEFAULT_RANGE_DAYS: u64 = 7;

/// Earliest and latest calendar date present in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateBounds {
    pub min: NaiveDate,
    pub max: NaiveDate,
}

impl DateBounds {
    /// `[max - 7 days, max]`, with the start clipped to `min`.
    pub fn default_range(&self) -> DateRange {
        let start = self
            .max
            .checked_sub_days(Days::new(DEFAULT_RANGE_DAYS))
            .map_or(self.min, |d| d.max(self.min));
        DateRange::new(start, self.max)
    }

    /// Clamps both ends of `range` into the bounds.
    pub fn clamp(&self, range: DateRange) -> DateRange {
        DateRange::new(
            range.start.clamp(self.min, self.max),
            range.end.clamp(self.min, self.max),
        )
    }
}

/// Cleaned table shared by every view, loaded once.
#[derive(Debug, Clone)]
pub struct Dataset {
    table: Arc<[CleanedReading]>,
    tariff: TariffConfig,
}

/// Result of looking for the processed file.
#[derive(Debug, Clone)]
pub enum DashboardState {
    /// No processed file yet; the pipeline has not run.
    Pending,
    Ready(Dataset),
}

impl DashboardState {
    /// Loads the processed file at `path`.
    ///
    /// An absent file is [`DashboardState::Pending`], not an error. A file
    /// that exists but cannot be decoded is reported as an error.
    pub fn load(path: &Path, tariff: TariffConfig) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "processed data not available yet");
            return Ok(Self::Pending);
        }
        let rows = read_processed(path)?;
        info!(rows = rows.len(), path = %path.display(), "dashboard dataset loaded");
        Ok(Self::Ready(Dataset::new(rows, tariff)))
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        match self {
            Self::Pending => None,
            Self::Ready(ds) => Some(ds),
        }
    }
}

impl Dataset {
    pub fn new(rows: Vec<CleanedReading>, tariff: TariffConfig) -> Self {
        Self {
            table: rows.into(),
            tariff,
        }
    }

    pub fn rows(&self) -> &[CleanedReading] {
        &self.table
    }

    pub fn tariff(&self) -> &TariffConfig {
        &self.tariff
    }

    /// Date span of the table; `None` when it is empty.
    pub fn bounds(&self) -> Option<DateBounds> {
        let min = self.table.iter().map(|r| r.timestamp.date()).min()?;
        let max = self.table.iter().map(|r| r.timestamp.date()).max()?;
        Some(DateBounds { min, max })
    }

    /// Range to show when the caller has not picked one.
    pub fn default_range(&self) -> Option<DateRange> {
        self.bounds().map(|b| b.default_range())
    }

    /// Summary metrics for `range`.
    pub fn summary(&self, range: DateRange) -> RangeSummary {
        RangeSummary::from_readings(&self.table, range, &self.tariff)
    }

    /// Power-flow series for `range`.
    pub fn power_flow(&self, range: DateRange) -> Vec<FlowPoint> {
        power_flow(&self.table, range)
    }

    /// Resolves optional bounds against the defaults.
    ///
    /// Missing ends fall back to the default range. Explicit ends are taken
    /// as given, including an inverted range which simply matches nothing.
    /// `None` only when an end is missing and the table has no dates.
    pub fn resolve_range(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Option<DateRange> {
        if let (Some(start), Some(end)) = (start, end) {
            return Some(DateRange::new(start, end));
        }
        let fallback = self.default_range()?;
        Some(DateRange::new(
            start.unwrap_or(fallback.start),
            end.unwrap_or(fallback.end),
        ))
    }
}
