//! Dashboard application state for the terminal UI.

use std::path::PathBuf;

use chrono::Days;

use crate::aggregate::{DateRange, FlowPoint, RangeSummary};
use crate::config::TariffConfig;
use crate::dashboard::{DashboardState, DateBounds, Dataset};

/// Which end of the date range the arrow keys move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEnd {
    Start,
    End,
}

/// TUI application state.
pub struct App {
    /// Processed file, re-read on reload.
    path: PathBuf,
    tariff: TariffConfig,
    /// Loaded table, or pending when the file is absent.
    pub state: DashboardState,
    /// Selected range; `None` while pending or when the table is empty.
    pub range: Option<DateRange>,
    /// Metrics for `range`.
    pub summary: Option<RangeSummary>,
    /// Power-flow series for `range`.
    pub flow: Vec<FlowPoint>,
    /// End moved by Left/Right.
    pub focus: RangeEnd,
    /// Last load error, shown in the status line.
    pub error: Option<String>,
    /// Whether the user has requested quit.
    pub quit: bool,
}

impl App {
    /// Loads the processed file at `path` and selects the default range.
    pub fn new(path: PathBuf, tariff: TariffConfig) -> Self {
        let mut app = Self::from_state(DashboardState::Pending, tariff);
        app.path = path;
        app.reload();
        app
    }

    /// Builds an app around an already loaded state.
    pub fn from_state(state: DashboardState, tariff: TariffConfig) -> Self {
        let mut app = Self {
            path: PathBuf::new(),
            tariff,
            state,
            range: None,
            summary: None,
            flow: Vec::new(),
            focus: RangeEnd::Start,
            error: None,
            quit: false,
        };
        app.reset_range();
        app
    }

    /// Re-reads the processed file, keeping the range when still in bounds.
    pub fn reload(&mut self) {
        match DashboardState::load(&self.path, self.tariff) {
            Ok(state) => {
                self.state = state;
                self.error = None;
            }
            Err(e) => {
                self.state = DashboardState::Pending;
                self.error = Some(e.to_string());
            }
        }
        match (self.range, self.bounds()) {
            (Some(range), Some(bounds)) => self.set_range(bounds.clamp(range)),
            _ => self.reset_range(),
        }
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.state.dataset()
    }

    pub fn bounds(&self) -> Option<DateBounds> {
        self.dataset().and_then(Dataset::bounds)
    }

    /// Selects the default range (last seven days of data).
    pub fn reset_range(&mut self) {
        match self.dataset().and_then(Dataset::default_range) {
            Some(range) => self.set_range(range),
            None => {
                self.range = None;
                self.summary = None;
                self.flow.clear();
            }
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            RangeEnd::Start => RangeEnd::End,
            RangeEnd::End => RangeEnd::Start,
        };
    }

    /// Moves the focused end by `days`, staying inside the data bounds.
    ///
    /// The start may pass the end; that range is valid and shows zeros.
    pub fn shift_focused(&mut self, days: i64) {
        let (Some(range), Some(bounds)) = (self.range, self.bounds()) else {
            return;
        };
        let moved = match self.focus {
            RangeEnd::Start => DateRange::new(shift(range.start, days), range.end),
            RangeEnd::End => DateRange::new(range.start, shift(range.end, days)),
        };
        self.set_range(bounds.clamp(moved));
    }

    /// Moves both ends by `days` when the whole window still fits the bounds.
    pub fn pan(&mut self, days: i64) {
        let (Some(range), Some(bounds)) = (self.range, self.bounds()) else {
            return;
        };
        let moved = DateRange::new(shift(range.start, days), shift(range.end, days));
        if bounds.clamp(moved) == moved {
            self.set_range(moved);
        }
    }

    fn set_range(&mut self, range: DateRange) {
        let Some(dataset) = self.state.dataset() else {
            return;
        };
        self.summary = Some(dataset.summary(range));
        self.flow = dataset.power_flow(range);
        self.range = Some(range);
    }

    /// `true` while no processed file has been loaded.
    pub fn is_pending(&self) -> bool {
        matches!(self.state, DashboardState::Pending)
    }
}

fn shift(date: chrono::NaiveDate, days: i64) -> chrono::NaiveDate {
    let step = Days::new(days.unsigned_abs());
    let moved = if days >= 0 {
        date.checked_add_days(step)
    } else {
        date.checked_sub_days(step)
    };
    moved.unwrap_or(date)
}
