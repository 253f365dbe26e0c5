//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};

use energy_pipeline::config::PipelineConfig;

/// Fixed "now" so generated windows are reproducible (2024-05-20 14:25).
pub fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 20)
        .and_then(|d| d.and_hms_opt(14, 25, 0))
        .expect("valid timestamp")
}

/// Default config with both handoff files placed under `dir` and seed 42.
pub fn config_in(dir: &Path) -> PipelineConfig {
    let mut cfg = PipelineConfig::default();
    cfg.paths.raw = dir.join("data/raw/energy_data_raw.csv");
    cfg.paths.processed = dir.join("data/processed/energy_data.parquet");
    cfg.generation.seed = Some(42);
    cfg
}
