//! The two scheduled tasks and the combined run.
//!
//! Each task reads its input from the previous task's handoff file and
//! writes its own output atomically, so the steps can be re-run in any
//! order without leaving partial files behind.

use std::path::PathBuf;
use std::time::Instant;

use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::generator::generate;
use crate::io::{read_raw, write_processed, write_raw};
use crate::retry::RetryPolicy;
use crate::transform::clean;

/// Outcome of one pipeline task.
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    /// File the task wrote.
    pub path: PathBuf,
    /// Rows written.
    pub rows: usize,
}

/// Seed from the config, or a fresh random one when unset.
pub fn resolve_seed(cfg: &PipelineConfig) -> u64 {
    cfg.generation.seed.unwrap_or_else(rand::random)
}

/// Generates the raw series for the window ending at `now` and writes the
/// raw handoff.
pub fn run_generate(cfg: &PipelineConfig, now: NaiveDateTime) -> Result<StepReport> {
    let started = Instant::now();
    let seed = resolve_seed(cfg);
    info!(seed, window_days = cfg.generation.window_days, "generating raw series");

    let rows = generate(&cfg.generation, now, seed)?;
    write_raw(&rows, &cfg.paths.raw)?;

    info!(
        rows = rows.len(),
        path = %cfg.paths.raw.display(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "raw data written"
    );
    Ok(StepReport {
        path: cfg.paths.raw.clone(),
        rows: rows.len(),
    })
}

/// Reads the raw handoff, cleans it, derives features and writes the
/// processed handoff.
///
/// Fails with [`crate::error::PipelineError::MissingInput`] when the raw
/// file does not exist; nothing is written in that case.
pub fn run_transform(cfg: &PipelineConfig) -> Result<StepReport> {
    let started = Instant::now();
    let raw = read_raw(&cfg.paths.raw)?;
    if raw.is_empty() {
        warn!(path = %cfg.paths.raw.display(), "raw handoff holds no rows");
    }

    let cleaned = clean(&raw, &cfg.tariff)?;
    write_processed(&cleaned, &cfg.paths.processed)?;

    info!(
        rows = cleaned.len(),
        path = %cfg.paths.processed.display(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "processed data written"
    );
    Ok(StepReport {
        path: cfg.paths.processed.clone(),
        rows: cleaned.len(),
    })
}

/// Runs generate then transform, each under `policy`.
///
/// The transform step only starts once generation has succeeded.
pub fn run_all(
    cfg: &PipelineConfig,
    now: NaiveDateTime,
    policy: &RetryPolicy,
) -> Result<(StepReport, StepReport)> {
    let generated = policy.run("generate", || run_generate(cfg, now))?;
    let processed = policy.run("transform", || run_transform(cfg))?;
    Ok((generated, processed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::io::read_processed;
    use chrono::NaiveDate;
    use std::path::Path;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 9, 1)
            .unwrap()
            .and_hms_opt(8, 15, 0)
            .unwrap()
    }

    fn config_in(dir: &Path) -> PipelineConfig {
        let mut cfg = PipelineConfig::default();
        cfg.paths.raw = dir.join("raw/energy_data_raw.csv");
        cfg.paths.processed = dir.join("processed/energy_data.parquet");
        cfg.generation.seed = Some(42);
        cfg.generation.window_days = 3;
        cfg
    }

    #[test]
    fn transform_without_raw_is_missing_input_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config_in(dir.path());
        let err = run_transform(&cfg).unwrap_err();
        assert!(matches!(err, PipelineError::MissingInput { .. }));
        assert!(!cfg.paths.processed.exists());
    }

    #[test]
    fn generate_then_transform_keeps_row_count() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config_in(dir.path());
        let (generated, processed) = run_all(&cfg, now(), &RetryPolicy::none()).unwrap();
        assert_eq!(generated.rows, 73);
        assert_eq!(processed.rows, 73);

        let table = read_processed(&cfg.paths.processed).unwrap();
        assert_eq!(table.len(), 73);
        assert!(table.iter().all(|r| r.consumption_kwh >= 0.0));
        assert!(table.iter().all(|r| r.temperature_c.is_finite()));
    }

    #[test]
    fn configured_seed_is_used() {
        let mut seeded = PipelineConfig::default();
        seeded.generation.seed = Some(9);
        assert_eq!(resolve_seed(&seeded), 9);
    }

    #[test]
    fn degenerate_window_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config_in(dir.path());
        cfg.generation.window_days = 0;
        let err = run_generate(&cfg, now()).unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)));
        assert!(!cfg.paths.raw.exists());
    }
}
