//! Handoff files between the pipeline steps.
//!
//! Every writer goes through [`write_atomic`], so a reader never observes a
//! half-written handoff: it sees either the previous file or the new one.

pub mod processed_parquet;
pub mod raw_csv;

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::error::Result;

pub use processed_parquet::{read_processed, write_processed};
pub use raw_csv::{read_raw, write_raw};

/// Sibling path the payload is staged at before the rename.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes `path` by filling a temp file and renaming it into place.
///
/// Missing parent directories are created. On failure the temp file is
/// removed and any previous file at `path` is left untouched.
pub fn write_atomic<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut File) -> Result<()>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let staging = staging_path(path);
    let outcome = stage_and_rename(&staging, path, fill);
    if outcome.is_err() {
        let _ = fs::remove_file(&staging);
    }
    outcome
}

fn stage_and_rename<F>(staging: &Path, path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut File) -> Result<()>,
{
    let mut file = File::create(staging)?;
    fill(&mut file)?;
    file.sync_all()?;
    drop(file);
    fs::rename(staging, path)?;
    Ok(())
}
