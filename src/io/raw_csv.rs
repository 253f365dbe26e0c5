//! Raw handoff: the generator's rows as CSV.
//!
//! Columns are `timestamp,consumption_kwh,solar_generation_kwh,temperature_c`.
//! Timestamps are ISO-8601 without offset; a missing temperature is an empty
//! field.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use crate::error::{PipelineError, Result};
use crate::readings::RawReading;

use super::write_atomic;

/// Writes the raw batch to `path`, replacing any previous file atomically.
pub fn write_raw(rows: &[RawReading], path: &Path) -> Result<()> {
    write_atomic(path, |file| write_rows(rows, io::BufWriter::new(file)))
}

/// Writes raw rows as CSV to any writer.
pub fn write_rows(rows: &[RawReading], writer: impl Write) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Reads the raw batch from `path`.
///
/// # Errors
///
/// * [`PipelineError::MissingInput`] - No file at `path`
/// * [`PipelineError::InvalidInput`] - A row does not match the raw layout
pub fn read_raw(path: &Path) -> Result<Vec<RawReading>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => PipelineError::MissingInput {
            path: path.to_path_buf(),
        },
        _ => PipelineError::Io(e),
    })?;
    read_rows(io::BufReader::new(file))
}

/// Parses raw rows from any reader.
///
/// An empty `temperature_c` field is read as missing. Text such as `NaN`
/// parses to a non-finite value, which cleaning also treats as missing.
pub fn read_rows(reader: impl Read) -> Result<Vec<RawReading>> {
    let mut rdr = csv::ReaderBuilder::new().from_reader(reader);
    rdr.deserialize()
        .map(|row| {
            row.map_err(|e| match e.kind() {
                csv::ErrorKind::Deserialize { .. } | csv::ErrorKind::UnequalLengths { .. } => {
                    PipelineError::InvalidInput(format!("raw row rejected: {e}"))
                }
                _ => PipelineError::Csv(e),
            })
        })
        .collect()
}
