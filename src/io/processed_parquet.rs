//! Processed handoff: the cleaned table as Parquet.
//!
//! One row group per write, Snappy-compressed, no nullable columns. The
//! timestamp is stored as microseconds without a timezone.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array as _, ArrayRef, BooleanArray, Float64Array, TimestampMicrosecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, NaiveDateTime};
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::error::{PipelineError, Result};
use crate::readings::CleanedReading;

use super::write_atomic;

/// Arrow schema of the processed table, in column order.
pub fn processed_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new(
            "timestamp",
            DataType::Timestamp(TimeUnit::Microsecond, None),
            false,
        ),
        Field::new("consumption_kwh", DataType::Float64, false),
        Field::new("solar_generation_kwh", DataType::Float64, false),
        Field::new("temperature_c", DataType::Float64, false),
        Field::new("net_grid_load", DataType::Float64, false),
        Field::new("is_self_sufficient", DataType::Boolean, false),
        Field::new("estimated_cost", DataType::Float64, false),
    ]))
}

fn writer_properties() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .set_created_by(concat!("energy-pipeline ", env!("CARGO_PKG_VERSION")).to_string())
        .build()
}

fn to_batch(rows: &[CleanedReading]) -> Result<RecordBatch> {
    let timestamps: Vec<i64> = rows
        .iter()
        .map(|r| r.timestamp.and_utc().timestamp_micros())
        .collect();
    let f64_col = |get: fn(&CleanedReading) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(get).collect::<Vec<_>>()))
    };

    let columns: Vec<ArrayRef> = vec![
        Arc::new(TimestampMicrosecondArray::from(timestamps)),
        f64_col(|r| r.consumption_kwh),
        f64_col(|r| r.solar_generation_kwh),
        f64_col(|r| r.temperature_c),
        f64_col(|r| r.net_grid_load),
        Arc::new(BooleanArray::from(
            rows.iter().map(|r| r.is_self_sufficient).collect::<Vec<_>>(),
        )),
        f64_col(|r| r.estimated_cost),
    ];

    Ok(RecordBatch::try_new(processed_schema(), columns)?)
}

/// Writes the cleaned table to `path`, replacing any previous file atomically.
pub fn write_processed(rows: &[CleanedReading], path: &Path) -> Result<()> {
    let batch = to_batch(rows)?;
    write_atomic(path, |file| {
        let mut writer = ArrowWriter::try_new(file, processed_schema(), Some(writer_properties()))?;
        writer.write(&batch)?;
        writer.close()?;
        Ok(())
    })
}

/// Reads the cleaned table back from `path`.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidInput`] when a column is missing, has the
/// wrong type or holds nulls, and the underlying I/O or Parquet error when
/// the file cannot be opened or decoded.
pub fn read_processed(path: &Path) -> Result<Vec<CleanedReading>> {
    let file = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut rows = Vec::new();
    for batch in reader {
        append_batch(&batch?, &mut rows)?;
    }
    Ok(rows)
}

fn append_batch(batch: &RecordBatch, out: &mut Vec<CleanedReading>) -> Result<()> {
    let timestamp = col_timestamp(batch, "timestamp")?;
    let consumption = col_f64(batch, "consumption_kwh")?;
    let solar = col_f64(batch, "solar_generation_kwh")?;
    let temperature = col_f64(batch, "temperature_c")?;
    let net = col_f64(batch, "net_grid_load")?;
    let self_sufficient = col_bool(batch, "is_self_sufficient")?;
    let cost = col_f64(batch, "estimated_cost")?;

    out.reserve(batch.num_rows());
    for i in 0..batch.num_rows() {
        out.push(CleanedReading {
            timestamp: micros_to_naive(timestamp.value(i))?,
            consumption_kwh: consumption.value(i),
            solar_generation_kwh: solar.value(i),
            temperature_c: temperature.value(i),
            net_grid_load: net.value(i),
            is_self_sufficient: self_sufficient.value(i),
            estimated_cost: cost.value(i),
        });
    }
    Ok(())
}

fn micros_to_naive(micros: i64) -> Result<NaiveDateTime> {
    DateTime::from_timestamp_micros(micros)
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| PipelineError::InvalidInput(format!("timestamp {micros} out of range")))
}

fn column<'a, T: 'static>(batch: &'a RecordBatch, name: &str, kind: &str) -> Result<&'a T> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|e| PipelineError::InvalidInput(format!("missing column '{name}': {e}")))?;
    let col = batch.column(idx);
    if col.null_count() > 0 {
        return Err(PipelineError::InvalidInput(format!(
            "column '{name}' holds {} null(s)",
            col.null_count()
        )));
    }
    col.as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| PipelineError::InvalidInput(format!("column '{name}' is not {kind}")))
}

fn col_f64<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Float64Array> {
    column(batch, name, "Float64Array")
}

fn col_bool<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a BooleanArray> {
    column(batch, name, "BooleanArray")
}

fn col_timestamp<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a TimestampMicrosecondArray> {
    column(batch, name, "TimestampMicrosecondArray")
}
