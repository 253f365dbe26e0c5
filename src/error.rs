//! Crate-wide error type for the pipeline steps and handoff codecs.

use std::io;
use std::path::PathBuf;

/// Errors raised by the generation and transformation steps.
///
/// Aggregation has no error path: it is total over any cleaned table.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// Raw handoff file is absent; run the generation step first.
    #[error("raw input not found at {path}: run the generation step first")]
    MissingInput { path: PathBuf },
    /// Degenerate or invalid configuration. Never retried.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Handoff content that cannot be turned into a valid table.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

impl PipelineError {
    /// Whether a scheduler should try the failed step again.
    ///
    /// Configuration and content errors will fail the same way on every
    /// attempt; everything else may be transient.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Configuration(_) | Self::InvalidInput(_))
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_input_message_points_at_generation() {
        let err = PipelineError::MissingInput {
            path: PathBuf::from("data/raw/energy_data_raw.csv"),
        };
        let msg = err.to_string();
        assert!(msg.contains("energy_data_raw.csv"));
        assert!(msg.contains("generation step"));
    }

    #[test]
    fn configuration_errors_are_not_retryable() {
        assert!(!PipelineError::Configuration("window".into()).is_retryable());
        assert!(!PipelineError::InvalidInput("temps".into()).is_retryable());
        assert!(
            PipelineError::MissingInput {
                path: PathBuf::from("x")
            }
            .is_retryable()
        );
        assert!(PipelineError::Io(io::Error::other("disk")).is_retryable());
    }
}
