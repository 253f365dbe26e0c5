//! Fixed-delay retry for scheduled pipeline steps.

use std::thread;
use std::time::Duration;

use tracing::{error, warn};

use crate::config::ScheduleConfig;
use crate::error::Result;

/// How often and how far apart a failed step is re-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first failure.
    pub max_retries: u32,
    /// Pause before each retry.
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    /// Single attempt, no waiting.
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Runs `step` until it succeeds, fails with a non-retryable error, or
    /// the retry budget is spent. The last error is returned.
    pub fn run<T>(&self, name: &str, mut step: impl FnMut() -> Result<T>) -> Result<T> {
        let mut attempt: u32 = 0;
        loop {
            match step() {
                Ok(v) => return Ok(v),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        step = name,
                        error = %e,
                        attempt,
                        delay_secs = self.delay.as_secs(),
                        "step failed, retrying after delay"
                    );
                    thread::sleep(self.delay);
                }
                Err(e) => {
                    error!(step = name, error = %e, attempts = attempt + 1, "step failed, giving up");
                    return Err(e);
                }
            }
        }
    }
}

impl From<&ScheduleConfig> for RetryPolicy {
    fn from(cfg: &ScheduleConfig) -> Self {
        Self::new(cfg.retries, cfg.retry_delay())
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&ScheduleConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use std::io;
    use std::path::PathBuf;

    fn quick(retries: u32) -> RetryPolicy {
        RetryPolicy::new(retries, Duration::ZERO)
    }

    #[test]
    fn transient_failure_is_retried_once() {
        let mut calls = 0;
        let out = quick(1).run("transform", || {
            calls += 1;
            if calls == 1 {
                Err(PipelineError::Io(io::Error::other("disk busy")))
            } else {
                Ok(calls)
            }
        });
        assert_eq!(out.unwrap(), 2);
    }

    #[test]
    fn budget_exhaustion_returns_last_error() {
        let mut calls = 0;
        let out: Result<()> = quick(2).run("transform", || {
            calls += 1;
            Err(PipelineError::MissingInput {
                path: PathBuf::from("raw.csv"),
            })
        });
        assert!(matches!(out, Err(PipelineError::MissingInput { .. })));
        assert_eq!(calls, 3);
    }

    #[test]
    fn configuration_errors_are_not_retried() {
        let mut calls = 0;
        let out: Result<()> = quick(5).run("generate", || {
            calls += 1;
            Err(PipelineError::Configuration("window".into()))
        });
        assert!(out.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn default_matches_schedule() {
        let p = RetryPolicy::default();
        assert_eq!(p.max_retries, 1);
        assert_eq!(p.delay, Duration::from_secs(300));
        assert_eq!(RetryPolicy::none().max_retries, 0);
    }
}
