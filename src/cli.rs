use std::env;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::config::PipelineConfig;

/// Default port for `serve`.
#[cfg(feature = "api")]
pub const DEFAULT_PORT: u16 = 3000;

/// What the binary should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Write the raw handoff.
    Generate,
    /// Raw handoff to processed handoff.
    Transform,
    /// Generate then transform, with retries.
    Run,
    /// Print the summary of a date range.
    Summary {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
    #[cfg(feature = "api")]
    Serve { port: u16 },
    #[cfg(feature = "tui")]
    Tui,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOptions {
    pub command: Command,
    pub config: Option<PathBuf>,
    pub seed: Option<u64>,
    pub raw: Option<PathBuf>,
    pub processed: Option<PathBuf>,
}

impl CliOptions {
    /// Applies command-line overrides on top of a loaded config.
    pub fn apply_overrides(&self, cfg: &mut PipelineConfig) {
        if let Some(seed) = self.seed {
            cfg.generation.seed = Some(seed);
        }
        if let Some(raw) = &self.raw {
            cfg.paths.raw = raw.clone();
        }
        if let Some(processed) = &self.processed {
            cfg.paths.processed = processed.clone();
        }
    }
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(args)
}

/// Parses everything after the program name.
pub fn parse_args_from(args: Vec<String>) -> Result<CliOptions, String> {
    let Some(first) = args.first() else {
        return Err("missing command".to_string());
    };

    let command = match first.as_str() {
        "generate" => Command::Generate,
        "transform" => Command::Transform,
        "run" => Command::Run,
        "summary" => Command::Summary {
            start: None,
            end: None,
        },
        #[cfg(feature = "api")]
        "serve" => Command::Serve { port: DEFAULT_PORT },
        #[cfg(feature = "tui")]
        "tui" => Command::Tui,
        "--help" | "-h" | "help" => Command::Help,
        other => return Err(format!("unknown command: {other}")),
    };
    parse_options(command, &args[1..])
}

fn parse_options(mut command: Command, args: &[String]) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut config = None;
    let mut seed = None;
    let mut raw = None;
    let mut processed = None;

    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                let path = args
                    .next_or_err(i, "missing value for --config (expected a TOML file path)")?;
                if config.replace(PathBuf::from(path)).is_some() {
                    return Err("--config provided more than once".to_string());
                }
            }
            "--seed" => {
                i += 1;
                let value = args.next_or_err(i, "missing value for --seed (expected a u64)")?;
                let parsed = value
                    .parse::<u64>()
                    .map_err(|_| format!("--seed value \"{value}\" is not a valid u64"))?;
                if seed.replace(parsed).is_some() {
                    return Err("--seed provided more than once".to_string());
                }
            }
            "--raw" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --raw (expected a file path)")?;
                if raw.replace(PathBuf::from(path)).is_some() {
                    return Err("--raw provided more than once".to_string());
                }
            }
            "--processed" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --processed (expected a file path)")?;
                if processed.replace(PathBuf::from(path)).is_some() {
                    return Err("--processed provided more than once".to_string());
                }
            }
            flag @ ("--start" | "--end") => {
                let Command::Summary { start, end } = &mut command else {
                    return Err(format!("{flag} is only valid with the summary command"));
                };
                i += 1;
                let value = args
                    .next_or_err(i, &format!("missing value for {flag} (expected YYYY-MM-DD)"))?;
                let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
                    .map_err(|_| format!("{flag} value \"{value}\" is not a YYYY-MM-DD date"))?;
                let slot = if flag == "--start" { start } else { end };
                if slot.replace(date).is_some() {
                    return Err(format!("{flag} provided more than once"));
                }
            }
            #[cfg(feature = "api")]
            "--port" => {
                let Command::Serve { port } = &mut command else {
                    return Err("--port is only valid with the serve command".to_string());
                };
                i += 1;
                let value = args.next_or_err(i, "missing value for --port (expected a u16)")?;
                *port = value
                    .parse::<u16>()
                    .map_err(|_| format!("--port value \"{value}\" is not a valid u16"))?;
            }
            "--help" | "-h" => command = Command::Help,
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    Ok(CliOptions {
        command,
        config,
        seed,
        raw,
        processed,
    })
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("energy-pipeline: synthetic energy ETL and dashboard");
    eprintln!();
    eprintln!("Usage: energy-pipeline <COMMAND> [OPTIONS]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  generate                 Write the raw CSV handoff");
    eprintln!("  transform                Clean the raw CSV into the processed Parquet file");
    eprintln!("  run                      generate then transform, retrying per [schedule]");
    eprintln!("  summary                  Print metrics for a date range");
    #[cfg(feature = "api")]
    eprintln!("  serve                    Serve the dashboard JSON API");
    #[cfg(feature = "tui")]
    eprintln!("  tui                      Open the terminal dashboard");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>          Load settings from a TOML file");
    eprintln!("  --seed <u64>             Override the generation seed");
    eprintln!("  --raw <path>             Override the raw CSV path");
    eprintln!("  --processed <path>       Override the processed Parquet path");
    eprintln!("  --start <YYYY-MM-DD>     summary: first date (default: last 7 days)");
    eprintln!("  --end <YYYY-MM-DD>       summary: last date (default: latest date)");
    #[cfg(feature = "api")]
    eprintln!("  --port <u16>             serve: listen port (default: 3000)");
    eprintln!("  --help                   Show this help message");
}
