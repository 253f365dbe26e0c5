//! energy-pipeline entry point: CLI wiring and config loading.

use std::process;

use chrono::Local;

use energy_pipeline::cli::{self, CliOptions, Command};
use energy_pipeline::config::PipelineConfig;
use energy_pipeline::dashboard::DashboardState;
use energy_pipeline::observability::init_tracing;
use energy_pipeline::pipeline::{run_all, run_generate, run_transform};
use energy_pipeline::retry::RetryPolicy;

/// Loads the config file (or defaults), applies CLI overrides, validates.
fn load_config(opts: &CliOptions) -> PipelineConfig {
    let mut cfg = match &opts.config {
        Some(path) => PipelineConfig::from_toml_file(path).unwrap_or_else(|e| {
            eprintln!("{e}");
            process::exit(1);
        }),
        None => PipelineConfig::default(),
    };
    opts.apply_overrides(&mut cfg);

    let errors = cfg.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }
    cfg
}

fn fail(context: &str, e: impl std::fmt::Display) -> ! {
    eprintln!("error: {context}: {e}");
    process::exit(1);
}

fn main() {
    let opts = cli::parse_args().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        cli::print_usage();
        process::exit(2);
    });

    if opts.command == Command::Help {
        cli::print_usage();
        return;
    }

    // The terminal dashboard owns the screen; keep log lines off it.
    #[cfg(feature = "tui")]
    let logs_enabled = opts.command != Command::Tui;
    #[cfg(not(feature = "tui"))]
    let logs_enabled = true;
    if logs_enabled {
        init_tracing();
    }

    let cfg = load_config(&opts);
    let now = Local::now().naive_local();

    match opts.command {
        Command::Generate => match run_generate(&cfg, now) {
            Ok(report) => println!("wrote {} raw rows to {}", report.rows, report.path.display()),
            Err(e) => fail("generation failed", e),
        },
        Command::Transform => match run_transform(&cfg) {
            Ok(report) => println!(
                "wrote {} processed rows to {}",
                report.rows,
                report.path.display()
            ),
            Err(e) => fail("transformation failed", e),
        },
        Command::Run => match run_all(&cfg, now, &RetryPolicy::from(&cfg.schedule)) {
            Ok((raw, processed)) => {
                println!("wrote {} raw rows to {}", raw.rows, raw.path.display());
                println!(
                    "wrote {} processed rows to {}",
                    processed.rows,
                    processed.path.display()
                );
            }
            Err(e) => fail("pipeline run failed", e),
        },
        Command::Summary { start, end } => {
            let state = DashboardState::load(&cfg.paths.processed, cfg.tariff)
                .unwrap_or_else(|e| fail("failed to load processed data", e));
            let Some(dataset) = state.dataset() else {
                println!(
                    "processed data not available yet at {}: run the pipeline first",
                    cfg.paths.processed.display()
                );
                return;
            };
            match dataset.resolve_range(start, end) {
                Some(range) => println!("{}", dataset.summary(range)),
                None => println!("processed table holds no rows"),
            }
        }
        #[cfg(feature = "api")]
        Command::Serve { port } => {
            use std::net::SocketAddr;
            use std::sync::Arc;

            let dashboard = DashboardState::load(&cfg.paths.processed, cfg.tariff)
                .unwrap_or_else(|e| fail("failed to load processed data", e));
            let state = Arc::new(energy_pipeline::api::AppState { dashboard });
            let addr = SocketAddr::from(([0, 0, 0, 0], port));
            let rt = tokio::runtime::Runtime::new()
                .unwrap_or_else(|e| fail("failed to create tokio runtime", e));
            if let Err(e) = rt.block_on(energy_pipeline::api::serve(state, addr)) {
                fail("API server stopped", e);
            }
        }
        #[cfg(feature = "tui")]
        Command::Tui => {
            if let Err(e) = energy_pipeline::tui::run(cfg.paths.processed.clone(), cfg.tariff) {
                fail("TUI crashed", e);
            }
        }
        Command::Help => cli::print_usage(),
    }
}
