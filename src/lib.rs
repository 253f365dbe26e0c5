pub mod aggregate;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod generator;
pub mod io;
pub mod observability;
pub mod pipeline;
pub mod profiles;
pub mod readings;
pub mod retry;
pub mod transform;
pub mod window;

#[cfg(feature = "api")]
pub mod api;

#[cfg(feature = "tui")]
pub mod tui;
