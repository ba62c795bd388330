//! cli
//!
//! Command-line interface layer for georesolve.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Install the log subscriber
//! - Load configuration and delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. Resolution, indexing and query building live in
//! [`crate::core`]; handlers only load what they need and format results.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use tracing_subscriber::EnvFilter;

use crate::cli::args::{Command, ConfigAction};
use crate::core::config::{Config, ConfigLoadResult};
use crate::ui::output::{self, Verbosity};

/// Per-invocation state shared by command handlers.
#[derive(Debug, Clone)]
pub struct Context {
    /// Effective configuration, with CLI overrides applied
    pub config: Config,
    /// The `--config` argument, if given
    pub config_path: Option<PathBuf>,
    pub verbosity: Verbosity,
    /// Emit JSON instead of text
    pub json: bool,
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let verbosity = Verbosity::from_flags(cli.quiet, cli.debug);
    init_tracing(verbosity);

    // `config init` creates the file, so it must not require one to exist.
    let creating = matches!(
        cli.command,
        Command::Config {
            action: ConfigAction::Init { .. }
        }
    );
    let loaded = if creating {
        ConfigLoadResult {
            config: Config::default(),
            warnings: Vec::new(),
        }
    } else {
        Config::load(cli.config.as_deref()).context("Failed to load config")?
    };
    for warning in &loaded.warnings {
        output::warn(
            format!("{} ({})", warning.message, warning.path.display()),
            verbosity,
        );
    }

    let mut config = loaded.config;
    if let Some(path) = cli.areas_data {
        config = config.with_areas_path(path);
    }
    if let Some(path) = cli.metro_data {
        config = config.with_metro_path(path);
    }

    let ctx = Context {
        config,
        config_path: cli.config,
        verbosity,
        json: cli.json,
    };

    commands::dispatch(cli.command, &ctx)
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` takes precedence over the level implied by the flags.
fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("georesolve={}", verbosity.log_level())));

    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
