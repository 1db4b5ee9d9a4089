//! Diagnostics for the `ledgerline` binary.
//!
//! Everything `tracing` emits goes to stderr; stdout carries only command
//! output (keys, node tables, transaction hex) so it can be piped into the
//! next signer. `RUST_LOG` replaces the `-v` derived filter when set.

use anyhow::{Context, Result};
use clap::ValueEnum;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Compact human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Filter directives for the binary and the SDK at a `-v` count.
/// Quiet by default so command output is all a terminal shows.
pub fn default_directives(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("ledgerline={level},ledgerline_sdk={level}")
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init(format: LogFormat, verbosity: u8) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbosity)));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(false),
            )
            .try_init(),
    }
    .context("failed to install log subscriber")?;

    tracing::debug!(?format, verbosity, "logging ready");
    Ok(())
}
