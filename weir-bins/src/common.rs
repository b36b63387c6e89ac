//! Common utilities for all binaries
//!
//! Shared logging initialization and session reporting.

use anyhow::Result;
use std::collections::BTreeMap;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing/logging
pub fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    Ok(())
}

/// Per-session counters kept by the gateway loop
#[derive(Debug, Default)]
pub struct SessionStats {
    pub processed: usize,
    pub filled: usize,
    pub risk_rejected: usize,
    pub quotes: usize,
    pub invalid: usize,
}

/// Print the end-of-session summary
pub fn print_summary(stats: &SessionStats, positions: &BTreeMap<String, i64>) {
    tracing::info!("=== Session Summary ===");
    tracing::info!("Messages processed: {}", stats.processed);
    tracing::info!("Filled: {}", stats.filled);
    tracing::info!("Risk-rejected: {}", stats.risk_rejected);
    tracing::info!("Quotes: {}", stats.quotes);
    tracing::info!("Invalid: {}", stats.invalid);

    if positions.is_empty() {
        tracing::info!("No positions");
    }
    for (symbol, position) in positions {
        tracing::info!("Position {}: {:+}", symbol, position);
    }
}
