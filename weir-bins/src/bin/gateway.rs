//! Weir Gateway - order-entry front door
//!
//! Reads raw FIX-style messages from the command line and/or a file,
//! runs each through the validation → risk → lifecycle pipeline, and
//! reports every outcome on stdout. All audit events land in a
//! JSON-lines journal; a journal failure aborts the session because the
//! trail is not optional.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use weir_bins::common::{init_logging, print_summary, SessionStats};
use weir_core::prelude::*;
use weir_core::risk::{DEFAULT_MAX_ORDER_SIZE, DEFAULT_MAX_POSITION};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// One raw message to process (repeatable)
    #[arg(short, long)]
    message: Vec<String>,

    /// File of newline-separated raw messages ('#' lines are comments)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Field delimiter used in raw messages
    #[arg(short, long, default_value_t = '|')]
    delimiter: char,

    /// Maximum quantity allowed per order
    #[arg(long, default_value_t = DEFAULT_MAX_ORDER_SIZE)]
    max_order_size: u64,

    /// Maximum absolute net position allowed per symbol
    #[arg(long, default_value_t = DEFAULT_MAX_POSITION)]
    max_position: i64,

    /// Path of the JSON-lines audit journal
    #[arg(short, long, default_value = "events.jsonl")]
    journal: PathBuf,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level)?;

    let mut raw_messages = args.message.clone();
    if let Some(path) = &args.input {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading messages from {}", path.display()))?;
        raw_messages.extend(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(str::to_string),
        );
    }
    if raw_messages.is_empty() {
        bail!("nothing to do: pass --message and/or --input");
    }

    let recorder = Arc::new(
        JsonlRecorder::create(&args.journal)
            .with_context(|| format!("opening journal {}", args.journal.display()))?,
    );
    let limits = RiskLimits {
        max_order_size: args.max_order_size,
        max_position: args.max_position,
    };
    let pipeline = Pipeline::new(limits, recorder).with_delimiter(args.delimiter);

    let mut stats = SessionStats::default();
    for raw in &raw_messages {
        stats.processed += 1;

        match pipeline.process(raw) {
            Ok(outcome) => {
                match &outcome {
                    Outcome::Filled { .. } => stats.filled += 1,
                    Outcome::Rejected { .. } => stats.risk_rejected += 1,
                    Outcome::QuoteAccepted { .. } => stats.quotes += 1,
                }
                println!("{}", outcome);
            }
            // An unusable audit trail ends the session; everything else is
            // reported and the caller may resubmit a corrected message.
            Err(PipelineError::Recorder(e)) => {
                return Err(e).context("audit journal write failed, aborting session");
            }
            Err(err) => {
                stats.invalid += 1;
                println!("INVALID {}: {}", raw, err);
            }
        }
    }

    let positions: BTreeMap<String, i64> = pipeline.positions().into_iter().collect();
    print_summary(&stats, &positions);

    Ok(())
}
