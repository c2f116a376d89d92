//! `relay-table` — Generates the relay output-state initializer table.
//!
//! Enumerates every GID of the relay bank, applies the exclusion, conflict,
//! dependency and decimation rules, and writes the surviving rows to a text
//! file for the firmware build.
//!
//! **Usage:**
//! ```
//! relay-table [--out <path>] [--config <file>] [--width <n>] [--exclude <gid>]...
//!             [--decimation <none|keep-even|keep-odd>] [--format <array|header>]
//!             [--report <file>]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::debug;
use relay_codegen::{Decimation, Format, TableConfig};

/// Generate the relay output-state table.
#[derive(Parser, Debug)]
#[command(
    name = "relay-table",
    about = "Generate the relay output-state initializer table"
)]
struct Args {
    /// Output file for the generated table.
    #[arg(long, default_value = "OutputStateArray.txt")]
    out: PathBuf,

    /// TOML table configuration. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Bits per state vector.
    #[arg(long)]
    width: Option<u32>,

    /// GID to leave out of the table (repeatable).
    #[arg(long)]
    exclude: Vec<u32>,

    /// Parity decimation: none, keep-even or keep-odd.
    #[arg(long)]
    decimation: Option<Decimation>,

    /// Output layout: array or header.
    #[arg(long)]
    format: Option<Format>,

    /// Also write the generation report as JSON to this file.
    #[arg(long)]
    report: Option<PathBuf>,
}

impl Args {
    /// Resolves the configuration file (or defaults) plus flag overrides.
    fn table_config(&self) -> Result<TableConfig> {
        let mut config = match &self.config {
            Some(path) => TableConfig::load(path)?,
            None => TableConfig::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        config.exclude.extend_from_slice(&self.exclude);
        if let Some(decimation) = self.decimation {
            config.decimation = decimation;
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = args.table_config()?;
    debug!("table config: {config:?}");

    let report = relay_codegen::generate(&config, &args.out)?;

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&report)
            .context("Failed to serialize generation report")?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        println!("  Report: {}", path.display());
    }

    println!(
        "Binary strings (count: {}) written to: {}",
        report.retained,
        args.out.display()
    );
    Ok(())
}
