//! Relay output-state table generator.
//!
//! Enumerates every GID of a fixed-width relay bank, drops the combinations
//! the hardware cannot take, rewrites dependent relays, decimates by parity and
//! renders what is left as an initializer array for the output state machine
//! firmware.
//!
//! # Entry Points
//!
//! ```no_run
//! use std::path::Path;
//! use relay_codegen::{generate, TableConfig};
//!
//! let report = generate(&TableConfig::default(), Path::new("OutputStateArray.txt"))
//!     .expect("table generation failed");
//! assert_eq!(report.retained, 192);
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod config;
pub mod emit;
pub mod error;
pub mod rules;
pub mod vector;

use std::path::{Path, PathBuf};

use anyhow::Result;
use log::{info, trace};
use serde::Serialize;

pub use config::{Decimation, Dependency, Format, TableConfig};
pub use error::ConfigError;
pub use rules::{Disposition, Row, RowRules, Skip};
pub use vector::StateVector;

use emit::TableFile;
use vector::candidate_count;

/// Report of what was generated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    /// Bits per row.
    pub width: u32,
    /// Number of GIDs enumerated (`2^width`).
    pub candidates: u64,
    /// Rows written.
    pub retained: u64,
    /// GIDs dropped by the exclusion list.
    pub excluded: u64,
    /// GIDs dropped by a conflict pair.
    pub conflicts: u64,
    /// GIDs dropped by parity decimation.
    pub decimated: u64,
    /// Retained rows whose bits differ from their GID.
    pub rewritten: u64,
    /// Output layout.
    pub format: Format,
    /// File written, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// A rendered table and its report.
#[derive(Debug, Clone)]
pub struct Table {
    /// File contents.
    pub text: String,
    /// Counts for the rendered rows.
    pub report: GenerationReport,
}

/// Validates `config` and renders the table in memory.
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
pub fn render(config: &TableConfig) -> Result<Table> {
    config.validate()?;

    let rules = RowRules::from_config(config);
    let mut report = GenerationReport {
        width: config.width,
        candidates: candidate_count(config.width),
        format: config.format,
        ..GenerationReport::default()
    };

    // The header declares the row count ahead of the rows, so collect first.
    let mut rows = Vec::new();
    for (gid, disposition) in rules.dispositions() {
        match disposition {
            Disposition::Keep(vector) => {
                let row = Row {
                    state: u32::try_from(rows.len())?,
                    gid,
                    vector,
                };
                if row.is_rewritten() {
                    report.rewritten += 1;
                }
                trace!("state {} -> GID {gid}: {vector}", row.state);
                rows.push(row);
            }
            Disposition::Skip(Skip::Excluded) => report.excluded += 1,
            Disposition::Skip(Skip::Conflict(_)) => report.conflicts += 1,
            Disposition::Skip(Skip::Decimated) => report.decimated += 1,
        }
    }
    report.retained = rows.len() as u64;

    let mut f = TableFile::new(config.format);
    f.open_array(rows.len(), config.width);
    for row in &rows {
        f.row(row);
    }

    info!(
        "rendered {} of {} states (excluded {}, conflicts {}, decimated {}, rewritten {})",
        report.retained,
        report.candidates,
        report.excluded,
        report.conflicts,
        report.decimated,
        report.rewritten
    );

    Ok(Table {
        text: f.finish(),
        report,
    })
}

/// Renders the table for `config` and writes it to `out_path`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the file cannot be written.
pub fn generate(config: &TableConfig, out_path: &Path) -> Result<GenerationReport> {
    let Table { text, mut report } = render(config)?;
    emit::write_file(out_path, &text)?;
    info!("wrote {}", out_path.display());
    report.path = Some(out_path.to_path_buf());
    Ok(report)
}
