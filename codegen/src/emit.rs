//! Table text builder and file writer.

use std::fmt::Write as FmtWrite;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::Format;
use crate::rules::Row;

/// Name of the initializer array the firmware indexes.
pub const ARRAY_NAME: &str = "outputStateArray";

/// Macro holding the number of emitted rows.
pub const STATE_COUNT_MACRO: &str = "NUM_STATES";

/// Macro holding the vector width.
pub const OUTPUT_COUNT_MACRO: &str = "NUM_OUTPUTS";

/// Accumulates the text of one generated table.
pub struct TableFile {
    /// The text buffer.
    pub buf: String,
    format: Format,
    indent: &'static str,
}

impl TableFile {
    /// Starts a table in the given layout. Header tables get their preamble
    /// immediately; the array declaration is opened by [`TableFile::open_array`].
    pub fn new(format: Format) -> Self {
        let mut f = Self {
            buf: String::new(),
            format,
            indent: "",
        };
        if format == Format::Header {
            f.line("// Generated by relay-table. Do not edit by hand.");
            f.line("#pragma once");
            f.blank();
        }
        f
    }

    /// Appends a line followed by newline.
    pub fn line(&mut self, s: &str) {
        self.buf.push_str(s);
        self.buf.push('\n');
    }

    /// Appends a blank line.
    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    /// Declares the row count and width and opens the array initializer.
    /// Does nothing for [`Format::Array`].
    pub fn open_array(&mut self, states: usize, width: u32) {
        if self.format != Format::Header {
            return;
        }
        let _ = writeln!(self.buf, "#define {STATE_COUNT_MACRO} {states}");
        let _ = writeln!(self.buf, "#define {OUTPUT_COUNT_MACRO} {width}");
        self.blank();
        let _ = writeln!(
            self.buf,
            "const bool {ARRAY_NAME}[{STATE_COUNT_MACRO}][{OUTPUT_COUNT_MACRO}] = {{"
        );
        self.indent = "    ";
    }

    /// Appends one table row.
    pub fn row(&mut self, row: &Row) {
        let _ = writeln!(self.buf, "{}{}", self.indent, format_row(row));
    }

    /// Closes the initializer and returns the finished text.
    pub fn finish(mut self) -> String {
        if self.format == Format::Header {
            self.line("};");
        }
        self.buf
    }
}

/// Formats one row as `{b0, ..., bN}, // state <n> -> GID <i>`.
pub fn format_row(row: &Row) -> String {
    format!("{}, // state {} -> GID {}", row.vector, row.state, row.gid)
}

/// Writes `content` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cannot be written.
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
