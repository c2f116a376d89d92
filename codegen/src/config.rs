//! Table configuration: width, row rules and output format.
//!
//! Configurations are plain TOML. Every field is optional and falls back to
//! the values that produce the shipped 9-relay table:
//!
//! ```toml
//! width = 9
//! exclude = []
//! conflicts = [[0, 1]]
//! decimation = "keep-even"
//! format = "array"
//!
//! [[dependencies]]
//! source = 7
//! target = 8
//! ```

use core::fmt;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::vector::{candidate_count, MAX_WIDTH};

/// Number of relays on the bench.
pub const DEFAULT_WIDTH: u32 = 9;

/// Parity rule applied after the dependent-bit rewrite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Decimation {
    /// Keep every row.
    None,
    /// Drop rows with an odd GID.
    #[default]
    KeepEven,
    /// Drop rows with an even GID.
    KeepOdd,
}

impl Decimation {
    /// Returns `true` if a row with this GID is dropped.
    pub fn drops(self, gid: u32) -> bool {
        match self {
            Self::None => false,
            Self::KeepEven => gid % 2 == 1,
            Self::KeepOdd => gid % 2 == 0,
        }
    }
}

impl fmt::Display for Decimation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::KeepEven => f.write_str("keep-even"),
            Self::KeepOdd => f.write_str("keep-odd"),
        }
    }
}

impl FromStr for Decimation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "keep-even" => Ok(Self::KeepEven),
            "keep-odd" => Ok(Self::KeepOdd),
            other => Err(ConfigError::UnknownDecimation(other.to_string())),
        }
    }
}

/// Layout of the generated file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    /// Bare initializer rows, one per line.
    #[default]
    Array,
    /// Rows wrapped in a C/C++ header declaring `outputStateArray`.
    Header,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Array => f.write_str("array"),
            Self::Header => f.write_str("header"),
        }
    }
}

impl FromStr for Format {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "array" => Ok(Self::Array),
            "header" => Ok(Self::Header),
            other => Err(ConfigError::UnknownFormat(other.to_string())),
        }
    }
}

/// A relay that follows another: `target` is overwritten with `source`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dependency {
    /// Position whose value is copied.
    pub source: u32,
    /// Position that is rewritten.
    pub target: u32,
}

/// Everything needed to generate one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableConfig {
    /// Bits per state vector.
    pub width: u32,
    /// GIDs that are never emitted.
    pub exclude: Vec<u32>,
    /// Position pairs that must not both be set.
    pub conflicts: Vec<[u32; 2]>,
    /// Dependent-bit rewrites, applied in order.
    pub dependencies: Vec<Dependency>,
    /// Parity decimation.
    pub decimation: Decimation,
    /// Output layout.
    pub format: Format,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            exclude: Vec::new(),
            // R09 and R08 share a mechanical linkage.
            conflicts: vec![[0, 1]],
            // R01 follows R02.
            dependencies: vec![Dependency {
                source: 7,
                target: 8,
            }],
            decimation: Decimation::KeepEven,
            format: Format::Array,
        }
    }
}

impl TableConfig {
    /// A configuration with every rule disabled: all `2^width` rows, verbatim.
    pub fn unfiltered(width: u32) -> Self {
        Self {
            width,
            exclude: Vec::new(),
            conflicts: Vec::new(),
            dependencies: Vec::new(),
            decimation: Decimation::None,
            format: Format::Array,
        }
    }

    /// Parses a TOML configuration. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not a valid configuration.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config = Self::from_toml_str(&text)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        Ok(config)
    }

    /// Checks that every rule fits the configured width.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let width = self.width;
        if !(1..=MAX_WIDTH).contains(&width) {
            return Err(ConfigError::WidthOutOfRange {
                width,
                max: MAX_WIDTH,
            });
        }

        let in_range = |rule: &'static str, pos: u32| {
            if pos < width {
                Ok(())
            } else {
                Err(ConfigError::PositionOutOfRange { rule, pos, width })
            }
        };

        for &[a, b] in &self.conflicts {
            in_range("conflict", a)?;
            in_range("conflict", b)?;
            if a == b {
                return Err(ConfigError::SelfConflict { pos: a });
            }
        }

        let mut targets = HashSet::new();
        for dep in &self.dependencies {
            in_range("dependency", dep.source)?;
            in_range("dependency", dep.target)?;
            if dep.source == dep.target {
                return Err(ConfigError::SelfDependency { pos: dep.source });
            }
            if !targets.insert(dep.target) {
                return Err(ConfigError::DuplicateTarget { target: dep.target });
            }
        }

        let candidates = candidate_count(width);
        if let Some(&gid) = self.exclude.iter().find(|&&g| u64::from(g) >= candidates) {
            return Err(ConfigError::GidOutOfRange { gid, width });
        }

        Ok(())
    }
}
