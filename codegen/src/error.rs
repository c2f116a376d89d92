//! Configuration errors.

use thiserror::Error;

/// A table configuration that cannot be generated.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Vector width outside `1..=32`.
    #[error("width {width} is out of range (expected 1..={max})")]
    WidthOutOfRange {
        /// Requested width.
        width: u32,
        /// Largest supported width.
        max: u32,
    },

    /// A rule names a bit position the vector does not have.
    #[error("{rule} position {pos} is out of range for width {width}")]
    PositionOutOfRange {
        /// Rule kind naming the position (`conflict`, `dependency`).
        rule: &'static str,
        /// Offending position.
        pos: u32,
        /// Configured width.
        width: u32,
    },

    /// A conflict pair names the same position twice.
    #[error("conflict pair ({pos}, {pos}) names a single position")]
    SelfConflict {
        /// Repeated position.
        pos: u32,
    },

    /// A dependency copies a position onto itself.
    #[error("dependency {pos} <- {pos} copies a position onto itself")]
    SelfDependency {
        /// Repeated position.
        pos: u32,
    },

    /// Two dependencies rewrite the same target.
    #[error("position {target} is the target of more than one dependency")]
    DuplicateTarget {
        /// Shared target position.
        target: u32,
    },

    /// An excluded GID outside `[0, 2^width)`.
    #[error("excluded GID {gid} is out of range for width {width}")]
    GidOutOfRange {
        /// Offending GID.
        gid: u32,
        /// Configured width.
        width: u32,
    },

    /// Unrecognised decimation mode name.
    #[error("unknown decimation mode `{0}` (expected none, keep-even or keep-odd)")]
    UnknownDecimation(String),

    /// Unrecognised output format name.
    #[error("unknown output format `{0}` (expected array or header)")]
    UnknownFormat(String),

    /// The configuration file is not valid TOML for [`TableConfig`](crate::config::TableConfig).
    #[error("invalid table configuration: {0}")]
    Parse(#[from] toml::de::Error),
}
