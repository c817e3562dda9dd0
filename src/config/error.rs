//! Error types for configuration parsing and validation.

use std::path::PathBuf;

use thiserror::Error;

use crate::host::AddressRange;

/// Error type for configuration operations.
///
/// Covers errors from parsing, validation, and file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file '{}': {source}", path.display())]
    FileRead {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize the configuration (for add command).
    #[error("Failed to serialize TOML config: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Failed to write configuration file (for init and add commands).
    #[error("Failed to write config file '{}': {source}", path.display())]
    FileWrite {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A value is not a dotted-quad IPv4 address.
    #[error("Invalid IPv4 address for {field}: '{value}'")]
    InvalidAddress {
        /// Name of the field
        field: &'static str,
        /// The rejected value
        value: String,
    },

    /// A range whose start lies after its end, or whose text is malformed.
    #[error("Invalid range '{value}': {reason}")]
    InvalidRange {
        /// The rejected range as written
        value: String,
        /// Reason for invalidity
        reason: &'static str,
    },

    /// Interval outside the accepted bounds.
    #[error("Invalid interval {value}s for {range}: must be between {min} and {max} seconds")]
    InvalidInterval {
        /// The range the interval belongs to
        range: AddressRange,
        /// The rejected interval
        value: u64,
        /// Lower bound
        min: u64,
        /// Upper bound
        max: u64,
    },

    /// The same range is configured twice.
    #[error("Range {0} is already configured")]
    DuplicateRange(AddressRange),

    /// A range overlaps or contains another configured range.
    #[error("Range {range} overlaps configured range {existing}")]
    OverlappingRange {
        /// The rejected range
        range: AddressRange,
        /// The configured range it collides with
        existing: AddressRange,
    },

    /// A range lies inside, or encloses, another configured range.
    #[error("Range {range} and configured range {existing} contain one another")]
    ContainedRange {
        /// The rejected range
        range: AddressRange,
        /// The configured range it collides with
        existing: AddressRange,
    },

    /// A range spans more hosts than one monitor may probe.
    #[error("Range {range} spans {hosts} hosts, at most {max} are allowed")]
    RangeTooLarge {
        /// The rejected range
        range: AddressRange,
        /// Number of addresses in the range
        hosts: u64,
        /// Upper bound
        max: u64,
    },

    /// No configured range matches the one to remove.
    #[error("Range {0} is not configured")]
    RangeNotConfigured(AddressRange),

    /// Neither the CLI nor the config file configured a range.
    #[error("No ranges configured. {hint}")]
    NoRanges {
        /// Hint for how to provide ranges
        hint: &'static str,
    },

    /// Invalid duration value (zero or too large).
    #[error("Invalid duration for {field}: {reason}")]
    InvalidDuration {
        /// Name of the field
        field: &'static str,
        /// Reason for invalidity
        reason: String,
    },
}

/// Well-known field names used in error variants.
///
/// Use these constants for compile-time safety when matching field names.
pub mod field {
    /// First address of a range.
    pub const START: &str = "start";
    /// Last address of a range.
    pub const END: &str = "end";
    /// Status report period.
    pub const REPORT_INTERVAL: &str = "report_interval";
}

impl ConfigError {
    /// Creates an `InvalidAddress` error for a field.
    #[must_use]
    pub fn address(field: &'static str, value: &str) -> Self {
        Self::InvalidAddress {
            field,
            value: value.to_string(),
        }
    }
}
