//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Global settings
    #[serde(default)]
    pub settings: SettingsSection,

    /// Monitored ranges, one `[[monitor]]` table each
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub monitor: Vec<MonitorEntry>,
}

/// Global settings section.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsSection {
    /// Seconds between status reports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_interval: Option<u64>,
}

/// One monitored range.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorEntry {
    /// First address of the range
    pub start: String,

    /// Last address of the range; a single host when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,

    /// Probe interval in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<u64>,

    /// Free-form description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl MonitorEntry {
    /// Returns the last address, falling back to `start`.
    #[must_use]
    pub fn end_or_start(&self) -> &str {
        self.end.as_deref().unwrap_or(&self.start)
    }
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }

    /// Serializes the configuration back to TOML text.
    ///
    /// Comments of a hand-edited file are not preserved.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(ConfigError::from)
    }

    /// Writes the configuration to a file, replacing it.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml_string()?;
        std::fs::write(path, content).map_err(|e| ConfigError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# rangewatch Configuration File

[settings]
# Seconds between status reports (default: 60)
report_interval = 60

# One [[monitor]] table per range.
# start     first address (required)
# end       last address, inclusive (default: same as start)
# interval  probe interval in seconds, 10 to 300 (default: 30)
# comment   free-form description shown in reports
#
# Ranges must not overlap or contain one another.

[[monitor]]
start = "192.168.1.1"
end = "192.168.1.20"
interval = 30
comment = "office"

# [[monitor]]
# start = "10.0.0.1"
# comment = "gateway"
"#
    .to_string()
}
