//! Parser configuration.
//!
//! A small YAML-serializable document controlling registry construction and
//! usage rendering.
//!
//! # Example YAML
//!
//! ```yaml
//! usage_header: "mytool [options] FILE..."
//! styled_usage: false
//! duplicate_names: first_wins
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// What the registry does when two descriptors compute the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail with [`SchemaError::DuplicateName`](crate::SchemaError::DuplicateName).
    #[default]
    Reject,
    /// Keep every descriptor; the earliest registered one wins resolution.
    FirstWins,
}

/// Registry and usage settings.
///
/// # Examples
///
/// ```
/// use argmap_core::{DuplicatePolicy, ParserConfig};
///
/// let config: ParserConfig = serde_yaml::from_str("duplicate_names: first_wins").unwrap();
/// assert_eq!(config.duplicate_names, DuplicatePolicy::FirstWins);
/// assert!(config.styled_usage);
/// assert!(config.usage_header.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Text printed before the option list.
    pub usage_header: Option<String>,
    /// Emit ANSI bold/underline in usage text.
    pub styled_usage: bool,
    /// Handling of identical computed names.
    pub duplicate_names: DuplicatePolicy,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            usage_header: None,
            styled_usage: true,
            duplicate_names: DuplicatePolicy::Reject,
        }
    }
}

impl ParserConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves configuration to a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be created, or
    /// [`ConfigError::Yaml`] if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }
}
