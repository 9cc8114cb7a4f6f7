//! Error types for schema construction, token parsing, and configuration.
//!
//! Schema problems surface once, when a [`Registry`](crate::Registry) is
//! built. Everything that can go wrong while consuming tokens is a
//! [`ParseError`]; the first one aborts the parse.

use thiserror::Error;

use crate::{OptionForm, TargetType};

/// Error type returned by setter hooks.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Invalid descriptor configuration, detected while building a registry.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A descriptor ended up with an empty literal name.
    #[error("option for slot '{slot}' has an empty name")]
    EmptyName { slot: String },

    /// One descriptor lists the same computed name twice, for example
    /// `v` alongside an explicit `no-v` on an opposite flag.
    #[error("option name '{name}' appears more than once in slot '{slot}'")]
    RepeatedName { slot: String, name: String },

    /// Two descriptors compute the same name (including generated `no-`
    /// aliases).
    #[error("duplicate option name '{name}' (slot '{first}' and slot '{second}')")]
    DuplicateName {
        name: String,
        first: String,
        second: String,
    },

    /// A `pattern` or `short_pattern` is not a valid regular expression.
    #[error("invalid pattern '{pattern}' for slot '{slot}': {source}")]
    InvalidPattern {
        slot: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A value token could not be converted to the slot's type.
///
/// # Examples
///
/// ```
/// use argmap_core::{convert, TargetType};
///
/// let err = convert::<i32>("abc").unwrap_err();
/// assert_eq!(err.raw, "abc");
/// assert_eq!(err.target, TargetType::Int32);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot convert '{raw}' to {target}: {reason}")]
pub struct ConversionError {
    /// The token as it appeared on the command line.
    pub raw: String,
    /// The slot's semantic type.
    pub target: TargetType,
    /// The underlying parse failure, rendered.
    pub reason: String,
}

/// A setter hook rejected a value.
#[derive(Debug, Error)]
#[error("setter for option '{option}' rejected the value: {source}")]
pub struct AssignmentError {
    /// The candidate name the hook was invoked for.
    pub option: String,
    #[source]
    pub source: HookError,
}

/// Failure while consuming command-line tokens.
///
/// Assignments made by earlier tokens of the same parse are not undone.
#[derive(Debug, Error)]
pub enum ParseError {
    /// No literal name or pattern matched the candidate.
    #[error("no such option: {}{}", .form.prefix(), .name)]
    NoSuchOption { name: String, form: OptionForm },

    /// A value-taking option was the last token.
    #[error("option '{option}' requires a value")]
    MissingValue { option: String },

    /// The value token could not be converted.
    #[error("invalid value for option '{option}': {source}")]
    Conversion {
        option: String,
        #[source]
        source: ConversionError,
    },

    /// A setter hook rejected the value.
    #[error(transparent)]
    Assignment(#[from] AssignmentError),
}

impl ParseError {
    /// Returns the candidate option name that caused the failure.
    pub fn option_name(&self) -> &str {
        match self {
            ParseError::NoSuchOption { name, .. } => name,
            ParseError::MissingValue { option } => option,
            ParseError::Conversion { option, .. } => option,
            ParseError::Assignment(err) => &err.option,
        }
    }
}

/// Failure loading or saving a [`ParserConfig`](crate::ParserConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
