//! Descriptor metadata shared by the registry, the dispatcher, and the
//! usage renderer.
//!
//! None of these types touch a subject value. They describe options, and
//! [`OptionInfo`] is a serializable snapshot of one registered descriptor.

use std::any::TypeId;
use std::fmt;

use serde::{Deserialize, Serialize};

/// How many value tokens an option consumes and how its slot is written.
///
/// # Examples
///
/// ```
/// use argmap_core::Arity;
///
/// assert!(!Arity::Flag.takes_value());
/// assert!(Arity::Single.takes_value());
/// assert!(Arity::Multi.takes_value());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arity {
    /// No value token; the slot is a truth value.
    Flag,
    /// One value token; each occurrence overwrites the slot.
    Single,
    /// One value token per occurrence; values accumulate in order.
    Multi,
}

impl Arity {
    /// Returns `true` if the option consumes the following token.
    pub fn takes_value(self) -> bool {
        !matches!(self, Arity::Flag)
    }
}

/// Which token form produced a candidate option name.
///
/// Literal names match either form. Patterns are form specific: `pattern`
/// applies to long candidates and `short_pattern` to short ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionForm {
    /// `--name`
    Long,
    /// One character out of a `-xyz` bundle.
    Short,
}

impl OptionForm {
    /// Returns the dash prefix used on the command line for this form.
    pub fn prefix(self) -> &'static str {
        match self {
            OptionForm::Long => "--",
            OptionForm::Short => "-",
        }
    }
}

impl fmt::Display for OptionForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionForm::Long => f.write_str("long"),
            OptionForm::Short => f.write_str("short"),
        }
    }
}

/// Semantic type of an option's slot.
///
/// Derived from the Rust type bound to the slot with [`TargetType::of`].
/// Types outside the recognized set are reported as [`TargetType::Other`]
/// carrying the Rust type name; they are converted through `FromStr`.
///
/// # Examples
///
/// ```
/// use argmap_core::TargetType;
/// use std::path::PathBuf;
///
/// assert_eq!(TargetType::of::<String>(), TargetType::Text);
/// assert_eq!(TargetType::of::<i64>(), TargetType::Int64);
/// assert!(matches!(TargetType::of::<PathBuf>(), TargetType::Other(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    /// `String`
    Text,
    /// `char`
    Char,
    /// `f32`
    Float32,
    /// `f64`
    Float64,
    /// `i16`
    Int16,
    /// `i32`
    Int32,
    /// `i64`
    Int64,
    /// `bool`
    Bool,
    /// Any other string-constructible type, by Rust type name.
    Other(String),
}

impl TargetType {
    /// Classifies the Rust type `V`.
    pub fn of<V: 'static>() -> Self {
        let id = TypeId::of::<V>();
        if id == TypeId::of::<String>() {
            TargetType::Text
        } else if id == TypeId::of::<char>() {
            TargetType::Char
        } else if id == TypeId::of::<f32>() {
            TargetType::Float32
        } else if id == TypeId::of::<f64>() {
            TargetType::Float64
        } else if id == TypeId::of::<i16>() {
            TargetType::Int16
        } else if id == TypeId::of::<i32>() {
            TargetType::Int32
        } else if id == TypeId::of::<i64>() {
            TargetType::Int64
        } else if id == TypeId::of::<bool>() {
            TargetType::Bool
        } else {
            TargetType::Other(std::any::type_name::<V>().to_string())
        }
    }

    /// Returns `true` for the floating point and signed integer kinds.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            TargetType::Float32
                | TargetType::Float64
                | TargetType::Int16
                | TargetType::Int32
                | TargetType::Int64
        )
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetType::Text => f.write_str("string"),
            TargetType::Char => f.write_str("char"),
            TargetType::Float32 => f.write_str("f32"),
            TargetType::Float64 => f.write_str("f64"),
            TargetType::Int16 => f.write_str("i16"),
            TargetType::Int32 => f.write_str("i32"),
            TargetType::Int64 => f.write_str("i64"),
            TargetType::Bool => f.write_str("bool"),
            TargetType::Other(name) => f.write_str(name),
        }
    }
}

/// How a descriptor writes its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetterKind {
    /// The slot is written through its accessor.
    Direct,
    /// A hook receiving `(name, value)`.
    NamedHook,
    /// A hook receiving `(value)`.
    ValueHook,
}

/// Presentation metadata. Only the usage renderer reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionHelp {
    /// Placeholder shown after value-taking names (renderer default `VALUE`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Documented default value. Never applied to the slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

/// Serializable snapshot of one registered descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionInfo {
    /// Identifier of the bound slot.
    pub slot: String,
    /// Literal names, in resolution order.
    pub names: Vec<String>,
    /// Generated `no-` aliases (flags with `opposite` only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub opposite_names: Vec<String>,
    /// Long-form pattern, as written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Short-form pattern, as written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_pattern: Option<String>,
    pub arity: Arity,
    pub target: TargetType,
    pub setter: SetterKind,
    #[serde(flatten)]
    pub help: OptionHelp,
}
