//! Declarative schema files and the JSON record they bind to.
//!
//! A schema file lists options; each option's slot is a key of a
//! [`Record`]. Values are written through setter hooks, so the record ends
//! up holding exactly the options that appeared on the command line.
//!
//! # Example YAML
//!
//! ```yaml
//! options:
//!   - slot: verbose
//!     names: [verbose, v]
//!     opposite: true
//!   - slot: jobs
//!     kind: single
//!     type: int32
//!     short_pattern: "[0-9]"
//!   - slot: include
//!     names: [include, I]
//!     kind: multi
//!     type: path
//! ```

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use argmap_core::{Hook, HookError, HookResult, OptionSpec, ParserConfig, Registry};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Option arity as written in a schema file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclKind {
    Flag,
    Single,
    Multi,
}

/// Value type as written in a schema file. Not allowed on flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclType {
    #[default]
    Text,
    Char,
    Float32,
    Float64,
    Int16,
    Int32,
    Int64,
    Path,
}

/// One option entry of a schema file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionDecl {
    pub slot: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<String>,
    /// Defaults to `single` when `type` is given, otherwise `flag`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<DeclKind>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub value_type: Option<DeclType>,
    #[serde(default)]
    pub opposite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, rename = "default", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

/// A schema file: options in resolution order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaFile {
    #[serde(default)]
    pub options: Vec<OptionDecl>,
}

impl SchemaFile {
    /// Loads a schema file; `.json` files are read as JSON, anything else as
    /// YAML.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|err| format!("Failed to read schema '{}': {err}", path.display()))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            serde_json::from_str(&content)
                .map_err(|err| format!("Invalid schema JSON '{}': {err}", path.display()))
        } else {
            serde_yaml::from_str(&content)
                .map_err(|err| format!("Invalid schema YAML '{}': {err}", path.display()))
        }
    }

    /// Builds a registry whose slots are keys of a [`Record`].
    pub fn build_registry(&self, config: &ParserConfig) -> Result<Registry<Record>, String> {
        let specs = self
            .options
            .iter()
            .map(OptionDecl::to_spec)
            .collect::<Result<Vec<_>, _>>()?;
        Registry::with_config(specs, config).map_err(|err| err.to_string())
    }
}

impl OptionDecl {
    /// Effective arity: explicit `kind`, else `single` when a `type` is
    /// given, else `flag`.
    pub fn resolved_kind(&self) -> Result<DeclKind, String> {
        match (self.kind, self.value_type) {
            (Some(DeclKind::Flag), Some(_)) => Err(format!(
                "option '{}' is declared as a flag but has a value type",
                self.slot
            )),
            (Some(kind), _) => Ok(kind),
            (None, Some(_)) => Ok(DeclKind::Single),
            (None, None) => Ok(DeclKind::Flag),
        }
    }

    fn to_spec(&self) -> Result<OptionSpec<Record>, String> {
        let mut spec = match self.resolved_kind()? {
            DeclKind::Flag => {
                let key = self.slot.clone();
                OptionSpec::flag_hook(
                    &self.slot,
                    Hook::value(move |record: &mut Record, on: bool| {
                        record.insert(&key, on)
                    }),
                )
            }
            kind => match self.value_type.unwrap_or_default() {
                DeclType::Text => value_spec::<String>(&self.slot, kind),
                DeclType::Char => value_spec::<char>(&self.slot, kind),
                DeclType::Float32 => finite_spec::<f32>(&self.slot, kind),
                DeclType::Float64 => finite_spec::<f64>(&self.slot, kind),
                DeclType::Int16 => value_spec::<i16>(&self.slot, kind),
                DeclType::Int32 => value_spec::<i32>(&self.slot, kind),
                DeclType::Int64 => value_spec::<i64>(&self.slot, kind),
                DeclType::Path => value_spec::<PathBuf>(&self.slot, kind),
            },
        };

        if !self.names.is_empty() {
            spec = spec.names(self.names.iter().cloned());
        }
        if let Some(ref pattern) = self.pattern {
            spec = spec.pattern(pattern.as_str());
        }
        if let Some(ref pattern) = self.short_pattern {
            spec = spec.short_pattern(pattern.as_str());
        }
        if self.opposite {
            spec = spec.opposite();
        }
        if let Some(ref placeholder) = self.placeholder {
            spec = spec.placeholder(placeholder.as_str());
        }
        if let Some(ref description) = self.description {
            spec = spec.description(description.as_str());
        }
        if let Some(ref default_value) = self.default_value {
            spec = spec.default_value(default_value.as_str());
        }
        Ok(spec)
    }
}

fn value_spec<V>(slot: &str, kind: DeclKind) -> OptionSpec<Record>
where
    V: FromStr + Serialize + 'static,
    V::Err: Display,
{
    let key = slot.to_string();
    match kind {
        DeclKind::Multi => OptionSpec::multi_hook(
            slot,
            Hook::value(move |record: &mut Record, value: V| record.append(&key, value)),
        ),
        _ => OptionSpec::single_hook(
            slot,
            Hook::value(move |record: &mut Record, value: V| record.insert(&key, value)),
        ),
    }
}

/// Like [`value_spec`], rejecting `NaN` and infinities, which JSON cannot hold.
fn finite_spec<V>(slot: &str, kind: DeclKind) -> OptionSpec<Record>
where
    V: FromStr + Serialize + Into<f64> + Copy + Display + 'static,
    V::Err: Display,
{
    let key = slot.to_string();
    let checked = |value: V| -> Result<V, HookError> {
        if Into::<f64>::into(value).is_finite() {
            Ok(value)
        } else {
            Err(format!("{value} is not a finite number").into())
        }
    };
    match kind {
        DeclKind::Multi => OptionSpec::multi_hook(
            slot,
            Hook::value(move |record: &mut Record, value: V| {
                record.append(&key, checked(value)?)
            }),
        ),
        _ => OptionSpec::single_hook(
            slot,
            Hook::value(move |record: &mut Record, value: V| {
                record.insert(&key, checked(value)?)
            }),
        ),
    }
}

/// Parsed option values keyed by slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    values: Map<String, Value>,
}

impl Record {
    pub fn get(&self, slot: &str) -> Option<&Value> {
        self.values.get(slot)
    }

    pub fn into_values(self) -> Map<String, Value> {
        self.values
    }

    /// Overwrites the slot.
    fn insert<V: Serialize>(&mut self, slot: &str, value: V) -> HookResult {
        let value = to_json(value)?;
        self.values.insert(slot.to_string(), value);
        Ok(())
    }

    /// Appends to the slot's list, creating it on first use.
    fn append<V: Serialize>(&mut self, slot: &str, value: V) -> HookResult {
        let value = to_json(value)?;
        match self
            .values
            .entry(slot.to_string())
            .or_insert_with(|| Value::Array(Vec::new()))
        {
            Value::Array(items) => {
                items.push(value);
                Ok(())
            }
            other => Err(format!("slot '{slot}' already holds a non-list value: {other}").into()),
        }
    }
}

/// Serializes a value for a slot. `null` is never a parsed value, so a
/// value that serializes to it is refused instead of stored.
fn to_json<V: Serialize>(value: V) -> Result<Value, HookError> {
    match serde_json::to_value(value)? {
        Value::Null => Err("value has no JSON representation".into()),
        value => Ok(value),
    }
}
