//! Option specs and the immutable descriptor registry built from them.
//!
//! An [`OptionSpec`] binds one slot of a subject type `T` to its names,
//! patterns, arity, and write strategy. [`Registry::new`] turns the specs
//! into descriptors once: names are defaulted, `no-` aliases are expanded,
//! patterns are compiled, and duplicate names are checked.

use std::collections::{HashMap, HashSet};
use std::fmt::{self, Display};
use std::str::FromStr;

use regex::Regex;
use tracing::{debug, warn};

use crate::assign::{self, Accumulate, Binding, Hook, Setter};
use crate::{
    Arity, DuplicatePolicy, OptionHelp, OptionInfo, ParserConfig, SchemaError, SetterKind,
    TargetType,
};

const OPPOSITE_PREFIX: &str = "no-";

/// Declaration of one option bound to a slot of `T`.
///
/// Constructors choose the arity and the write strategy; builder methods add
/// names, patterns, and presentation metadata.
///
/// # Examples
///
/// ```
/// use argmap_core::OptionSpec;
///
/// #[derive(Default)]
/// struct Args {
///     verbose: bool,
///     count: i32,
///     tags: Option<Vec<String>>,
/// }
///
/// let specs = vec![
///     OptionSpec::flag("verbose", |a: &mut Args| &mut a.verbose)
///         .names(["verbose", "v"])
///         .opposite(),
///     OptionSpec::single("count", |a: &mut Args| &mut a.count)
///         .placeholder("N")
///         .description("How many times."),
///     OptionSpec::multi("tag", |a: &mut Args| &mut a.tags),
/// ];
/// assert_eq!(specs.len(), 3);
/// ```
pub struct OptionSpec<T> {
    slot: String,
    names: Vec<String>,
    pattern: Option<String>,
    short_pattern: Option<String>,
    opposite: bool,
    arity: Arity,
    help: OptionHelp,
    binding: Binding<T>,
}

impl<T: 'static> OptionSpec<T> {
    fn with_binding(slot: &str, arity: Arity, binding: Binding<T>) -> Self {
        Self {
            slot: slot.to_string(),
            names: Vec::new(),
            pattern: None,
            short_pattern: None,
            opposite: false,
            arity,
            help: OptionHelp::default(),
            binding,
        }
    }

    /// A flag written directly to a `bool` slot.
    pub fn flag<F>(slot: &str, access: F) -> Self
    where
        F: Fn(&mut T) -> &mut bool + 'static,
    {
        let setter = Setter::Direct(assign::overwrite(access));
        Self::with_binding(slot, Arity::Flag, Binding::Flag(setter))
    }

    /// A flag whose truth value is handed to `hook`.
    pub fn flag_hook(slot: &str, hook: Hook<T, bool>) -> Self {
        Self::with_binding(slot, Arity::Flag, Binding::Flag(Setter::Hook(hook)))
    }

    /// A single value overwriting a `V` slot.
    pub fn single<V, F>(slot: &str, access: F) -> Self
    where
        V: FromStr + 'static,
        V::Err: Display,
        F: Fn(&mut T) -> &mut V + 'static,
    {
        let setter = Setter::Direct(assign::overwrite(access));
        Self::with_binding(slot, Arity::Single, Binding::value(setter))
    }

    /// A single value stored as `Some(value)` in an `Option<V>` slot.
    pub fn optional<V, F>(slot: &str, access: F) -> Self
    where
        V: FromStr + 'static,
        V::Err: Display,
        F: Fn(&mut T) -> &mut Option<V> + 'static,
    {
        let setter = Setter::Direct(assign::overwrite_optional(access));
        Self::with_binding(slot, Arity::Single, Binding::value(setter))
    }

    /// A single value handed to `hook`.
    pub fn single_hook<V>(slot: &str, hook: Hook<T, V>) -> Self
    where
        V: FromStr + 'static,
        V::Err: Display,
    {
        Self::with_binding(slot, Arity::Single, Binding::value(Setter::Hook(hook)))
    }

    /// Repeated values appended to an `Option<C>` slot, creating the
    /// container with `C::default()` on first use.
    pub fn multi<C, F>(slot: &str, access: F) -> Self
    where
        C: Accumulate + Default + 'static,
        C::Item: FromStr + 'static,
        <C::Item as FromStr>::Err: Display,
        F: Fn(&mut T) -> &mut Option<C> + 'static,
    {
        Self::multi_with(slot, access, C::default)
    }

    /// Like [`multi`](Self::multi), with an explicit container factory.
    pub fn multi_with<C, F, K>(slot: &str, access: F, factory: K) -> Self
    where
        C: Accumulate + 'static,
        C::Item: FromStr + 'static,
        <C::Item as FromStr>::Err: Display,
        F: Fn(&mut T) -> &mut Option<C> + 'static,
        K: Fn() -> C + 'static,
    {
        let setter = Setter::Direct(assign::accumulate(access, factory));
        Self::with_binding(slot, Arity::Multi, Binding::value(setter))
    }

    /// Repeated values, each handed to `hook`.
    pub fn multi_hook<V>(slot: &str, hook: Hook<T, V>) -> Self
    where
        V: FromStr + 'static,
        V::Err: Display,
    {
        Self::with_binding(slot, Arity::Multi, Binding::value(Setter::Hook(hook)))
    }
}

impl<T> OptionSpec<T> {
    /// Replaces the literal names. Without names, the slot identifier is used.
    pub fn names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Appends one literal name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.names.push(name.into());
        self
    }

    /// Regex matched in full against long candidates after literal names fail.
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Regex matched in full against short candidates after literal names fail.
    pub fn short_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.short_pattern = Some(pattern.into());
        self
    }

    /// Adds a `no-<name>` alias per name that sets the flag to `false`.
    /// Has no effect on value options.
    pub fn opposite(mut self) -> Self {
        self.opposite = true;
        self
    }

    /// Placeholder for the usage text.
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.help.placeholder = Some(placeholder.into());
        self
    }

    /// Description for the usage text.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.help.description = Some(description.into());
        self
    }

    /// Documented default for the usage text. The slot is never written with it.
    pub fn default_value(mut self, default_value: impl Into<String>) -> Self {
        self.help.default_value = Some(default_value.into());
        self
    }
}

/// A compiled regex that remembers how it was written.
struct NamePattern {
    source: String,
    regex: Regex,
}

impl NamePattern {
    fn compile(slot: &str, source: String) -> Result<Self, SchemaError> {
        let regex = Regex::new(&format!("^(?:{source})$")).map_err(|err| {
            SchemaError::InvalidPattern {
                slot: slot.to_string(),
                pattern: source.clone(),
                source: err,
            }
        })?;
        Ok(Self { source, regex })
    }

    fn is_full_match(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }
}

/// A registered option: names, patterns, arity, and its write path.
pub struct OptionDescriptor<T> {
    slot: String,
    names: Vec<String>,
    opposite_names: Vec<String>,
    pattern: Option<NamePattern>,
    short_pattern: Option<NamePattern>,
    arity: Arity,
    help: OptionHelp,
    pub(crate) binding: Binding<T>,
}

impl<T> OptionDescriptor<T> {
    fn build(spec: OptionSpec<T>) -> Result<Self, SchemaError> {
        let OptionSpec {
            slot,
            mut names,
            pattern,
            short_pattern,
            opposite,
            arity,
            help,
            binding,
        } = spec;

        if names.is_empty() {
            names.push(slot.clone());
        }
        if names.iter().any(String::is_empty) {
            return Err(SchemaError::EmptyName { slot });
        }

        let opposite_names = match (opposite, arity) {
            (true, Arity::Flag) => names
                .iter()
                .map(|name| format!("{OPPOSITE_PREFIX}{name}"))
                .collect(),
            (true, _) => {
                debug!(slot = %slot, "Ignoring opposite alias on a value option");
                Vec::new()
            }
            (false, _) => Vec::new(),
        };

        let repeated = {
            let mut seen = HashSet::new();
            names
                .iter()
                .chain(&opposite_names)
                .find(|name| !seen.insert(name.as_str()))
                .cloned()
        };
        if let Some(name) = repeated {
            return Err(SchemaError::RepeatedName { slot, name });
        }

        let pattern = pattern
            .map(|source| NamePattern::compile(&slot, source))
            .transpose()?;
        let short_pattern = short_pattern
            .map(|source| NamePattern::compile(&slot, source))
            .transpose()?;

        Ok(Self {
            slot,
            names,
            opposite_names,
            pattern,
            short_pattern,
            arity,
            help,
            binding,
        })
    }

    /// Identifier of the bound slot.
    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Literal names, explicit or defaulted from the slot.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Generated `no-` aliases.
    pub fn opposite_names(&self) -> &[String] {
        &self.opposite_names
    }

    /// Every computed literal name: names first, then `no-` aliases.
    pub fn all_names(&self) -> impl Iterator<Item = &str> {
        self.names
            .iter()
            .chain(self.opposite_names.iter())
            .map(String::as_str)
    }

    /// Source of the long-form pattern, as written.
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_ref().map(|p| p.source.as_str())
    }

    /// Source of the short-form pattern, as written.
    pub fn short_pattern(&self) -> Option<&str> {
        self.short_pattern.as_ref().map(|p| p.source.as_str())
    }

    /// Flag, single value, or multi-value.
    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Whether the option consumes the following token.
    pub fn takes_value(&self) -> bool {
        self.arity.takes_value()
    }

    /// Semantic type of the slot.
    pub fn target(&self) -> TargetType {
        self.binding.target()
    }

    /// How values reach the slot.
    pub fn setter_kind(&self) -> SetterKind {
        self.binding.setter_kind()
    }

    /// Placeholder, description, and documented default.
    pub fn help(&self) -> &OptionHelp {
        &self.help
    }

    /// Serializable snapshot of this descriptor.
    pub fn info(&self) -> OptionInfo {
        OptionInfo {
            slot: self.slot.clone(),
            names: self.names.clone(),
            opposite_names: self.opposite_names.clone(),
            pattern: self.pattern().map(String::from),
            short_pattern: self.short_pattern().map(String::from),
            arity: self.arity,
            target: self.target(),
            setter: self.setter_kind(),
            help: self.help.clone(),
        }
    }

    pub(crate) fn has_name(&self, candidate: &str) -> bool {
        self.names.iter().any(|name| name == candidate)
    }

    pub(crate) fn has_opposite_name(&self, candidate: &str) -> bool {
        self.opposite_names.iter().any(|name| name == candidate)
    }

    pub(crate) fn matches_pattern(&self, candidate: &str) -> bool {
        self.pattern
            .as_ref()
            .is_some_and(|p| p.is_full_match(candidate))
    }

    pub(crate) fn matches_short_pattern(&self, candidate: &str) -> bool {
        self.short_pattern
            .as_ref()
            .is_some_and(|p| p.is_full_match(candidate))
    }
}

impl<T> fmt::Debug for OptionDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionDescriptor")
            .field("slot", &self.slot)
            .field("names", &self.names)
            .field("opposite_names", &self.opposite_names)
            .field("pattern", &self.pattern())
            .field("short_pattern", &self.short_pattern())
            .field("arity", &self.arity)
            .field("target", &self.target())
            .field("setter", &self.setter_kind())
            .finish()
    }
}

/// Ordered, immutable list of option descriptors for subject type `T`.
///
/// Built once, then used for any number of [`parse`](Registry::parse) calls.
///
/// # Examples
///
/// ```
/// use argmap_core::{OptionSpec, Registry, SchemaError};
///
/// #[derive(Default)]
/// struct Args {
///     quiet: bool,
///     silent: bool,
/// }
///
/// let registry = Registry::new(vec![
///     OptionSpec::flag("quiet", |a: &mut Args| &mut a.quiet).names(["quiet", "q"]),
/// ])
/// .unwrap();
/// assert_eq!(registry.len(), 1);
///
/// let err = Registry::new(vec![
///     OptionSpec::flag("quiet", |a: &mut Args| &mut a.quiet).name("q"),
///     OptionSpec::flag("silent", |a: &mut Args| &mut a.silent).name("q"),
/// ])
/// .err()
/// .unwrap();
/// assert!(matches!(err, SchemaError::DuplicateName { .. }));
/// ```
pub struct Registry<T> {
    descriptors: Vec<OptionDescriptor<T>>,
}

impl<T> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.descriptors).finish()
    }
}

impl<T> Registry<T> {
    /// Builds a registry with the default [`ParserConfig`].
    ///
    /// # Errors
    ///
    /// See [`with_config`](Self::with_config).
    pub fn new(specs: Vec<OptionSpec<T>>) -> Result<Self, SchemaError> {
        Self::with_config(specs, &ParserConfig::default())
    }

    /// Builds a registry, keeping the specs' order.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::EmptyName`] for an empty literal name.
    /// - [`SchemaError::InvalidPattern`] for a pattern that does not compile.
    /// - [`SchemaError::DuplicateName`] for identical computed names, unless
    ///   `config.duplicate_names` is [`DuplicatePolicy::FirstWins`].
    pub fn with_config(
        specs: Vec<OptionSpec<T>>,
        config: &ParserConfig,
    ) -> Result<Self, SchemaError> {
        let mut descriptors: Vec<OptionDescriptor<T>> = Vec::with_capacity(specs.len());
        let mut owners: HashMap<String, String> = HashMap::new();

        for spec in specs {
            let descriptor = OptionDescriptor::build(spec)?;
            for name in descriptor.all_names() {
                match owners.get(name) {
                    None => {
                        owners.insert(name.to_string(), descriptor.slot.clone());
                    }
                    Some(first) => match config.duplicate_names {
                        DuplicatePolicy::Reject => {
                            return Err(SchemaError::DuplicateName {
                                name: name.to_string(),
                                first: first.clone(),
                                second: descriptor.slot.clone(),
                            });
                        }
                        DuplicatePolicy::FirstWins => {
                            warn!(
                                option = name,
                                first = %first,
                                shadowed = %descriptor.slot,
                                "Duplicate option name, earliest registration wins"
                            );
                        }
                    },
                }
            }
            descriptors.push(descriptor);
        }

        debug!(
            options = descriptors.len(),
            names = owners.len(),
            "Built option registry"
        );
        Ok(Self { descriptors })
    }

    /// Descriptors in registration order.
    pub fn descriptors(&self) -> &[OptionDescriptor<T>] {
        &self.descriptors
    }

    /// Finds a descriptor by slot identifier.
    pub fn descriptor(&self, slot: &str) -> Option<&OptionDescriptor<T>> {
        self.descriptors.iter().find(|d| d.slot == slot)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Serializable snapshots of every descriptor, in registration order.
    pub fn infos(&self) -> Vec<OptionInfo> {
        self.descriptors.iter().map(OptionDescriptor::info).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[derive(Default)]
    struct Args {
        verbose: bool,
        quiet: bool,
        file: Option<String>,
        set: Option<BTreeSet<String>>,
    }

    #[test]
    fn test_names_default_to_slot() {
        let registry =
            Registry::new(vec![OptionSpec::flag("verbose", |a: &mut Args| &mut a.verbose)])
                .unwrap();

        assert_eq!(registry.descriptors()[0].names(), ["verbose"]);
    }

    #[test]
    fn test_explicit_names_replace_slot_name() {
        let registry = Registry::new(vec![
            OptionSpec::optional("file", |a: &mut Args| &mut a.file).names(["input", "i"]),
        ])
        .unwrap();

        let descriptor = registry.descriptor("file").unwrap();
        assert_eq!(descriptor.names(), ["input", "i"]);
        assert!(!descriptor.has_name("file"));
    }

    #[test]
    fn test_opposite_expands_every_flag_name() {
        let registry = Registry::new(vec![
            OptionSpec::flag("verbose", |a: &mut Args| &mut a.verbose)
                .names(["verbose", "v"])
                .opposite(),
        ])
        .unwrap();

        let descriptor = &registry.descriptors()[0];
        assert_eq!(descriptor.opposite_names(), ["no-verbose", "no-v"]);
        assert_eq!(
            descriptor.all_names().collect::<Vec<_>>(),
            vec!["verbose", "v", "no-verbose", "no-v"]
        );
    }

    #[test]
    fn test_opposite_ignored_for_value_options() {
        let registry = Registry::new(vec![
            OptionSpec::optional("file", |a: &mut Args| &mut a.file).opposite(),
            OptionSpec::multi("set", |a: &mut Args| &mut a.set).opposite(),
        ])
        .unwrap();

        assert!(
            registry
                .descriptors()
                .iter()
                .all(|d| d.opposite_names().is_empty())
        );
    }

    #[test]
    fn test_rejects_duplicate_names_by_default() {
        let result = Registry::new(vec![
            OptionSpec::flag("verbose", |a: &mut Args| &mut a.verbose).name("v"),
            OptionSpec::flag("quiet", |a: &mut Args| &mut a.quiet).names(["quiet", "v"]),
        ]);

        match result {
            Err(SchemaError::DuplicateName {
                name,
                first,
                second,
            }) => {
                assert_eq!(name, "v");
                assert_eq!(first, "verbose");
                assert_eq!(second, "quiet");
            }
            _ => panic!("expected a duplicate name error"),
        }
    }

    #[test]
    fn test_name_repeated_within_one_option() {
        let result = Registry::new(vec![
            OptionSpec::flag("verbose", |a: &mut Args| &mut a.verbose).names(["v", "v"]),
        ]);

        match result {
            Err(err @ SchemaError::RepeatedName { .. }) => {
                assert_eq!(
                    err.to_string(),
                    "option name 'v' appears more than once in slot 'verbose'"
                );
            }
            _ => panic!("expected a repeated name error"),
        }
    }

    #[test]
    fn test_own_opposite_alias_is_a_repeat() {
        let result = Registry::new(vec![
            OptionSpec::flag("verbose", |a: &mut Args| &mut a.verbose)
                .names(["v", "no-v"])
                .opposite(),
        ]);

        assert!(matches!(
            result,
            Err(SchemaError::RepeatedName { name, slot }) if name == "no-v" && slot == "verbose"
        ));
    }

    #[test]
    fn test_repeat_rejected_under_first_wins() {
        let config = ParserConfig {
            duplicate_names: DuplicatePolicy::FirstWins,
            ..Default::default()
        };
        let result = Registry::with_config(
            vec![OptionSpec::flag("quiet", |a: &mut Args| &mut a.quiet).names(["q", "q"])],
            &config,
        );

        assert!(matches!(result, Err(SchemaError::RepeatedName { .. })));
    }

    #[test]
    fn test_generated_alias_collision_is_a_duplicate() {
        let result = Registry::new(vec![
            OptionSpec::flag("verbose", |a: &mut Args| &mut a.verbose).opposite(),
            OptionSpec::flag("quiet", |a: &mut Args| &mut a.quiet).name("no-verbose"),
        ]);

        assert!(matches!(
            result,
            Err(SchemaError::DuplicateName { name, .. }) if name == "no-verbose"
        ));
    }

    #[test]
    fn test_first_wins_keeps_all_descriptors() {
        let config = ParserConfig {
            duplicate_names: DuplicatePolicy::FirstWins,
            ..Default::default()
        };
        let registry = Registry::with_config(
            vec![
                OptionSpec::flag("verbose", |a: &mut Args| &mut a.verbose).name("v"),
                OptionSpec::flag("quiet", |a: &mut Args| &mut a.quiet).name("v"),
            ],
            &config,
        )
        .unwrap();

        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_invalid_pattern() {
        let result = Registry::new(vec![
            OptionSpec::flag("verbose", |a: &mut Args| &mut a.verbose).pattern("[0-9"),
        ]);

        assert!(matches!(
            result,
            Err(SchemaError::InvalidPattern { slot, pattern, .. })
                if slot == "verbose" && pattern == "[0-9"
        ));
    }

    #[test]
    fn test_empty_name_rejected() {
        let result = Registry::new(vec![
            OptionSpec::flag("verbose", |a: &mut Args| &mut a.verbose).name(""),
        ]);

        assert!(matches!(result, Err(SchemaError::EmptyName { slot }) if slot == "verbose"));
    }

    #[test]
    fn test_patterns_match_in_full() {
        let registry = Registry::new(vec![
            OptionSpec::flag("verbose", |a: &mut Args| &mut a.verbose)
                .pattern("v+")
                .short_pattern("[0-9]"),
        ])
        .unwrap();

        let descriptor = &registry.descriptors()[0];
        assert!(descriptor.matches_pattern("vvv"));
        assert!(!descriptor.matches_pattern("vvvx"));
        assert!(descriptor.matches_short_pattern("7"));
        assert!(!descriptor.matches_short_pattern("77"));
        assert_eq!(descriptor.pattern(), Some("v+"));
    }

    #[test]
    fn test_info_snapshot() {
        let registry = Registry::new(vec![
            OptionSpec::multi("set", |a: &mut Args| &mut a.set)
                .placeholder("STRING")
                .description("A multiple string value."),
        ])
        .unwrap();

        let infos = registry.infos();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].arity, Arity::Multi);
        assert_eq!(infos[0].target, TargetType::Text);
        assert_eq!(infos[0].setter, SetterKind::Direct);
        assert_eq!(infos[0].help.placeholder.as_deref(), Some("STRING"));
    }
}
