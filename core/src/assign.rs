//! Slot assignment strategies.
//!
//! A descriptor writes its slot in one of three ways: overwrite, accumulate
//! into a container created on first use, or hand the value to a setter
//! [`Hook`]. The strategy is fixed when the [`OptionSpec`](crate::OptionSpec)
//! is built, so nothing is looked up by type while tokens are consumed.

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::fmt::Display;
use std::hash::Hash;
use std::str::FromStr;

use crate::{AssignmentError, HookError, ParseError, SetterKind, TargetType, convert};

/// Result returned by setter hooks.
pub type HookResult = Result<(), HookError>;

type Store<T, V> = Box<dyn Fn(&mut T, V)>;
type ValueAssign<T> = Box<dyn Fn(&mut T, &str, &str) -> Result<(), ParseError>>;

/// A caller-supplied setter that replaces direct slot writes.
///
/// Hooks may validate and reject values; an `Err` aborts the parse with
/// [`ParseError::Assignment`]. For multi-value options the hook is called
/// once per value.
///
/// # Examples
///
/// ```
/// use argmap_core::{Hook, OptionSpec, Registry};
///
/// #[derive(Default)]
/// struct Args {
///     level: u8,
/// }
///
/// let registry = Registry::new(vec![OptionSpec::single_hook(
///     "level",
///     Hook::value(|args: &mut Args, level: u8| {
///         if level > 3 {
///             return Err(format!("level {level} is above 3").into());
///         }
///         args.level = level;
///         Ok(())
///     }),
/// )])
/// .unwrap();
///
/// let mut args = Args::default();
/// registry.parse(&mut args, ["--level", "2"]).unwrap();
/// assert_eq!(args.level, 2);
/// assert!(registry.parse(&mut args, ["--level", "9"]).is_err());
/// ```
pub enum Hook<T, V> {
    /// Receives the matched option name and the value.
    Named(Box<dyn Fn(&mut T, &str, V) -> HookResult>),
    /// Receives only the value.
    Value(Box<dyn Fn(&mut T, V) -> HookResult>),
}

impl<T, V> Hook<T, V> {
    /// Creates a hook taking `(subject, name, value)`.
    pub fn named<F>(f: F) -> Self
    where
        F: Fn(&mut T, &str, V) -> HookResult + 'static,
    {
        Hook::Named(Box::new(f))
    }

    /// Creates a hook taking `(subject, value)`.
    pub fn value<F>(f: F) -> Self
    where
        F: Fn(&mut T, V) -> HookResult + 'static,
    {
        Hook::Value(Box::new(f))
    }

    fn call(&self, subject: &mut T, name: &str, value: V) -> Result<(), ParseError> {
        let outcome = match self {
            Hook::Named(f) => f(subject, name, value),
            Hook::Value(f) => f(subject, value),
        };
        outcome.map_err(|source| {
            ParseError::from(AssignmentError {
                option: name.to_string(),
                source,
            })
        })
    }

    fn kind(&self) -> SetterKind {
        match self {
            Hook::Named(_) => SetterKind::NamedHook,
            Hook::Value(_) => SetterKind::ValueHook,
        }
    }
}

/// Where a converted value goes.
pub(crate) enum Setter<T, V> {
    Direct(Store<T, V>),
    Hook(Hook<T, V>),
}

impl<T, V> Setter<T, V> {
    pub(crate) fn assign(&self, subject: &mut T, name: &str, value: V) -> Result<(), ParseError> {
        match self {
            Setter::Direct(store) => {
                store(subject, value);
                Ok(())
            }
            Setter::Hook(hook) => hook.call(subject, name, value),
        }
    }

    pub(crate) fn kind(&self) -> SetterKind {
        match self {
            Setter::Direct(_) => SetterKind::Direct,
            Setter::Hook(hook) => hook.kind(),
        }
    }
}

/// Ordered or set-like container a multi-value slot appends to.
///
/// Implemented for the standard sequence and set types. `Vec` and
/// `VecDeque` keep every value in encounter order.
pub trait Accumulate {
    /// Element type each value token converts into.
    type Item;

    /// Appends one value.
    fn accumulate(&mut self, item: Self::Item);
}

impl<V> Accumulate for Vec<V> {
    type Item = V;

    fn accumulate(&mut self, item: V) {
        self.push(item);
    }
}

impl<V> Accumulate for VecDeque<V> {
    type Item = V;

    fn accumulate(&mut self, item: V) {
        self.push_back(item);
    }
}

impl<V: Ord> Accumulate for BTreeSet<V> {
    type Item = V;

    fn accumulate(&mut self, item: V) {
        self.insert(item);
    }
}

impl<V: Eq + Hash> Accumulate for HashSet<V> {
    type Item = V;

    fn accumulate(&mut self, item: V) {
        self.insert(item);
    }
}

/// Overwrites the slot with each value.
pub(crate) fn overwrite<T, V, F>(access: F) -> Store<T, V>
where
    T: 'static,
    V: 'static,
    F: Fn(&mut T) -> &mut V + 'static,
{
    Box::new(move |subject: &mut T, value: V| *access(subject) = value)
}

/// Overwrites an optional slot with `Some(value)`.
pub(crate) fn overwrite_optional<T, V, F>(access: F) -> Store<T, V>
where
    T: 'static,
    V: 'static,
    F: Fn(&mut T) -> &mut Option<V> + 'static,
{
    Box::new(move |subject: &mut T, value: V| *access(subject) = Some(value))
}

/// Appends to the container in the slot, creating it with `factory` when the
/// slot is unset. An existing container is reused as is.
pub(crate) fn accumulate<T, C, F, K>(access: F, factory: K) -> Store<T, C::Item>
where
    T: 'static,
    C: Accumulate + 'static,
    F: Fn(&mut T) -> &mut Option<C> + 'static,
    K: Fn() -> C + 'static,
{
    Box::new(move |subject: &mut T, value: C::Item| {
        access(subject)
            .get_or_insert_with(&factory)
            .accumulate(value)
    })
}

/// Type-erased write path of one descriptor.
pub(crate) enum Binding<T> {
    /// Truth-value slot; receives `true`, or `false` through an opposite alias.
    Flag(Setter<T, bool>),
    /// Value slot; converts the raw token then assigns it.
    Value {
        target: TargetType,
        setter: SetterKind,
        assign: ValueAssign<T>,
    },
}

impl<T: 'static> Binding<T> {
    /// Wraps a typed setter so it can sit next to bindings of other types.
    pub(crate) fn value<V>(setter: Setter<T, V>) -> Self
    where
        V: FromStr + 'static,
        V::Err: Display,
    {
        let kind = setter.kind();
        Binding::Value {
            target: TargetType::of::<V>(),
            setter: kind,
            assign: Box::new(move |subject: &mut T, name: &str, raw: &str| {
                let value = convert::<V>(raw).map_err(|source| ParseError::Conversion {
                    option: name.to_string(),
                    source,
                })?;
                setter.assign(subject, name, value)
            }),
        }
    }
}

impl<T> Binding<T> {
    pub(crate) fn target(&self) -> TargetType {
        match self {
            Binding::Flag(_) => TargetType::Bool,
            Binding::Value { target, .. } => target.clone(),
        }
    }

    pub(crate) fn setter_kind(&self) -> SetterKind {
        match self {
            Binding::Flag(setter) => setter.kind(),
            Binding::Value { setter, .. } => *setter,
        }
    }
}
