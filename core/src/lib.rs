//! Declarative command-line option mapping.
//!
//! A [`Registry`] is built once from [`OptionSpec`]s, each binding one slot of
//! a subject type to option names, optional name patterns, and a write
//! strategy. [`Registry::parse`] then walks a token list, writes every option
//! it meets into the subject, and returns the positional tokens.
//!
//! - [`OptionSpec`]: declaration of one option: flag, single value, or
//!   multi-value, written directly or through a [`Hook`].
//! - [`Registry`]: ordered, immutable descriptors; name and pattern
//!   resolution ([`Registry::resolve`]) and parsing ([`Registry::parse`]).
//! - [`convert`]: conversion of value tokens through `FromStr`.
//! - [`Usage`]: usage text over the registry's metadata.
//! - [`ParserConfig`]: YAML-loadable settings for duplicates and usage.
//!
//! Parsing is single pass. The first error aborts it and slots written before
//! the error keep their values.
//!
//! # Example
//!
//! ```
//! use argmap_core::*;
//! use std::path::PathBuf;
//!
//! #[derive(Default)]
//! struct Args {
//!     verbose: bool,
//!     output: Option<PathBuf>,
//!     tags: Option<Vec<String>>,
//! }
//!
//! let registry = Registry::new(vec![
//!     OptionSpec::flag("verbose", |a: &mut Args| &mut a.verbose)
//!         .names(["verbose", "v"])
//!         .opposite(),
//!     OptionSpec::optional("output", |a: &mut Args| &mut a.output).names(["output", "o"]),
//!     OptionSpec::multi("tag", |a: &mut Args| &mut a.tags),
//! ])
//! .unwrap();
//!
//! let mut args = Args::default();
//! let rest = registry
//!     .parse(&mut args, ["-vo", "out.bin", "--tag", "a", "src", "--tag", "b"])
//!     .unwrap();
//!
//! assert!(args.verbose);
//! assert_eq!(args.output, Some(PathBuf::from("out.bin")));
//! assert_eq!(args.tags, Some(vec!["a".to_string(), "b".to_string()]));
//! assert_eq!(rest, vec!["src"]);
//!
//! let err = registry.parse(&mut args, ["--nope"]).unwrap_err();
//! assert!(matches!(err, ParseError::NoSuchOption { .. }));
//! ```

mod assign;
mod config;
mod convert;
mod dispatch;
mod error;
mod registry;
mod resolve;
mod types;
mod usage;

pub use assign::{Accumulate, Hook, HookResult};
pub use config::{DuplicatePolicy, ParserConfig};
pub use convert::convert;
pub use error::{AssignmentError, ConfigError, ConversionError, HookError, ParseError, SchemaError};
pub use registry::{OptionDescriptor, OptionSpec, Registry};
pub use resolve::Resolved;
pub use types::*;
pub use usage::Usage;
