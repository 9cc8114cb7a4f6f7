//! Binding a typed struct.
//!
//! Declares a registry over a plain `struct`, parses either the process
//! arguments or a built-in sample command line, and prints what landed in
//! each field.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p argmap-demos --example bind_struct
//! cargo run -p argmap-demos --example bind_struct -- -vj 4 --include a --include b src
//! RUST_LOG=argmap_core=trace cargo run -p argmap-demos --example bind_struct
//! ```

use std::collections::BTreeSet;
use std::path::PathBuf;

use argmap_core::{OptionSpec, Registry};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct BuildArgs {
    verbose: bool,
    release: bool,
    jobs: u16,
    target_dir: Option<PathBuf>,
    includes: Option<Vec<PathBuf>>,
    features: Option<BTreeSet<String>>,
    separator: Option<char>,
}

fn registry() -> Registry<BuildArgs> {
    Registry::new(vec![
        OptionSpec::flag("verbose", |a: &mut BuildArgs| &mut a.verbose)
            .names(["verbose", "v"])
            .opposite(),
        OptionSpec::flag("release", |a: &mut BuildArgs| &mut a.release).opposite(),
        OptionSpec::single("jobs", |a: &mut BuildArgs| &mut a.jobs).names(["jobs", "j"]),
        OptionSpec::optional("target_dir", |a: &mut BuildArgs| &mut a.target_dir)
            .name("target-dir"),
        OptionSpec::multi("includes", |a: &mut BuildArgs| &mut a.includes)
            .names(["include", "I"]),
        OptionSpec::multi("features", |a: &mut BuildArgs| &mut a.features)
            .names(["feature", "F"]),
        OptionSpec::optional("separator", |a: &mut BuildArgs| &mut a.separator).name("sep"),
    ])
    .unwrap()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut tokens: Vec<String> = std::env::args().skip(1).collect();
    if tokens.is_empty() {
        tokens = [
            "-vj", "4", "--target-dir", "build", "-I", "include", "--include", "vendor/include",
            "-F", "simd", "-F", "serde", "-F", "simd", "--sep", ":", "main.c", "--",
            "-not-an-option",
        ]
        .map(String::from)
        .to_vec();
    }

    println!("Tokens: {tokens:?}");
    println!();

    let registry = registry();
    let mut args = BuildArgs::default();
    match registry.parse(&mut args, tokens) {
        Ok(positional) => {
            println!("Parsed:");
            println!("  verbose:    {}", args.verbose);
            println!("  release:    {}", args.release);
            println!("  jobs:       {}", args.jobs);
            println!("  target_dir: {:?}", args.target_dir);
            println!("  includes:   {:?}", args.includes);
            println!("  features:   {:?}", args.features);
            println!("  separator:  {:?}", args.separator);
            println!("Positional: {positional:?}");
        }
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
