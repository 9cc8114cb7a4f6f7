//! Usage text.
//!
//! Renders the option list for a small registry, once styled for a
//! terminal and once plain, then prints the descriptor metadata.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p argmap-demos --example usage_text
//! ```

use std::path::PathBuf;

use argmap_core::{OptionSpec, Registry, Usage};

#[derive(Debug, Default)]
struct CopyArgs {
    recursive: bool,
    level: Option<u8>,
    exclude: Option<Vec<String>>,
    output: Option<PathBuf>,
}

fn main() {
    let registry = Registry::new(vec![
        OptionSpec::flag("recursive", |a: &mut CopyArgs| &mut a.recursive)
            .names(["recursive", "r"])
            .opposite()
            .description("Descend into directories.")
            .default_value("false"),
        OptionSpec::optional("level", |a: &mut CopyArgs| &mut a.level)
            .short_pattern("[0-9]")
            .placeholder("N")
            .description("Compression level, e.g. -9 9."),
        OptionSpec::multi("exclude", |a: &mut CopyArgs| &mut a.exclude)
            .names(["exclude", "x"])
            .placeholder("GLOB")
            .description("Skip matching paths. May be repeated."),
        OptionSpec::optional("output", |a: &mut CopyArgs| &mut a.output)
            .names(["output", "o"])
            .placeholder("DIR")
            .default_value("."),
    ])
    .unwrap();

    let usage = Usage::new(&registry).header("Usage: copy [OPTIONS] SOURCE...");
    print!("{}", usage.render());

    println!("----");
    let mut stdout = std::io::stdout();
    usage.styled(false).write_to(&mut stdout).unwrap();

    println!("----");
    for info in registry.infos() {
        println!(
            "{:<10} {:?} {} names={:?} opposite={:?}",
            info.slot, info.arity, info.target, info.names, info.opposite_names
        );
    }
}
