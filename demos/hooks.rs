//! Setter hooks.
//!
//! Shows both hook shapes: a value hook that validates before storing, and
//! a named hook that learns which alias was typed.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p argmap-demos --example hooks
//! ```

use argmap_core::{Hook, OptionSpec, ParseError, Registry};

#[derive(Debug, Default)]
struct ServerArgs {
    port: u16,
    log_level: Option<String>,
    peers: Vec<String>,
}

fn registry() -> Registry<ServerArgs> {
    Registry::new(vec![
        OptionSpec::single_hook(
            "port",
            Hook::value(|args: &mut ServerArgs, port: u16| {
                if port < 1024 {
                    return Err(format!("port {port} is privileged").into());
                }
                args.port = port;
                Ok(())
            }),
        )
        .names(["port", "p"]),
        // `--quiet` and `--debug` share one slot; the hook maps the alias
        // to a level.
        OptionSpec::flag_hook(
            "log_level",
            Hook::named(|args: &mut ServerArgs, name: &str, on: bool| {
                args.log_level = on.then(|| name.to_string());
                Ok(())
            }),
        )
        .names(["quiet", "debug"]),
        OptionSpec::multi_hook(
            "peers",
            Hook::value(|args: &mut ServerArgs, peer: String| {
                if !args.peers.contains(&peer) {
                    args.peers.push(peer);
                }
                Ok(())
            }),
        )
        .name("peer"),
    ])
    .unwrap()
}

fn main() {
    let registry = registry();

    let mut args = ServerArgs::default();
    let positional = registry
        .parse(
            &mut args,
            ["--port", "8080", "--debug", "--peer", "a:1", "--peer", "b:2", "--peer", "a:1"],
        )
        .unwrap();
    println!("Accepted: {args:?}");
    println!("Positional: {positional:?}");
    println!();

    let mut args = ServerArgs::default();
    match registry.parse(&mut args, ["-p", "80"]) {
        Err(ParseError::Assignment(err)) => println!("Rejected {}: {}", err.option, err.source),
        other => println!("Unexpected result: {other:?}"),
    }
}
