mod schema;

use std::io::Write;
use std::path::{Path, PathBuf};

use argmap_core::{OptionInfo, ParserConfig, Usage};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::schema::{Record, SchemaFile};

/// Output format for parse results and schema descriptions.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "argmap")]
#[command(about = "Map command-line tokens onto a declared option schema")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse tokens given after `--` against a schema file.
    Parse(ParseArgs),
    /// Print usage text for a schema file.
    Usage(UsageArgs),
    /// Print the registered option descriptors of a schema file.
    Describe(DescribeArgs),
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Schema file (YAML, or JSON with a .json extension).
    #[arg(long)]
    schema: PathBuf,
    /// Parser configuration YAML.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Tokens to parse.
    #[arg(last = true)]
    tokens: Vec<String>,
}

#[derive(Debug, Args)]
struct UsageArgs {
    /// Schema file (YAML, or JSON with a .json extension).
    #[arg(long)]
    schema: PathBuf,
    /// Parser configuration YAML.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Header text; overrides `usage_header` from the config.
    #[arg(long)]
    header: Option<String>,
    /// Disable ANSI styling.
    #[arg(long)]
    plain: bool,
}

#[derive(Debug, Args)]
struct DescribeArgs {
    /// Schema file (YAML, or JSON with a .json extension).
    #[arg(long)]
    schema: PathBuf,
    /// Parser configuration YAML.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

#[derive(Debug, Serialize)]
struct ParseOutput {
    values: Map<String, Value>,
    positional: Vec<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Usage(args) => run_usage(args),
        Command::Describe(args) => run_describe(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_parse(args: ParseArgs) -> Result<(), String> {
    let config = load_config(args.config.as_deref())?;
    let schema = SchemaFile::load(&args.schema)?;
    let registry = schema
        .build_registry(&config)
        .map_err(|err| format!("Invalid schema '{}': {err}", args.schema.display()))?;

    debug!(tokens = args.tokens.len(), "Parsing tokens");
    let mut record = Record::default();
    let positional = registry
        .parse(&mut record, args.tokens)
        .map_err(|err| err.to_string())?;

    let output = ParseOutput {
        values: record.into_values(),
        positional,
    };
    println!("{}", format_output(&output, args.format)?);
    Ok(())
}

fn run_usage(args: UsageArgs) -> Result<(), String> {
    let config = load_config(args.config.as_deref())?;
    let schema = SchemaFile::load(&args.schema)?;
    let registry = schema
        .build_registry(&config)
        .map_err(|err| format!("Invalid schema '{}': {err}", args.schema.display()))?;

    let mut usage = Usage::from_config(&registry, &config);
    if let Some(header) = args.header {
        usage = usage.header(header);
    }
    if args.plain {
        usage = usage.styled(false);
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    usage
        .write_to(&mut out)
        .and_then(|()| out.flush())
        .map_err(|err| format!("Failed to write usage: {err}"))
}

fn run_describe(args: DescribeArgs) -> Result<(), String> {
    let config = load_config(args.config.as_deref())?;
    let schema = SchemaFile::load(&args.schema)?;
    let registry = schema
        .build_registry(&config)
        .map_err(|err| format!("Invalid schema '{}': {err}", args.schema.display()))?;

    let infos: Vec<OptionInfo> = registry.infos();
    println!("{}", format_output(&infos, args.format)?);
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ParserConfig, String> {
    match path {
        Some(path) => ParserConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display())),
        None => Ok(ParserConfig::default()),
    }
}

fn format_output<T: Serialize>(value: &T, format: CliOutputFormat) -> Result<String, String> {
    match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        CliOutputFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|e| format!("YAML serialization failed: {e}"))
        }
    }
}
