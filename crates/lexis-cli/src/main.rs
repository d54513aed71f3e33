//! `lexis` command-line tool
//!
//! Subcommands: `deconstruct`, `validate`, `graph`, `schema`, `models`.
//! Logging goes to stderr and is filtered by `RUST_LOG` (default `info`).

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use lexis_core::{Deconstructor, LexisConfig, ModelSelector, KNOWN_MODELS};
use lexis_record::{record_json_schema, DecompositionRecord, GraphProjection};
use lexis_validator::StructuralValidator;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn record_arg() -> Arg {
    Arg::new("record")
        .value_name("FILE")
        .default_value("-")
        .help("Decomposition record JSON (\"-\" reads stdin)")
}

fn cli() -> Command {
    Command::new("lexis")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Etymological word decomposition with structural validation")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(
            Command::new("deconstruct")
                .about("Decompose a word with the configured model")
                .arg(Arg::new("word").required(true).help("Word to decompose"))
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("TOML configuration file"),
                )
                .arg(
                    Arg::new("model")
                        .long("model")
                        .help("Model identifier (overrides configuration)"),
                )
                .arg(
                    Arg::new("max-attempts")
                        .long("max-attempts")
                        .value_parser(value_parser!(u32).range(1..))
                        .help("Generation attempts per request"),
                )
                .arg(
                    Arg::new("retry")
                        .long("retry")
                        .default_value("0")
                        .value_parser(value_parser!(u32))
                        .help("User retry count; above zero enables the default record"),
                )
                .arg(
                    Arg::new("graph")
                        .long("graph")
                        .action(ArgAction::SetTrue)
                        .help("Print the graph projection instead of the record"),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Check a record against a word")
                .arg(Arg::new("word").required(true).help("Word the record should spell"))
                .arg(record_arg()),
        )
        .subcommand(
            Command::new("graph")
                .about("Project a record into renderable nodes and edges")
                .arg(record_arg()),
        )
        .subcommand(Command::new("schema").about("Print the record JSON Schema"))
        .subcommand(Command::new("models").about("List known models"))
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn read_record(source: &str) -> Result<DecompositionRecord> {
    let text = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading record from stdin")?;
        buf
    } else {
        std::fs::read_to_string(Path::new(source))
            .with_context(|| format!("reading record from {source}"))?
    };
    DecompositionRecord::from_json(&text).context("parsing record")
}

fn load_config(args: &ArgMatches) -> Result<LexisConfig> {
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => LexisConfig::load(path)?,
        None => LexisConfig::default(),
    }
    .with_env_overrides()?;

    if let Some(model) = args.get_one::<String>("model") {
        config = config.with_model(ModelSelector::new(model));
    }
    if let Some(max_attempts) = args.get_one::<u32>("max-attempts") {
        config = config.with_max_attempts(*max_attempts);
    }
    config.validate()?;
    Ok(config)
}

async fn deconstruct(args: &ArgMatches) -> Result<()> {
    let config = load_config(args)?;
    let word = args
        .get_one::<String>("word")
        .context("missing word")?;
    let attempt_seed = args.get_one::<u32>("retry").copied().unwrap_or(0);

    let api_key = config.api_key();
    if api_key.is_none() {
        tracing::warn!(variable = %config.api_key_env, "no API key set");
    }
    let service = Deconstructor::openai(config, api_key)?;

    let result = service.deconstruct(word, attempt_seed).await?;
    tracing::info!(
        request_id = %result.request_id,
        status = ?result.status,
        attempts = result.attempts,
        "decomposition finished"
    );
    for violation in &result.violations {
        eprintln!("warning: {violation}");
    }

    let output = if args.get_flag("graph") {
        serde_json::to_string_pretty(&GraphProjection::from_record(&result.record))?
    } else {
        serde_json::to_string_pretty(&result.record)?
    };
    println!("{output}");
    Ok(())
}

fn validate(args: &ArgMatches) -> Result<bool> {
    let word = args
        .get_one::<String>("word")
        .context("missing word")?;
    let source = args.get_one::<String>("record").context("missing record")?;
    let record = read_record(source)?;

    let violations = StructuralValidator::new().check(word, &record);
    if violations.is_empty() {
        println!("valid");
        return Ok(true);
    }
    for violation in &violations {
        println!("[{:?}] {violation}", violation.rule());
    }
    Ok(false)
}

fn graph(args: &ArgMatches) -> Result<()> {
    let source = args.get_one::<String>("record").context("missing record")?;
    let record = read_record(source)?;
    let projection = GraphProjection::from_record(&record);
    let order = projection.topological_order()?;

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "nodes": &projection.nodes,
            "edges": &projection.edges,
            "order": order,
        }))?
    );
    Ok(())
}

fn models() {
    let default = ModelSelector::default();
    for (id, name) in KNOWN_MODELS {
        let marker = if *id == default.as_str() { "*" } else { " " };
        println!("{marker} {id:<20} {name}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"));

    match matches.subcommand() {
        Some(("deconstruct", args)) => deconstruct(args).await,
        Some(("validate", args)) => {
            if !validate(args)? {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(("graph", args)) => graph(args),
        Some(("schema", _)) => {
            println!("{}", serde_json::to_string_pretty(&record_json_schema())?);
            Ok(())
        }
        Some(("models", _)) => {
            models();
            Ok(())
        }
        Some((other, _)) => bail!("unknown command: {other}"),
        None => bail!("no command given"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn deconstruct_flags_parse() {
        let matches = cli()
            .try_get_matches_from([
                "lexis",
                "--log-json",
                "deconstruct",
                "telephone",
                "--model",
                "gpt-4o-mini",
                "--max-attempts",
                "5",
                "--retry",
                "1",
            ])
            .unwrap();
        assert!(matches.get_flag("log-json"));

        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "deconstruct");
        assert_eq!(args.get_one::<u32>("max-attempts"), Some(&5));
        assert_eq!(args.get_one::<u32>("retry"), Some(&1));

        let config = load_config(args).unwrap();
        assert_eq!(config.model.as_str(), "gpt-4o-mini");
        assert_eq!(config.max_attempts, 5);
    }

    #[test]
    fn zero_max_attempts_rejected_by_parser() {
        let result =
            cli().try_get_matches_from(["lexis", "deconstruct", "word", "--max-attempts", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn validate_reads_record_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("record.json");
        std::fs::write(&path, DecompositionRecord::fallback().to_pretty_json()).unwrap();

        let matches = cli()
            .try_get_matches_from(["lexis", "validate", "deconstructor", path.to_str().unwrap()])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        assert!(validate(args).unwrap());

        let matches = cli()
            .try_get_matches_from(["lexis", "validate", "constructor", path.to_str().unwrap()])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        assert!(!validate(args).unwrap());
    }
}
