use crate::{
    commands::{Commands, SearchArgs},
    error::CliError,
};
use chrono::{DateTime, Utc};
use clap::Parser;
use connectors::{
    memory::MemoryStore,
    sql::{dialect::SqlDialect, table::SqlTable},
};
use model::{
    config::{SearchConfig, UnresolvedFieldPolicy},
    field::allowed::AllowedFields,
};
use search_core::{CompileOptions, Search, cast::date::PhraseResolver};
use std::{process::ExitCode, str::FromStr};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod output;

#[derive(Parser)]
#[command(name = "search", version = "0.1.0", about = "Typed search over records")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err.report());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Query {
            search,
            records,
            output,
        } => {
            let (config, engine) = load_search(&search).await?;
            let registry = engine.registry().snapshot();
            let source = tokio::fs::read_to_string(&records).await?;
            let store = MemoryStore::from_json(&source, &registry, config.time_zone()?)?;

            let matches = engine.run(&store, &search.query, &allowed(&search))?;
            info!(
                entity = %config.entity,
                total = store.len(),
                matched = matches.len(),
                "Query complete"
            );
            output::write(output::records_json(&matches)?, output).await?;
        }
        Commands::Sql {
            search,
            table,
            dialect,
        } => {
            let dialect = SqlDialect::from_str(&dialect).map_err(CliError::InvalidDialect)?;
            let (config, engine) = load_search(&search).await?;
            let table = SqlTable::new(table.unwrap_or(config.entity), dialect);

            let select = engine.run(&table, &search.query, &allowed(&search))?;
            output::write(output::select_json(&select)?, None).await?;
        }
        Commands::Explain { search } => {
            let (_, engine) = load_search(&search).await?;
            match engine.compile(&search.query, &allowed(&search))? {
                Some(predicate) => println!("{predicate}"),
                None => println!("(no filter)"),
            }
        }
        Commands::Ast { query } => {
            let tree = query_syntax::parse(&query)?;
            output::write(serde_json::to_string_pretty(&tree)?, None).await?;
        }
        Commands::Fields { config } => {
            let config = load_config(&config).await?;
            let registry = config.registry()?;
            let fields = registry.iter().collect::<Vec<_>>();
            output::write(serde_json::to_string_pretty(&fields)?, None).await?;
        }
    }

    Ok(())
}

async fn load_config(path: &str) -> Result<SearchConfig, CliError> {
    let source = tokio::fs::read_to_string(path).await?;
    Ok(SearchConfig::from_json(&source)?)
}

async fn load_search(args: &SearchArgs) -> Result<(SearchConfig, Search), CliError> {
    let config = load_config(&args.config).await?;
    let zone = config.time_zone()?;

    let resolver = match &args.now {
        Some(now) => {
            let now = DateTime::parse_from_rfc3339(now)
                .map_err(|_| CliError::InvalidReferenceTime(now.clone()))?;
            PhraseResolver::at(zone, now.with_timezone(&Utc))
        }
        None => PhraseResolver::new(zone),
    };

    let mut options = CompileOptions::from(&config);
    if args.strict {
        options.unresolved_fields = UnresolvedFieldPolicy::Strict;
    }

    let search = Search::new(config.registry()?)
        .with_options(options)
        .with_resolver(resolver);
    Ok((config, search))
}

fn allowed(args: &SearchArgs) -> AllowedFields {
    if args.fields.is_empty() {
        AllowedFields::All
    } else {
        AllowedFields::only(&args.fields)
    }
}
