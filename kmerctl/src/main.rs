//! kmerctl CLI - a demo driver for the kmer-index de Bruijn k-mer hash table.
//!
//! This is the main entry point for the kmerctl CLI application. It uses
//! clap for argument parsing and dispatches to the `ingest`/`lookup` command
//! handlers, which build and query a [`kmer_index::KmerIndex`] directly —
//! there is no client/server split, this is a single-process demonstration
//! of the SPMD ingest protocol (§4.5-§4.7).

mod commands;
mod config;
mod dispatch;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{
    ingest::{run_ingest, IngestArgs},
    lookup::{run_lookup, LookupArgs},
};
use config::Config;
use error::{CliError, Result};

/// kmerctl - build and query a concurrent de Bruijn k-mer hash table
#[derive(Parser, Debug)]
#[command(name = "kmerctl")]
#[command(author = "Kmer Index Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Demo driver for the kmer-index k-mer hash table", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, env = "KMERCTL_VERBOSE")]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "KMERCTL_CONFIG")]
    config: Option<PathBuf>,

    /// Emit structured JSON instead of human-readable output
    #[arg(long, global = true)]
    json: bool,

    /// K-mer length, in bases
    #[arg(short = 'k', long, global = true)]
    k: Option<usize>,

    /// Number of SPMD worker threads
    #[arg(short = 'w', long, global = true)]
    workers: Option<usize>,

    /// Per-worker heap stripe capacity, in records
    #[arg(long, global = true)]
    heap_block_size: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the kmerctl CLI.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Ingest one or more UFX files into a fresh index and report stats
    Ingest(IngestCommand),

    /// Rebuild the index from UFX files and query it for specific k-mers
    Lookup(LookupCommand),
}

/// Arguments for the ingest subcommand.
#[derive(Parser, Debug)]
struct IngestCommand {
    /// UFX input files
    #[arg(required = true)]
    input: Vec<PathBuf>,
}

/// Arguments for the lookup subcommand.
#[derive(Parser, Debug)]
struct LookupCommand {
    /// UFX input files to rebuild the index from
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// K-mer texts to query
    #[arg(short, long = "query", required = true)]
    queries: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref())?;
    config.verbose = config.verbose || cli.verbose;
    config.json = config.json || cli.json;
    if let Some(k) = cli.k {
        config.k = k;
    }
    if let Some(workers) = cli.workers {
        config.workers = workers;
    }
    if let Some(heap_block_size) = cli.heap_block_size {
        config.heap_block_size = heap_block_size;
    }

    execute_command(cli.command, config)
}

/// Initialize the logging system.
fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let subscriber = fmt::layer().with_target(false).with_thread_ids(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()
        .map_err(|e| CliError::Config(format!("Failed to initialize logging: {}", e)))?;

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(config_path: Option<&std::path::Path>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
}

/// Execute the selected command.
fn execute_command(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Ingest(args) => execute_ingest(args, config),
        Commands::Lookup(args) => execute_lookup(args, config),
    }
}

fn execute_ingest(args: IngestCommand, config: Config) -> Result<()> {
    let stats = run_ingest(IngestArgs {
        inputs: args.input,
        config: config.clone(),
    })?;

    if config.json {
        println!(
            "{}",
            serde_json::json!({
                "inserted": stats.inserted,
                "start_kmers": stats.start_kmers,
                "bucket_count": stats.bucket_count,
                "heap_capacity": stats.heap_capacity,
                "duration_ms": stats.duration.as_millis(),
            })
        );
    } else {
        println!(
            "ingested {} k-mers ({} start k-mers) into {} buckets ({} heap slots) in {:.3}s",
            stats.inserted,
            stats.start_kmers,
            stats.bucket_count,
            stats.heap_capacity,
            stats.duration.as_secs_f64()
        );
    }

    Ok(())
}

fn execute_lookup(args: LookupCommand, config: Config) -> Result<()> {
    let outcomes = run_lookup(LookupArgs {
        inputs: args.input,
        config: config.clone(),
        queries: args.queries,
    })?;

    if config.json {
        let rows: Vec<_> = outcomes
            .iter()
            .map(|o| {
                serde_json::json!({
                    "query": o.query,
                    "found": o.found,
                    "handle": o.handle,
                    "l_ext": o.l_ext.map(|b| (b as char).to_string()),
                    "r_ext": o.r_ext.map(|b| (b as char).to_string()),
                })
            })
            .collect();
        println!("{}", serde_json::Value::Array(rows));
    } else {
        for o in &outcomes {
            if o.found {
                println!(
                    "{}: found (handle {}, lExt={}, rExt={})",
                    o.query,
                    o.handle.unwrap(),
                    o.l_ext.unwrap() as char,
                    o.r_ext.unwrap() as char
                );
            } else {
                println!("{}: not found", o.query);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_ingest() {
        let cli = Cli::parse_from(["kmerctl", "ingest", "a.ufx"]);
        assert!(matches!(cli.command, Commands::Ingest(_)));
    }

    #[test]
    fn test_cli_parse_lookup_with_queries() {
        let cli = Cli::parse_from([
            "kmerctl", "lookup", "a.ufx", "--query", "ACGT", "--query", "TTTT",
        ]);
        if let Commands::Lookup(args) = cli.command {
            assert_eq!(args.queries, vec!["ACGT".to_string(), "TTTT".to_string()]);
        } else {
            panic!("expected Lookup command");
        }
    }

    #[test]
    fn test_cli_parse_global_k_and_workers() {
        let cli = Cli::parse_from(["kmerctl", "-k", "21", "-w", "4", "ingest", "a.ufx"]);
        assert_eq!(cli.k, Some(21));
        assert_eq!(cli.workers, Some(4));
    }

    #[test]
    fn test_cli_parse_global_verbose() {
        let cli = Cli::parse_from(["kmerctl", "--verbose", "ingest", "a.ufx"]);
        assert!(cli.verbose);
    }
}
