//! KGX Ingest - pathway and nomenclature loaders

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use kgx_common::logging::{init_logging, LogConfig, LogLevel};
use kgx_ingest::config::IngestConfig;
use kgx_ingest::fetch::{self, Fetcher};
use kgx_ingest::hgnc::{self, HgncLoader};
use kgx_ingest::reactome::{self, ReactomeLoader, VersionDiscovery};
use kgx_ingest::run_loader;
use std::path::PathBuf;
use tokio::runtime::Runtime;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "kgx-ingest")]
#[command(author, version, about = "KGX data ingestion tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Source {
    Reactome,
    Hgnc,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract Reactome into KGX files
    Reactome {
        /// Exported graph (JSON) to read instead of Neo4j
        #[arg(long, env = "REACTOME_GRAPH_FILE")]
        graph_file: Option<PathBuf>,

        /// Rule table replacing the embedded one
        #[arg(long, env = "REACTOME_RULE_TABLE")]
        rules: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Source version to record; discovered from the news page when omitted
        #[arg(long)]
        source_version: Option<String>,
    },

    /// Parse the HGNC complete set into KGX files
    Hgnc {
        /// Complete set file; defaults to the data directory copy
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Stop after this many rows
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Download raw source files into the data directory
    Fetch {
        #[arg(value_enum)]
        sources: Vec<Source>,
    },

    /// Print the latest available source version
    Version {
        #[arg(value_enum)]
        source: Source,
    },
}

fn runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
}

fn reactome_version(config: &IngestConfig) -> Result<String> {
    let discovery = VersionDiscovery::new(&config.reactome)?;
    Ok(runtime()?.block_on(discovery.latest_version())?)
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    // Environment variables take precedence over flags
    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("kgx-ingest")
        .build()
        .merge_env()?;
    let _guard = init_logging(&log_config)?;

    let mut config = IngestConfig::from_env();

    match cli.command {
        Command::Reactome {
            graph_file,
            rules,
            output,
            source_version,
        } => {
            if graph_file.is_some() {
                config.reactome.graph_file = graph_file;
            }
            if rules.is_some() {
                config.reactome.rule_table = rules;
            }
            config.validate()?;

            let source_version = match source_version {
                Some(v) => v,
                None => reactome_version(&config)?,
            };
            let output = output.unwrap_or_else(|| config.source_output_dir(reactome::SOURCE_ID));

            let mut loader = ReactomeLoader::from_config(&config.reactome, &config.neo4j)?;
            run_loader(&mut loader, &source_version, &output)?;
        },
        Command::Hgnc { input, output, limit } => {
            if limit.is_some() {
                config.hgnc.parse_limit = limit;
            }
            config.validate()?;

            let mut loader = match input {
                Some(path) => HgncLoader::new(path, &config.hgnc),
                None => HgncLoader::from_config(&config),
            };
            let output = output.unwrap_or_else(|| config.source_output_dir(hgnc::SOURCE_ID));
            run_loader(&mut loader, &HgncLoader::latest_source_version(), &output)?;
        },
        Command::Fetch { sources } => {
            config.validate()?;
            let sources = if sources.is_empty() {
                vec![Source::Reactome, Source::Hgnc]
            } else {
                sources
            };

            let rt = runtime()?;
            for source in sources {
                let path = match source {
                    Source::Reactome => {
                        let fetcher = Fetcher::new(config.reactome.timeout_secs)?;
                        rt.block_on(fetch::fetch_reactome(&config, &fetcher))?
                    },
                    Source::Hgnc => {
                        let fetcher = Fetcher::new(config.hgnc.timeout_secs)?;
                        rt.block_on(fetch::fetch_hgnc(&config, &fetcher))?
                    },
                };
                info!("Saved {}", path.display());
            }
        },
        Command::Version { source } => {
            let version = match source {
                Source::Reactome => reactome_version(&config)?,
                Source::Hgnc => HgncLoader::latest_source_version(),
            };
            println!("{version}");
        },
    }

    info!("Ingestion complete");
    Ok(())
}
