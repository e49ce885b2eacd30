//! Sitewalk main entry point
//!
//! This is the command-line interface for the Sitewalk site crawler.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use sitewalk::config::{load_config_with_hash, Config};
use sitewalk::output::{print_history, print_summary, write_report};
use sitewalk::{CrawlerService, SqliteStore};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Sitewalk: a single-site web crawler
///
/// Sitewalk starts from one URL and visits every page on the same host it can
/// reach through anchor links. Results are kept in a local database and a
/// recent crawl of the same host is reused instead of crawling again.
#[derive(Parser, Debug)]
#[command(name = "sitewalk")]
#[command(version)]
#[command(about = "A single-site web crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl a site starting from URL
    Crawl {
        #[arg(value_name = "URL")]
        url: String,
    },

    /// Show a stored crawl
    Show {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// List every stored crawl
    History,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load(cli.config.as_deref())?;
    let database_path = PathBuf::from(&config.output.database_path);
    let report_path = PathBuf::from(&config.output.report_path);

    let store = SqliteStore::new(&database_path)
        .with_context(|| format!("Failed to open database {}", database_path.display()))?;
    let mut service = CrawlerService::new(store, &config);

    let records = match cli.command {
        Command::Crawl { url } => {
            let record = service
                .crawl_site(&url)
                .await
                .with_context(|| format!("Failed to crawl {}", url))?;
            print_summary(&record);
            vec![record]
        }
        Command::Show { id } => {
            if Uuid::parse_str(&id).is_err() {
                bail!("Invalid crawl id {:?}, expected a UUID", id);
            }
            let record = service.get_crawl(&id)?;
            print_summary(&record);
            vec![record]
        }
        Command::History => {
            let records = service.crawl_history()?;
            print_history(&records);
            records
        }
    };

    write_report(&records, &report_path)
        .with_context(|| format!("Failed to write report {}", report_path.display()))?;
    tracing::info!("Report written to {}", report_path.display());

    Ok(())
}

/// Loads the configuration file, or the defaults when none is given
fn load(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::info!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitewalk=info,warn"),
            1 => EnvFilter::new("sitewalk=debug,info"),
            2 => EnvFilter::new("sitewalk=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
