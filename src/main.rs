//! # Main — CLI Entry Point
//!
//! Parses the command line, initializes structured logging and runs the
//! chosen subcommand on a tokio runtime.
//!
//! ## Subcommands
//!
//! - `crawl` — the random-walk crawl: seed identifier, iteration count,
//!   date-range bounds, initial (year, month), optional RNG seed for a
//!   reproducible walk, and the CSV output directory.
//! - `peek` — one-shot archive fetch for a single (user, year, month),
//!   useful for checking what a crawl step would see.
//!
//! ## Global Options
//!
//! - `--config` / `CHESSWALK_CONFIG`: TOML file overriding the fetch-layer
//!   defaults (base URLs, Accept-Encoding, timeout, fan-out bound).

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use chesswalk::cli::{run_crawl, run_peek, CrawlArgs};
use chesswalk::{ApiClient, CrawlConfig};

#[derive(Parser)]
#[command(name = "chesswalk", about = "Random-walk crawl over the chess.com public API")]
struct Cli {
    /// Path to a TOML config file (base URLs, timeout, fan-out bound)
    #[arg(long, env = "CHESSWALK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl the API by random-hopping between accounts and months
    Crawl {
        /// Account handle to start the walk from
        #[arg(long)]
        seed_user: String,
        /// Number of crawl iterations
        #[arg(long, default_value_t = 10)]
        steps: u32,
        /// First year of the sampled date range
        #[arg(long)]
        begin_year: i32,
        /// First month within the first year (1-12)
        #[arg(long, default_value_t = 1)]
        begin_month: u32,
        /// Last year of the sampled date range
        #[arg(long)]
        end_year: i32,
        /// Last month within the last year (1-12)
        #[arg(long, default_value_t = 12)]
        end_month: u32,
        /// Year queried on the first iteration
        #[arg(long, default_value_t = 2022)]
        init_year: i32,
        /// Month queried on the first iteration
        #[arg(long, default_value_t = 8)]
        init_month: u32,
        /// Seed for the walk's randomness (omit for an entropy seed)
        #[arg(long)]
        rng_seed: Option<u64>,
        /// Directory for the three CSV outputs
        #[arg(long, default_value = "data")]
        out_dir: PathBuf,
    },
    /// Fetch and summarize one month's archive for one account
    Peek {
        /// Account handle
        #[arg(long)]
        user: String,
        /// Archive year
        #[arg(long)]
        year: i32,
        /// Archive month (1-12)
        #[arg(long)]
        month: u32,
    },
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // Structured logging: LOG_FORMAT=json for machines, human-readable otherwise
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt().json().with_target(false).init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => CrawlConfig::load(path)?,
        None => CrawlConfig::default(),
    };
    let client = ApiClient::new(config)?;

    let rt = tokio::runtime::Runtime::new()?;
    match cli.command {
        Commands::Crawl {
            seed_user,
            steps,
            begin_year,
            begin_month,
            end_year,
            end_month,
            init_year,
            init_month,
            rng_seed,
            out_dir,
        } => rt.block_on(run_crawl(
            client,
            CrawlArgs {
                seed_user: &seed_user,
                steps,
                begin_year,
                begin_month,
                end_year,
                end_month,
                init_year,
                init_month,
                rng_seed,
                out_dir: &out_dir,
            },
        )),
        Commands::Peek { user, year, month } => rt.block_on(run_peek(client, &user, year, month)),
    }
}
