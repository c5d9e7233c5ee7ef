//! # Cli — Subcommand Runners
//!
//! The async bodies behind the CLI subcommands: `crawl` runs the full
//! random walk and writes the three CSV outputs; `peek` does a one-shot
//! archive fetch for a single (user, year, month) and prints what a crawl
//! step would see there.

use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::archive;
use crate::http::ApiClient;
use crate::walk::Walk;
use crate::ymrange::YmRange;

pub struct CrawlArgs<'a> {
    pub seed_user: &'a str,
    pub steps: u32,
    pub begin_year: i32,
    pub begin_month: u32,
    pub end_year: i32,
    pub end_month: u32,
    pub init_year: i32,
    pub init_month: u32,
    pub rng_seed: Option<u64>,
    pub out_dir: &'a Path,
}

/// Run a crawl and export `account_data.csv`, `player_stats.csv` and
/// `metadata.csv` into the output directory.
pub async fn run_crawl(client: ApiClient, args: CrawlArgs<'_>) -> Result<()> {
    let range = YmRange::new(args.begin_year, args.begin_month, args.end_year, args.end_month)?;
    let walk = Walk::new(
        client,
        range,
        args.seed_user,
        args.init_year,
        args.init_month,
        args.rng_seed,
    );

    let output = walk.run(args.steps).await;

    std::fs::create_dir_all(args.out_dir)?;
    output.accounts.write_csv(&args.out_dir.join("account_data.csv"))?;
    output.ratings.write_csv(&args.out_dir.join("player_stats.csv"))?;
    output.metadata.write_csv(&args.out_dir.join("metadata.csv"))?;

    info!(
        accounts = output.accounts.len(),
        ratings = output.ratings.len(),
        iterations = output.metadata.len(),
        out_dir = %args.out_dir.display(),
        "crawl complete"
    );
    Ok(())
}

/// Fetch one month's archive for one user and print a summary of the
/// games and the candidate pool a walk step would hop into.
pub async fn run_peek(client: ApiClient, user: &str, year: i32, month: u32) -> Result<()> {
    let games = archive::fetch_one(&client, user, year, month).await?;
    let pool = archive::player_pool(&games);

    println!("{} games for {} in {}-{:02}", games.len(), user, year, month);
    for row in 0..games.len() {
        let cell = |name: &str| games.get(row, name).map(|f| f.to_string()).unwrap_or_default();
        println!(
            "  {} vs {} [{}] {} eco={}",
            cell("white_username"),
            cell("black_username"),
            cell("time_class"),
            cell("result"),
            cell("eco_code"),
        );
    }
    println!("candidate pool ({}): {}", pool.len(), pool.join(", "));
    Ok(())
}
