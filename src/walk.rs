//! # Walk — The Random-Hop Tunnel
//!
//! The crawl's single-state driver. Each iteration, strictly in sequence:
//!
//! 1. fetch the current user's archive for the current (year, month)
//! 2. derive the candidate pool from the games' white/black identifiers
//! 3. fetch account, membership and rating data for the pool concurrently
//!    and left-join membership codes onto the account rows
//! 4. record one metadata row for the iteration
//! 5. hop to a uniformly random pool member and a uniformly random
//!    (year, month) from the configured range
//!
//! Any failure inside steps 1–3 degrades that iteration to a sentinel
//! metadata row; the walk itself never aborts. The current user is kept
//! on failure and the month still advances, so a dead month does not end
//! the crawl. Users may be revisited; there is no visited set.
//!
//! Randomness is injected as a seedable `StdRng` so a crawl can be
//! replayed deterministically.

use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::account::{self, ACCOUNT_JOINED_COLUMNS};
use crate::archive::{self, player_pool};
use crate::http::ApiClient;
use crate::membership;
use crate::stats::{self, STATS_COLUMNS};
use crate::table::{Field, Table};
use crate::ymrange::YmRange;

/// Identifier recorded in the metadata table for a failed iteration.
pub const ERROR_SENTINEL: &str = "encountered error";

pub const METADATA_COLUMNS: &[&str] = &["username", "year_querying", "month_querying", "iteration"];

/// The three final crawl tables.
pub struct WalkOutput {
    pub accounts: Table,
    pub ratings: Table,
    pub metadata: Table,
}

pub struct Walk {
    client: ApiClient,
    range: YmRange,
    rng: StdRng,
    user: String,
    year: i32,
    month: u32,
}

impl Walk {
    pub fn new(
        client: ApiClient,
        range: YmRange,
        seed_user: &str,
        init_year: i32,
        init_month: u32,
        rng_seed: Option<u64>,
    ) -> Self {
        let rng = match rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Walk {
            client,
            range,
            rng,
            user: seed_user.to_string(),
            year: init_year,
            month: init_month,
        }
    }

    /// Run the walk for a fixed number of iterations and concatenate the
    /// per-iteration tables into the three outputs.
    pub async fn run(mut self, steps: u32) -> WalkOutput {
        let mut accounts: Vec<Table> = Vec::new();
        let mut ratings: Vec<Table> = Vec::new();
        let mut metadata = Table::empty(METADATA_COLUMNS);

        for iteration in 0..steps {
            let visited = self.user.clone();
            let (year, month) = (self.year, self.month);

            match self.step().await {
                Ok((account_rows, rating_rows)) => {
                    info!(iteration, year, month, user = %visited, "crawl step");
                    metadata.push_row(metadata_row(&visited, year, month, iteration));
                    accounts.push(account_rows);
                    ratings.push(rating_rows);
                }
                Err(e) => {
                    warn!(iteration, year, month, error = %e, "crawl step failed");
                    metadata.push_row(metadata_row(ERROR_SENTINEL, year, month, iteration));
                }
            }

            let (next_year, next_month) = self.range.sample(&mut self.rng);
            self.year = next_year;
            self.month = next_month;
        }

        WalkOutput {
            accounts: Table::concat(ACCOUNT_JOINED_COLUMNS, accounts),
            ratings: Table::concat(STATS_COLUMNS, ratings),
            metadata,
        }
    }

    /// One iteration's fetch fan-out. Errors here are caught by `run` and
    /// turned into a sentinel metadata row.
    async fn step(&mut self) -> Result<(Table, Table)> {
        let games = archive::fetch_batch(
            &self.client,
            std::slice::from_ref(&self.user),
            self.year,
            self.month,
        )
        .await;

        let pool = player_pool(&games);
        if pool.is_empty() {
            bail!(
                "no games found for {} in {}-{:02}",
                self.user,
                self.year,
                self.month
            );
        }

        let (account_rows, membership_rows, rating_rows) = tokio::join!(
            account::fetch_batch(&self.client, &pool),
            membership::fetch_batch(&self.client, &pool),
            stats::fetch_batch(&self.client, &pool),
        );
        let account_rows = account_rows.left_join(&membership_rows, "username");

        // Hop only happens on a successful iteration.
        self.user = pool
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_else(|| self.user.clone());

        Ok((account_rows, rating_rows))
    }
}

fn metadata_row(user: &str, year: i32, month: u32, iteration: u32) -> Vec<Field> {
    vec![
        Field::Str(user.to_string()),
        Field::Str(year.to_string()),
        Field::Str(format!("{:02}", month)),
        Field::Int(iteration as i64),
    ]
}
