//! # Stats — Current Rating Snapshots
//!
//! Fetches `GET {api_base}/player/{user}/stats` and keeps the eight
//! best/last rating columns for the four time-control modes. Accounts
//! that never played a mode simply lack that subtree in the response,
//! which the normalizer turns into `Null` cells.

use anyhow::Result;

use crate::batch::fetch_all;
use crate::http::ApiClient;
use crate::normalize::normalize;
use crate::table::{Field, Table};

pub const STATS_COLUMNS: &[&str] = &[
    "username",
    "chess_daily_best_rating",
    "chess_daily_last_rating",
    "chess_blitz_best_rating",
    "chess_blitz_last_rating",
    "chess_bullet_last_rating",
    "chess_bullet_best_rating",
    "chess_rapid_best_rating",
    "chess_rapid_last_rating",
];

/// Fetch one player's rating stats.
pub async fn fetch_one(client: &ApiClient, user: &str) -> Result<Table> {
    let raw = client.get_json(&client.stats_url(user)).await?;
    Ok(normalize(
        &raw,
        &[("username", Field::Str(user.to_string()))],
        STATS_COLUMNS,
    ))
}

/// Concurrent rating fetch over a candidate pool.
pub async fn fetch_batch(client: &ApiClient, users: &[String]) -> Table {
    let client = client.clone();
    let max_in_flight = client.config().max_in_flight;
    fetch_all(users, STATS_COLUMNS, max_in_flight, move |user| {
        let client = client.clone();
        async move { fetch_one(&client, &user).await }
    })
    .await
}
