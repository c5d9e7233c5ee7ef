//! # Membership — Tier Codes
//!
//! Fetches the popup callback endpoint and keeps only the membership tier
//! code. The result is left-joined onto the account table by the walk
//! driver, one code per identifier.

use anyhow::Result;

use crate::batch::fetch_all;
use crate::http::ApiClient;
use crate::normalize::normalize;
use crate::table::{Field, Table};

pub const MEMBERSHIP_COLUMNS: &[&str] = &["membership_code", "username"];

/// Fetch one player's membership tier.
pub async fn fetch_one(client: &ApiClient, user: &str) -> Result<Table> {
    let raw = client.get_json(&client.popup_url(user)).await?;
    Ok(normalize(
        &raw,
        &[("username", Field::Str(user.to_string()))],
        MEMBERSHIP_COLUMNS,
    ))
}

/// Concurrent membership fetch over a candidate pool.
pub async fn fetch_batch(client: &ApiClient, users: &[String]) -> Table {
    let client = client.clone();
    let max_in_flight = client.config().max_in_flight;
    fetch_all(users, MEMBERSHIP_COLUMNS, max_in_flight, move |user| {
        let client = client.clone();
        async move { fetch_one(&client, &user).await }
    })
    .await
}
