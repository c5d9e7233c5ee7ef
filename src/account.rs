//! # Account — Profile Snapshots
//!
//! Fetches `GET {api_base}/player/{user}` for every identifier in a pool
//! and normalizes the profiles into one fixed-schema table. The API omits
//! `country` and `title` for many accounts; the normalizer fills those
//! with `Null` so the projection never fails. The `country` field arrives
//! as a URL (`.../country/US`) and is reduced to its trailing segment.

use anyhow::Result;
use chrono::Utc;

use crate::batch::fetch_all;
use crate::http::{tail_segment, ApiClient};
use crate::normalize::normalize;
use crate::table::{Field, Table};

pub const ACCOUNT_COLUMNS: &[&str] = &[
    "player_id",
    "country",
    "last_online",
    "joined",
    "title",
    "scraped_datetime",
    "username",
];

/// Account columns after the membership join in the walk driver.
pub const ACCOUNT_JOINED_COLUMNS: &[&str] = &[
    "player_id",
    "country",
    "last_online",
    "joined",
    "title",
    "scraped_datetime",
    "username",
    "membership_code",
];

/// Fetch and clean one account profile.
pub async fn fetch_one(client: &ApiClient, user: &str) -> Result<Table> {
    let now = Utc::now().timestamp();
    let raw = client.get_json(&client.player_url(user)).await?;
    let mut table = normalize(
        &raw,
        &[
            ("scraped_datetime", Field::Int(now)),
            ("username", Field::Str(user.to_string())),
        ],
        ACCOUNT_COLUMNS,
    );
    table.map_column("country", |field| match field.as_str() {
        Some(raw_url) => Field::from(tail_segment(raw_url)),
        None => Field::Null,
    });
    Ok(table)
}

/// Concurrent account fetch over a candidate pool. Individual failures
/// drop out; the table always carries `ACCOUNT_COLUMNS`.
pub async fn fetch_batch(client: &ApiClient, users: &[String]) -> Table {
    let client = client.clone();
    let max_in_flight = client.config().max_in_flight;
    fetch_all(users, ACCOUNT_COLUMNS, max_in_flight, move |user| {
        let client = client.clone();
        async move { fetch_one(&client, &user).await }
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use serde_json::json;

    #[test]
    fn profile_without_country_or_title_projects_cleanly() {
        let raw = json!({
            "player_id": 123,
            "joined": 1_600_000_000,
            "last_online": 1_700_000_000,
        });
        let t = normalize(
            &raw,
            &[("scraped_datetime", Field::Int(42)), ("username", "ghost".into())],
            ACCOUNT_COLUMNS,
        );
        assert_eq!(t.len(), 1);
        assert_eq!(t.get(0, "country"), Some(&Field::Null));
        assert_eq!(t.get(0, "title"), Some(&Field::Null));
        assert_eq!(t.get(0, "player_id"), Some(&Field::Int(123)));
        assert_eq!(t.get(0, "username"), Some(&Field::Str("ghost".into())));
    }

    #[test]
    fn country_url_reduces_to_code() {
        let raw = json!({"country": "https://api.chess.com/pub/country/NO"});
        let mut t = normalize(&raw, &[], ACCOUNT_COLUMNS);
        t.map_column("country", |field| match field.as_str() {
            Some(raw_url) => Field::from(tail_segment(raw_url)),
            None => Field::Null,
        });
        assert_eq!(t.get(0, "country"), Some(&Field::Str("NO".into())));
    }
}
