//! # Archive — Monthly Game Records
//!
//! Fetches `GET {api_base}/player/{user}/games/{year}/{month}` (month
//! always two digits) and cleans the raw `games` array into fixed-schema
//! game records:
//!
//! - rule variants other than standard chess are dropped
//! - the two per-side result strings collapse into one outcome label
//!   (`white_win` / `black_win` / `draw`, white checked first)
//! - a numeric game id is derived from the game URL's trailing segment
//! - the embedded PGN yields the paired move list and the ECO code
//!
//! The cleaned table also feeds the walk driver's candidate pool: the
//! deduplicated union of all white/black identifiers in the month.

use anyhow::{Context, Result};
use chrono::Utc;

use crate::batch::fetch_all;
use crate::http::{tail_segment, ApiClient};
use crate::normalize::normalize;
use crate::pgn::{extract_moves, extract_opening};
use crate::table::{Field, Table};

/// Raw projection straight out of the response, before cleaning.
const RAW_GAME_COLUMNS: &[&str] = &[
    "url",
    "pgn",
    "rules",
    "white_result",
    "black_result",
    "white_username",
    "black_username",
    "white_rating",
    "black_rating",
    "time_class",
    "time_control",
    "rated",
    "start_time",
    "end_time",
    "scraped_datetime",
];

/// Final game-record schema.
pub const GAME_COLUMNS: &[&str] = &[
    "white_username",
    "black_username",
    "white_rating",
    "black_rating",
    "time_class",
    "time_control",
    "rated",
    "start_time",
    "end_time",
    "scraped_datetime",
    "result",
    "game_id",
    "moves",
    "eco_code",
];

/// Fetch and clean one player's archive for a month.
pub async fn fetch_one(client: &ApiClient, user: &str, year: i32, month: u32) -> Result<Table> {
    let now = Utc::now().timestamp();
    let raw = client.get_json(&client.archive_url(user, year, month)).await?;
    let games = raw
        .get("games")
        .with_context(|| format!("archive response for {user} has no games field"))?;
    let table = normalize(games, &[("scraped_datetime", Field::Int(now))], RAW_GAME_COLUMNS);
    Ok(clean(table))
}

/// Concurrent archive fetch over a set of identifiers for one month.
pub async fn fetch_batch(client: &ApiClient, users: &[String], year: i32, month: u32) -> Table {
    let client = client.clone();
    let max_in_flight = client.config().max_in_flight;
    fetch_all(users, GAME_COLUMNS, max_in_flight, move |user| {
        let client = client.clone();
        async move { fetch_one(&client, &user, year, month).await }
    })
    .await
}

/// White result `win` beats black result `win`; anything else is a draw.
/// A double-"win" cannot occur in well-formed data, but resolves to white.
fn result_label(white_result: &Field, black_result: &Field) -> Field {
    if white_result.as_str() == Some("win") {
        Field::Str("white_win".to_string())
    } else if black_result.as_str() == Some("win") {
        Field::Str("black_win".to_string())
    } else {
        Field::Str("draw".to_string())
    }
}

fn numeric_tail(url: &Field) -> Field {
    url.as_str()
        .and_then(|u| tail_segment(u))
        .and_then(|segment| segment.parse::<i64>().ok())
        .map(Field::Int)
        .unwrap_or(Field::Null)
}

/// Project raw rows onto `GAME_COLUMNS`, deriving the outcome label, game
/// id, move list and opening code.
fn clean(mut raw: Table) -> Table {
    let rules = Field::Str("chess".to_string());
    if let Some(idx) = raw.column_index("rules") {
        raw.retain_rows(|row| row[idx] == rules);
    }

    let mut out = Table::empty(GAME_COLUMNS);
    for i in 0..raw.len() {
        let cell = |name: &str| raw.get(i, name).cloned().unwrap_or(Field::Null);
        let pgn = cell("pgn");
        let (moves, eco_code) = match pgn.as_str() {
            Some(text) => (
                Field::Str(extract_moves(text)),
                Field::from(extract_opening(text)),
            ),
            None => (Field::Null, Field::Null),
        };
        out.push_row(vec![
            cell("white_username"),
            cell("black_username"),
            cell("white_rating"),
            cell("black_rating"),
            cell("time_class"),
            cell("time_control"),
            cell("rated"),
            cell("start_time"),
            cell("end_time"),
            cell("scraped_datetime"),
            result_label(&cell("white_result"), &cell("black_result")),
            numeric_tail(&cell("url")),
            moves,
            eco_code,
        ]);
    }
    out
}

/// The candidate pool: deduplicated union of all white and black
/// identifiers in a cleaned game table, in first-seen order.
pub fn player_pool(games: &Table) -> Vec<String> {
    let mut pool = Vec::new();
    for column in ["white_username", "black_username"] {
        for field in games.column(column) {
            if let Some(name) = field.as_str() {
                if !pool.iter().any(|p| p == name) {
                    pool.push(name.to_string());
                }
            }
        }
    }
    pool
}
