//! # Batch — Concurrent Fetch Fan-Out
//!
//! One fan-out of fetch calls over a set of identifiers. Every call runs
//! concurrently (bounded by the configured `max_in_flight`), the batch
//! waits for all of them, and each call resolves to a tagged
//! `FetchOutcome` — success carries that identifier's rows, failure
//! carries the reason. A failed call contributes zero rows and is logged;
//! it never fails the batch or loses the other identifiers' results. When
//! every call fails (or the identifier set is empty) the batch returns an
//! empty table that still carries the declared schema, so downstream
//! concatenation and column indexing keep working.

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::warn;

use crate::table::Table;

/// The per-identifier result of one batch member, kept explicit so the
/// lenient drop-on-failure policy is observable in tests.
pub struct FetchOutcome {
    pub id: String,
    pub result: Result<Table>,
}

/// Run `fetch_one` for every identifier concurrently and wait for all of
/// them. Outcomes are returned in the identifiers' order.
pub async fn run_batch<F, Fut>(ids: &[String], max_in_flight: usize, fetch_one: F) -> Vec<FetchOutcome>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<Table>> + Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(max_in_flight.max(1)));
    let mut set = JoinSet::new();
    for (index, id) in ids.iter().enumerate() {
        let semaphore = Arc::clone(&semaphore);
        let fut = fetch_one(id.clone());
        let id = id.clone();
        set.spawn(async move {
            // The semaphore never closes, so acquire only fails on shutdown.
            let _permit = semaphore.acquire_owned().await.expect("batch semaphore closed");
            (index, FetchOutcome { id, result: fut.await })
        });
    }

    let mut outcomes: Vec<(usize, FetchOutcome)> = Vec::with_capacity(ids.len());
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => warn!(error = %e, "fetch task panicked"),
        }
    }
    outcomes.sort_by_key(|(index, _)| *index);
    outcomes.into_iter().map(|(_, o)| o).collect()
}

/// Fan out, wait for all, keep the successes. The failures are logged and
/// excluded; all-failed yields `Table::empty(columns)`.
pub async fn fetch_all<F, Fut>(
    ids: &[String],
    columns: &[&str],
    max_in_flight: usize,
    fetch_one: F,
) -> Table
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<Table>> + Send + 'static,
{
    let outcomes = run_batch(ids, max_in_flight, fetch_one).await;
    collect(outcomes, columns)
}

/// Concatenate the successful outcomes into one schema-conformant table.
pub fn collect(outcomes: Vec<FetchOutcome>, columns: &[&str]) -> Table {
    let tables = outcomes.into_iter().filter_map(|outcome| match outcome.result {
        Ok(table) => Some(table),
        Err(e) => {
            warn!(id = %outcome.id, error = %e, "fetch failed, dropping item");
            None
        }
    });
    Table::concat(columns, tables)
}
