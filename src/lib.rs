//! # chesswalk — Random-Walk Crawler for the chess.com Public API
//!
//! Starting from a seed account, the crawler fetches one month's game
//! archive, collects the opponents it finds there, fetches each opponent's
//! profile, membership tier and current ratings, then hops to a random
//! opponent and a random month and repeats. The result is three
//! fixed-schema tables — account snapshots, rating snapshots and
//! per-iteration crawl metadata — exported as CSV for downstream plotting.
//!
//! Layering, leaves first: [`normalize`] turns heterogeneous JSON into
//! fixed-schema [`table::Table`] rows; [`batch`] fans fetches out
//! concurrently and tolerates per-item failure; [`account`], [`stats`],
//! [`membership`] and [`archive`] pair the four endpoint shapes with their
//! schemas and cleaning; [`walk`] drives the iterative crawl over a
//! [`ymrange::YmRange`] of candidate months.

pub mod account;
pub mod archive;
pub mod batch;
pub mod cli;
pub mod config;
pub mod http;
pub mod membership;
pub mod normalize;
pub mod pgn;
pub mod stats;
pub mod table;
pub mod walk;
pub mod ymrange;

pub use config::CrawlConfig;
pub use http::ApiClient;
pub use table::{Field, Table};
pub use walk::{Walk, WalkOutput};
pub use ymrange::YmRange;
