#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dashboard analytics over the surveillance database.
//!
//! Each public function runs a fixed set of parameterized queries through
//! `dengue_watch_database` and combines the rows into the typed results of
//! `dengue_watch_analytics_models`. The pure pieces (alert classification,
//! weekly bucketing) are exposed separately so they can be tested without
//! a database.

pub mod alerts;
pub mod dashboard;
pub mod snapshot;
pub mod trend;

use thiserror::Error;

pub use alerts::{alert_digest, alerts_from_counts};
pub use dashboard::{dashboard, window_start};
pub use snapshot::build_snapshot;
pub use trend::{compute_weekly_trend, weekly_trend};

/// Errors that can occur during analytics operations.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Database operation failed.
    #[error(transparent)]
    Database(#[from] dengue_watch_database::DbError),
}
