#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Database connection, schema, and queries for dengue surveillance data.
//!
//! Uses `switchy_database` over an embedded `SQLite` file. Every query goes
//! through `query_raw_params()` / `exec_raw_params()` with bound values;
//! nothing is interpolated into SQL text. Rows are converted into the typed
//! structs of `dengue_watch_database_models` before leaving this crate.

pub mod db;
pub mod import;
pub mod queries;

/// Errors that can occur during database operations.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Database query error.
    #[error("Database error: {0}")]
    Database(#[from] switchy_database::DatabaseError),

    /// Connection could not be opened.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Filesystem error while preparing the database location.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Data conversion error.
    #[error("Data conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}
