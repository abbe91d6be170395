#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dengue case prediction for barangays.
//!
//! Applies a multi-linear regression with coefficients fitted offline
//! against population, mean temperature, and mean humidity. The crate is
//! pure: no I/O, no shared state, so every function is safe to call from
//! any number of concurrent requests.
//!
//! - [`model`] evaluates the formula for one input.
//! - [`validation`] replays the model over historical observations.
//! - [`fleet`] ranks every barangay under a shared weather reading.

pub mod fleet;
pub mod model;
pub mod validation;

pub use dengue_watch_prediction_models::round_to;
pub use fleet::{DEFAULT_POPULATION, predict_fleet, regions_from_history};
pub use model::predict;
pub use validation::{confidence_level, validate, validate_with};
