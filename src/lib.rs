//! Lesividad prediction service.
//!
//! Serves two pre-trained binary classifiers over HTTP, predicting whether
//! a Madrid traffic accident required medical assistance. Requests carry a
//! location either as a district code or as a coordinate pair; each mode is
//! served by its own model bundle (preprocessor + classifier + label
//! decoder), loaded once at startup.

pub mod api;
pub mod config;
pub mod error;
pub mod model;

pub use error::{AppError, Result};
