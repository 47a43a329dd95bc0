// src/error.rs

use std::time::Duration;
use thiserror::Error;

use crate::schema::{Settlement, ValueType};

/// Failure of a single browser primitive.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("browser protocol error: {0}")]
    Protocol(String),
    #[error("timed out after {waited:?} waiting for `{selector}`")]
    Timeout { selector: String, waited: Duration },
    #[error("browser session already closed")]
    Closed,
}

/// Failure taxonomy of a collection run.
///
/// Only `Setup` aborts the run; every other variant is caught at the
/// narrowest scope and downgraded to missing data.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("browser setup failed: {0}")]
    Setup(String),
    #[error("{page}: could not set {what}")]
    Navigation { page: &'static str, what: String },
    #[error("{page}/{settlement}: {reason}")]
    Extraction {
        page: &'static str,
        settlement: Settlement,
        reason: String,
    },
    #[error("column {column}: cannot read {text:?} as {expected}")]
    Parse {
        column: &'static str,
        text: String,
        expected: ValueType,
    },
}
