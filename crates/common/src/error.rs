//! Error types for the QA suite

use std::time::Duration;

use thiserror::Error;

/// Result type alias using the suite error
pub type Result<T> = std::result::Result<T, Error>;

/// QA suite error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Timeout waiting for {what} after {elapsed:?}: {last_failure}")]
    Timeout {
        what: String,
        elapsed: Duration,
        last_failure: String,
    },

    #[error("Playwright not found. Install with: npx playwright install")]
    PlaywrightNotFound,

    #[error("Playwright error: {0}")]
    Playwright(String),

    #[error("Step failed: {step} - {reason}")]
    StepFailed { step: String, reason: String },

    #[error("{context}: expected status {expected}, got {actual}")]
    UnexpectedStatus {
        context: String,
        expected: u16,
        actual: u16,
    },

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),
}

impl Error {
    /// Build an `UnexpectedStatus` unless `actual` matches `expected`.
    pub fn check_status(context: impl Into<String>, expected: u16, actual: u16) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(Error::UnexpectedStatus {
                context: context.into(),
                expected,
                actual,
            })
        }
    }
}
