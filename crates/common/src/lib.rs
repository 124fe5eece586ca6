//! QA Suite Common Library
//!
//! Configuration, errors, and polling shared by the Jira API checks and the
//! storefront UI checks.

pub mod config;
pub mod error;
pub mod poll;

pub use config::{Browser, JiraConfig, SuiteConfig, UiConfig, Viewport};
pub use error::{Error, Result};
pub use poll::{poll_until, PollPolicy};

/// Suite version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the fmt subscriber used by test binaries.
///
/// Honors `RUST_LOG`, defaulting to `info`. Calling it again is a no-op.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}
