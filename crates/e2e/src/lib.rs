//! Storefront UI test framework
//!
//! Page objects record awaited Playwright statements on a shared `Page`;
//! the runner compiles them into one Node script per scenario, executes it
//! under `node`, and reads the outcome back.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    SuiteRunner (Rust)                       │
//! │    ├── Scenario { name, tags, build }                       │
//! │    └── retries, ✓/✗ log, test-results.json                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  UiFixture ── Page (recorded steps + StorageSeed)           │
//! │    ├── HomePage   ── Header, Search, Footer, CookieBanner   │
//! │    └── SportsPage                                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Page::run()                                                │
//! │    ├── scenario.js + storage-state.json in a temp dir       │
//! │    ├── node (NODE_PATH) under the test timeout              │
//! │    └── last JSON stdout line -> ScriptOutcome               │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod components;
pub mod fallback;
pub mod fixture;
pub mod locator;
pub mod pages;
pub mod playwright;
pub mod runner;
pub mod storage;

pub use fallback::FallbackChain;
pub use fixture::UiFixture;
pub use locator::Locator;
pub use pages::{BasePage, HomePage, SportsPage};
pub use playwright::{LoadState, Page, RunReport, WaitState};
pub use runner::{Scenario, SuiteResult, SuiteRunner, TestResult};
pub use storage::StorageSeed;
