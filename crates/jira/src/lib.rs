//! Jira issue API checks
//!
//! Layers, leaves first:
//!
//! ```text
//! ApiFixture ──> JiraIssuesClient ──> ApiClient ──> reqwest::Client ──> Jira
//!     │               (paths)          (status + normalized body)
//!     └── IssueBuilder / UpdateIssueBuilder (payloads, ADF descriptions)
//! ```
//!
//! Responses come back unchanged in shape through every layer; assertions
//! on status codes and fields live in the tests.

pub mod builder;
pub mod fixture;
pub mod http;
pub mod issues;
pub mod models;

pub use builder::{create_adf, IssueBuilder, UpdateIssueBuilder};
pub use fixture::ApiFixture;
pub use http::{ApiClient, ApiResponse, StatusOnly};
pub use issues::{JiraIssuesClient, DEFAULT_MAX_RESULTS, SEARCH_FIELDS};
pub use models::{IssueResponse, IssueType, Priority, SearchResponse};
