//! Per-test API context
//!
//! Owns the shared request context (a `reqwest::Client` carrying the auth
//! and JSON headers) and hands out clients bound to it. Dropping the
//! fixture releases the connection pool; tests never clean up by hand.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use tracing::{debug, warn};

use qa_common::{Error, JiraConfig, Result};

use crate::builder::IssueBuilder;
use crate::http::ApiClient;
use crate::issues::JiraIssuesClient;

/// Upper bound for a single request, including reading the body
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct ApiFixture {
    issues: JiraIssuesClient,
    project_key: String,
}

impl ApiFixture {
    pub fn new(config: &JiraConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("qa-jira/", env!("CARGO_PKG_VERSION")))
            .default_headers(default_headers(config)?)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        debug!("API fixture for {} (project {})", config.base_url, config.project_key);

        Ok(Self {
            issues: JiraIssuesClient::new(ApiClient::new(client, config.base_url.clone())),
            project_key: config.project_key.clone(),
        })
    }

    pub fn issues(&self) -> &JiraIssuesClient {
        &self.issues
    }

    pub fn project_key(&self) -> &str {
        &self.project_key
    }

    /// Create-payload builder preset to the configured project.
    pub fn issue_builder(&self) -> IssueBuilder {
        IssueBuilder::new(self.project_key.clone())
    }
}

fn default_headers(config: &JiraConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    match &config.auth_token {
        Some(token) => {
            let mut value = HeaderValue::from_str(&format!("Basic {}", token))
                .map_err(|e| Error::Config(format!("JIRA_AUTH_TOKEN is not a valid header value: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        None => warn!("JIRA_AUTH_TOKEN is not set; requests will be anonymous"),
    }

    Ok(headers)
}
