// Shared test utilities

pub mod mock_jira;

use qa_common::JiraConfig;
use qa_jira::ApiFixture;

pub use mock_jira::{MockJira, TEST_TOKEN};

/// Fixture wired to a mock server with valid credentials
pub fn fixture_for(mock: &MockJira, project_key: &str) -> ApiFixture {
    ApiFixture::new(&JiraConfig {
        base_url: mock.base_url.clone(),
        project_key: project_key.to_string(),
        auth_token: Some(TEST_TOKEN.to_string()),
    })
    .expect("api fixture")
}
