//! Jira issue resource client

use tracing::debug;

use qa_common::{poll_until, Error, PollPolicy, Result};

use crate::http::{ApiClient, ApiResponse, StatusOnly};
use crate::models::{
    CreateIssuePayload, CreatedIssue, IssueResponse, SearchResponse, UpdateIssuePayload,
};

const ISSUE_PATH: &str = "/rest/api/3/issue";
const SEARCH_PATH: &str = "/rest/api/3/search/jql";

/// Fields requested from search; the rest of the issue is not needed
pub const SEARCH_FIELDS: &str = "summary,priority,labels,status";

/// Default page size for search
pub const DEFAULT_MAX_RESULTS: u32 = 10;

/// CRUD and search over `/rest/api/3/issue`
///
/// Pure pass-through: keys and JQL go to the server as given.
#[derive(Debug, Clone)]
pub struct JiraIssuesClient {
    api: ApiClient,
}

impl JiraIssuesClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn create_issue(&self, payload: &CreateIssuePayload) -> Result<ApiResponse<CreatedIssue>> {
        self.api.post(ISSUE_PATH, payload).await
    }

    pub async fn get_issue(&self, key: &str) -> Result<ApiResponse<IssueResponse>> {
        self.api.get(&issue_path(key), None).await
    }

    pub async fn update_issue(&self, key: &str, payload: &UpdateIssuePayload) -> Result<StatusOnly> {
        self.api.put(&issue_path(key), payload).await
    }

    pub async fn delete_issue(&self, key: &str) -> Result<StatusOnly> {
        self.api.delete(&issue_path(key)).await
    }

    pub async fn search_issues(&self, jql: &str, max_results: u32) -> Result<ApiResponse<SearchResponse>> {
        self.search_issues_page(jql, max_results, None).await
    }

    /// One page of results, continuing from `next_page_token` when given.
    pub async fn search_issues_page(
        &self,
        jql: &str,
        max_results: u32,
        next_page_token: Option<&str>,
    ) -> Result<ApiResponse<SearchResponse>> {
        let max_results = max_results.to_string();
        let mut params = vec![
            ("jql", jql),
            ("maxResults", max_results.as_str()),
            ("fields", SEARCH_FIELDS),
        ];
        if let Some(token) = next_page_token {
            params.push(("nextPageToken", token));
        }
        self.api.get(SEARCH_PATH, Some(params.as_slice())).await
    }

    /// Follow continuation tokens until the last page.
    ///
    /// Stops early on a non-200 page and returns that status with the
    /// issues gathered so far.
    pub async fn search_all(&self, jql: &str, page_size: u32) -> Result<ApiResponse<Vec<IssueResponse>>> {
        let mut issues = Vec::new();
        let mut token: Option<String> = None;

        loop {
            let page = self.search_issues_page(jql, page_size, token.as_deref()).await?;
            if page.status != 200 {
                return Ok(ApiResponse {
                    status: page.status,
                    body: issues,
                });
            }

            issues.extend(page.body.issues);
            match page.body.next_page_token {
                Some(next) if !page.body.is_last => {
                    debug!("Fetching next search page ({} issues so far)", issues.len());
                    token = Some(next);
                }
                _ => break,
            }
        }

        Ok(ApiResponse { status: 200, body: issues })
    }

    /// Poll search until `key` shows up and `check` accepts it.
    ///
    /// The search index lags behind writes, so a freshly created or
    /// updated issue is not visible immediately. Fails with
    /// `Error::Timeout` once the policy deadline passes.
    pub async fn wait_for_search_hit<C>(
        &self,
        jql: &str,
        key: &str,
        policy: &PollPolicy,
        mut check: C,
    ) -> Result<IssueResponse>
    where
        C: FnMut(&IssueResponse) -> std::result::Result<(), String>,
    {
        let what = format!("issue {} in search results", key);
        let response = poll_until(
            policy,
            &what,
            || self.search_issues(jql, DEFAULT_MAX_RESULTS),
            |response| {
                if response.status != 200 {
                    return Err(format!("search returned status {}", response.status));
                }
                let issue = response
                    .body
                    .find(key)
                    .ok_or_else(|| format!("not among {} result(s)", response.body.issues.len()))?;
                check(issue)
            },
        )
        .await?;

        response
            .body
            .find(key)
            .cloned()
            .ok_or_else(|| Error::AssertionFailed(format!("issue {} vanished from search results", key)))
    }
}

fn issue_path(key: &str) -> String {
    format!("{}/{}", ISSUE_PATH, key)
}
