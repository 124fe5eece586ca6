//! Issue API data model
//!
//! Request payloads serialize to the shapes the REST API expects. Response
//! types default every field so an empty body (`{}`) still deserializes;
//! callers check the status code before trusting any field.

use serde::{Deserialize, Serialize};

/// Version tag carried by every ADF document
pub const ADF_VERSION: u8 = 1;

/// Atlassian Document Format root node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdfDocument {
    pub version: u8,
    #[serde(rename = "type")]
    pub node_type: String,
    pub content: Vec<AdfNode>,
}

impl Default for AdfDocument {
    fn default() -> Self {
        Self {
            version: ADF_VERSION,
            node_type: "doc".to_string(),
            content: Vec::new(),
        }
    }
}

impl AdfDocument {
    /// Concatenated text of every leaf, in document order.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for node in &self.content {
            node.collect_text(&mut out);
        }
        out
    }
}

/// ADF node (`paragraph`, `text`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdfNode {
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<AdfNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl AdfNode {
    fn collect_text(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        for child in self.content.iter().flatten() {
            child.collect_text(out);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Highest,
    High,
    Medium,
    Low,
    Lowest,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Highest => "Highest",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
            Priority::Lowest => "Lowest",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueType {
    #[default]
    Task,
    Bug,
    Story,
}

/// `{ "name": ... }` reference used for priority and issue type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRef<T> {
    pub name: T,
}

impl<T> NameRef<T> {
    pub fn new(name: T) -> Self {
        Self { name }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub key: String,
}

/// Body of `POST /issue`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateIssuePayload {
    pub fields: CreateIssueFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateIssueFields {
    pub project: ProjectRef,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<AdfDocument>,
    pub issuetype: NameRef<IssueType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<NameRef<Priority>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

/// Body of `PUT /issue/{key}`
///
/// Every field is optional and each one also exists on create; the key and
/// server-owned fields cannot be expressed here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateIssuePayload {
    pub fields: UpdateIssueFields,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateIssueFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<AdfDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuetype: Option<NameRef<IssueType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<NameRef<Priority>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

/// `{ "name": ... }` as returned by the server (names are free text there)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NamedField {
    pub name: String,
}

/// Issue as returned by `GET /issue/{key}` and search
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct IssueResponse {
    pub id: String,
    pub key: String,
    #[serde(rename = "self")]
    pub self_url: String,
    pub fields: IssueFields,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct IssueFields {
    pub summary: String,
    pub description: Option<AdfDocument>,
    pub status: NamedField,
    pub issuetype: NamedField,
    pub priority: NamedField,
    pub labels: Vec<String>,
    pub project: ProjectRef,
    pub created: String,
    pub updated: String,
}

/// Response of `POST /issue`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CreatedIssue {
    pub id: String,
    pub key: String,
    #[serde(rename = "self")]
    pub self_url: String,
}

/// One page of `GET /search/jql`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchResponse {
    pub issues: Vec<IssueResponse>,
    pub next_page_token: Option<String>,
    pub is_last: bool,
}

impl SearchResponse {
    pub fn find(&self, key: &str) -> Option<&IssueResponse> {
        self.issues.iter().find(|issue| issue.key == key)
    }
}
