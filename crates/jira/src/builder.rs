//! Test data builders for issue payloads
//!
//! Builders are plain values: every `with_*` consumes the builder and hands
//! it back, and `build` returns an owned copy, so a built payload never
//! shares state with the builder or with other payloads built from it.

use chrono::Utc;

use crate::models::{
    AdfDocument, AdfNode, CreateIssueFields, CreateIssuePayload, IssueType, NameRef, Priority,
    ProjectRef, UpdateIssueFields, UpdateIssuePayload, ADF_VERSION,
};

/// One-paragraph ADF document whose single text leaf is `text`, verbatim.
pub fn create_adf(text: &str) -> AdfDocument {
    AdfDocument {
        version: ADF_VERSION,
        node_type: "doc".to_string(),
        content: vec![AdfNode {
            node_type: "paragraph".to_string(),
            content: Some(vec![AdfNode {
                node_type: "text".to_string(),
                content: None,
                text: Some(text.to_string()),
            }]),
            text: None,
        }],
    }
}

/// Builder for `POST /issue` payloads
#[derive(Debug, Clone)]
pub struct IssueBuilder {
    fields: CreateIssueFields,
}

impl IssueBuilder {
    /// Defaults: the given project, a timestamped summary, type `Task`.
    pub fn new(project_key: impl Into<String>) -> Self {
        Self {
            fields: CreateIssueFields {
                project: ProjectRef {
                    key: project_key.into(),
                },
                summary: format!("[Auto] Test Issue {}", Utc::now().timestamp_millis()),
                description: None,
                issuetype: NameRef::new(IssueType::Task),
                priority: None,
                labels: None,
            },
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.fields.summary = summary.into();
        self
    }

    pub fn with_description(mut self, text: &str) -> Self {
        self.fields.description = Some(create_adf(text));
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.fields.priority = Some(NameRef::new(priority));
        self
    }

    /// Replaces any labels set earlier.
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_type(mut self, issue_type: IssueType) -> Self {
        self.fields.issuetype = NameRef::new(issue_type);
        self
    }

    pub fn build(&self) -> CreateIssuePayload {
        CreateIssuePayload {
            fields: self.fields.clone(),
        }
    }
}

/// Builder for `PUT /issue/{key}` payloads; unset fields are left untouched
/// by the server.
#[derive(Debug, Clone, Default)]
pub struct UpdateIssueBuilder {
    fields: UpdateIssueFields,
}

impl UpdateIssueBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.fields.summary = Some(summary.into());
        self
    }

    pub fn with_description(mut self, text: &str) -> Self {
        self.fields.description = Some(create_adf(text));
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.fields.priority = Some(NameRef::new(priority));
        self
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_type(mut self, issue_type: IssueType) -> Self {
        self.fields.issuetype = Some(NameRef::new(issue_type));
        self
    }

    pub fn build(&self) -> UpdateIssuePayload {
        UpdateIssuePayload {
            fields: self.fields.clone(),
        }
    }
}
