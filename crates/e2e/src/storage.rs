//! Persisted browser state seeded before the first page load
//!
//! Uses Playwright's `storageState` layout so a seed captured from a real
//! session (`context.storageState({ path })`) can be dropped in as-is.

use std::path::Path;

use serde::{Deserialize, Serialize};

use qa_common::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSeed {
    #[serde(default)]
    pub cookies: Vec<SeedCookie>,
    #[serde(default)]
    pub origins: Vec<OriginStorage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    /// Unix seconds; -1 for a session cookie
    pub expires: i64,
    pub http_only: bool,
    pub secure: bool,
    pub same_site: String,
}

impl SeedCookie {
    /// Session cookie valid for the whole domain
    pub fn new(name: impl Into<String>, value: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: domain.into(),
            path: "/".to_string(),
            expires: -1,
            http_only: false,
            secure: false,
            same_site: "Lax".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginStorage {
    pub origin: String,
    #[serde(default)]
    pub local_storage: Vec<StorageEntry>,
}

/// One named key/value pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageEntry {
    pub name: String,
    pub value: String,
}

impl StorageSeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a local-storage entry for `origin`, replacing an existing key.
    pub fn with_local_storage(
        mut self,
        origin: &str,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let origin = origin.trim_end_matches('/');
        let entry = StorageEntry {
            name: name.into(),
            value: value.into(),
        };

        let idx = match self.origins.iter().position(|o| o.origin == origin) {
            Some(idx) => idx,
            None => {
                self.origins.push(OriginStorage {
                    origin: origin.to_string(),
                    local_storage: Vec::new(),
                });
                self.origins.len() - 1
            }
        };

        let entries = &mut self.origins[idx].local_storage;
        match entries.iter_mut().find(|e| e.name == entry.name) {
            Some(existing) => existing.value = entry.value,
            None => entries.push(entry),
        }
        self
    }

    pub fn with_cookie(mut self, cookie: SeedCookie) -> Self {
        self.cookies.retain(|c| !(c.name == cookie.name && c.domain == cookie.domain));
        self.cookies.push(cookie);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty() && self.origins.iter().all(|o| o.local_storage.is_empty())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
