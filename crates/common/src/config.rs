//! Suite configuration
//!
//! Built once at process start and passed by reference into the API and UI
//! fixtures. Nothing below the fixtures reads the environment.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Top-level configuration for both test layers
#[derive(Debug, Clone, Default)]
pub struct SuiteConfig {
    /// Storefront UI settings
    pub ui: UiConfig,

    /// Issue tracker API settings
    pub jira: JiraConfig,

    /// Running under CI
    pub ci: bool,
}

impl SuiteConfig {
    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let ci = get("CI").is_some();

        let mut ui = UiConfig::default();
        if let Some(url) = get("BASE_URL") {
            ui.base_url = url;
        }
        if let Some(browser) = get("UI_BROWSER") {
            ui.browser = browser.parse()?;
        }
        if let Some(headless) = get("UI_HEADLESS") {
            ui.headless = parse_bool("UI_HEADLESS", &headless)?;
        }
        if let Some(path) = get("UI_STORAGE_STATE") {
            ui.storage_state = Some(PathBuf::from(path));
        }
        if let Some(dir) = get("UI_SCREENSHOT_DIR") {
            ui.screenshot_dir = PathBuf::from(dir);
        }
        if let Some(dir) = get("UI_NODE_MODULES") {
            ui.node_modules = PathBuf::from(dir);
        }
        ui.retries = if ci { 2 } else { 0 };

        let mut jira = JiraConfig::default();
        if let Some(url) = get("JIRA_BASE_URL") {
            jira.base_url = url;
        }
        if let Some(key) = get("JIRA_PROJECT_KEY") {
            jira.project_key = key;
        }
        jira.auth_token = get("JIRA_AUTH_TOKEN");

        Ok(Self { ui, jira, ci })
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::Config(format!("{name}: expected a boolean, got '{other}'"))),
    }
}

/// Browser engine driven by Playwright
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl Browser {
    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Chromium => "chromium",
            Browser::Firefox => "firefox",
            Browser::Webkit => "webkit",
        }
    }
}

impl FromStr for Browser {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chromium" | "chrome" => Ok(Browser::Chromium),
            "firefox" => Ok(Browser::Firefox),
            "webkit" => Ok(Browser::Webkit),
            other => Err(Error::Config(format!("unknown browser '{other}'"))),
        }
    }
}

/// Browser viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Storefront UI settings
#[derive(Debug, Clone)]
pub struct UiConfig {
    /// Site root; page objects navigate relative to it
    pub base_url: String,

    pub browser: Browser,
    pub headless: bool,
    pub viewport: Viewport,

    /// Whole-scenario budget; the browser process is killed past it
    pub test_timeout: Duration,

    /// Auto-wait budget for each expectation
    pub expect_timeout: Duration,

    pub screenshot_dir: PathBuf,
    pub screenshot_on_failure: bool,

    /// Extra attempts for a failing scenario
    pub retries: u32,

    /// Storage seed applied before the first page load
    pub storage_state: Option<PathBuf>,

    /// Where `playwright` and `@playwright/test` are installed
    pub node_modules: PathBuf,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://gamdom.com".to_string(),
            browser: Browser::Chromium,
            headless: true,
            viewport: Viewport::default(),
            test_timeout: Duration::from_secs(30),
            expect_timeout: Duration::from_secs(10),
            screenshot_dir: PathBuf::from("test-results/screenshots"),
            screenshot_on_failure: true,
            retries: 0,
            storage_state: None,
            node_modules: PathBuf::from("node_modules"),
        }
    }
}

/// Issue tracker API settings
#[derive(Clone)]
pub struct JiraConfig {
    pub base_url: String,
    pub project_key: String,

    /// Pre-encoded credential sent as `Authorization: Basic <token>`
    pub auth_token: Option<String>,
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            base_url: "https://autoapi.atlassian.net".to_string(),
            project_key: "DEV".to_string(),
            auth_token: None,
        }
    }
}

impl fmt::Debug for JiraConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JiraConfig")
            .field("base_url", &self.base_url)
            .field("project_key", &self.project_key)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
