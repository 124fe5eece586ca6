//! Playwright browser automation
//!
//! A `Page` records awaited statements while page objects and scenarios run,
//! then executes them in one browser session: the statements are compiled
//! into a Node script that drives Playwright, run under `node`, and the JSON
//! outcome the script prints is parsed back.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::{debug, info, warn};

use qa_common::{Error, Result, UiConfig};

use crate::fallback::FallbackChain;
use crate::locator::{js_str, Locator};
use crate::storage::StorageSeed;

/// `waitUntil` option for navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Load,
    DomContentLoaded,
    NetworkIdle,
}

impl LoadState {
    fn as_str(&self) -> &'static str {
        match self {
            LoadState::Load => "load",
            LoadState::DomContentLoaded => "domcontentloaded",
            LoadState::NetworkIdle => "networkidle",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WaitState {
    #[default]
    Visible,
    Hidden,
    Attached,
    Detached,
}

impl WaitState {
    fn as_str(&self) -> &'static str {
        match self {
            WaitState::Visible => "visible",
            WaitState::Hidden => "hidden",
            WaitState::Attached => "attached",
            WaitState::Detached => "detached",
        }
    }
}

/// One recorded statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub label: String,
    pub code: String,
}

/// Outcome line printed by the generated script
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptOutcome {
    pub success: bool,
    #[serde(default)]
    pub step: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub screenshot: Option<String>,
}

/// Result of a successful run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub steps: usize,
    pub duration_ms: u64,
}

struct PageInner {
    name: String,
    config: UiConfig,
    seed: Option<StorageSeed>,
    steps: Mutex<Vec<Step>>,
}

/// Browser page handle shared by the page objects of one test
#[derive(Clone)]
pub struct Page {
    inner: Arc<PageInner>,
}

impl Page {
    pub fn new(name: impl Into<String>, config: UiConfig, seed: Option<StorageSeed>) -> Self {
        Self {
            inner: Arc::new(PageInner {
                name: name.into(),
                config,
                seed,
                steps: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn config(&self) -> &UiConfig {
        &self.inner.config
    }

    pub fn seed(&self) -> Option<&StorageSeed> {
        self.inner.seed.as_ref()
    }

    pub fn locator(&self, selector: &str) -> Locator {
        Locator::css(selector)
    }

    pub fn get_by_test_id(&self, id: &str) -> Locator {
        Locator::test_id(id)
    }

    pub fn get_by_text(&self, text: &str) -> Locator {
        Locator::text(text)
    }

    pub fn get_by_role(&self, role: &str, name: Option<&str>) -> Locator {
        Locator::role(role, name)
    }

    /// Steps recorded so far
    pub fn steps(&self) -> Vec<Step> {
        self.inner.steps.lock().clone()
    }

    /// Record a raw statement
    pub fn record(&self, label: impl Into<String>, code: impl Into<String>) {
        let step = Step {
            label: label.into(),
            code: code.into(),
        };
        debug!("[{}] recorded {}", self.inner.name, step.label);
        self.inner.steps.lock().push(step);
    }

    // Navigation

    /// Navigate relative to the configured base URL.
    pub fn goto(&self, path: &str, wait_until: LoadState) {
        self.record(
            format!("goto:{}", path),
            format!("await page.goto({}, {{ waitUntil: '{}' }});", js_str(path), wait_until.as_str()),
        );
    }

    pub fn wait_for_load_state(&self, state: LoadState) {
        self.record(
            format!("load-state:{}", state.as_str()),
            format!("await {};", Self::wait_for_load_state_expr(state)),
        );
    }

    // Interaction

    pub fn click(&self, locator: &Locator) {
        self.record(format!("click:{}", locator), format!("await {};", Self::click_expr(locator)));
    }

    pub fn fill(&self, locator: &Locator, value: &str) {
        self.record(
            format!("fill:{}", locator),
            format!("await {}.fill({});", locator, js_str(value)),
        );
    }

    /// Type into whatever has focus, key by key.
    pub fn type_text(&self, text: &str) {
        self.record(format!("type:{}", text), format!("await {};", Self::keyboard_type_expr(text)));
    }

    pub fn press(&self, key: &str) {
        self.record(
            format!("press:{}", key),
            format!("await page.keyboard.press({});", js_str(key)),
        );
    }

    /// Run a function body in the page.
    pub fn evaluate(&self, label: &str, function_body: &str) {
        self.record(
            format!("evaluate:{}", label),
            format!("await page.evaluate(() => {{ {} }});", function_body),
        );
    }

    // Waiting

    pub fn wait_for(&self, locator: &Locator, state: WaitState, timeout: Duration) {
        self.record(
            format!("wait:{}", locator),
            format!(
                "await {}.waitFor({{ state: '{}', timeout: {} }});",
                locator,
                state.as_str(),
                timeout.as_millis()
            ),
        );
    }

    /// Fixed sleep; use sparingly
    pub fn wait_for_timeout(&self, duration: Duration) {
        self.record(
            format!("sleep:{}ms", duration.as_millis()),
            format!("await page.waitForTimeout({});", duration.as_millis()),
        );
    }

    /// Await several expressions concurrently.
    ///
    /// For actions that race with what they trigger, e.g. waiting for a
    /// response while typing the input that causes it.
    pub fn all<I, S>(&self, label: &str, exprs: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let exprs: Vec<String> = exprs.into_iter().map(Into::into).collect();
        self.record(
            format!("all:{}", label),
            format!("await Promise.all([\n      {},\n    ]);", exprs.join(",\n      ")),
        );
    }

    /// Run a fallback chain; never fails the test by itself.
    pub fn best_effort(&self, chain: &FallbackChain) {
        self.record(format!("best-effort:{}", chain.name), chain.render());
    }

    pub fn log(&self, message: &str) {
        self.record(
            format!("log:{}", message.chars().take(30).collect::<String>()),
            format!("console.log('[TEST] ' + {});", js_str(message)),
        );
    }

    // Expectations (auto-retrying up to the expect timeout)

    pub fn expect_visible(&self, locator: &Locator) {
        self.expect_visible_within(locator, self.inner.config.expect_timeout);
    }

    pub fn expect_visible_within(&self, locator: &Locator, timeout: Duration) {
        self.record(
            format!("expect-visible:{}", locator),
            format!(
                "await expect({}).toBeVisible({{ timeout: {} }});",
                locator,
                timeout.as_millis()
            ),
        );
    }

    pub fn expect_hidden(&self, locator: &Locator) {
        self.record(
            format!("expect-hidden:{}", locator),
            format!(
                "await expect({}).toBeHidden({{ timeout: {} }});",
                locator,
                self.expect_ms()
            ),
        );
    }

    /// URL matches the regular expression `pattern`
    pub fn expect_url(&self, pattern: &str) {
        self.record(
            format!("expect-url:{}", pattern),
            format!(
                "await expect(page).toHaveURL(new RegExp({}), {{ timeout: {} }});",
                js_str(pattern),
                self.expect_ms()
            ),
        );
    }

    /// Title matches the regular expression `pattern`
    pub fn expect_title(&self, pattern: &str) {
        self.record(
            format!("expect-title:{}", pattern),
            format!(
                "await expect(page).toHaveTitle(new RegExp({}), {{ timeout: {} }});",
                js_str(pattern),
                self.expect_ms()
            ),
        );
    }

    /// More than `min` elements match, polling until the expect timeout
    pub fn expect_count_greater_than(&self, locator: &Locator, min: usize) {
        self.record(
            format!("expect-count>{}:{}", min, locator),
            format!(
                "await expect.poll(() => {}.count(), {{ timeout: {} }}).toBeGreaterThan({});",
                locator,
                self.expect_ms(),
                min
            ),
        );
    }

    /// Full-page screenshot under the configured screenshot directory
    pub fn screenshot(&self, name: &str) -> PathBuf {
        let path = self.inner.config.screenshot_dir.join(format!("{}.png", name));
        self.record(
            format!("screenshot:{}", name),
            format!(
                "await page.screenshot({{ path: {}, fullPage: true }});",
                js_str(&absolute(&path).to_string_lossy())
            ),
        );
        path
    }

    // Expressions for `all`

    pub fn wait_for_load_state_expr(state: LoadState) -> String {
        format!("page.waitForLoadState('{}')", state.as_str())
    }

    /// Resolves on the first response whose URL matches `pattern`
    pub fn wait_for_response_expr(pattern: &str) -> String {
        format!("page.waitForResponse(new RegExp({}))", js_str(pattern))
    }

    pub fn keyboard_type_expr(text: &str) -> String {
        format!("page.keyboard.type({})", js_str(text))
    }

    pub fn click_expr(locator: &Locator) -> String {
        format!("{}.click()", locator)
    }

    fn expect_ms(&self) -> u128 {
        self.inner.config.expect_timeout.as_millis()
    }

    /// Build the Playwright script for the recorded steps
    pub fn build_script(&self, storage_state: Option<&Path>) -> String {
        let config = &self.inner.config;
        let steps = self.inner.steps.lock();

        let storage = storage_state
            .map(|p| format!(",\n    storageState: {}", js_str(&p.to_string_lossy())))
            .unwrap_or_default();
        let failure_shot = if config.screenshot_on_failure {
            let path = config.screenshot_dir.join(format!("{}-failure.png", sanitize(&self.inner.name)));
            js_str(&absolute(&path).to_string_lossy())
        } else {
            "null".to_string()
        };

        let mut script = format!(
            r#"
const {{ chromium, firefox, webkit }} = require('playwright');
const {{ expect }} = require('@playwright/test');

(async () => {{
  const browser = await {browser}.launch({{ headless: {headless} }});
  const context = await browser.newContext({{
    baseURL: {base_url},
    viewport: {{ width: {width}, height: {height} }}{storage}
  }});
  context.setDefaultTimeout({expect_ms});
  const page = await context.newPage();
  const failureShot = {failure_shot};
  let currentStep = null;

  try {{
"#,
            browser = config.browser.as_str(),
            headless = config.headless,
            base_url = js_str(&config.base_url),
            width = config.viewport.width,
            height = config.viewport.height,
            storage = storage,
            expect_ms = config.expect_timeout.as_millis(),
            failure_shot = failure_shot,
        );

        for (i, step) in steps.iter().enumerate() {
            script.push_str(&format!(
                "\n    // Step {}: {}\n    currentStep = {};\n    {}\n",
                i + 1,
                step.label.replace('\n', " "),
                js_str(&step.label),
                step.code
            ));
        }

        script.push_str(
            r#"
    console.log(JSON.stringify({ success: true }));
  } catch (error) {
    let screenshot = null;
    if (failureShot) {
      try {
        await page.screenshot({ path: failureShot, fullPage: true });
        screenshot = failureShot;
      } catch (_) {}
    }
    console.log(JSON.stringify({ success: false, step: currentStep, error: error.message, screenshot }));
    process.exitCode = 1;
  } finally {
    await browser.close();
  }
})();
"#,
        );

        script
    }

    /// Execute every recorded step in one browser session.
    pub async fn run(&self) -> Result<RunReport> {
        check_playwright_installed().await?;

        let start = Instant::now();
        let config = &self.inner.config;
        let step_count = self.inner.steps.lock().len();

        let temp_dir = tempfile::tempdir()?;
        let storage_path = match &self.inner.seed {
            Some(seed) if !seed.is_empty() => {
                let path = temp_dir.path().join("storage-state.json");
                seed.write_to(&path)?;
                Some(path)
            }
            _ => None,
        };
        if config.screenshot_on_failure {
            std::fs::create_dir_all(&config.screenshot_dir)?;
        }

        let script_path = temp_dir.path().join("scenario.js");
        std::fs::write(&script_path, self.build_script(storage_path.as_deref()))?;

        info!("Running '{}' ({} steps) against {}", self.inner.name, step_count, config.base_url);
        debug!("Playwright script: {}", script_path.display());

        let child = Command::new("node")
            .arg(&script_path)
            .env("NODE_PATH", absolute(&config.node_modules))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let output = match tokio::time::timeout(config.test_timeout, child.wait_with_output()).await {
            Ok(output) => output?,
            Err(_) => {
                return Err(Error::Timeout {
                    what: format!("scenario '{}'", self.inner.name),
                    elapsed: start.elapsed(),
                    last_failure: "browser run exceeded the test timeout".to_string(),
                });
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        for line in stdout.lines().filter(|l| l.starts_with('[')) {
            debug!("[{}] {}", self.inner.name, line);
        }

        let Some(outcome) = parse_outcome(&stdout) else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Playwright(format!(
                "Script produced no outcome (exit {}):\nstdout: {}\nstderr: {}",
                output.status, stdout, stderr
            )));
        };

        if !outcome.success {
            if let Some(shot) = &outcome.screenshot {
                warn!("[{}] failure screenshot: {}", self.inner.name, shot);
            }
            return Err(Error::StepFailed {
                step: outcome.step.unwrap_or_else(|| "setup".to_string()),
                reason: outcome.error.unwrap_or_else(|| "unknown error".to_string()),
            });
        }

        Ok(RunReport {
            steps: step_count,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// Last JSON object line printed by the script
pub fn parse_outcome(stdout: &str) -> Option<ScriptOutcome> {
    stdout
        .lines()
        .rev()
        .filter(|line| line.trim_start().starts_with('{'))
        .find_map(|line| serde_json::from_str(line.trim()).ok())
}

/// Check if Playwright is installed
async fn check_playwright_installed() -> Result<()> {
    let status = Command::new("npx")
        .args(["playwright", "--version"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;

    match status {
        Ok(status) if status.success() => Ok(()),
        _ => Err(Error::PlaywrightNotFound),
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn page() -> Page {
        Page::new("homepage critical elements", UiConfig::default(), None)
    }

    #[test]
    fn test_steps_recorded_in_order() {
        let page = page();
        page.goto("/", LoadState::DomContentLoaded);
        page.click(&Locator::test_id("navLink-sports-link"));
        page.expect_url("sport");

        let labels: Vec<String> = page.steps().into_iter().map(|s| s.label).collect();
        assert_eq!(
            labels,
            vec![
                "goto:/".to_string(),
                r#"click:page.getByTestId("navLink-sports-link")"#.to_string(),
                "expect-url:sport".to_string(),
            ]
        );
    }

    #[test]
    fn test_clones_share_recorded_steps() {
        let page = page();
        let other = page.clone();
        other.press("Enter");
        assert_eq!(page.steps().len(), 1);
    }

    #[test]
    fn test_script_header_uses_config() {
        let config = UiConfig {
            base_url: "http://localhost:3000".to_string(),
            browser: qa_common::Browser::Firefox,
            headless: false,
            ..Default::default()
        };
        let page = Page::new("scenario", config, None);
        page.goto("/sports", LoadState::Load);

        let script = page.build_script(Some(Path::new("/tmp/state.json")));
        assert!(script.contains("await firefox.launch({ headless: false });"));
        assert!(script.contains(r#"baseURL: "http://localhost:3000""#));
        assert!(script.contains(r#"storageState: "/tmp/state.json""#));
        assert!(script.contains("viewport: { width: 1280, height: 720 }"));
        assert!(script.contains(r#"await page.goto("/sports", { waitUntil: 'load' });"#));
        assert!(script.contains(r#"currentStep = "goto:/sports";"#));
        assert!(script.contains("require('@playwright/test')"));
    }

    #[test]
    fn test_script_without_seed_or_failure_screenshot() {
        let config = UiConfig {
            screenshot_on_failure: false,
            ..Default::default()
        };
        let script = Page::new("scenario", config, None).build_script(None);
        assert!(!script.contains("storageState"));
        assert!(script.contains("const failureShot = null;"));
    }

    #[test]
    fn test_concurrent_group() {
        let page = page();
        page.all(
            "search:crash",
            [Page::wait_for_response_expr("games-search"), Page::keyboard_type_expr("crash")],
        );
        let code = &page.steps()[0].code;
        assert!(code.starts_with("await Promise.all(["));
        assert!(code.contains(r#"page.waitForResponse(new RegExp("games-search"))"#));
        assert!(code.contains(r#"page.keyboard.type("crash")"#));
    }

    #[test]
    fn test_expectations_carry_timeouts() {
        let page = page();
        let games = Locator::css("a[href*='originals']");
        page.expect_visible_within(&games.first(), Duration::from_secs(5));
        page.expect_count_greater_than(&games, 0);

        let steps = page.steps();
        assert!(steps[0].code.contains("toBeVisible({ timeout: 5000 })"));
        assert!(steps[1].code.contains("expect.poll(() => page.locator"));
        assert!(steps[1].code.contains("{ timeout: 10000 }).toBeGreaterThan(0)"));
    }

    #[test]
    fn test_screenshot_lands_in_configured_dir() {
        let config = UiConfig {
            screenshot_dir: PathBuf::from("/tmp/shots"),
            ..Default::default()
        };
        let page = Page::new("scenario", config, None);

        let path = page.screenshot("homepage");
        assert_eq!(path, PathBuf::from("/tmp/shots/homepage.png"));
        assert_eq!(
            page.steps()[0].code,
            r#"await page.screenshot({ path: "/tmp/shots/homepage.png", fullPage: true });"#
        );
    }

    #[test]
    fn test_log_label_truncated() {
        let page = page();
        page.log("a message that is definitely longer than thirty characters");
        assert_eq!(page.steps()[0].label, "log:a message that is definitely l");
    }

    #[test]
    fn test_parse_outcome_takes_last_json_line() {
        let stdout = "[fallback] \"geo-modal\": nothing applied\n[TEST] hi\n{\"success\":false,\"step\":\"click:x\",\"error\":\"Timeout 10000ms exceeded\",\"screenshot\":null}\n";
        let outcome = parse_outcome(stdout).unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.step.as_deref(), Some("click:x"));
        assert_eq!(outcome.error.as_deref(), Some("Timeout 10000ms exceeded"));

        assert!(parse_outcome("no json here\n").is_none());
        assert!(parse_outcome("{\"success\":true}\n").unwrap().success);
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize("game search: crash"), "game-search--crash");
    }
}
