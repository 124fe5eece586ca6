//! Suite runner: executes scenarios against the configured site

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use qa_common::{Result, UiConfig};

use crate::fixture::UiFixture;

/// A named UI test
///
/// `build` records the scenario's steps on a fresh fixture; the runner
/// executes them.
#[derive(Clone, Copy)]
pub struct Scenario {
    pub name: &'static str,
    pub tags: &'static [&'static str],
    pub build: fn(&UiFixture),
}

impl Scenario {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| *t == tag)
    }
}

/// Result of running a single scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub success: bool,
    pub attempts: u32,
    pub steps: usize,
    pub duration_ms: u64,
    pub error: Option<String>,
}

/// Result of running all selected scenarios
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuiteResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub results: Vec<TestResult>,
}

impl SuiteResult {
    pub fn success(&self) -> bool {
        self.failed == 0
    }
}

pub struct SuiteRunner {
    config: UiConfig,
    scenarios: Vec<Scenario>,
    output_dir: PathBuf,
}

impl SuiteRunner {
    pub fn new(config: UiConfig, scenarios: Vec<Scenario>) -> Self {
        Self {
            config,
            scenarios,
            output_dir: PathBuf::from("test-results"),
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub async fn run_all(&self) -> Result<SuiteResult> {
        self.run_scenarios(&self.scenarios).await
    }

    pub async fn run_tagged(&self, tag: &str) -> Result<SuiteResult> {
        self.run_scenarios(&self.tagged(tag)).await
    }

    /// Run scenarios whose name contains `pattern`
    pub async fn run_named(&self, pattern: &str) -> Result<SuiteResult> {
        self.run_scenarios(&self.named(pattern)).await
    }

    pub fn tagged(&self, tag: &str) -> Vec<Scenario> {
        self.scenarios.iter().filter(|s| s.has_tag(tag)).copied().collect()
    }

    pub fn named(&self, pattern: &str) -> Vec<Scenario> {
        self.scenarios
            .iter()
            .filter(|s| s.name.contains(pattern))
            .copied()
            .collect()
    }

    /// Run scenarios one after another
    pub async fn run_scenarios(&self, scenarios: &[Scenario]) -> Result<SuiteResult> {
        let start = Instant::now();
        let mut results = Vec::with_capacity(scenarios.len());

        info!("Running {} scenario(s) against {}", scenarios.len(), self.config.base_url);

        for scenario in scenarios {
            let result = self.run_scenario(scenario).await?;
            if result.success {
                info!("✓ {} ({} ms)", result.name, result.duration_ms);
            } else {
                error!(
                    "✗ {} - {}",
                    result.name,
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            results.push(result);
        }

        let suite = summarize(results, start.elapsed().as_millis() as u64);
        info!(
            "Test Results: {} passed, {} failed ({} ms)",
            suite.passed, suite.failed, suite.duration_ms
        );
        Ok(suite)
    }

    /// Run one scenario, retrying failures up to the configured count.
    ///
    /// Each attempt gets a fresh fixture. Only setup errors (an unreadable
    /// storage seed) abort the suite; browser failures are recorded.
    pub async fn run_scenario(&self, scenario: &Scenario) -> Result<TestResult> {
        let start = Instant::now();
        let max_attempts = self.config.retries + 1;
        let mut last_error = None;
        let mut steps = 0;

        for attempt in 1..=max_attempts {
            let fixture = UiFixture::new(&self.config, scenario.name)?;
            (scenario.build)(&fixture);
            steps = fixture.page().steps().len();
            debug!("{}: attempt {} with {} steps", scenario.name, attempt, steps);

            match fixture.run().await {
                Ok(_) => {
                    return Ok(TestResult {
                        name: scenario.name.to_string(),
                        success: true,
                        attempts: attempt,
                        steps,
                        duration_ms: start.elapsed().as_millis() as u64,
                        error: None,
                    });
                }
                Err(e) => {
                    if attempt < max_attempts {
                        warn!("{}: attempt {} failed, retrying: {}", scenario.name, attempt, e);
                    }
                    last_error = Some(e.to_string());
                }
            }
        }

        Ok(TestResult {
            name: scenario.name.to_string(),
            success: false,
            attempts: max_attempts,
            steps,
            duration_ms: start.elapsed().as_millis() as u64,
            error: last_error,
        })
    }

    /// Write suite results to `test-results.json` in the output directory
    pub fn write_results(&self, results: &SuiteResult) -> Result<PathBuf> {
        write_results(&self.output_dir, results)
    }
}

pub fn write_results(dir: &Path, results: &SuiteResult) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let path = dir.join("test-results.json");
    std::fs::write(&path, serde_json::to_string_pretty(results)?)?;

    info!("Results written to: {}", path.display());
    Ok(path)
}

fn summarize(results: Vec<TestResult>, duration_ms: u64) -> SuiteResult {
    let passed = results.iter().filter(|r| r.success).count();
    SuiteResult {
        total: results.len(),
        passed,
        failed: results.len() - passed,
        duration_ms,
        results,
    }
}
