//! Per-scenario UI context
//!
//! One fixture per scenario run: a fresh `Page` with its own recorded steps
//! and, when configured, the storage seed applied before the first load.
//! Generated scripts and seed files live in a temp dir owned by the run and
//! are removed whatever the outcome.

use tracing::debug;

use qa_common::{Result, UiConfig};

use crate::pages::{HomePage, SportsPage};
use crate::playwright::{Page, RunReport};
use crate::storage::StorageSeed;

pub struct UiFixture {
    page: Page,
}

impl UiFixture {
    /// Fixture for scenario `name`, seeded from `config.storage_state` if set
    pub fn new(config: &UiConfig, name: &str) -> Result<Self> {
        let seed = match &config.storage_state {
            Some(path) => {
                debug!("Loading storage seed from {}", path.display());
                Some(StorageSeed::from_file(path)?)
            }
            None => None,
        };
        Ok(Self {
            page: Page::new(name, config.clone(), seed),
        })
    }

    /// Replace the configured seed, keeping any steps already recorded
    pub fn with_seed(self, seed: StorageSeed) -> Self {
        let page = Page::new(self.page.name(), self.page.config().clone(), Some(seed));
        for step in self.page.steps() {
            page.record(step.label, step.code);
        }
        Self { page }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn home_page(&self) -> HomePage {
        HomePage::new(self.page.clone())
    }

    pub fn sports_page(&self) -> SportsPage {
        SportsPage::new(self.page.clone())
    }

    /// Execute everything recorded through this fixture's pages
    pub async fn run(&self) -> Result<RunReport> {
        self.page.run().await
    }
}
