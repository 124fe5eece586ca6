//! Behaviour shared by every page object

use std::time::Duration;

use crate::locator::Locator;
use crate::playwright::{LoadState, Page, WaitState};

pub trait BasePage {
    fn page(&self) -> &Page;

    /// Path relative to the configured base URL
    fn url(&self) -> &'static str;

    /// The site renders client-side, so DOM content is not enough to
    /// interact with; wait for the full load as well.
    fn navigate(&self) {
        self.page().goto(self.url(), LoadState::DomContentLoaded);
        self.page().wait_for_load_state(LoadState::Load);
    }

    fn expect_title(&self, pattern: &str) {
        self.page().expect_title(pattern);
    }

    fn wait_for_element(&self, locator: &Locator, timeout: Duration) {
        self.page().wait_for(locator, WaitState::Visible, timeout);
    }

    fn click_and_wait_for_navigation(&self, locator: &Locator) {
        self.page().all(
            &format!("navigate-via:{}", locator),
            [
                Page::wait_for_load_state_expr(LoadState::DomContentLoaded),
                Page::click_expr(locator),
            ],
        );
    }
}
