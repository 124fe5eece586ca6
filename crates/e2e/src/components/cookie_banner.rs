//! Geo-restriction modal and cookie consent banner
//!
//! Neither overlay is guaranteed to appear, and both come from third-party
//! markup that changes without notice. Dismissal is a pair of best-effort
//! chains; "not present" is a normal outcome.

use std::time::Duration;

use crate::fallback::FallbackChain;
use crate::locator::Locator;
use crate::playwright::Page;

/// Overlay containers removed when clicking through them fails
const MODAL_SELECTORS: [&str; 2] = [".MuiModal-root", ".MuiBackdrop-root"];

pub struct CookieBannerComponent {
    page: Page,
    pub geo_modal_button: Locator,
    pub accept_button: Locator,
}

impl CookieBannerComponent {
    pub fn new(page: Page) -> Self {
        Self {
            geo_modal_button: page.get_by_text("Got it").first(),
            accept_button: page
                .locator(r#"button:has-text("Accept"), [class*="cookie"] button"#)
                .first(),
            page,
        }
    }

    /// The backdrop intercepts pointer events, so the first attempt clicks
    /// from inside the page. React may ignore that click, so it only counts
    /// once the modal has left the DOM; otherwise the overlay nodes are
    /// removed.
    pub fn geo_modal_chain(&self) -> FallbackChain {
        let removal = MODAL_SELECTORS
            .iter()
            .map(|sel| format!("document.querySelectorAll('{}').forEach((el) => el.remove());", sel))
            .collect::<Vec<_>>()
            .join(" ");

        FallbackChain::new("geo-modal")
            .then(
                "in-page click",
                Duration::from_millis(2_000),
                format!(
                    "await {}.evaluate((el) => el.click(), undefined, {{ timeout }});\n            await {}.waitFor({{ state: 'detached', timeout }});",
                    self.geo_modal_button,
                    Locator::css(MODAL_SELECTORS[0]).first()
                ),
            )
            .then(
                "remove overlay",
                Duration::from_millis(1_000),
                format!("await page.evaluate(() => {{ {} }});", removal),
            )
    }

    pub fn consent_chain(&self) -> FallbackChain {
        FallbackChain::new("cookie-consent")
            .then(
                "click accept",
                Duration::from_millis(3_000),
                format!(
                    "await {btn}.waitFor({{ state: 'visible', timeout }});\n            await {btn}.click({{ timeout }});",
                    btn = self.accept_button
                ),
            )
            .then(
                "forced click",
                Duration::from_millis(1_000),
                format!("await {}.click({{ force: true, timeout }});", self.accept_button),
            )
            .then(
                "remove banner",
                Duration::from_millis(1_000),
                r#"await page.evaluate(() => { document.querySelectorAll('[class*="cookie"]').forEach((el) => el.remove()); });"#,
            )
    }

    pub fn dismiss_if_visible(&self) {
        self.page.best_effort(&self.geo_modal_chain());
        self.page.best_effort(&self.consent_chain());
    }
}
