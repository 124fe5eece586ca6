//! Site header: branding, auth buttons and main section links

use crate::locator::Locator;
use crate::playwright::Page;

pub struct HeaderComponent {
    page: Page,
    pub container: Locator,

    pub logo: Locator,
    pub sign_in_button: Locator,
    pub create_account_button: Locator,

    pub originals_link: Locator,
    pub casino_link: Locator,
    pub sports_link: Locator,
    pub support_link: Locator,
    pub rewards_link: Locator,
}

impl HeaderComponent {
    pub fn new(page: Page, container: Locator) -> Self {
        Self {
            logo: container.locator(r#"[href="/"]"#).first(),
            sign_in_button: container.get_by_test_id("signin-nav"),
            create_account_button: container.get_by_test_id("signup-nav"),
            originals_link: container.get_by_test_id("navLink-home"),
            casino_link: container.get_by_test_id("navLink-casino-link"),
            sports_link: container.get_by_test_id("navLink-sports-link"),
            support_link: container.get_by_test_id("navLink-support"),
            rewards_link: container.get_by_test_id("navLink-rewards"),
            container,
            page,
        }
    }

    /// The sign-in button doubles as the login entry point.
    pub fn login_button(&self) -> &Locator {
        &self.sign_in_button
    }

    pub fn navigate_to_sports(&self) {
        self.page.click(&self.sports_link);
    }

    pub fn navigate_to_casino(&self) {
        self.page.click(&self.casino_link);
    }
}
