//! Sportsbook landing page

use crate::locator::Locator;
use crate::pages::BasePage;
use crate::playwright::Page;

pub struct SportsPage {
    page: Page,
    pub sport_categories: Locator,
    pub events_list: Locator,
    pub live_section: Locator,
}

impl SportsPage {
    pub fn new(page: Page) -> Self {
        Self {
            sport_categories: page
                .locator(r#"[class*="sport-nav"], [class*="sport-menu"], [class*="category"]"#),
            events_list: page.locator(r#"[class*="event"], [class*="match"], [class*="fixture"]"#),
            live_section: page.locator(r#"[class*="live"], [data-live], :text("live")"#),
            page,
        }
    }
}

impl BasePage for SportsPage {
    fn page(&self) -> &Page {
        &self.page
    }

    fn url(&self) -> &'static str {
        "/sports"
    }
}
