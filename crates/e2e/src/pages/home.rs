//! Landing page

use crate::components::{CookieBannerComponent, FooterComponent, HeaderComponent, SearchComponent};
use crate::locator::Locator;
use crate::pages::BasePage;
use crate::playwright::Page;

pub struct HomePage {
    page: Page,
    pub header: HeaderComponent,
    pub search: SearchComponent,
    pub footer: FooterComponent,
    pub cookie_banner: CookieBannerComponent,

    /// Tiles linking into the in-house games section
    pub original_games: Locator,
    pub hero: Locator,
}

impl HomePage {
    pub fn new(page: Page) -> Self {
        Self {
            header: HeaderComponent::new(page.clone(), page.locator("header").first()),
            search: SearchComponent::new(page.clone(), page.get_by_test_id("searchInputFieldContainer")),
            footer: FooterComponent::new(page.locator("footer").first()),
            cookie_banner: CookieBannerComponent::new(page.clone()),
            original_games: page.locator(r#"a[href*="originals"]"#),
            hero: page
                .locator(r#"[class*="hero"], [class*="banner"], [class*="carousel"]"#)
                .first(),
            page,
        }
    }

    pub fn navigate_and_dismiss_cookies(&self) {
        self.navigate();
        self.cookie_banner.dismiss_if_visible();
    }

    /// Fails unless no modal backdrop is left to intercept clicks.
    pub fn expect_overlays_cleared(&self) {
        self.page.expect_hidden(&self.page.locator(".MuiBackdrop-root").first());
    }
}

impl BasePage for HomePage {
    fn page(&self) -> &Page {
        &self.page
    }

    fn url(&self) -> &'static str {
        "/"
    }
}
