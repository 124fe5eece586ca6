//! Game search box

use crate::locator::Locator;
use crate::playwright::Page;

/// URL fragment of the search backend call
pub const SEARCH_RESPONSE_PATTERN: &str = "games-search";

pub struct SearchComponent {
    page: Page,
    pub container: Locator,
    pub search_input: Locator,
    pub search_results: Locator,
}

impl SearchComponent {
    pub fn new(page: Page, container: Locator) -> Self {
        Self {
            search_input: container.locator("input"),
            search_results: page.locator(r#"[role="presentation"]"#),
            container,
            page,
        }
    }

    /// Focus the box, clear any previous query and type `query`.
    ///
    /// The response wait is armed together with the typing so a fast
    /// debounce cannot answer before anyone is listening.
    pub fn search(&self, query: &str) {
        self.page.click(&self.search_input);
        self.page.fill(&self.search_input, "");
        self.page.all(
            &format!("search:{}", query),
            [
                Page::wait_for_response_expr(SEARCH_RESPONSE_PATTERN),
                Page::keyboard_type_expr(query),
            ],
        );
    }
}
