//! Site footer

use crate::locator::Locator;

pub struct FooterComponent {
    pub container: Locator,
    pub links: Locator,
}

impl FooterComponent {
    pub fn new(container: Locator) -> Self {
        Self {
            links: container.locator("a"),
            container,
        }
    }
}
