//! Playwright locator expressions
//!
//! A `Locator` is the JavaScript expression that resolves an element set on
//! the current `page`. Arguments are embedded as JSON string literals, so
//! selectors and text never need manual quoting.

use std::fmt;

/// Quote `s` as a JavaScript string literal.
pub fn js_str(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    expr: String,
}

impl Locator {
    /// CSS or Playwright selector on the page
    pub fn css(selector: &str) -> Self {
        Self {
            expr: format!("page.locator({})", js_str(selector)),
        }
    }

    pub fn test_id(id: &str) -> Self {
        Self {
            expr: format!("page.getByTestId({})", js_str(id)),
        }
    }

    pub fn text(text: &str) -> Self {
        Self {
            expr: format!("page.getByText({})", js_str(text)),
        }
    }

    /// ARIA role, optionally narrowed by accessible name
    pub fn role(role: &str, name: Option<&str>) -> Self {
        let expr = match name {
            Some(name) => format!("page.getByRole({}, {{ name: {} }})", js_str(role), js_str(name)),
            None => format!("page.getByRole({})", js_str(role)),
        };
        Self { expr }
    }

    pub fn locator(&self, selector: &str) -> Self {
        self.chain(format!("locator({})", js_str(selector)))
    }

    pub fn get_by_test_id(&self, id: &str) -> Self {
        self.chain(format!("getByTestId({})", js_str(id)))
    }

    pub fn get_by_text(&self, text: &str) -> Self {
        self.chain(format!("getByText({})", js_str(text)))
    }

    pub fn get_by_role(&self, role: &str, name: Option<&str>) -> Self {
        let inner = Locator::role(role, name);
        self.chain(inner.expr.trim_start_matches("page.").to_string())
    }

    pub fn first(&self) -> Self {
        self.chain("first()".to_string())
    }

    pub fn nth(&self, index: usize) -> Self {
        self.chain(format!("nth({})", index))
    }

    /// Matches either locator
    pub fn or(&self, other: &Locator) -> Self {
        self.chain(format!("or({})", other.expr))
    }

    /// The JavaScript expression
    pub fn expr(&self) -> &str {
        &self.expr
    }

    fn chain(&self, call: String) -> Self {
        Self {
            expr: format!("{}.{}", self.expr, call),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expr)
    }
}
