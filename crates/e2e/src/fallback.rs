//! Best-effort sequential fallback
//!
//! An ordered list of independent strategies for reaching the same end
//! state. Each strategy gets a short timeout; a failing strategy is not an
//! error, and the chain stops at the first one that completes. A chain in
//! which nothing applies is a normal outcome (the element was never there).

use std::time::Duration;

use crate::locator::js_str;

#[derive(Debug, Clone)]
pub struct Strategy {
    pub name: String,
    pub timeout: Duration,

    /// Statements run with `timeout` (milliseconds) in scope; throwing
    /// means "did not apply"
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct FallbackChain {
    pub name: String,
    pub strategies: Vec<Strategy>,
}

impl FallbackChain {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            strategies: Vec::new(),
        }
    }

    /// Append a strategy; attempted only if every earlier one failed.
    pub fn then(mut self, name: impl Into<String>, timeout: Duration, body: impl Into<String>) -> Self {
        self.strategies.push(Strategy {
            name: name.into(),
            timeout,
            body: body.into(),
        });
        self
    }

    /// Render as one script statement.
    ///
    /// Reports the strategy that applied (or none) on stdout as a
    /// `[fallback]` line.
    pub fn render(&self) -> String {
        let chain = js_str(&self.name);
        let mut js = String::from("{\n      let settled = null;\n");

        for strategy in &self.strategies {
            js.push_str(&format!(
                r#"      if (settled === null) {{
        try {{
          await (async (timeout) => {{
            {body}
          }})({timeout});
          settled = {name};
        }} catch (_) {{}}
      }}
"#,
                body = strategy.body,
                timeout = strategy.timeout.as_millis(),
                name = js_str(&strategy.name),
            ));
        }

        js.push_str(&format!(
            "      console.log('[fallback] ' + {chain} + ': ' + (settled === null ? 'nothing applied' : settled));\n    }}"
        ));
        js
    }
}
