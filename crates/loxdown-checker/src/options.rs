//! Checker configuration.
//!
//! Loaded from JSON (the CLI's `--config` file) with camelCase keys; every
//! key is optional.
//!
//! ```json
//! { "maxDiagnostics": 50, "implicitAny": false }
//! ```

use loxdown_common::limits::{DEFAULT_MAX_DIAGNOSTICS, MAX_EXPR_CHECK_DEPTH};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckerOptions {
    /// Diagnostics past this count are dropped.
    pub max_diagnostics: usize,
    /// Expression nesting depth at which checking gives up on a subtree.
    pub max_check_depth: u32,
    /// Type unannotated parameters as `Any` silently. When false each one is
    /// reported.
    pub implicit_any: bool,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        Self {
            max_diagnostics: DEFAULT_MAX_DIAGNOSTICS,
            max_check_depth: MAX_EXPR_CHECK_DEPTH,
            implicit_any: true,
        }
    }
}

impl CheckerOptions {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
#[path = "../tests/options_tests.rs"]
mod tests;
