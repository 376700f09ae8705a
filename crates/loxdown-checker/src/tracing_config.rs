//! Tracing setup for the checker binaries.
//!
//! Nothing is installed unless `LOXDOWN_LOG` (or `RUST_LOG`) is set, so a
//! normal run pays nothing. Output always goes to stderr; stdout carries
//! the diagnostics.
//!
//! ```bash
//! # Indented span tree, good for following one unification
//! LOXDOWN_LOG=loxdown_solver=trace LOXDOWN_LOG_FORMAT=tree loxdown-check prog.json
//!
//! # One JSON object per event
//! LOXDOWN_LOG=debug LOXDOWN_LOG_FORMAT=json loxdown-check prog.json
//! ```

use std::str::FromStr;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

pub const LOG_ENV: &str = "LOXDOWN_LOG";
pub const LOG_FORMAT_ENV: &str = "LOXDOWN_LOG_FORMAT";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    /// Hierarchical output via `tracing-tree`.
    Tree,
    /// Newline-delimited JSON.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "tree" => Ok(Self::Tree),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

impl LogFormat {
    /// From `LOXDOWN_LOG_FORMAT`; unknown or missing values mean text.
    pub fn from_env() -> Self {
        std::env::var(LOG_FORMAT_ENV)
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }
}

fn build_filter() -> EnvFilter {
    match std::env::var(LOG_ENV) {
        Ok(directives) => EnvFilter::builder().parse_lossy(directives),
        Err(_) => EnvFilter::from_default_env(),
    }
}

/// Install the global subscriber if logging was requested. A `format`
/// overrides `LOXDOWN_LOG_FORMAT`.
#[allow(clippy::print_stderr)]
pub fn init_tracing(format: Option<LogFormat>) {
    if std::env::var_os(LOG_ENV).is_none() && std::env::var_os("RUST_LOG").is_none() {
        return;
    }

    let filter = build_filter();
    let result = match format.unwrap_or_else(LogFormat::from_env) {
        LogFormat::Tree => {
            let tree = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_targets(true);
            Registry::default().with(filter).with(tree).try_init()
        }
        LogFormat::Json => {
            let json = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json).try_init()
        }
        LogFormat::Text => {
            let text = fmt::layer().with_writer(std::io::stderr);
            Registry::default().with(filter).with(text).try_init()
        }
    };
    if let Err(err) = result {
        eprintln!("tracing already initialised: {err}");
    }
}

#[cfg(test)]
#[path = "../tests/tracing_config_tests.rs"]
mod tests;
