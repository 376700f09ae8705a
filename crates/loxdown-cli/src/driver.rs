//! Loading inputs and running one check.

use crate::args::CliArgs;
use anyhow::{Context, Result};
use loxdown_checker::CheckerOptions;
use loxdown_checker::ast::Program;
use loxdown_common::Diagnostic;
use std::path::Path;
use tracing::{debug, info};

/// Options from `--config`, then overridden by explicit flags.
pub fn load_options(args: &CliArgs) -> Result<CheckerOptions> {
    let mut options = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            CheckerOptions::from_json(&text)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => CheckerOptions::default(),
    };
    if args.no_implicit_any {
        options.implicit_any = false;
    }
    if let Some(max) = args.max_diagnostics {
        options.max_diagnostics = max;
    }
    debug!(?options, "checker options");
    Ok(options)
}

pub fn load_program(path: &Path) -> Result<Program> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("{} is not a valid syntax tree", path.display()))
}

/// Load and check the program named by `args`.
pub fn run(args: &CliArgs) -> Result<Vec<Diagnostic>> {
    let options = load_options(args)?;
    let program = load_program(&args.input)?;
    info!(
        input = %args.input.display(),
        statements = program.statements.len(),
        "checking"
    );
    Ok(loxdown_checker::check_program(&program, options))
}

#[cfg(test)]
#[path = "../tests/driver_tests.rs"]
mod tests;
