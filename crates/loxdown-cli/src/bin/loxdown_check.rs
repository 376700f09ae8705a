#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;

use loxdown_checker::tracing_config::init_tracing;
use loxdown_cli::args::{CliArgs, OutputFormat};
use loxdown_cli::driver;
use loxdown_cli::reporter::Reporter;

const EXIT_SUCCESS: i32 = 0;
const EXIT_DIAGNOSTICS: i32 = 1;

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.log_format);

    let diagnostics = driver::run(&args)?;

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&diagnostics)
                .context("failed to serialize diagnostics")?;
            println!("{json}");
        }
        OutputFormat::Text => {
            let color = args
                .pretty
                .unwrap_or_else(|| std::io::stdout().is_terminal());
            let mut reporter = Reporter::new(color, args.input.display().to_string());
            if let Some(path) = &args.source {
                let source = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read source {}", path.display()))?;
                reporter = reporter.with_source(source);
            }
            if !diagnostics.is_empty() {
                println!("{}\n", reporter.render(&diagnostics));
            }
            eprintln!("{}", reporter.summary(&diagnostics));
        }
    }

    std::process::exit(if diagnostics.is_empty() {
        EXIT_SUCCESS
    } else {
        EXIT_DIAGNOSTICS
    });
}
