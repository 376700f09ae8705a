use clap::{Parser, ValueEnum};
use loxdown_checker::tracing_config::LogFormat;
use std::path::PathBuf;

/// CLI arguments for the loxdown-check binary.
#[derive(Parser, Debug)]
#[command(
    name = "loxdown-check",
    version,
    about = "Type-check a loxdown program given as a JSON syntax tree"
)]
pub struct CliArgs {
    /// The program's syntax tree, as produced by the front-end.
    pub input: PathBuf,

    /// Original source text, used to print the offending line under each
    /// diagnostic.
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Checker options file (JSON, camelCase keys).
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// How diagnostics are written to stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Report parameters without annotations.
    #[arg(long = "noImplicitAny", alias = "no-implicit-any")]
    pub no_implicit_any: bool,

    /// Stop collecting diagnostics after this many.
    #[arg(long = "maxDiagnostics", alias = "max-diagnostics")]
    pub max_diagnostics: Option<usize>,

    /// Force colored output on or off. Defaults to on for terminals.
    #[arg(long)]
    pub pretty: Option<bool>,

    /// Tracing output format when LOXDOWN_LOG is set (text, tree, json).
    #[arg(long = "logFormat", alias = "log-format")]
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[cfg(test)]
#[path = "../tests/args_tests.rs"]
mod tests;
