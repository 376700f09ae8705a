use colored::Colorize;
use loxdown_common::{Diagnostic, DiagnosticCategory, Span};

/// Renders diagnostics for a terminal.
pub struct Reporter {
    color: bool,
    file: String,
    source: Option<String>,
}

impl Reporter {
    pub fn new(color: bool, file: impl Into<String>) -> Self {
        Self {
            color,
            file: file.into(),
            source: None,
        }
    }

    /// Attach the original source text so each diagnostic shows its line.
    pub fn with_source(mut self, source: String) -> Self {
        self.source = Some(source);
        self
    }

    pub fn render(&self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for (index, diagnostic) in diagnostics.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&self.format_diagnostic(diagnostic));
        }
        out
    }

    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let mut output = String::new();
        output.push_str(&self.format_location(diagnostic.span));
        output.push_str(" - ");
        output.push_str(&self.format_category(diagnostic.category));
        output.push(' ');
        output.push_str(&self.format_code(diagnostic));
        output.push_str(": ");
        output.push_str(&diagnostic.message_text);
        if let Some(snippet) = self.format_snippet(diagnostic.span) {
            output.push_str(&snippet);
        }
        output
    }

    /// `Found 2 errors.`
    pub fn summary(&self, diagnostics: &[Diagnostic]) -> String {
        match diagnostics.len() {
            0 => "No errors found.".to_string(),
            1 => "Found 1 error.".to_string(),
            n => format!("Found {n} errors."),
        }
    }

    fn format_location(&self, span: Span) -> String {
        if span.is_dummy() {
            return self.file.clone();
        }
        format!("{}:{}:{}", self.file, span.line, span.column)
    }

    /// The source line with the span underlined:
    ///
    /// ```text
    ///     3   var n: Number = "three";
    ///                         ~~~~~~~
    /// ```
    fn format_snippet(&self, span: Span) -> Option<String> {
        if span.is_dummy() {
            return None;
        }
        let source = self.source.as_ref()?;
        let line_text = source.lines().nth(span.line as usize - 1)?;

        let start = span.column.saturating_sub(1) as usize;
        let width = span.length.max(1) as usize;
        let underline = format!("{}{}", " ".repeat(start), "~".repeat(width));
        let underline = if self.color {
            underline.red().to_string()
        } else {
            underline
        };
        Some(format!(
            "\n  {:>3}   {}\n        {}",
            span.line, line_text, underline
        ))
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = category.as_str();
        if !self.color {
            return label.to_string();
        }
        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
            DiagnosticCategory::Message => label.cyan().bold().to_string(),
        }
    }

    fn format_code(&self, diagnostic: &Diagnostic) -> String {
        let label = diagnostic.code_string();
        if self.color {
            label.bright_blue().to_string()
        } else {
            label
        }
    }
}

#[cfg(test)]
#[path = "../tests/reporter_tests.rs"]
mod tests;
