//! Common types and utilities for the loxdown type checker.
//!
//! This crate provides foundational types used across all loxdown crates:
//! - Source spans (`Span`)
//! - Diagnostics (`Diagnostic`, `DiagnosticCategory`, message templates)
//! - Checker limits and thresholds

// Span - Source location tracking (line/column)
pub mod span;
pub use span::Span;

// Diagnostics reported by the checker
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticMessage, format_message};

// Centralized limits and thresholds
pub mod limits;
