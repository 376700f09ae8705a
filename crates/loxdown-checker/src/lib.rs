//! Type checker for loxdown
//!
//! Walks a syntax tree (see [`ast`]) and drives the solver:
//!
//! - declarations become solver classes and signatures
//! - expressions are typed bottom-up with error containment
//! - `if` conditions that call a guard narrow their variable arguments
//!
//! ```no_run
//! use loxdown_checker::{CheckerOptions, check_program};
//! # let program = loxdown_checker::ast::Program::default();
//! let diagnostics = check_program(&program, CheckerOptions::default());
//! ```

pub mod ast;
mod builtins;
mod call_checker;
mod class_checker;
pub mod context;
mod error_reporter;
mod expr;
pub mod options;
pub mod scope;
pub mod state;
pub mod tracing_config;
mod type_resolution;

pub use builtins::Builtins;
pub use options::CheckerOptions;
pub use state::CheckerState;

use ast::Program;
use loxdown_common::Diagnostic;
use loxdown_solver::TypeStore;

/// Check `program` in a fresh store and return its diagnostics in report
/// order.
pub fn check_program(program: &Program, options: CheckerOptions) -> Vec<Diagnostic> {
    let store = TypeStore::new();
    let mut checker = CheckerState::new(&store, options);
    checker.check_program(program);
    checker.into_diagnostics()
}
