//! Centralized limits and thresholds for the type checker.
//!
//! The solver itself has no depth limits: recursive generic signatures are
//! legal input and terminate through the self-binding short-circuit in
//! unification. The limits here guard the driving checker, whose recursion
//! follows the nesting of the syntax tree.

/// Maximum depth for expression type checking.
///
/// Each nested expression adds a frame to the call stack; past this depth
/// the checker reports the expression instead of overflowing the stack.
///
/// ```text
/// var x = ((((((((((((((((((1 + 2) + 3) + 4) /* ... 500 levels ... */)))));
/// f(f(f(f(f(f(f(f(f(f(f(f(/* ... */))))))))))));
/// ```
pub const MAX_EXPR_CHECK_DEPTH: u32 = 500;

/// Default cap on the number of diagnostics collected in one checking pass.
///
/// Error containment already suppresses cascades; this bounds output for
/// pathological inputs.
pub const DEFAULT_MAX_DIAGNOSTICS: usize = 1000;
