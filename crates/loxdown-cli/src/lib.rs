//! Command-line front-end: reads a JSON syntax tree, checks it and renders
//! the diagnostics.

pub mod args;
pub mod driver;
pub mod reporter;
