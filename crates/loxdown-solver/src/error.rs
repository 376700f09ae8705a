//! Internal consistency failures.
//!
//! These never describe a mistake in the checked program. The checker turns
//! them into a single internal diagnostic and keeps going.

use crate::types::{GenericParam, Name};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SolverError {
    #[error("'{owner}' expects {expected} generic arguments but got {found}")]
    ArityMismatch {
        owner: Name,
        expected: usize,
        found: usize,
    },

    #[error("no binding for generic parameter '{param}' of class '{class}'")]
    MissingBinding { class: Name, param: Name },

    #[error("generic parameter '{param}' is not declared by class '{class}'")]
    ForeignParameter { class: Name, param: Name },

    #[error("class '{class}' is already instantiated with different arguments")]
    AlreadyInstantiated { class: Name },
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InferenceError {
    /// Parameters no argument constrained.
    #[error("unable to infer {}", param_names(.0))]
    Unresolved(Vec<GenericParam>),

    #[error(transparent)]
    Solver(#[from] SolverError),
}

fn param_names(params: &[GenericParam]) -> String {
    params
        .iter()
        .map(|param| format!("'{}'", param.name))
        .collect::<Vec<_>>()
        .join(", ")
}
