//! Static type solver for loxdown
//!
//! This crate is the type system core. It knows nothing about syntax: the
//! checker declares classes, builds types and asks questions.
//!
//! - **`TypeStore`**: arena of class records addressed by `ClassId`, so
//!   self-referential generic classes never form ownership cycles
//! - **Unification**: one compatibility relation with generic binding
//! - **Instantiation**: lazily substituted, interned generic classes
//! - **Set algebra**: union / intersection / complement for narrowing
//!
//! Key properties:
//! - Nominal classes, covariant generic arguments
//! - `Any` and the error marker are compatible in both directions
//! - Union members are pairwise non-redundant
mod bindings;
mod class_hierarchy;
mod class_type;
mod error;
mod format;
mod instantiate;
mod narrowing;
mod set_ops;
mod store;
pub mod types;
mod unify;

pub use bindings::{BindingsSnapshot, FullBindings, GenericBindings};
pub use class_hierarchy::Superclasses;
pub use class_type::{ClassDecl, ClassType, MemberInit, MemberMap, Members};
pub use error::{InferenceError, SolverError};
pub use format::{TypeDisplay, TypeFormatter};
pub use narrowing::GuardNarrowing;
pub use store::TypeStore;
pub use types::{
    CallableType, ClassId, GenericParam, GenericParamId, GenericType, Name, NarrowingMap,
    NarrowingProducer, Type, UnionType,
};

#[cfg(test)]
#[path = "../tests/fixtures.rs"]
mod fixtures;
