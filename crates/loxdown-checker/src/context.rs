//! Shared state threaded through a checking pass.

use crate::builtins::Builtins;
use crate::options::CheckerOptions;
use crate::scope::{Scopes, TypeBinding};
use loxdown_common::Diagnostic;
use loxdown_solver::{ClassId, Type, TypeStore};

/// The function body currently being checked.
#[derive(Clone, Debug)]
pub struct FunctionContext {
    /// What `return` values must be compatible with. `None` for an
    /// unannotated function whose returns are not checked.
    pub expected_return: Option<Type>,
}

/// The class body currently being checked.
#[derive(Clone, Copy, Debug)]
pub struct ClassContext {
    pub class: ClassId,
    pub superclass: Option<ClassId>,
}

pub struct CheckerContext<'a> {
    pub store: &'a TypeStore,
    pub builtins: Builtins,
    pub options: CheckerOptions,
    pub diagnostics: Vec<Diagnostic>,
    pub scopes: Scopes,
    pub functions: Vec<FunctionContext>,
    pub classes: Vec<ClassContext>,
    /// Current expression nesting depth.
    pub depth: u32,
}

impl<'a> CheckerContext<'a> {
    /// Declare the builtins into `store` and populate the global frame.
    pub fn new(store: &'a TypeStore, options: CheckerOptions) -> Self {
        let builtins = Builtins::declare(store);
        let mut scopes = Scopes::new();
        for (name, class) in builtins.classes() {
            scopes.declare_type(name, TypeBinding::Class(class));
            scopes.declare_value(name, Type::Class(class));
        }
        for (name, ty) in builtins.natives(store) {
            scopes.declare_value(name, ty);
        }

        Self {
            store,
            builtins,
            options,
            diagnostics: Vec::new(),
            scopes,
            functions: Vec::new(),
            classes: Vec::new(),
            depth: 0,
        }
    }
}
