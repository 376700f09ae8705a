//! Resolving type annotations to solver types.

use crate::ast::{Identifier, TypeExpr};
use crate::scope::TypeBinding;
use crate::state::CheckerState;
use loxdown_common::Span;
use loxdown_common::diagnostics::diagnostic_codes;
use loxdown_solver::{ClassId, FullBindings, GenericParam, Type};
use tracing::trace;

impl CheckerState<'_> {
    pub(crate) fn resolve_type(&mut self, expr: &TypeExpr) -> Type {
        match expr {
            TypeExpr::Named {
                name,
                generic_args,
                span,
            } => self.resolve_named_type(name, generic_args, *span),
            TypeExpr::Union { left, right, .. } => {
                let left = self.resolve_type(left);
                let right = self.resolve_type(right);
                self.ctx.store.union(&left, &right)
            }
            TypeExpr::Function {
                generic_params,
                params,
                return_type,
                ..
            } => {
                let generic_params = self.fresh_generic_params(generic_params);
                self.with_generic_scope(&generic_params, |this| {
                    let params = params.iter().map(|param| this.resolve_type(param)).collect();
                    let returns = return_type.as_ref().map(|ty| this.resolve_type(ty));
                    let callable = Type::callable(params, returns);
                    if generic_params.is_empty() {
                        callable
                    } else {
                        Type::generic(generic_params.clone(), callable)
                    }
                })
            }
        }
    }

    fn resolve_named_type(
        &mut self,
        name: &Identifier,
        generic_args: &[TypeExpr],
        span: Span,
    ) -> Type {
        let binding = match name.name.as_str() {
            "Any" => None,
            "nil" => Some(TypeBinding::Class(ClassId::NIL)),
            other => self.ctx.scopes.lookup_type(other).cloned(),
        };
        let args: Vec<Type> = generic_args
            .iter()
            .map(|arg| self.resolve_type(arg))
            .collect();

        match binding {
            None if name.name == "Any" => {
                if args.is_empty() {
                    Type::Any
                } else {
                    self.report(span, diagnostic_codes::TYPE_NOT_GENERIC, &["Any"])
                }
            }
            Some(TypeBinding::Class(class)) => match self.apply_generic_args(class, &args, span) {
                Some(class) => Type::Instance(class),
                None => Type::PreviousError,
            },
            Some(TypeBinding::Param(param)) => {
                if args.is_empty() {
                    Type::GenericParam(param)
                } else {
                    self.report(span, diagnostic_codes::TYPE_NOT_GENERIC, &[&name.name])
                }
            }
            Some(TypeBinding::Alias { params, aliased }) => {
                if params.is_empty() && !args.is_empty() {
                    return self.report(span, diagnostic_codes::TYPE_NOT_GENERIC, &[&name.name]);
                }
                match FullBindings::from_args(&params, &args) {
                    Some(bindings) => self.ctx.store.substitute(&aliased, &bindings),
                    None => self.report_generic_arity(span, params.len(), args.len()),
                }
            }
            None => {
                let code = if self.ctx.scopes.lookup_value(&name.name).is_some() {
                    diagnostic_codes::NOT_A_TYPE
                } else {
                    diagnostic_codes::UNDEFINED_TYPE
                };
                self.report(name.span, code, &[&name.name])
            }
        }
    }

    /// Apply explicit generic arguments to a declared class, reporting
    /// user-facing arity problems. `None` after a reported error.
    pub(crate) fn apply_generic_args(
        &mut self,
        class: ClassId,
        args: &[Type],
        span: Span,
    ) -> Option<ClassId> {
        let record = self.ctx.store.class(class);
        let expected = if record.is_generic_root() {
            record.generic_params().count()
        } else {
            0
        };
        if expected == 0 && args.is_empty() {
            return Some(class);
        }
        if expected == 0 {
            let name = self.format_type(&Type::Instance(class));
            self.report(span, diagnostic_codes::TYPE_NOT_GENERIC, &[&name]);
            return None;
        }
        if expected != args.len() {
            self.report_generic_arity(span, expected, args.len());
            return None;
        }
        trace!(class = %record.name, args = args.len(), "applying generic arguments");
        match self.ctx.store.instantiate_with_args(class, args) {
            Ok(instantiated) => Some(instantiated),
            Err(err) => {
                self.report_solver_error(span, &err);
                None
            }
        }
    }

    pub(crate) fn report_generic_arity(&mut self, span: Span, expected: usize, found: usize) -> Type {
        let expected = expected.to_string();
        let found = found.to_string();
        self.report(
            span,
            diagnostic_codes::GENERIC_ARGUMENT_COUNT_MISMATCH,
            &[&expected, &found],
        )
    }

    /// Allocate solver parameters for declared generic parameter names.
    pub(crate) fn fresh_generic_params(&mut self, names: &[Identifier]) -> Vec<GenericParam> {
        names
            .iter()
            .map(|name| self.ctx.store.fresh_generic_param(name.name.as_str()))
            .collect()
    }

    /// Run `f` in a new frame where `params` are visible as type names.
    pub(crate) fn with_generic_scope<R>(
        &mut self,
        params: &[GenericParam],
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        self.ctx.scopes.push();
        for param in params {
            self.ctx
                .scopes
                .declare_type(&param.name, TypeBinding::Param(param.clone()));
        }
        let result = f(self);
        self.ctx.scopes.pop();
        result
    }

    /// `type Name[T] = ...;`
    pub(crate) fn declare_type_alias(
        &mut self,
        name: &Identifier,
        generic_params: &[Identifier],
        aliased: &TypeExpr,
    ) {
        let params = self.fresh_generic_params(generic_params);
        let aliased = self.with_generic_scope(&params, |this| this.resolve_type(aliased));
        self.ctx
            .scopes
            .declare_type(&name.name, TypeBinding::Alias { params, aliased });
    }
}

#[cfg(test)]
#[path = "../tests/type_resolution_tests.rs"]
mod tests;
