//! Checker state and statement checking.
//!
//! `CheckerState` is split across modules by concern:
//! - statements, functions and control flow live here
//! - expressions in `expr`, calls in `call_checker`
//! - classes in `class_checker`, annotations in `type_resolution`
//! - diagnostics in `error_reporter`

use crate::ast::{Expr, FunctionDecl, Parameter, Program, Stmt};
use crate::context::{CheckerContext, FunctionContext};
use crate::options::CheckerOptions;
use loxdown_common::Diagnostic;
use loxdown_common::diagnostics::diagnostic_codes;
use loxdown_solver::{GenericParam, GuardNarrowing, Name, Type, TypeStore};
use smallvec::SmallVec;
use tracing::{Level, debug, info, span, trace};

pub struct CheckerState<'a> {
    pub ctx: CheckerContext<'a>,
}

/// A function's resolved signature, kept so the body can be checked against
/// it after the name is bound.
#[derive(Clone, Debug)]
pub(crate) struct FunctionSignature {
    pub ty: Type,
    pub generic_params: Vec<GenericParam>,
    pub param_types: Vec<Type>,
    /// The annotated return type, if any.
    pub declared_return: Option<Type>,
}

/// Variable overlays for the two branches of a guarded condition.
#[derive(Debug, Default)]
struct BranchNarrowing {
    then_vars: SmallVec<[(Name, Type); 2]>,
    else_vars: SmallVec<[(Name, Type); 2]>,
}

impl<'a> CheckerState<'a> {
    pub fn new(store: &'a TypeStore, options: CheckerOptions) -> Self {
        Self {
            ctx: CheckerContext::new(store, options),
        }
    }

    pub fn check_program(&mut self, program: &Program) {
        let _span = span!(
            Level::INFO,
            "check_program",
            statements = program.statements.len()
        )
        .entered();
        for stmt in &program.statements {
            self.check_stmt(stmt);
        }
        info!(
            diagnostics = self.ctx.diagnostics.len(),
            classes = self.ctx.store.class_count(),
            "check complete"
        );
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.ctx.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.ctx.diagnostics
    }

    /// The type `name` has in the outermost scope after checking.
    pub fn global_type(&self, name: &str) -> Option<&Type> {
        self.ctx.scopes.lookup_value(name)
    }

    pub fn display_type(&self, ty: &Type) -> String {
        self.format_type(ty)
    }

    pub(crate) fn check_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expression { expression, .. } | Stmt::Print { expression, .. } => {
                self.check_expr(expression);
            }
            Stmt::Var {
                name,
                type_annotation,
                initializer,
                ..
            } => {
                let declared = type_annotation.as_ref().map(|ty| self.resolve_type(ty));
                let ty = match (declared, initializer) {
                    (Some(declared), Some(init)) => {
                        let init_ty = self.check_expr(init);
                        self.check_assignable(init.span(), &init_ty, &declared);
                        declared
                    }
                    (Some(declared), None) => declared,
                    (None, Some(init)) => self.check_expr(init),
                    (None, None) => Type::Any,
                };
                trace!(name = %name.name, "declare variable");
                self.ctx.scopes.declare_value(&name.name, ty);
            }
            Stmt::Block { statements, .. } => {
                self.ctx.scopes.push();
                for stmt in statements {
                    self.check_stmt(stmt);
                }
                self.ctx.scopes.pop();
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => self.check_if(condition, then_branch, else_branch.as_deref()),
            Stmt::While {
                condition, body, ..
            } => {
                self.check_expr(condition);
                self.ctx.scopes.push();
                self.check_stmt(body);
                self.ctx.scopes.pop();
            }
            Stmt::Function(decl) => {
                let signature = self.resolve_signature(decl);
                // Bound before the body so recursive calls resolve.
                self.ctx
                    .scopes
                    .declare_value(&decl.name.name, signature.ty.clone());
                self.check_function_body(decl, &signature);
            }
            Stmt::Return { value, span } => self.check_return(value.as_ref(), *span),
            Stmt::Class(class) => self.check_class(class),
            Stmt::TypeAlias {
                name,
                generic_params,
                aliased,
                ..
            } => self.declare_type_alias(name, generic_params, aliased),
        }
    }

    fn check_if(&mut self, condition: &Expr, then_branch: &Stmt, else_branch: Option<&Stmt>) {
        let narrowing = self.check_condition(condition);

        self.ctx.scopes.push();
        self.apply_narrowing(&narrowing.then_vars);
        self.check_stmt(then_branch);
        self.ctx.scopes.pop();

        if let Some(else_branch) = else_branch {
            self.ctx.scopes.push();
            self.apply_narrowing(&narrowing.else_vars);
            self.check_stmt(else_branch);
            self.ctx.scopes.pop();
        }

        // Code after the `if` only runs through the branch that falls through.
        if then_branch.always_returns() {
            self.apply_narrowing(&narrowing.else_vars);
        } else if else_branch.is_some_and(Stmt::always_returns) {
            self.apply_narrowing(&narrowing.then_vars);
        }
    }

    /// Check a condition, collecting variable narrowing when it is a call to
    /// a guard whose guarded arguments are plain variables.
    fn check_condition(&mut self, condition: &Expr) -> BranchNarrowing {
        let (callee, generic_args, args, span) = match condition {
            Expr::Call {
                callee,
                generic_args,
                args,
                span,
            } => (callee, generic_args, args, *span),
            Expr::Grouping { expression, .. } => return self.check_condition(expression),
            _ => {
                self.check_expr(condition);
                return BranchNarrowing::default();
            }
        };

        let outcome = self.check_call(callee, generic_args, args, span);
        let Some(guard) = outcome.narrowing else {
            return BranchNarrowing::default();
        };
        narrowing_for_args(&guard, args)
    }

    fn apply_narrowing(&mut self, vars: &[(Name, Type)]) {
        for (name, ty) in vars {
            trace!(name = %name, ty = %self.ctx.store.display(ty), "narrow");
            self.ctx.scopes.narrow(name, ty.clone());
        }
    }

    fn check_return(&mut self, value: Option<&Expr>, span: loxdown_common::Span) {
        let value_ty = match value {
            Some(value) => self.check_expr(value),
            None => Type::nil(),
        };
        let Some(function) = self.ctx.functions.last() else {
            self.error_at(span, diagnostic_codes::RETURN_OUTSIDE_FUNCTION, &[]);
            return;
        };
        let Some(expected) = function.expected_return.clone() else {
            return;
        };
        if !self.ctx.store.is_compatible(&value_ty, &expected) {
            let actual = self.format_type(&value_ty);
            let declared = self.format_type(&expected);
            self.error_at(
                value.map_or(span, Expr::span),
                diagnostic_codes::INCOMPATIBLE_RETURN,
                &[&actual, &declared],
            );
        }
    }

    // =========================================================================
    // Functions
    // =========================================================================

    /// Resolve a function's signature without checking its body.
    ///
    /// Unannotated parameters are `Any`. Without a return annotation the
    /// function returns `Any` when some `return` carries a value and nothing
    /// otherwise.
    pub(crate) fn resolve_signature(&mut self, decl: &FunctionDecl) -> FunctionSignature {
        let generic_params = self.fresh_generic_params(&decl.generic_params);
        self.with_generic_scope(&generic_params, |this| {
            let param_types: Vec<Type> = decl
                .params
                .iter()
                .map(|param| this.resolve_param(param))
                .collect();
            let declared_return = decl.return_type.as_ref().map(|ty| this.resolve_type(ty));
            let returns = match &declared_return {
                Some(ty) => Some(ty.clone()),
                None => contains_value_return(&decl.body).then_some(Type::Any),
            };

            let callable = Type::callable(param_types.clone(), returns);
            let ty = if generic_params.is_empty() {
                callable
            } else {
                Type::generic(generic_params.clone(), callable)
            };
            debug!(
                name = %decl.name.name,
                ty = %this.ctx.store.display(&ty),
                "resolved signature"
            );
            FunctionSignature {
                ty,
                generic_params: generic_params.clone(),
                param_types,
                declared_return,
            }
        })
    }

    fn resolve_param(&mut self, param: &Parameter) -> Type {
        match &param.type_annotation {
            Some(annotation) => self.resolve_type(annotation),
            None => {
                if !self.ctx.options.implicit_any {
                    self.error_at(
                        param.name.span,
                        diagnostic_codes::IMPLICIT_ANY_PARAMETER,
                        &[&param.name.name],
                    );
                }
                Type::Any
            }
        }
    }

    pub(crate) fn check_function_body(&mut self, decl: &FunctionDecl, signature: &FunctionSignature) {
        let _span = span!(Level::DEBUG, "check_function", name = %decl.name.name).entered();
        self.with_generic_scope(&signature.generic_params, |this| {
            for (param, ty) in decl.params.iter().zip(&signature.param_types) {
                this.ctx.scopes.declare_value(&param.name.name, ty.clone());
            }
            this.ctx.functions.push(FunctionContext {
                expected_return: signature.declared_return.clone(),
            });
            for stmt in &decl.body {
                this.check_stmt(stmt);
            }
            this.ctx.functions.pop();
        });
    }
}

/// Map guard argument indices to the variables passed at those positions.
fn narrowing_for_args(guard: &GuardNarrowing, args: &[Expr]) -> BranchNarrowing {
    let collect = |types: &rustc_hash::FxHashMap<usize, Type>| {
        let mut vars: SmallVec<[(Name, Type); 2]> = types
            .iter()
            .filter_map(|(&index, ty)| {
                let name = args.get(index)?.as_variable()?;
                Some((Name::from(name.name.as_str()), ty.clone()))
            })
            .collect();
        vars.sort_by(|a, b| a.0.cmp(&b.0));
        vars
    };
    BranchNarrowing {
        then_vars: collect(&guard.then_types),
        else_vars: collect(&guard.else_types),
    }
}

/// Whether any `return` in `body` (outside nested declarations) carries a
/// value.
fn contains_value_return(body: &[Stmt]) -> bool {
    body.iter().any(|stmt| match stmt {
        Stmt::Return { value, .. } => value.is_some(),
        Stmt::Block { statements, .. } => contains_value_return(statements),
        Stmt::If {
            then_branch,
            else_branch,
            ..
        } => {
            contains_value_return(std::slice::from_ref(then_branch.as_ref()))
                || else_branch
                    .as_deref()
                    .is_some_and(|stmt| contains_value_return(std::slice::from_ref(stmt)))
        }
        Stmt::While { body, .. } => contains_value_return(std::slice::from_ref(body.as_ref())),
        _ => false,
    })
}

#[cfg(test)]
#[path = "../tests/state_tests.rs"]
mod tests;
