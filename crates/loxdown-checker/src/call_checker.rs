//! Call checking: resolving the callee to a concrete signature, then
//! checking arity and each argument.

use crate::ast::{Expr, TypeExpr};
use crate::state::CheckerState;
use loxdown_common::Span;
use loxdown_common::diagnostics::diagnostic_codes;
use loxdown_solver::{CallableType, ClassId, GenericType, GuardNarrowing, InferenceError, Type};
use std::sync::Arc;
use tracing::{Level, span, trace};

/// The result of checking a call.
#[derive(Debug)]
pub(crate) struct CallOutcome {
    pub ty: Type,
    /// Present when the callee is a guard and every argument checked.
    pub narrowing: Option<GuardNarrowing>,
}

impl CallOutcome {
    fn error() -> Self {
        Self {
            ty: Type::PreviousError,
            narrowing: None,
        }
    }
}

impl CheckerState<'_> {
    pub(crate) fn check_call(
        &mut self,
        callee: &Expr,
        generic_args: &[TypeExpr],
        args: &[Expr],
        span: Span,
    ) -> CallOutcome {
        let _span = span!(Level::TRACE, "check_call", args = args.len()).entered();
        let callee_ty = self.check_expr(callee);
        let arg_types: Vec<Type> = args.iter().map(|arg| self.check_expr(arg)).collect();
        let explicit: Vec<Type> = generic_args
            .iter()
            .map(|arg| self.resolve_type(arg))
            .collect();

        let Some(callable) = self.resolve_callee(&callee_ty, &explicit, &arg_types, span) else {
            return CallOutcome::error();
        };

        if callable.arity() != arg_types.len() {
            let expected = callable.arity().to_string();
            let got = arg_types.len().to_string();
            self.error_at(
                span,
                diagnostic_codes::ARGUMENT_COUNT_MISMATCH,
                &[&expected, &got],
            );
            return CallOutcome::error();
        }

        let mut compatible = true;
        for ((param, arg_ty), arg) in callable.params.iter().zip(&arg_types).zip(args) {
            compatible &= self.check_assignable(arg.span(), arg_ty, param);
        }
        if !compatible {
            return CallOutcome::error();
        }

        let narrowing = self.ctx.store.call_narrowing(&callee_ty, &arg_types);
        trace!(guard = narrowing.is_some(), "call checked");
        CallOutcome {
            ty: callable.return_type(),
            narrowing,
        }
    }

    /// The concrete signature being called. `None` once the failure has been
    /// reported, or silently for a callee that is already an error.
    fn resolve_callee(
        &mut self,
        callee: &Type,
        explicit: &[Type],
        arg_types: &[Type],
        span: Span,
    ) -> Option<Arc<CallableType>> {
        match callee {
            Type::PreviousError => None,
            Type::Any => Some(Arc::new(CallableType::new(
                vec![Type::Any; arg_types.len()],
                Some(Type::Any),
            ))),
            Type::Callable(callable) => {
                if !explicit.is_empty() {
                    let name = self.format_type(callee);
                    self.error_at(span, diagnostic_codes::TYPE_NOT_GENERIC, &[&name]);
                    return None;
                }
                Some(Arc::clone(callable))
            }
            Type::Generic(generic) => {
                let instantiated = self.instantiate_callee_template(generic, explicit, arg_types, span)?;
                match instantiated {
                    Type::Callable(callable) => Some(callable),
                    other => {
                        let name = self.format_type(&other);
                        self.error_at(span, diagnostic_codes::NOT_CALLABLE, &[&name]);
                        None
                    }
                }
            }
            Type::Class(class) => {
                let class = self.instantiate_callee_class(*class, explicit, arg_types, span)?;
                Some(Arc::new(self.ctx.store.constructor(class)))
            }
            Type::Instance(_) | Type::Union(_) | Type::GenericParam(_) => {
                let name = self.format_type(callee);
                self.error_at(span, diagnostic_codes::NOT_CALLABLE, &[&name]);
                None
            }
        }
    }

    fn instantiate_callee_template(
        &mut self,
        generic: &Arc<GenericType>,
        explicit: &[Type],
        arg_types: &[Type],
        span: Span,
    ) -> Option<Type> {
        if !explicit.is_empty() {
            if explicit.len() != generic.params.len() {
                self.report_generic_arity(span, generic.params.len(), explicit.len());
                return None;
            }
            return match self.ctx.store.instantiate_template(generic, explicit) {
                Ok(ty) => Some(ty),
                Err(err) => {
                    self.report_solver_error(span, &err);
                    None
                }
            };
        }

        // Inference only makes sense for a call with the right arity.
        if let Type::Callable(body) = &generic.body
            && body.arity() != arg_types.len()
        {
            let expected = body.arity().to_string();
            let got = arg_types.len().to_string();
            self.error_at(
                span,
                diagnostic_codes::ARGUMENT_COUNT_MISMATCH,
                &[&expected, &got],
            );
            return None;
        }
        let inferred = self.ctx.store.infer_template(generic, arg_types);
        self.accept_inference(inferred, span)
    }

    fn instantiate_callee_class(
        &mut self,
        class: ClassId,
        explicit: &[Type],
        arg_types: &[Type],
        span: Span,
    ) -> Option<ClassId> {
        if !explicit.is_empty() {
            return self.apply_generic_args(class, explicit, span);
        }
        let record = self.ctx.store.class(class);
        if !record.is_generic_root() || record.generic_params().next().is_none() {
            return Some(class);
        }

        let constructor = self.ctx.store.constructor(class);
        if constructor.arity() != arg_types.len() {
            let expected = constructor.arity().to_string();
            let got = arg_types.len().to_string();
            self.error_at(
                span,
                diagnostic_codes::ARGUMENT_COUNT_MISMATCH,
                &[&expected, &got],
            );
            return None;
        }
        let inferred = self.ctx.store.infer_class_generics(class, arg_types);
        self.accept_inference(inferred, span)
    }

    fn accept_inference<T>(&mut self, inferred: Result<T, InferenceError>, span: Span) -> Option<T> {
        match inferred {
            Ok(value) => Some(value),
            Err(InferenceError::Unresolved(params)) => {
                let name = params.first().map_or("?", |param| &*param.name);
                self.error_at(span, diagnostic_codes::CANNOT_INFER_GENERIC, &[name]);
                None
            }
            Err(InferenceError::Solver(err)) => {
                self.report_solver_error(span, &err);
                None
            }
        }
    }
}
