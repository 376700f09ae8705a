//! Error reporting (`error_*` for emission, `report_*` for higher-level
//! wrappers).
//!
//! Every `report_*` helper returns the error marker so call sites can write
//! `return self.report_...(...)` and keep the failure from cascading.

use crate::state::CheckerState;
use loxdown_common::Diagnostic;
use loxdown_common::Span;
use loxdown_common::diagnostics::diagnostic_codes;
use loxdown_solver::{SolverError, Type};
use tracing::{debug, warn};

impl CheckerState<'_> {
    /// Emit a templated diagnostic.
    pub(crate) fn error_at(&mut self, span: Span, code: u32, args: &[&str]) {
        if self.ctx.diagnostics.len() >= self.ctx.options.max_diagnostics {
            debug!(code, "diagnostic limit reached, dropping");
            return;
        }
        let diagnostic = Diagnostic::from_code(span, code, args);
        debug!(
            code = %diagnostic.code_string(),
            span = %span,
            message = %diagnostic.message_text,
            "diagnostic"
        );
        self.ctx.diagnostics.push(diagnostic);
    }

    /// Emit a diagnostic and type the offending expression as the error
    /// marker.
    pub(crate) fn report(&mut self, span: Span, code: u32, args: &[&str]) -> Type {
        self.error_at(span, code, args);
        Type::PreviousError
    }

    pub(crate) fn report_incompatible(
        &mut self,
        span: Span,
        candidate: &Type,
        target: &Type,
    ) -> Type {
        let candidate = self.format_type(candidate);
        let target = self.format_type(target);
        self.report(
            span,
            diagnostic_codes::INCOMPATIBLE_TYPES,
            &[&candidate, &target],
        )
    }

    /// Check `candidate` against `target`, reporting a mismatch at `span`.
    /// Returns whether the types were compatible.
    pub(crate) fn check_assignable(&mut self, span: Span, candidate: &Type, target: &Type) -> bool {
        if self.ctx.store.is_compatible(candidate, target) {
            return true;
        }
        self.report_incompatible(span, candidate, target);
        false
    }

    /// An internal solver failure. The pass continues with the error marker.
    pub(crate) fn report_solver_error(&mut self, span: Span, err: &SolverError) -> Type {
        warn!(error = %err, span = %span, "internal solver error");
        let message = err.to_string();
        self.report(span, diagnostic_codes::INTERNAL_ERROR, &[&message])
    }

    pub(crate) fn format_type(&self, ty: &Type) -> String {
        self.ctx.store.format_type(ty)
    }
}
