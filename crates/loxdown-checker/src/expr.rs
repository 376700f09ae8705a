//! Expression checking.
//!
//! Every rule returns the expression's type. A rule that reports a
//! diagnostic returns the error marker, which every other rule accepts
//! silently, so one mistake produces one diagnostic.

use crate::ast::{BinaryOp, Expr, Identifier, LiteralValue, UnaryOp};
use crate::state::CheckerState;
use loxdown_common::Span;
use loxdown_common::diagnostics::diagnostic_codes;
use loxdown_solver::Type;
use tracing::trace;

impl CheckerState<'_> {
    /// Check an expression, giving up on subtrees nested past the configured
    /// depth.
    pub(crate) fn check_expr(&mut self, expr: &Expr) -> Type {
        if self.ctx.depth >= self.ctx.options.max_check_depth {
            return self.report(expr.span(), diagnostic_codes::CHECK_DEPTH_EXCEEDED, &[]);
        }
        self.ctx.depth += 1;
        let ty = self.check_expr_inner(expr);
        self.ctx.depth -= 1;
        ty
    }

    fn check_expr_inner(&mut self, expr: &Expr) -> Type {
        match expr {
            Expr::Literal { value, .. } => self.literal_type(value),
            Expr::Variable { name } => match self.ctx.scopes.lookup_value(&name.name) {
                Some(ty) => ty.clone(),
                None => self.report(name.span, diagnostic_codes::UNDEFINED_VARIABLE, &[&name.name]),
            },
            Expr::Assign { name, value, .. } => self.check_assign(name, value),
            Expr::Binary {
                left,
                operator,
                right,
                span,
            } => {
                let left = self.check_expr(left);
                let right = self.check_expr(right);
                self.check_binary(&left, *operator, &right, *span)
            }
            Expr::Unary {
                operator,
                right,
                span,
            } => {
                let operand = self.check_expr(right);
                match operator {
                    UnaryOp::Not => self.ctx.builtins.boolean(),
                    UnaryOp::Negate => {
                        let number = self.ctx.builtins.number();
                        if self.ctx.store.is_compatible(&operand, &number) {
                            if operand.is_previous_error() { operand } else { number }
                        } else {
                            self.report(*span, diagnostic_codes::OPERAND_MUST_BE_NUMBER, &[])
                        }
                    }
                }
            }
            Expr::Logical { left, right, .. } => {
                let left = self.check_expr(left);
                let right = self.check_expr(right);
                self.ctx.store.union(&left, &right)
            }
            Expr::Grouping { expression, .. } => self.check_expr(expression),
            Expr::Call {
                callee,
                generic_args,
                args,
                span,
            } => self.check_call(callee, generic_args, args, *span).ty,
            Expr::Get { object, name, .. } => {
                let object = self.check_expr(object);
                self.property_type(&object, name)
            }
            Expr::Set {
                object,
                name,
                value,
                ..
            } => self.check_set(object, name, value),
            Expr::This { span } => match self.ctx.classes.last() {
                Some(class) => Type::Instance(class.class),
                None => self.report(*span, diagnostic_codes::THIS_OUTSIDE_CLASS, &[]),
            },
            Expr::Super { method, span } => self.check_super(method, *span),
        }
    }

    fn literal_type(&self, value: &LiteralValue) -> Type {
        match value {
            LiteralValue::Bool(_) => self.ctx.builtins.boolean(),
            LiteralValue::Number(_) => self.ctx.builtins.number(),
            LiteralValue::String(_) => self.ctx.builtins.string(),
            LiteralValue::Nil => Type::nil(),
        }
    }

    fn check_assign(&mut self, name: &Identifier, value: &Expr) -> Type {
        let value_ty = self.check_expr(value);
        let Some(declared) = self.ctx.scopes.declared_value(&name.name).cloned() else {
            return self.report(name.span, diagnostic_codes::UNDEFINED_VARIABLE, &[&name.name]);
        };
        // Whatever was proven about the old value no longer holds.
        self.ctx.scopes.clear_narrowing(&name.name);
        if self.check_assignable(value.span(), &value_ty, &declared) {
            value_ty
        } else {
            Type::PreviousError
        }
    }

    fn check_binary(&mut self, left: &Type, op: BinaryOp, right: &Type, span: Span) -> Type {
        let builtins = self.ctx.builtins;
        match op {
            BinaryOp::Equal | BinaryOp::NotEqual => builtins.boolean(),
            BinaryOp::Add => {
                if left.is_previous_error() || right.is_previous_error() {
                    return Type::PreviousError;
                }
                if left.is_any() || right.is_any() {
                    return Type::Any;
                }
                let store = self.ctx.store;
                for operand in [builtins.number(), builtins.string()] {
                    if store.is_compatible(left, &operand) && store.is_compatible(right, &operand) {
                        return operand;
                    }
                }
                self.report(span, diagnostic_codes::OPERANDS_MUST_BE_NUMBERS_OR_STRINGS, &[])
            }
            BinaryOp::Subtract | BinaryOp::Multiply | BinaryOp::Divide => {
                self.require_numbers(left, right, span, builtins.number())
            }
            BinaryOp::Greater | BinaryOp::GreaterEqual | BinaryOp::Less | BinaryOp::LessEqual => {
                self.require_numbers(left, right, span, builtins.boolean())
            }
        }
    }

    fn require_numbers(&mut self, left: &Type, right: &Type, span: Span, result: Type) -> Type {
        if left.is_previous_error() || right.is_previous_error() {
            return Type::PreviousError;
        }
        let number = self.ctx.builtins.number();
        let store = self.ctx.store;
        if store.is_compatible(left, &number) && store.is_compatible(right, &number) {
            result
        } else {
            self.report(span, diagnostic_codes::OPERANDS_MUST_BE_NUMBERS, &[])
        }
    }

    fn property_type(&mut self, object: &Type, name: &Identifier) -> Type {
        match self.ctx.store.get_property(object, &name.name) {
            Some(ty) => ty,
            None => {
                let object = self.format_type(object);
                self.report(
                    name.span,
                    diagnostic_codes::UNDEFINED_PROPERTY,
                    &[&name.name, &object],
                )
            }
        }
    }

    fn check_set(&mut self, object: &Expr, name: &Identifier, value: &Expr) -> Type {
        let object_ty = self.check_expr(object);
        let value_ty = self.check_expr(value);
        if !is_instance_like(&object_ty) {
            return self.report(object.span(), diagnostic_codes::ONLY_INSTANCES_HAVE_FIELDS, &[]);
        }
        let field_ty = self.property_type(&object_ty, name);
        if field_ty.is_previous_error() {
            return field_ty;
        }
        trace!(field = %name.name, "assign field");
        if self.check_assignable(value.span(), &value_ty, &field_ty) {
            value_ty
        } else {
            Type::PreviousError
        }
    }

    fn check_super(&mut self, method: &Identifier, span: Span) -> Type {
        let Some(class) = self.ctx.classes.last().copied() else {
            return self.report(span, diagnostic_codes::SUPER_OUTSIDE_CLASS, &[]);
        };
        let Some(superclass) = class.superclass else {
            return self.report(span, diagnostic_codes::SUPER_WITHOUT_SUPERCLASS, &[]);
        };
        match self.ctx.store.find_method(superclass, &method.name) {
            Some(ty) => ty,
            None => {
                let owner = self.format_type(&Type::Instance(superclass));
                self.report(
                    method.span,
                    diagnostic_codes::UNDEFINED_PROPERTY,
                    &[&method.name, &owner],
                )
            }
        }
    }
}

/// Values whose fields may be assigned.
fn is_instance_like(ty: &Type) -> bool {
    match ty {
        Type::Instance(_) | Type::Any | Type::PreviousError => true,
        Type::Union(union) => union
            .members()
            .iter()
            .all(|member| matches!(member, Type::Instance(_))),
        _ => false,
    }
}

#[cfg(test)]
#[path = "../tests/expr_tests.rs"]
mod tests;
