//! Union, intersection and complement over types, plus the callable merge
//! used when two function types are unioned.
//!
//! These build the types that control-flow narrowing assigns to each branch.
//! The error marker absorbs every operation it takes part in, and `Any`
//! absorbs union.

use crate::store::TypeStore;
use crate::types::{CallableType, Type};
use std::sync::Arc;
use tracing::trace;

impl TypeStore {
    /// The least set of alternatives covering both sides.
    pub fn union(&self, left: &Type, right: &Type) -> Type {
        if left == right {
            return left.clone();
        }
        if left.is_previous_error() || right.is_previous_error() {
            return Type::PreviousError;
        }
        if left.is_any() || right.is_any() {
            return Type::Any;
        }
        if let (Some(left_fn), Some(right_fn)) = (left.as_callable(), right.as_callable()) {
            if let Some(merged) = self.attempt_union_of_callables(left_fn, right_fn) {
                return Type::Callable(Arc::new(merged));
            }
        }

        let mut members: Vec<Type> = left.children().into_vec();
        for candidate in right.children() {
            if members
                .iter()
                .any(|existing| self.is_compatible(&candidate, existing))
            {
                continue;
            }
            members.retain(|existing| !self.is_compatible(existing, &candidate));
            members.push(candidate);
        }
        trace!(members = members.len(), "union");
        Type::from_members(members)
    }

    /// The narrower side when one side is compatible with the other.
    pub fn intersection(&self, left: &Type, right: &Type) -> Option<Type> {
        if self.is_compatible(left, right) {
            Some(left.clone())
        } else if self.is_compatible(right, left) {
            Some(right.clone())
        } else {
            None
        }
    }

    /// `left` without the alternatives compatible with `right`.
    ///
    /// Removing everything yields the error marker, which marks the branch
    /// as unreachable without producing further diagnostics.
    pub fn complement(&self, left: &Type, right: &Type) -> Type {
        match left {
            // An unknown value minus one class is still unknown. Returning
            // the error marker here would silence the else branch of every
            // guard on an `Any` value.
            Type::Any => Type::Any,
            Type::PreviousError => Type::PreviousError,
            Type::Union(union) => {
                let kept: Vec<Type> = union
                    .members()
                    .iter()
                    .filter(|member| !self.is_compatible(member, right))
                    .cloned()
                    .collect();
                if kept.len() == union.len() {
                    left.clone()
                } else {
                    Type::from_members(kept)
                }
            }
            _ if self.is_compatible(left, right) => Type::PreviousError,
            _ => left.clone(),
        }
    }

    /// Merge two callables into one accepting what both accept and
    /// returning what either returns. `None` when arities differ or some
    /// parameter pair has no intersection.
    pub fn attempt_union_of_callables(
        &self,
        left: &CallableType,
        right: &CallableType,
    ) -> Option<CallableType> {
        if left.arity() != right.arity() {
            return None;
        }
        let params = left
            .params
            .iter()
            .zip(&right.params)
            .map(|(l, r)| self.intersection(l, r))
            .collect::<Option<Vec<_>>>()?;
        let returns = match (&left.returns, &right.returns) {
            (None, None) => None,
            _ => Some(self.union(&left.return_type(), &right.return_type())),
        };
        let narrowing = match (&left.narrowing, &right.narrowing) {
            (Some(l), Some(r)) if l.ptr_eq(r) => Some(l.clone()),
            _ => None,
        };
        Some(CallableType {
            params,
            returns,
            narrowing,
        })
    }
}

#[cfg(test)]
#[path = "../tests/set_ops_tests.rs"]
mod tests;
