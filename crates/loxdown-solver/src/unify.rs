//! Unification: the single compatibility relation of the type system.
//!
//! `unify(target, candidate, bindings)` answers "can a value of `candidate`
//! be used where `target` is expected?", binding generic parameters that
//! appear in the candidate when a binding map is supplied.
//!
//! Rules, in order:
//!
//! 1. A candidate generic parameter consults the bindings: bound to itself
//!    succeeds immediately, bound to a type recurses with that type, unbound
//!    binds to the target.
//! 2. `PreviousError` and `Any` candidates succeed.
//! 3. A union candidate succeeds iff every member does.
//! 4. Otherwise dispatch on the target (nominal classes, callables, unions,
//!    generic identity).
//!
//! Rule 1's self-binding short-circuit is what stops recursive generic
//! signatures such as `Node[T].next(): Node[T]` from recursing forever.

use crate::bindings::GenericBindings;
use crate::store::TypeStore;
use crate::types::{ClassId, Type};
use std::sync::Arc;
use tracing::trace;

impl TypeStore {
    pub fn unify(
        &self,
        target: &Type,
        candidate: &Type,
        mut bindings: Option<&mut GenericBindings>,
    ) -> bool {
        if let (Type::GenericParam(param), Some(map)) = (candidate, bindings.as_deref_mut()) {
            return match map.get(param.id).cloned() {
                Some(Type::GenericParam(bound)) if bound.id == param.id => true,
                Some(bound) => self.unify(target, &bound, Some(map)),
                None => {
                    trace!(param = %param.name, "binding generic parameter");
                    map.bind(param, target.clone());
                    true
                }
            };
        }

        match candidate {
            Type::PreviousError | Type::Any => return true,
            Type::Union(members) => {
                return members
                    .members()
                    .iter()
                    .all(|member| self.unify(target, member, bindings.as_deref_mut()));
            }
            _ => {}
        }

        match target {
            Type::Any | Type::PreviousError => true,

            Type::Class(target_class) => match candidate {
                Type::Class(candidate_class) => {
                    self.unify_classes(*target_class, *candidate_class, bindings)
                }
                _ => false,
            },

            Type::Instance(target_class) => match candidate {
                Type::Instance(candidate_class) => {
                    self.unify_classes(*target_class, *candidate_class, bindings)
                }
                // Class objects are instances of the metaclass.
                Type::Class(_) => self.unify_classes(*target_class, ClassId::METACLASS, bindings),
                _ => false,
            },

            Type::Callable(target_fn) => {
                let Some(candidate_fn) = self.callable_of(candidate) else {
                    return false;
                };
                if Arc::ptr_eq(target_fn, &candidate_fn) {
                    return true;
                }
                if target_fn.arity() != candidate_fn.arity() {
                    return false;
                }
                // Parameters are contravariant.
                for (target_param, candidate_param) in
                    target_fn.params.iter().zip(&candidate_fn.params)
                {
                    if !self.unify(candidate_param, target_param, bindings.as_deref_mut()) {
                        return false;
                    }
                }
                self.unify(
                    &target_fn.return_type(),
                    &candidate_fn.return_type(),
                    bindings,
                )
            }

            Type::Union(target_union) => {
                for member in target_union.members() {
                    match bindings.as_deref_mut() {
                        Some(map) => {
                            let snapshot = map.snapshot();
                            if self.unify(member, candidate, Some(&mut *map)) {
                                return true;
                            }
                            map.restore(snapshot);
                        }
                        None => {
                            if self.unify(member, candidate, None) {
                                return true;
                            }
                        }
                    }
                }
                false
            }

            Type::GenericParam(target_param) => {
                matches!(candidate, Type::GenericParam(param) if param.id == target_param.id)
            }

            Type::Generic(target_generic) => {
                matches!(candidate, Type::Generic(generic) if Arc::ptr_eq(generic, target_generic))
            }
        }
    }

    /// Nominal class rule: find the candidate's ancestor in the target's
    /// generic family, then compare generic arguments positionally.
    pub(crate) fn unify_classes(
        &self,
        target: ClassId,
        candidate: ClassId,
        mut bindings: Option<&mut GenericBindings>,
    ) -> bool {
        let target_class = self.class(target);
        for ancestor in self.superclasses(candidate) {
            let ancestor_class = self.class(ancestor);
            if ancestor_class.generic_root != target_class.generic_root {
                continue;
            }
            // Covariant in every argument. Unsound for mutable fields.
            return target_class
                .generic_args
                .iter()
                .zip(&ancestor_class.generic_args)
                .all(|(target_arg, candidate_arg)| {
                    self.unify(target_arg, candidate_arg, bindings.as_deref_mut())
                });
        }
        trace!(
            target = %target_class.name,
            candidate = candidate.0,
            "no ancestor in target's generic family"
        );
        false
    }

    /// `candidate` may be used where `target` is expected.
    pub fn is_compatible(&self, candidate: &Type, target: &Type) -> bool {
        self.unify(target, candidate, None)
    }
}

#[cfg(test)]
#[path = "../tests/unify_tests.rs"]
mod tests;
