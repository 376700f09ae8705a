//! Guard narrowing.
//!
//! A callable may carry a `NarrowingProducer`. When a call to it is used as a
//! condition, the producer reports what each argument is known to be if the
//! call returned true; the store turns that into per-branch types.

use crate::store::TypeStore;
use crate::types::{NarrowingMap, Type};
use rustc_hash::FxHashMap;
use tracing::{Level, span, trace};

/// Per-argument types for the two branches of a guarded condition.
#[derive(Clone, Debug, Default)]
pub struct GuardNarrowing {
    pub then_types: FxHashMap<usize, Type>,
    pub else_types: FxHashMap<usize, Type>,
}

impl GuardNarrowing {
    pub fn is_empty(&self) -> bool {
        self.then_types.is_empty() && self.else_types.is_empty()
    }
}

impl TypeStore {
    /// Narrow `arg_types` by a producer's result.
    ///
    /// The then branch keeps each alternative of the current type that
    /// overlaps the narrowed type (the error marker when none does); the
    /// else branch gets the current type minus the narrowed one.
    pub fn narrow_guard(&self, arg_types: &[Type], narrowed: &NarrowingMap) -> GuardNarrowing {
        let _span = span!(Level::TRACE, "narrow_guard", args = arg_types.len()).entered();
        let mut result = GuardNarrowing::default();
        for (&index, narrowed_ty) in narrowed {
            let Some(current) = arg_types.get(index) else {
                continue;
            };
            let then_ty = self.guarded_type(narrowed_ty, current);
            let else_ty = self.complement(current, narrowed_ty);
            trace!(index, "narrowed guard argument");
            result.then_types.insert(index, then_ty);
            result.else_types.insert(index, else_ty);
        }
        result
    }

    /// The part of `current` a true guard for `narrowed` leaves possible.
    ///
    /// Alternatives are narrowed one at a time, so `Circle | String` guarded
    /// by `Shape` keeps `Circle`. An instance whose class descends from an
    /// instantiation of the narrowed class's generic root is kept as is:
    /// `Box[Number]` guarded by `Box` stays `Box[Number]`.
    fn guarded_type(&self, narrowed: &Type, current: &Type) -> Type {
        let mut result: Option<Type> = None;
        for member in current.children() {
            let hit = self
                .intersection(narrowed, &member)
                .or_else(|| self.in_generic_family(&member, narrowed).then_some(member));
            if let Some(hit) = hit {
                result = Some(match result {
                    Some(acc) => self.union(&acc, &hit),
                    None => hit,
                });
            }
        }
        result.unwrap_or(Type::PreviousError)
    }

    /// `member` is an instance of some instantiation of the uninstantiated
    /// class `narrowed` describes.
    fn in_generic_family(&self, member: &Type, narrowed: &Type) -> bool {
        let (Type::Instance(member_class), Type::Instance(narrowed_class)) = (member, narrowed)
        else {
            return false;
        };
        let narrowed_record = self.class(*narrowed_class);
        if !narrowed_record.is_generic_root() {
            return false;
        }
        let root = narrowed_record.id;
        self.superclasses(*member_class)
            .any(|ancestor| self.class(ancestor).generic_root == root)
    }

    /// Narrowing for a call of `callee` with `arg_types`, if the callee is a
    /// guard.
    pub fn call_narrowing(&self, callee: &Type, arg_types: &[Type]) -> Option<GuardNarrowing> {
        let producer = callee.as_callable()?.narrowing.as_ref()?;
        let narrowed = producer.produce(arg_types);
        Some(self.narrow_guard(arg_types, &narrowed))
    }
}

#[cfg(test)]
#[path = "../tests/narrowing_tests.rs"]
mod tests;
