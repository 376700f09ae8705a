//! The class arena and generic-parameter allocator.
//!
//! `TypeStore` owns every `ClassType` of a checking pass. Relations, member
//! lookup, instantiation and set algebra are all methods on the store, split
//! across the sibling modules by concern.
//!
//! | Id | Class |
//! |----|-------|
//! | 0  | `Class` (the metaclass) |
//! | 1  | `Nil` |
//! | 2+ | builtins and user declarations, in declaration order |

use crate::class_type::{ClassDecl, ClassType, MemberMap, Members};
use crate::types::{ClassId, GenericParam, GenericParamId, Name, Type};
use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::trace;

pub struct TypeStore {
    classes: DashMap<ClassId, Arc<ClassType>, FxBuildHasher>,
    /// `(generic_root, args)` -> derived class. Keeps instantiation
    /// idempotent so recursive signatures reach the same `ClassId`.
    pub(crate) instantiations: DashMap<(ClassId, Vec<Type>), ClassId, FxBuildHasher>,
    next_class: AtomicU32,
    next_param: AtomicU32,
}

impl Default for TypeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeStore {
    /// Create a store holding only the reserved `Class` and `Nil` classes.
    pub fn new() -> Self {
        let store = Self {
            classes: DashMap::with_hasher(FxBuildHasher),
            instantiations: DashMap::with_hasher(FxBuildHasher),
            next_class: AtomicU32::new(0),
            next_param: AtomicU32::new(0),
        };

        let metaclass = store.declare_class(ClassDecl::new("Class").with_methods(
            Members::deferred(|_, metaclass| {
                let mut methods = MemberMap::default();
                methods.insert(
                    Name::from("getSuperclass"),
                    Type::callable(Vec::new(), Some(Type::Instance(metaclass))),
                );
                methods
            }),
        ));
        let nil = store.declare_class(ClassDecl::new("Nil"));
        debug_assert_eq!(metaclass, ClassId::METACLASS);
        debug_assert_eq!(nil, ClassId::NIL);
        debug_assert_eq!(store.next_class.load(Ordering::SeqCst), ClassId::FIRST_USER);

        store
    }

    pub(crate) fn allocate_class_id(&self) -> ClassId {
        ClassId(self.next_class.fetch_add(1, Ordering::SeqCst))
    }

    pub(crate) fn insert_class(&self, class: ClassType) {
        trace!(class_id = class.id.0, name = %class.name, "TypeStore::insert_class");
        self.classes.insert(class.id, Arc::new(class));
    }

    /// Declare a new uninstantiated class. Its generic parameters become its
    /// own `generic_args`, and it is its own `generic_root`.
    pub fn declare_class(&self, decl: ClassDecl) -> ClassId {
        let id = self.allocate_class_id();
        let generic_args = decl
            .generic_params
            .into_iter()
            .map(Type::GenericParam)
            .collect();
        self.insert_class(ClassType::new(
            id,
            decl.name,
            decl.fields,
            decl.methods,
            decl.superclass,
            generic_args,
            id,
        ));
        id
    }

    /// Allocate a generic parameter with a store-unique id.
    pub fn fresh_generic_param(&self, name: impl Into<Name>) -> GenericParam {
        GenericParam {
            id: GenericParamId(self.next_param.fetch_add(1, Ordering::SeqCst)),
            name: name.into(),
        }
    }

    /// The class record for `id`.
    ///
    /// # Panics
    ///
    /// If `id` was not allocated by this store. Class ids never cross stores.
    pub fn class(&self, id: ClassId) -> Arc<ClassType> {
        match self.try_class(id) {
            Some(class) => class,
            None => panic!("ClassId({}) does not belong to this TypeStore", id.0),
        }
    }

    pub fn try_class(&self, id: ClassId) -> Option<Arc<ClassType>> {
        self.classes.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn class_name(&self, id: ClassId) -> Name {
        self.class(id).name.clone()
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }
}

#[cfg(test)]
#[path = "../tests/store_tests.rs"]
mod tests;
