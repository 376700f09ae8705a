//! Class graph queries: member lookup along the superclass chain, the
//! constructor view of a class, and property access on arbitrary types.
//!
//! Single inheritance only. The checker rejects a class inheriting from
//! itself before declaring it, and a superclass must already exist when its
//! subclass is declared, so chains are acyclic.

use crate::store::TypeStore;
use crate::types::{CallableType, ClassId, Type};
use std::sync::Arc;

/// Walks a class and its ancestors, nearest first.
pub struct Superclasses<'s> {
    store: &'s TypeStore,
    next: Option<ClassId>,
}

impl Iterator for Superclasses<'_> {
    type Item = ClassId;

    fn next(&mut self) -> Option<ClassId> {
        let current = self.next?;
        self.next = self.store.class(current).superclass;
        Some(current)
    }
}

impl TypeStore {
    /// `class` followed by each of its ancestors.
    pub fn superclasses(&self, class: ClassId) -> Superclasses<'_> {
        Superclasses {
            store: self,
            next: Some(class),
        }
    }

    /// Fields, then methods, then the superclass.
    pub fn find_member(&self, class: ClassId, name: &str) -> Option<Type> {
        for id in self.superclasses(class) {
            let record = self.class(id);
            if let Some(ty) = record.fields(self).get(name) {
                return Some(ty.clone());
            }
            if let Some(ty) = record.methods(self).get(name) {
                return Some(ty.clone());
            }
        }
        None
    }

    pub fn find_method(&self, class: ClassId, name: &str) -> Option<Type> {
        self.superclasses(class).find_map(|id| {
            let record = self.class(id);
            record.methods(self).get(name).cloned()
        })
    }

    /// The callable view of calling the class: `init`'s parameters (none
    /// without an `init`), returning an instance.
    pub fn constructor(&self, class: ClassId) -> CallableType {
        let params = match self.find_method(class, "init") {
            Some(Type::Callable(init)) => init.params.clone(),
            Some(Type::Generic(generic)) => match &generic.body {
                Type::Callable(init) => init.params.clone(),
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };
        CallableType::new(params, Some(Type::Instance(class)))
    }

    /// Static access on a class object: every class is an instance of the
    /// metaclass.
    pub fn get_static(&self, name: &str) -> Option<Type> {
        self.find_member(ClassId::METACLASS, name)
    }

    /// Property `name` on a value of type `ty`.
    ///
    /// A union has the property only if every member has it; the result is
    /// the union of the member results.
    pub fn get_property(&self, ty: &Type, name: &str) -> Option<Type> {
        match ty {
            Type::Instance(class) => self.find_member(*class, name),
            Type::Class(_) => self.get_static(name),
            Type::Any | Type::PreviousError => Some(ty.clone()),
            Type::Union(union) => {
                let mut result: Option<Type> = None;
                for member in union.members() {
                    let property = self.get_property(member, name)?;
                    result = Some(match result {
                        Some(acc) => self.union(&acc, &property),
                        None => property,
                    });
                }
                result
            }
            Type::Callable(_) | Type::GenericParam(_) | Type::Generic(_) => None,
        }
    }

    /// What calling a value of type `ty` looks like, if it can be called.
    pub fn callable_of(&self, ty: &Type) -> Option<Arc<CallableType>> {
        match ty {
            Type::Callable(callable) => Some(Arc::clone(callable)),
            Type::Class(class) => Some(Arc::new(self.constructor(*class))),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../tests/class_hierarchy_tests.rs"]
mod tests;
