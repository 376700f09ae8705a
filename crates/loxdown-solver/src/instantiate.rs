//! Generic instantiation and substitution.
//!
//! Instantiating `Box[T]` with `T = Number` derives a new class record that
//! shares `Box`'s generic root. The superclass is substituted eagerly; fields
//! and methods are substituted lazily, on first member access, so a method
//! returning `Box[T]` does not recurse while the derived class is being
//! built.
//!
//! Derived classes are interned by `(generic_root, args)`: every path to
//! `Box[Number]` yields the same `ClassId`.

use crate::bindings::{FullBindings, GenericBindings};
use crate::class_type::{ClassType, MemberMap, Members};
use crate::error::{InferenceError, SolverError};
use crate::store::TypeStore;
use crate::types::{CallableType, ClassId, GenericParam, GenericType, Name, Type};
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use tracing::{debug, trace};

impl TypeStore {
    /// Instantiate `class` with a complete set of bindings for its root's
    /// generic parameters.
    ///
    /// Re-instantiating an already derived class with its own arguments
    /// returns it unchanged; any other binding of a derived class is an
    /// error.
    pub fn instantiate_generics(
        &self,
        class: ClassId,
        bindings: &FullBindings,
    ) -> Result<ClassId, SolverError> {
        let record = self.class(class);
        let root = self.class(record.generic_root);
        let params: Vec<GenericParam> = root.generic_params().cloned().collect();

        if let Some(foreign) = bindings
            .params()
            .find(|bound| !params.iter().any(|param| param.id == bound.id))
        {
            return Err(SolverError::ForeignParameter {
                class: root.name.clone(),
                param: foreign.name.clone(),
            });
        }

        let mut args = Vec::with_capacity(params.len());
        for param in &params {
            match bindings.get(param.id) {
                Some(ty) => args.push(ty.clone()),
                None => {
                    return Err(SolverError::MissingBinding {
                        class: root.name.clone(),
                        param: param.name.clone(),
                    });
                }
            }
        }

        if !record.is_generic_root() {
            if args == record.generic_args {
                return Ok(class);
            }
            return Err(SolverError::AlreadyInstantiated {
                class: record.name.clone(),
            });
        }

        Ok(self.derive_class(root.id, args))
    }

    /// Instantiate with positional arguments, checking arity first.
    pub fn instantiate_with_args(
        &self,
        class: ClassId,
        args: &[Type],
    ) -> Result<ClassId, SolverError> {
        let root = self.class(self.class(class).generic_root);
        let params: Vec<GenericParam> = root.generic_params().cloned().collect();
        let bindings =
            FullBindings::from_args(&params, args).ok_or_else(|| SolverError::ArityMismatch {
                owner: root.name.clone(),
                expected: params.len(),
                found: args.len(),
            })?;
        self.instantiate_generics(class, &bindings)
    }

    /// The class in `root`'s family whose arguments are `args`, creating it
    /// on first request.
    pub(crate) fn derive_class(&self, root_id: ClassId, args: Vec<Type>) -> ClassId {
        let root = self.class(root_id);
        if args == root.generic_args {
            return root_id;
        }

        // Reserve the id before building so that a superclass mentioning
        // this instantiation resolves to it instead of deriving again.
        let id = match self.instantiations.entry((root_id, args.clone())) {
            Entry::Occupied(existing) => return *existing.get(),
            Entry::Vacant(slot) => {
                let id = self.allocate_class_id();
                slot.insert(id);
                id
            }
        };

        let params: Vec<GenericParam> = root.generic_params().cloned().collect();
        let bindings = FullBindings::from_pairs(params.into_iter().zip(args.iter().cloned()));
        debug!(
            root = %root.name,
            class_id = id.0,
            args = args.len(),
            "deriving generic instantiation"
        );

        let superclass = root
            .superclass
            .map(|superclass| self.substitute_class(superclass, &bindings));

        let field_bindings = bindings.clone();
        let fields = Members::deferred(move |store, _| {
            let root = store.class(root_id);
            substitute_members(store, root.fields(store), &field_bindings)
        });
        let method_bindings = bindings;
        let methods = Members::deferred(move |store, _| {
            let root = store.class(root_id);
            substitute_members(store, root.methods(store), &method_bindings)
        });

        self.insert_class(ClassType::new(
            id,
            root.name.clone(),
            fields,
            methods,
            superclass,
            args,
            root_id,
        ));
        id
    }

    /// Substitute through a class's generic arguments, deriving the
    /// resulting instantiation.
    pub fn substitute_class(&self, class: ClassId, bindings: &FullBindings) -> ClassId {
        let record = self.class(class);
        if record.generic_args.is_empty() {
            return class;
        }
        let args: Vec<Type> = record
            .generic_args
            .iter()
            .map(|arg| self.substitute(arg, bindings))
            .collect();
        if args == record.generic_args {
            return class;
        }
        self.derive_class(record.generic_root, args)
    }

    /// Replace every bound generic parameter in `ty`.
    pub fn substitute(&self, ty: &Type, bindings: &FullBindings) -> Type {
        if bindings.is_empty() {
            return ty.clone();
        }
        match ty {
            Type::Class(class) => Type::Class(self.substitute_class(*class, bindings)),
            Type::Instance(class) => Type::Instance(self.substitute_class(*class, bindings)),
            Type::Callable(callable) => Type::Callable(Arc::new(CallableType {
                params: callable
                    .params
                    .iter()
                    .map(|param| self.substitute(param, bindings))
                    .collect(),
                returns: callable
                    .returns
                    .as_ref()
                    .map(|returns| self.substitute(returns, bindings)),
                narrowing: callable.narrowing.clone(),
            })),
            Type::Union(union) => {
                let mut members = union
                    .members()
                    .iter()
                    .map(|member| self.substitute(member, bindings));
                let Some(first) = members.next() else {
                    return ty.clone();
                };
                members.fold(first, |acc, member| self.union(&acc, &member))
            }
            Type::GenericParam(param) => bindings.get(param.id).cloned().unwrap_or_else(|| ty.clone()),
            Type::Generic(generic) => {
                Type::generic(generic.params.clone(), self.substitute(&generic.body, bindings))
            }
            Type::Any | Type::PreviousError => ty.clone(),
        }
    }

    /// Apply explicit generic arguments to a generic function template.
    pub fn instantiate_template(
        &self,
        generic: &Arc<GenericType>,
        args: &[Type],
    ) -> Result<Type, SolverError> {
        let bindings = FullBindings::from_args(&generic.params, args).ok_or_else(|| {
            SolverError::ArityMismatch {
                owner: Name::from(self.display(&Type::Generic(Arc::clone(generic))).to_string()),
                expected: generic.params.len(),
                found: args.len(),
            }
        })?;
        Ok(self.substitute(&generic.body, &bindings))
    }

    /// Infer a template's generic arguments from call argument types.
    ///
    /// Each argument is unified as the target against its parameter as the
    /// candidate, so the parameter's generic parameters bind to argument
    /// types. Compatibility is not decided here: the caller checks the
    /// arguments against the substituted signature and reports mismatches.
    pub fn infer_template(
        &self,
        generic: &GenericType,
        arg_types: &[Type],
    ) -> Result<Type, InferenceError> {
        let mut bindings = GenericBindings::new();
        if let Type::Callable(body) = &generic.body {
            self.bind_arguments(&body.params, arg_types, &mut bindings);
        }
        let full = bindings
            .complete(&generic.params)
            .map_err(InferenceError::Unresolved)?;
        Ok(self.substitute(&generic.body, &full))
    }

    /// Infer a generic class's arguments from constructor argument types.
    pub fn infer_class_generics(
        &self,
        class: ClassId,
        arg_types: &[Type],
    ) -> Result<ClassId, InferenceError> {
        let root = self.class(self.class(class).generic_root);
        let params: Vec<GenericParam> = root.generic_params().cloned().collect();
        let constructor = self.constructor(root.id);

        let mut bindings = GenericBindings::new();
        self.bind_arguments(&constructor.params, arg_types, &mut bindings);
        let full = bindings
            .complete(&params)
            .map_err(InferenceError::Unresolved)?;
        Ok(self.instantiate_generics(root.id, &full)?)
    }

    fn bind_arguments(&self, params: &[Type], arg_types: &[Type], bindings: &mut GenericBindings) {
        for (param, arg) in params.iter().zip(arg_types) {
            let unified = self.unify(arg, param, Some(bindings));
            trace!(unified, "bind generic argument");
        }
    }
}

fn substitute_members(store: &TypeStore, members: &MemberMap, bindings: &FullBindings) -> MemberMap {
    members
        .iter()
        .map(|(name, ty)| (name.clone(), store.substitute(ty, bindings)))
        .collect()
}

#[cfg(test)]
#[path = "../tests/instantiate_tests.rs"]
mod tests;
