//! Class declaration checking.
//!
//! A class is declared into the store before its member signatures are
//! resolved, so annotations inside the class may name the class itself
//! (`fun next(): Node[T]`). The member tables are deferred slots filled once
//! resolution finishes; nothing reads them before that.

use crate::ast::{ClassStmt, SuperclassRef};
use crate::context::ClassContext;
use crate::scope::TypeBinding;
use crate::state::{CheckerState, FunctionSignature};
use loxdown_common::diagnostics::diagnostic_codes;
use loxdown_solver::{ClassDecl, ClassId, MemberMap, Members, Name, Type};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::{Level, debug, span};

/// A member table whose contents are supplied after the class is declared.
#[derive(Clone, Default)]
pub(crate) struct MemberSlot(Arc<OnceCell<MemberMap>>);

impl MemberSlot {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The deferred table to hand to `ClassDecl`.
    pub(crate) fn members(&self) -> Members {
        let slot = Arc::clone(&self.0);
        Members::deferred(move |_, _| slot.get().cloned().unwrap_or_default())
    }

    pub(crate) fn fill(&self, members: MemberMap) {
        if self.0.set(members).is_err() {
            debug!("member slot filled twice, keeping the first table");
        }
    }
}

impl CheckerState<'_> {
    pub(crate) fn check_class(&mut self, class: &ClassStmt) {
        let _span = span!(Level::DEBUG, "check_class", name = %class.name.name).entered();
        let store = self.ctx.store;

        let params = self.fresh_generic_params(&class.generic_params);
        let superclass = match &class.superclass {
            Some(superclass) => {
                self.with_generic_scope(&params, |this| this.resolve_superclass(class, superclass))
            }
            None => None,
        };

        let fields = MemberSlot::new();
        let methods = MemberSlot::new();
        let id = store.declare_class(
            ClassDecl::new(class.name.name.as_str())
                .with_generic_params(params.clone())
                .with_superclass(superclass)
                .with_fields(fields.members())
                .with_methods(methods.members()),
        );
        self.ctx
            .scopes
            .declare_type(&class.name.name, TypeBinding::Class(id));
        self.ctx
            .scopes
            .declare_value(&class.name.name, Type::Class(id));

        self.with_generic_scope(&params, |this| {
            let mut field_map = MemberMap::default();
            for field in &class.fields {
                let ty = this.resolve_type(&field.type_annotation);
                field_map.insert(Name::from(field.name.name.as_str()), ty);
            }

            let mut method_map = MemberMap::default();
            let mut signatures: Vec<FunctionSignature> = Vec::with_capacity(class.methods.len());
            for method in &class.methods {
                let signature = this.resolve_signature(method);
                method_map.insert(Name::from(method.name.name.as_str()), signature.ty.clone());
                signatures.push(signature);
            }

            fields.fill(field_map);
            methods.fill(method_map);
            debug!(
                class = %class.name.name,
                fields = class.fields.len(),
                methods = class.methods.len(),
                "class members resolved"
            );

            this.ctx.classes.push(ClassContext {
                class: id,
                superclass,
            });
            for (method, signature) in class.methods.iter().zip(&signatures) {
                this.check_function_body(method, signature);
            }
            this.ctx.classes.pop();
        });
    }

    fn resolve_superclass(
        &mut self,
        class: &ClassStmt,
        superclass: &SuperclassRef,
    ) -> Option<ClassId> {
        let name = &superclass.name;
        if name.name == class.name.name {
            self.error_at(name.span, diagnostic_codes::CLASS_INHERITS_ITSELF, &[]);
            return None;
        }
        match self.ctx.scopes.lookup_type(&name.name).cloned() {
            Some(TypeBinding::Class(id)) => {
                let args: Vec<Type> = superclass
                    .generic_args
                    .iter()
                    .map(|arg| self.resolve_type(arg))
                    .collect();
                self.apply_generic_args(id, &args, name.span)
            }
            None if self.ctx.scopes.lookup_value(&name.name).is_none() => {
                self.error_at(name.span, diagnostic_codes::UNDEFINED_TYPE, &[&name.name]);
                None
            }
            _ => {
                self.error_at(name.span, diagnostic_codes::SUPERCLASS_MUST_BE_CLASS, &[]);
                None
            }
        }
    }
}
