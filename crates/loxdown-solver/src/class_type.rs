//! Class records and their lazily populated member tables.
//!
//! A generic class may mention its own instantiated form inside a method
//! signature before the class has finished being declared. Member tables are
//! therefore deferred: the closure runs on first access, receives the store
//! and the owning class's own id, and its result is cached for the rest of
//! the checking pass.

use crate::store::TypeStore;
use crate::types::{ClassId, GenericParam, Name, Type};
use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use rustc_hash::FxBuildHasher;
use std::fmt;
use std::sync::Arc;

/// Member name -> member type, in declaration order.
pub type MemberMap = IndexMap<Name, Type, FxBuildHasher>;

/// Deferred member computation. Receives the store and the id of the class
/// being populated.
pub type MemberInit = Arc<dyn Fn(&TypeStore, ClassId) -> MemberMap + Send + Sync>;

/// How a declaration supplies its fields or methods.
#[derive(Clone)]
pub enum Members {
    Ready(MemberMap),
    Deferred(MemberInit),
}

impl Members {
    pub fn deferred(
        init: impl Fn(&TypeStore, ClassId) -> MemberMap + Send + Sync + 'static,
    ) -> Self {
        Self::Deferred(Arc::new(init))
    }

    pub fn from_pairs<N: Into<Name>>(pairs: impl IntoIterator<Item = (N, Type)>) -> Self {
        Self::Ready(pairs.into_iter().map(|(name, ty)| (name.into(), ty)).collect())
    }
}

impl Default for Members {
    fn default() -> Self {
        Self::Ready(MemberMap::default())
    }
}

/// Compute-once cell backing `ClassType::fields` / `ClassType::methods`.
///
/// The deferred closure must not force the table it is populating; doing so
/// would block on the cell. Instantiation and substitution never force
/// members, so recursive signatures only ever force other classes' tables.
pub(crate) struct MemberTable {
    cell: OnceCell<MemberMap>,
    init: Option<MemberInit>,
}

impl MemberTable {
    pub(crate) fn new(members: Members) -> Self {
        match members {
            Members::Ready(map) => Self {
                cell: OnceCell::with_value(map),
                init: None,
            },
            Members::Deferred(init) => Self {
                cell: OnceCell::new(),
                init: Some(init),
            },
        }
    }

    pub(crate) fn get(&self, store: &TypeStore, owner: ClassId) -> &MemberMap {
        self.cell.get_or_init(|| match &self.init {
            Some(init) => init(store, owner),
            None => MemberMap::default(),
        })
    }

    pub(crate) fn is_forced(&self) -> bool {
        self.cell.get().is_some()
    }
}

/// Everything needed to declare a new (uninstantiated) class.
pub struct ClassDecl {
    pub name: Name,
    pub generic_params: Vec<GenericParam>,
    pub superclass: Option<ClassId>,
    pub fields: Members,
    pub methods: Members,
}

impl ClassDecl {
    pub fn new(name: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            generic_params: Vec::new(),
            superclass: None,
            fields: Members::default(),
            methods: Members::default(),
        }
    }

    #[must_use]
    pub fn with_generic_params(mut self, params: Vec<GenericParam>) -> Self {
        self.generic_params = params;
        self
    }

    #[must_use]
    pub fn with_superclass(mut self, superclass: Option<ClassId>) -> Self {
        self.superclass = superclass;
        self
    }

    #[must_use]
    pub fn with_fields(mut self, fields: Members) -> Self {
        self.fields = fields;
        self
    }

    #[must_use]
    pub fn with_methods(mut self, methods: Members) -> Self {
        self.methods = methods;
        self
    }
}

/// A nominal class, either a declaration or an instantiation of one.
pub struct ClassType {
    pub id: ClassId,
    pub name: Name,
    fields: MemberTable,
    methods: MemberTable,
    pub superclass: Option<ClassId>,
    /// For a declaration: its own generic parameters. For an instantiation:
    /// the concrete arguments, positionally matching the root's parameters.
    pub generic_args: Vec<Type>,
    /// The uninstantiated declaration this class derives from (itself for a
    /// declaration).
    pub generic_root: ClassId,
}

impl ClassType {
    pub(crate) fn new(
        id: ClassId,
        name: Name,
        fields: Members,
        methods: Members,
        superclass: Option<ClassId>,
        generic_args: Vec<Type>,
        generic_root: ClassId,
    ) -> Self {
        Self {
            id,
            name,
            fields: MemberTable::new(fields),
            methods: MemberTable::new(methods),
            superclass,
            generic_args,
            generic_root,
        }
    }

    pub fn fields<'s>(&'s self, store: &TypeStore) -> &'s MemberMap {
        self.fields.get(store, self.id)
    }

    pub fn methods<'s>(&'s self, store: &TypeStore) -> &'s MemberMap {
        self.methods.get(store, self.id)
    }

    pub fn is_generic_root(&self) -> bool {
        self.generic_root == self.id
    }

    /// The declared generic parameters of a root class. Empty for
    /// instantiations whose arguments are all concrete.
    pub fn generic_params(&self) -> impl Iterator<Item = &GenericParam> {
        self.generic_args.iter().filter_map(|arg| match arg {
            Type::GenericParam(param) => Some(param),
            _ => None,
        })
    }

    pub fn members_forced(&self) -> (bool, bool) {
        (self.fields.is_forced(), self.methods.is_forced())
    }
}

impl fmt::Debug for ClassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassType")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("superclass", &self.superclass)
            .field("generic_args", &self.generic_args)
            .field("generic_root", &self.generic_root)
            .finish_non_exhaustive()
    }
}
