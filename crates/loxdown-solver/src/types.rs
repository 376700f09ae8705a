//! Type representation for the solver.
//!
//! `Type` is a closed sum over every representable type. Class records live
//! in the `TypeStore` arena and are referenced by `ClassId`, so a class that
//! mentions itself in its own signatures never forms an ownership cycle.
//! Everything else is an immutable value that is cheap to clone.

use rustc_hash::{FxHashMap, FxHasher};
use smallvec::{SmallVec, smallvec};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Interned-style name used for classes, members and generic parameters.
pub type Name = Arc<str>;

// =============================================================================
// Identifiers
// =============================================================================

/// Index of a class record in the `TypeStore` arena.
///
/// Two classes are "the same generic family" iff their `generic_root`s are
/// the same `ClassId`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub u32);

impl ClassId {
    /// The metaclass `Class`: the class type of every class object.
    pub const METACLASS: Self = Self(0);

    /// `Nil`, the type of absent return values.
    pub const NIL: Self = Self(1);

    /// First id handed out for user and builtin declarations.
    pub const FIRST_USER: u32 = 2;
}

/// Identity of a generic parameter. Names are for display only.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GenericParamId(pub u32);

/// An unbound type variable declared by a generic class or function.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GenericParam {
    pub id: GenericParamId,
    pub name: Name,
}

// =============================================================================
// Narrowing producers
// =============================================================================

/// Argument index -> type the argument has when the guard returned true.
pub type NarrowingMap = FxHashMap<usize, Type>;

/// A native hook attached to a callable that reports how a call used as a
/// condition narrows its arguments.
#[derive(Clone)]
pub struct NarrowingProducer(Arc<dyn Fn(&[Type]) -> NarrowingMap + Send + Sync>);

impl NarrowingProducer {
    pub fn new(produce: impl Fn(&[Type]) -> NarrowingMap + Send + Sync + 'static) -> Self {
        Self(Arc::new(produce))
    }

    pub fn produce(&self, arg_types: &[Type]) -> NarrowingMap {
        (self.0)(arg_types)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn addr(&self) -> usize {
        Arc::as_ptr(&self.0).cast::<()>() as usize
    }
}

impl PartialEq for NarrowingProducer {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for NarrowingProducer {}

impl Hash for NarrowingProducer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl fmt::Debug for NarrowingProducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NarrowingProducer({:#x})", self.addr())
    }
}

// =============================================================================
// Compound type payloads
// =============================================================================

/// A function signature. `returns: None` means the function returns nil.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CallableType {
    pub params: Vec<Type>,
    pub returns: Option<Type>,
    pub narrowing: Option<NarrowingProducer>,
}

impl CallableType {
    pub fn new(params: Vec<Type>, returns: Option<Type>) -> Self {
        Self {
            params,
            returns,
            narrowing: None,
        }
    }

    #[must_use]
    pub fn with_narrowing(mut self, producer: NarrowingProducer) -> Self {
        self.narrowing = Some(producer);
        self
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// The declared return type, with an absent return read as nil.
    pub fn return_type(&self) -> Type {
        self.returns.clone().unwrap_or_else(Type::nil)
    }
}

/// A flattened, minimal set of alternatives.
///
/// Members are never unions themselves and no member is compatible with
/// another; `TypeStore::union` is the only way to build one from arbitrary
/// inputs.
#[derive(Clone, Debug)]
pub struct UnionType {
    members: Vec<Type>,
}

impl UnionType {
    /// Wrap members that already satisfy the union invariants.
    pub(crate) fn from_normalized(members: Vec<Type>) -> Self {
        debug_assert!(members.len() >= 2);
        debug_assert!(members.iter().all(|m| !m.is_union()));
        Self { members }
    }

    pub fn members(&self) -> &[Type] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

// Unions are sets: equality and hashing ignore member order.
impl PartialEq for UnionType {
    fn eq(&self, other: &Self) -> bool {
        self.members.len() == other.members.len()
            && self.members.iter().all(|m| other.members.contains(m))
    }
}

impl Eq for UnionType {}

impl Hash for UnionType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut combined: u64 = 0;
        for member in &self.members {
            let mut hasher = FxHasher::default();
            member.hash(&mut hasher);
            combined = combined.wrapping_add(hasher.finish());
        }
        state.write_usize(self.members.len());
        state.write_u64(combined);
    }
}

/// A generic function or method template: `fun[T] (T): T`.
#[derive(Clone, Debug)]
pub struct GenericType {
    pub params: Vec<GenericParam>,
    pub body: Type,
}

// =============================================================================
// Type
// =============================================================================

#[derive(Clone, Debug)]
pub enum Type {
    /// The class object itself; its class type is the metaclass.
    Class(ClassId),
    /// Values of a class.
    Instance(ClassId),
    Callable(Arc<CallableType>),
    Union(Arc<UnionType>),
    GenericParam(GenericParam),
    Generic(Arc<GenericType>),
    /// Compatible with everything in both directions.
    Any,
    /// Substituted for an expression after a reported error; compatible
    /// with everything so one mistake does not cascade.
    PreviousError,
}

impl Type {
    pub const fn nil() -> Self {
        Self::Instance(ClassId::NIL)
    }

    pub const fn instance(class: ClassId) -> Self {
        Self::Instance(class)
    }

    pub fn callable(params: Vec<Type>, returns: Option<Type>) -> Self {
        Self::Callable(Arc::new(CallableType::new(params, returns)))
    }

    pub fn generic(params: Vec<GenericParam>, body: Type) -> Self {
        Self::Generic(Arc::new(GenericType { params, body }))
    }

    pub const fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    pub const fn is_previous_error(&self) -> bool {
        matches!(self, Self::PreviousError)
    }

    pub const fn is_union(&self) -> bool {
        matches!(self, Self::Union(_))
    }

    pub fn as_callable(&self) -> Option<&Arc<CallableType>> {
        match self {
            Self::Callable(callable) => Some(callable),
            _ => None,
        }
    }

    pub fn as_union(&self) -> Option<&UnionType> {
        match self {
            Self::Union(union) => Some(union),
            _ => None,
        }
    }

    /// The class whose instances this type describes. Class objects are
    /// instances of the metaclass.
    pub const fn class_type(&self) -> Option<ClassId> {
        match self {
            Self::Class(_) => Some(ClassId::METACLASS),
            Self::Instance(class) => Some(*class),
            _ => None,
        }
    }

    /// A union's members, or the type itself.
    pub fn children(&self) -> SmallVec<[Type; 4]> {
        match self {
            Self::Union(union) => union.members().iter().cloned().collect(),
            other => smallvec![other.clone()],
        }
    }

    /// Build a type from normalized alternatives: one member stays bare,
    /// more become a union.
    pub(crate) fn from_members(mut members: Vec<Type>) -> Self {
        match members.len() {
            0 => Self::PreviousError,
            1 => members.swap_remove(0),
            _ => Self::Union(Arc::new(UnionType::from_normalized(members))),
        }
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Class(a), Self::Class(b)) | (Self::Instance(a), Self::Instance(b)) => a == b,
            (Self::Callable(a), Self::Callable(b)) => Arc::ptr_eq(a, b) || a == b,
            (Self::Union(a), Self::Union(b)) => Arc::ptr_eq(a, b) || a == b,
            (Self::GenericParam(a), Self::GenericParam(b)) => a.id == b.id,
            (Self::Generic(a), Self::Generic(b)) => Arc::ptr_eq(a, b),
            (Self::Any, Self::Any) | (Self::PreviousError, Self::PreviousError) => true,
            _ => false,
        }
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Class(id) | Self::Instance(id) => id.hash(state),
            Self::Callable(callable) => callable.hash(state),
            Self::Union(union) => union.hash(state),
            Self::GenericParam(param) => param.id.hash(state),
            Self::Generic(generic) => (Arc::as_ptr(generic) as usize).hash(state),
            Self::Any | Self::PreviousError => {}
        }
    }
}

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod tests;
