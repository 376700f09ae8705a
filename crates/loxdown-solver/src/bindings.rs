//! Generic binding maps.
//!
//! `GenericBindings` is the mutable accumulator threaded through one
//! unification attempt. `FullBindings` is the frozen, complete substitution
//! handed to instantiation.

use crate::types::{GenericParam, GenericParamId, Type};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Bindings collected while unifying. Create one per independent attempt.
#[derive(Clone, Debug, Default)]
pub struct GenericBindings {
    bound: FxHashMap<GenericParamId, Type>,
}

/// Saved state for rolling back speculative bindings.
#[derive(Clone, Debug)]
pub struct BindingsSnapshot(FxHashMap<GenericParamId, Type>);

impl GenericBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, param: GenericParamId) -> Option<&Type> {
        self.bound.get(&param)
    }

    pub fn bind(&mut self, param: &GenericParam, ty: Type) {
        self.bound.insert(param.id, ty);
    }

    pub fn is_bound(&self, param: GenericParamId) -> bool {
        self.bound.contains_key(&param)
    }

    pub fn len(&self) -> usize {
        self.bound.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }

    pub fn snapshot(&self) -> BindingsSnapshot {
        BindingsSnapshot(self.bound.clone())
    }

    pub fn restore(&mut self, snapshot: BindingsSnapshot) {
        self.bound = snapshot.0;
    }

    /// Freeze the bindings for `params`. Fails with every parameter that
    /// was never bound.
    pub fn complete(&self, params: &[GenericParam]) -> Result<FullBindings, Vec<GenericParam>> {
        let missing: Vec<GenericParam> = params
            .iter()
            .filter(|param| !self.is_bound(param.id))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(missing);
        }
        Ok(FullBindings::from_pairs(params.iter().filter_map(|param| {
            self.get(param.id).map(|ty| (param.clone(), ty.clone()))
        })))
    }
}

/// A complete parameter -> type substitution.
///
/// Generic arity is small, so entries are a flat list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FullBindings {
    entries: SmallVec<[(GenericParam, Type); 2]>,
}

impl FullBindings {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (GenericParam, Type)>) -> Self {
        Self {
            entries: pairs.into_iter().collect(),
        }
    }

    /// Pair `params` with `args` positionally. `None` on arity mismatch.
    pub fn from_args(params: &[GenericParam], args: &[Type]) -> Option<Self> {
        if params.len() != args.len() {
            return None;
        }
        Some(Self::from_pairs(
            params.iter().cloned().zip(args.iter().cloned()),
        ))
    }

    pub fn get(&self, param: GenericParamId) -> Option<&Type> {
        self.entries
            .iter()
            .find(|(bound, _)| bound.id == param)
            .map(|(_, ty)| ty)
    }

    pub fn params(&self) -> impl Iterator<Item = &GenericParam> {
        self.entries.iter().map(|(param, _)| param)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GenericParam, &Type)> {
        self.entries.iter().map(|(param, ty)| (param, ty))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
