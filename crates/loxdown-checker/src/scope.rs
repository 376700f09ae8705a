//! Lexical scopes for values and type names, with narrowing overlays.
//!
//! A narrowing overlay records the type a variable is known to have inside
//! one region (a guarded branch, or the code after an `if` whose other
//! branch always returns). Lookups consult each frame's overlay before its
//! declarations, innermost frame first, so a narrowing placed in an inner
//! frame disappears when that frame is popped.

use loxdown_solver::{ClassId, GenericParam, Name, Type};
use rustc_hash::FxHashMap;

/// What a name means in type position.
#[derive(Clone, Debug)]
pub enum TypeBinding {
    Class(ClassId),
    Param(GenericParam),
    Alias {
        params: Vec<GenericParam>,
        aliased: Type,
    },
}

#[derive(Debug, Default)]
struct Frame {
    values: FxHashMap<Name, Type>,
    types: FxHashMap<Name, TypeBinding>,
    narrowed: FxHashMap<Name, Type>,
}

#[derive(Debug)]
pub struct Scopes {
    frames: Vec<Frame>,
}

impl Default for Scopes {
    fn default() -> Self {
        Self::new()
    }
}

impl Scopes {
    /// A stack holding only the global frame.
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::default()],
        }
    }

    pub fn push(&mut self) {
        self.frames.push(Frame::default());
    }

    pub fn pop(&mut self) {
        debug_assert!(self.frames.len() > 1, "global frame popped");
        self.frames.pop();
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    fn innermost(&mut self) -> &mut Frame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    pub fn declare_value(&mut self, name: &str, ty: Type) {
        let frame = self.innermost();
        frame.narrowed.remove(name);
        frame.values.insert(Name::from(name), ty);
    }

    pub fn declare_type(&mut self, name: &str, binding: TypeBinding) {
        self.innermost().types.insert(Name::from(name), binding);
    }

    /// The type `name` has here, narrowing included.
    pub fn lookup_value(&self, name: &str) -> Option<&Type> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.narrowed.get(name).or_else(|| frame.values.get(name)))
    }

    /// The type `name` was declared with, ignoring narrowing.
    pub fn declared_value(&self, name: &str) -> Option<&Type> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.values.get(name))
    }

    pub fn lookup_type(&self, name: &str) -> Option<&TypeBinding> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.types.get(name))
    }

    /// Overlay a narrowed type for `name` in the innermost frame. Unknown
    /// names are ignored.
    pub fn narrow(&mut self, name: &str, ty: Type) {
        if self.declared_value(name).is_none() {
            return;
        }
        self.innermost().narrowed.insert(Name::from(name), ty);
    }

    /// Drop every overlay for `name` down to the frame declaring it, e.g.
    /// after an assignment.
    pub fn clear_narrowing(&mut self, name: &str) {
        for frame in self.frames.iter_mut().rev() {
            frame.narrowed.remove(name);
            if frame.values.contains_key(name) {
                break;
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/scope_tests.rs"]
mod tests;
