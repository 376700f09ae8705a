//! Type rendering for diagnostics.
//!
//! | Type | Rendering |
//! |------|-----------|
//! | class | `class Box[Number]` |
//! | instance | `Box[Number]` |
//! | callable | `fun (Number, String): Boolean` |
//! | union | `Number | String` |
//! | template | `fun[T] (T): T` |

use crate::store::TypeStore;
use crate::types::{CallableType, ClassId, Type};
use std::fmt::{self, Write};

pub struct TypeFormatter<'s> {
    store: &'s TypeStore,
}

impl<'s> TypeFormatter<'s> {
    pub fn new(store: &'s TypeStore) -> Self {
        Self { store }
    }

    pub fn format(&self, ty: &Type) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_type(&mut out, ty);
        out
    }

    fn write_type(&self, out: &mut impl Write, ty: &Type) -> fmt::Result {
        match ty {
            Type::Class(class) => {
                out.write_str("class ")?;
                self.write_class(out, *class)
            }
            Type::Instance(class) => self.write_class(out, *class),
            Type::Callable(callable) => self.write_callable(out, callable),
            Type::Union(union) => {
                for (i, member) in union.members().iter().enumerate() {
                    if i > 0 {
                        out.write_str(" | ")?;
                    }
                    self.write_type(out, member)?;
                }
                Ok(())
            }
            Type::GenericParam(param) => out.write_str(&param.name),
            Type::Generic(generic) => {
                out.write_str("fun[")?;
                for (i, param) in generic.params.iter().enumerate() {
                    if i > 0 {
                        out.write_str(", ")?;
                    }
                    out.write_str(&param.name)?;
                }
                out.write_str("] ")?;
                match &generic.body {
                    // `fun[T] (T): T` rather than `fun[T] fun (T): T`
                    Type::Callable(body) => self.write_signature(out, body),
                    body => self.write_type(out, body),
                }
            }
            Type::Any => out.write_str("Any"),
            Type::PreviousError => out.write_str("<error>"),
        }
    }

    fn write_class(&self, out: &mut impl Write, class: ClassId) -> fmt::Result {
        let record = self.store.class(class);
        out.write_str(&record.name)?;
        if record.generic_args.is_empty() {
            return Ok(());
        }
        out.write_char('[')?;
        for (i, arg) in record.generic_args.iter().enumerate() {
            if i > 0 {
                out.write_str(", ")?;
            }
            self.write_type(out, arg)?;
        }
        out.write_char(']')
    }

    fn write_callable(&self, out: &mut impl Write, callable: &CallableType) -> fmt::Result {
        out.write_str("fun ")?;
        self.write_signature(out, callable)
    }

    fn write_signature(&self, out: &mut impl Write, callable: &CallableType) -> fmt::Result {
        out.write_char('(')?;
        for (i, param) in callable.params.iter().enumerate() {
            if i > 0 {
                out.write_str(", ")?;
            }
            self.write_type(out, param)?;
        }
        out.write_char(')')?;
        if let Some(returns) = &callable.returns {
            out.write_str(": ")?;
            self.write_type(out, returns)?;
        }
        Ok(())
    }
}

/// `Display` adapter returned by [`TypeStore::display`].
pub struct TypeDisplay<'s> {
    store: &'s TypeStore,
    ty: &'s Type,
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        TypeFormatter::new(self.store).write_type(f, self.ty)
    }
}

impl TypeStore {
    pub fn display<'s>(&'s self, ty: &'s Type) -> TypeDisplay<'s> {
        TypeDisplay { store: self, ty }
    }

    pub fn format_type(&self, ty: &Type) -> String {
        TypeFormatter::new(self).format(ty)
    }
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod tests;
