//! The global environment every program is checked in: builtin classes and
//! native functions.

use crate::class_checker::MemberSlot;
use loxdown_solver::{
    CallableType, ClassDecl, ClassId, MemberMap, Name, NarrowingMap, NarrowingProducer, Type,
    TypeStore,
};
use std::sync::Arc;

/// Ids of the builtin classes declared into a store.
#[derive(Clone, Copy, Debug)]
pub struct Builtins {
    pub number: ClassId,
    pub string: ClassId,
    pub boolean: ClassId,
    pub function: ClassId,
}

impl Builtins {
    /// Declare the builtin classes. `Class` and `Nil` come with the store.
    pub fn declare(store: &TypeStore) -> Self {
        let number_methods = MemberSlot::new();
        let string_methods = MemberSlot::new();
        let boolean_methods = MemberSlot::new();
        let number =
            store.declare_class(ClassDecl::new("Number").with_methods(number_methods.members()));
        let string =
            store.declare_class(ClassDecl::new("String").with_methods(string_methods.members()));
        let boolean =
            store.declare_class(ClassDecl::new("Boolean").with_methods(boolean_methods.members()));
        let function = store.declare_class(ClassDecl::new("Function"));

        // Conversion constructors: `Number("3")`, `String(x)`, `Boolean(x)`.
        let number_input = store.union(&Type::Instance(number), &Type::Instance(string));
        number_methods.fill(init_only(vec![number_input]));
        string_methods.fill(init_only(vec![Type::Any]));
        boolean_methods.fill(init_only(vec![Type::Any]));

        Self {
            number,
            string,
            boolean,
            function,
        }
    }

    pub fn number(&self) -> Type {
        Type::Instance(self.number)
    }

    pub fn string(&self) -> Type {
        Type::Instance(self.string)
    }

    pub fn boolean(&self) -> Type {
        Type::Instance(self.boolean)
    }

    /// Builtin class names visible in both type and value position.
    pub fn classes(&self) -> [(&'static str, ClassId); 6] {
        [
            ("Number", self.number),
            ("String", self.string),
            ("Boolean", self.boolean),
            ("Function", self.function),
            ("Class", ClassId::METACLASS),
            ("Nil", ClassId::NIL),
        ]
    }

    /// Native functions visible as global values.
    pub fn natives(&self, store: &TypeStore) -> Vec<(&'static str, Type)> {
        let class_object = Type::Instance(ClassId::METACLASS);
        vec![
            ("clock", Type::callable(Vec::new(), Some(self.number()))),
            (
                "isInstance",
                Type::Callable(Arc::new(
                    CallableType::new(vec![Type::Any, class_object.clone()], Some(self.boolean()))
                        .with_narrowing(is_instance_narrowing()),
                )),
            ),
            (
                "type",
                Type::callable(
                    vec![Type::Any],
                    Some(store.union(&class_object, &Type::nil())),
                ),
            ),
        ]
    }
}

/// `isInstance(value, SomeClass)` proves `value` is a `SomeClass` instance.
fn is_instance_narrowing() -> NarrowingProducer {
    NarrowingProducer::new(|args| {
        let mut narrowed = NarrowingMap::default();
        if let Some(Type::Class(class)) = args.get(1) {
            narrowed.insert(0, Type::Instance(*class));
        }
        narrowed
    })
}

fn init_only(params: Vec<Type>) -> MemberMap {
    let mut methods = MemberMap::default();
    methods.insert(Name::from("init"), Type::callable(params, None));
    methods
}

#[cfg(test)]
#[path = "../tests/builtins_tests.rs"]
mod tests;
