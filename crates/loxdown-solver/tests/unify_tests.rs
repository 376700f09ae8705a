use super::*;
use crate::class_type::ClassDecl;
use crate::fixtures::Fixture;

#[test]
fn test_every_type_is_compatible_with_itself() {
    let fx = Fixture::new();
    let (box_id, t) = fx.box_class();
    let samples = vec![
        fx.number(),
        Type::Class(fx.number),
        Type::Instance(box_id),
        Type::callable(vec![fx.number()], Some(fx.string())),
        fx.union(&[fx.number(), fx.string()]),
        Type::GenericParam(t),
        Type::Any,
        Type::PreviousError,
    ];
    for ty in &samples {
        assert!(fx.store.is_compatible(ty, ty), "{} not reflexive", fx.store.display(ty));
    }
}

#[test]
fn test_error_marker_and_any_are_compatible_both_ways() {
    let fx = Fixture::new();
    for ty in [fx.number(), Type::Class(fx.string), fx.union(&[fx.number(), fx.boolean()])] {
        assert!(fx.store.is_compatible(&Type::PreviousError, &ty));
        assert!(fx.store.is_compatible(&ty, &Type::PreviousError));
        assert!(fx.store.is_compatible(&Type::Any, &ty));
        assert!(fx.store.is_compatible(&ty, &Type::Any));
    }
}

#[test]
fn test_subclass_instance_is_compatible_with_base_only() {
    let fx = Fixture::new();
    let base = fx.class("Base", None);
    let derived = fx.class("Derived", Some(base));

    assert!(fx.store.is_compatible(&Type::Instance(derived), &Type::Instance(base)));
    assert!(!fx.store.is_compatible(&Type::Instance(base), &Type::Instance(derived)));
    assert!(fx.store.is_compatible(&Type::Class(derived), &Type::Class(base)));
}

#[test]
fn test_unrelated_classes_are_incompatible() {
    let fx = Fixture::new();
    assert!(!fx.store.is_compatible(&fx.number(), &fx.string()));
    assert!(!fx.store.is_compatible(&fx.number(), &Type::Class(fx.number)));
}

#[test]
fn test_class_object_is_an_instance_of_the_metaclass() {
    let fx = Fixture::new();
    let metaclass = Type::Instance(ClassId::METACLASS);

    assert!(fx.store.is_compatible(&Type::Class(fx.number), &metaclass));
    assert!(!fx.store.is_compatible(&fx.number(), &metaclass));
}

#[test]
fn test_generic_arguments_are_covariant() {
    let fx = Fixture::new();
    let (box_id, _) = fx.box_class();
    let base = fx.class("Base", None);
    let derived = fx.class("Derived", Some(base));

    let box_number = fx.store.instantiate_with_args(box_id, &[fx.number()]).unwrap();
    let box_string = fx.store.instantiate_with_args(box_id, &[fx.string()]).unwrap();
    let box_base = fx.store.instantiate_with_args(box_id, &[Type::Instance(base)]).unwrap();
    let box_derived = fx.store.instantiate_with_args(box_id, &[Type::Instance(derived)]).unwrap();

    assert!(!fx.store.is_compatible(&Type::Instance(box_number), &Type::Instance(box_string)));
    assert!(fx.store.is_compatible(&Type::Instance(box_derived), &Type::Instance(box_base)));
    assert!(!fx.store.is_compatible(&Type::Instance(box_base), &Type::Instance(box_derived)));
}

#[test]
fn test_union_target_accepts_any_member() {
    let fx = Fixture::new();
    let number_or_string = fx.union(&[fx.number(), fx.string()]);

    assert!(fx.store.is_compatible(&fx.number(), &number_or_string));
    assert!(fx.store.is_compatible(&fx.string(), &number_or_string));
    assert!(!fx.store.is_compatible(&fx.boolean(), &number_or_string));
}

#[test]
fn test_union_candidate_requires_every_member() {
    let fx = Fixture::new();
    let number_or_string = fx.union(&[fx.number(), fx.string()]);
    let wider = fx.union(&[fx.number(), fx.string(), fx.boolean()]);

    assert!(!fx.store.is_compatible(&number_or_string, &fx.number()));
    assert!(fx.store.is_compatible(&number_or_string, &wider));
    assert!(!fx.store.is_compatible(&wider, &number_or_string));
}

#[test]
fn test_callable_parameters_are_contravariant() {
    let fx = Fixture::new();
    let base = fx.class("Base", None);
    let derived = fx.class("Derived", Some(base));
    let takes_base = Type::callable(vec![Type::Instance(base)], None);
    let takes_derived = Type::callable(vec![Type::Instance(derived)], None);

    assert!(fx.store.is_compatible(&takes_base, &takes_derived));
    assert!(!fx.store.is_compatible(&takes_derived, &takes_base));
}

#[test]
fn test_callable_returns_are_covariant_and_absent_is_nil() {
    let fx = Fixture::new();
    let base = fx.class("Base", None);
    let derived = fx.class("Derived", Some(base));
    let gives_base = Type::callable(Vec::new(), Some(Type::Instance(base)));
    let gives_derived = Type::callable(Vec::new(), Some(Type::Instance(derived)));
    let gives_nothing = Type::callable(Vec::new(), None);
    let gives_nil = Type::callable(Vec::new(), Some(Type::nil()));

    assert!(fx.store.is_compatible(&gives_derived, &gives_base));
    assert!(!fx.store.is_compatible(&gives_base, &gives_derived));
    assert!(fx.store.is_compatible(&gives_nothing, &gives_nil));
    assert!(fx.store.is_compatible(&gives_nil, &gives_nothing));
}

#[test]
fn test_callable_arity_must_match() {
    let fx = Fixture::new();
    let one = Type::callable(vec![fx.number()], None);
    let two = Type::callable(vec![fx.number(), fx.number()], None);
    assert!(!fx.store.is_compatible(&one, &two));
}

#[test]
fn test_class_candidate_contributes_its_constructor() {
    let fx = Fixture::new();
    let (box_id, _) = fx.box_class();
    let box_number = fx.store.instantiate_with_args(box_id, &[fx.number()]).unwrap();
    let factory = Type::callable(vec![fx.number()], Some(Type::Instance(box_number)));

    assert!(fx.store.is_compatible(&Type::Class(box_number), &factory));
    assert!(!fx.store.is_compatible(&Type::Class(fx.number), &factory));
}

#[test]
fn test_unbound_candidate_parameter_binds_to_target() {
    let fx = Fixture::new();
    let t = fx.store.fresh_generic_param("T");
    let mut bindings = GenericBindings::new();

    assert!(fx.store.unify(&fx.number(), &Type::GenericParam(t.clone()), Some(&mut bindings)));
    assert_eq!(bindings.get(t.id), Some(&fx.number()));

    // Once bound, the parameter behaves as its binding.
    assert!(!fx.store.unify(&fx.string(), &Type::GenericParam(t.clone()), Some(&mut bindings)));
    assert!(fx.store.unify(&fx.number(), &Type::GenericParam(t), Some(&mut bindings)));
}

#[test]
fn test_self_bound_parameter_short_circuits() {
    let fx = Fixture::new();
    let t = fx.store.fresh_generic_param("T");
    let mut bindings = GenericBindings::new();
    bindings.bind(&t, Type::GenericParam(t.clone()));

    assert!(fx.store.unify(&fx.string(), &Type::GenericParam(t.clone()), Some(&mut bindings)));
    assert_eq!(bindings.get(t.id), Some(&Type::GenericParam(t)));
}

#[test]
fn test_generic_param_target_matches_only_itself_without_bindings() {
    let fx = Fixture::new();
    let t = fx.store.fresh_generic_param("T");
    let u = fx.store.fresh_generic_param("U");

    assert!(!fx.store.is_compatible(&fx.number(), &Type::GenericParam(t.clone())));
    assert!(!fx.store.is_compatible(&Type::GenericParam(u), &Type::GenericParam(t)));
}

#[test]
fn test_failed_union_alternative_rolls_back_bindings() {
    let fx = Fixture::new();
    let k = fx.store.fresh_generic_param("K");
    let v = fx.store.fresh_generic_param("V");
    let map = fx
        .store
        .declare_class(ClassDecl::new("Map").with_generic_params(vec![k, v]));
    let t = fx.store.fresh_generic_param("T");
    let t_ty = Type::GenericParam(t.clone());

    let number_to_string = fx
        .store
        .instantiate_with_args(map, &[fx.number(), fx.string()])
        .unwrap();
    let string_to_string = fx
        .store
        .instantiate_with_args(map, &[fx.string(), fx.string()])
        .unwrap();
    let t_to_t = fx
        .store
        .instantiate_with_args(map, &[t_ty.clone(), t_ty])
        .unwrap();
    let target = fx.union(&[
        Type::Instance(number_to_string),
        Type::Instance(string_to_string),
    ]);

    // The first alternative binds T to Number before failing on String.
    let mut bindings = GenericBindings::new();
    assert!(fx.store.unify(&target, &Type::Instance(t_to_t), Some(&mut bindings)));
    assert_eq!(bindings.get(t.id), Some(&fx.string()));
}

#[test]
fn test_generic_template_matches_only_itself() {
    let fx = Fixture::new();
    let t = fx.store.fresh_generic_param("T");
    let body = Type::callable(vec![Type::GenericParam(t.clone())], Some(Type::GenericParam(t.clone())));
    let identity = Type::generic(vec![t.clone()], body.clone());
    let copy = Type::generic(vec![t], body);

    assert!(fx.store.is_compatible(&identity, &identity.clone()));
    assert!(!fx.store.is_compatible(&copy, &identity));
}
