use super::*;
use crate::fixtures::Fixture;
use crate::types::{NarrowingMap, NarrowingProducer, UnionType};

#[test]
fn test_union_with_itself_is_identity() {
    let fx = Fixture::new();
    let number_or_string = fx.union(&[fx.number(), fx.string()]);
    for ty in [fx.number(), number_or_string, Type::Any] {
        assert_eq!(fx.store.union(&ty, &ty), ty);
    }
}

#[test]
fn test_union_is_commutative() {
    let fx = Fixture::new();
    let base = fx.class("Base", None);
    let derived = fx.class("Derived", Some(base));
    let pairs = [
        (fx.number(), fx.string()),
        (Type::Instance(base), Type::Instance(derived)),
        (fx.union(&[fx.number(), fx.string()]), fx.boolean()),
        (fx.union(&[fx.number(), fx.string()]), fx.union(&[fx.string(), fx.boolean()])),
    ];
    for (a, b) in &pairs {
        assert_eq!(fx.store.union(a, b), fx.store.union(b, a));
    }
}

#[test]
fn test_union_absorbs_error_marker_and_any() {
    let fx = Fixture::new();
    assert_eq!(fx.store.union(&fx.number(), &Type::PreviousError), Type::PreviousError);
    assert_eq!(fx.store.union(&Type::Any, &Type::PreviousError), Type::PreviousError);
    assert_eq!(fx.store.union(&fx.number(), &Type::Any), Type::Any);
}

#[test]
fn test_union_drops_subsumed_members() {
    let fx = Fixture::new();
    let base = fx.class("Base", None);
    let derived = fx.class("Derived", Some(base));

    assert_eq!(
        fx.store.union(&Type::Instance(derived), &Type::Instance(base)),
        Type::Instance(base)
    );
    let mixed = fx.union(&[fx.number(), Type::Instance(derived)]);
    let widened = fx.store.union(&mixed, &Type::Instance(base));
    assert_eq!(widened, fx.union(&[fx.number(), Type::Instance(base)]));
    assert_eq!(widened.as_union().map(UnionType::len), Some(2));
}

#[test]
fn test_union_flattens_nested_unions() {
    let fx = Fixture::new();
    let left = fx.union(&[fx.number(), fx.string()]);
    let right = fx.union(&[fx.boolean(), fx.string()]);
    let all = fx.store.union(&left, &right);

    let union = all.as_union().expect("three alternatives");
    assert_eq!(union.len(), 3);
    assert!(union.members().iter().all(|member| !member.is_union()));
}

#[test]
fn test_union_of_callables_merges_signatures() {
    let fx = Fixture::new();
    let base = fx.class("Base", None);
    let derived = fx.class("Derived", Some(base));
    let left = Type::callable(vec![Type::Instance(base)], Some(fx.number()));
    let right = Type::callable(vec![Type::Instance(derived)], Some(fx.string()));

    assert_eq!(
        fx.store.union(&left, &right),
        Type::callable(
            vec![Type::Instance(derived)],
            Some(fx.union(&[fx.number(), fx.string()]))
        )
    );
}

#[test]
fn test_callable_merge_requires_equal_arity_and_overlapping_params() {
    let fx = Fixture::new();
    let unary = CallableType::new(vec![fx.number()], None);
    let binary = CallableType::new(vec![fx.number(), fx.number()], None);
    let takes_string = CallableType::new(vec![fx.string()], None);

    assert!(fx.store.attempt_union_of_callables(&unary, &binary).is_none());
    assert!(fx.store.attempt_union_of_callables(&unary, &takes_string).is_none());

    let merged = fx
        .store
        .attempt_union_of_callables(&unary, &unary.clone())
        .expect("same signature merges");
    assert_eq!(merged.returns, None);

    let with_nil = CallableType::new(vec![fx.number()], Some(fx.number()));
    let merged = fx.store.attempt_union_of_callables(&unary, &with_nil).unwrap();
    assert_eq!(merged.returns, Some(fx.union(&[Type::nil(), fx.number()])));
}

#[test]
fn test_callable_merge_keeps_only_shared_producer() {
    let fx = Fixture::new();
    let producer = NarrowingProducer::new(|_| NarrowingMap::default());
    let other = NarrowingProducer::new(|_| NarrowingMap::default());
    let guard = CallableType::new(vec![Type::Any], Some(fx.boolean()));

    let shared = fx
        .store
        .attempt_union_of_callables(
            &guard.clone().with_narrowing(producer.clone()),
            &guard.clone().with_narrowing(producer.clone()),
        )
        .unwrap();
    assert_eq!(shared.narrowing, Some(producer.clone()));

    let mixed = fx
        .store
        .attempt_union_of_callables(
            &guard.clone().with_narrowing(producer),
            &guard.with_narrowing(other),
        )
        .unwrap();
    assert!(mixed.narrowing.is_none());
}

#[test]
fn test_intersection_picks_narrower_side() {
    let fx = Fixture::new();
    let number_or_string = fx.union(&[fx.number(), fx.string()]);

    assert_eq!(fx.store.intersection(&fx.number(), &number_or_string), Some(fx.number()));
    assert_eq!(fx.store.intersection(&number_or_string, &fx.number()), Some(fx.number()));
    assert_eq!(fx.store.intersection(&fx.number(), &fx.string()), None);
    assert_eq!(fx.store.intersection(&Type::Any, &fx.string()), Some(Type::Any));
}

#[test]
fn test_complement_identities() {
    let fx = Fixture::new();
    let number_or_string = fx.union(&[fx.number(), fx.string()]);

    assert_eq!(fx.store.complement(&number_or_string, &fx.number()), fx.string());
    assert_eq!(fx.store.complement(&fx.number(), &fx.number()), Type::PreviousError);
    assert_eq!(fx.store.complement(&fx.number(), &fx.string()), fx.number());
    assert_eq!(
        fx.store.complement(&number_or_string, &fx.boolean()),
        number_or_string
    );
    assert_eq!(
        fx.store.complement(&number_or_string, &number_or_string),
        Type::PreviousError
    );
    assert_eq!(fx.store.complement(&Type::Any, &fx.number()), Type::Any);
    assert_eq!(
        fx.store.complement(&Type::PreviousError, &fx.number()),
        Type::PreviousError
    );
}

#[test]
fn test_complement_removes_subclasses_of_right() {
    let fx = Fixture::new();
    let base = fx.class("Base", None);
    let derived = fx.class("Derived", Some(base));
    let either = fx.union(&[Type::Instance(derived), fx.number()]);

    assert_eq!(fx.store.complement(&either, &Type::Instance(base)), fx.number());
}
