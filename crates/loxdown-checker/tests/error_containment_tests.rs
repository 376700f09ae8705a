//! One mistake, one diagnostic: the error marker flows through every rule
//! without producing follow-on reports.

mod support;

use loxdown_checker::CheckerOptions;
use loxdown_checker::ast::{BinaryOp, Expr, UnaryOp};
use loxdown_common::Span;
use loxdown_common::diagnostics::diagnostic_codes;
use support::*;

#[test]
fn test_undefined_variable_reports_once_through_operators() {
    let program = vec![var_decl(
        "total",
        Some(ty("Number")),
        Some(binary(
            unary(UnaryOp::Negate, var_at("missing", Span::new(3, 14, 7))),
            BinaryOp::Add,
            num(1.0),
        )),
    )];

    let checked = check(program);
    assert_eq!(checked.codes(), vec![diagnostic_codes::UNDEFINED_VARIABLE]);
    assert_eq!(checked.diagnostics[0].span, Span::new(3, 14, 7));
    assert_eq!(checked.messages(), vec!["Undefined variable 'missing'."]);
}

#[test]
fn test_error_callee_and_property_chains_are_silent() {
    let program = vec![
        expr_stmt(call(var("missing"), vec![num(1.0), string("two")])),
        expr_stmt(get(get(var("alsoMissing"), "first"), "second")),
        expr_stmt(set(var("stillMissing"), "field", num(1.0))),
    ];

    let checked = check(program);
    assert_eq!(
        checked.codes(),
        vec![
            diagnostic_codes::UNDEFINED_VARIABLE,
            diagnostic_codes::UNDEFINED_VARIABLE,
            diagnostic_codes::UNDEFINED_VARIABLE,
        ]
    );
}

#[test]
fn test_error_variable_is_usable_everywhere() {
    // var broken: Nope; then use broken as every kind of value.
    let program = vec![
        var_decl("broken", Some(ty("Nope")), None),
        var_decl("n", Some(ty("Number")), Some(var("broken"))),
        var_decl("s", Some(ty("String")), Some(var("broken"))),
        expr_stmt(call(var("broken"), Vec::new())),
        expr_stmt(binary(var("broken"), BinaryOp::Multiply, num(2.0))),
    ];

    let checked = check(program);
    assert_eq!(checked.codes(), vec![diagnostic_codes::UNDEFINED_TYPE]);
    assert_eq!(checked.messages(), vec!["Undefined type 'Nope'."]);
    assert_eq!(checked.type_of("broken"), Some("<error>"));
}

#[test]
fn test_argument_error_does_not_cascade_into_result() {
    // fun half(x: Number): Number { return x / 2; }
    // var h: String = half("ten");
    let program = vec![
        fun(
            "half",
            &[],
            vec![param("x", Some(ty("Number")))],
            Some(ty("Number")),
            vec![ret(Some(binary(var("x"), BinaryOp::Divide, num(2.0))))],
        ),
        var_decl("h", Some(ty("String")), Some(call(var("half"), vec![string("ten")]))),
    ];

    let checked = check(program);
    assert_eq!(
        checked.messages(),
        vec!["Type 'String' is not compatible with type 'Number'."]
    );
}

#[test]
fn test_any_flows_without_diagnostics() {
    let program = vec![
        var_decl("anything", None, None),
        var_decl("n", Some(ty("Number")), Some(var("anything"))),
        var_decl("called", None, Some(call(var("anything"), vec![num(1.0), num(2.0)]))),
        var_decl("field", None, Some(get(var("anything"), "whatever"))),
        var_decl("sum", None, Some(binary(var("anything"), BinaryOp::Add, num(1.0)))),
    ];

    let checked = check(program);
    assert!(checked.is_clean(), "unexpected diagnostics: {:?}", checked.messages());
    assert_eq!(checked.type_of("anything"), Some("Any"));
    assert_eq!(checked.type_of("called"), Some("Any"));
    assert_eq!(checked.type_of("field"), Some("Any"));
    assert_eq!(checked.type_of("sum"), Some("Any"));
}

#[test]
fn test_diagnostic_limit_drops_the_rest() {
    let program = (0..10)
        .map(|i| expr_stmt(var(&format!("missing{i}"))))
        .collect();
    let options = CheckerOptions {
        max_diagnostics: 3,
        ..CheckerOptions::default()
    };

    let checked = check_with(program, options);
    assert_eq!(checked.diagnostics.len(), 3);
    assert_eq!(checked.messages()[2], "Undefined variable 'missing2'.");
}

#[test]
fn test_deep_nesting_reports_once_and_recovers() {
    let mut nested: Expr = num(1.0);
    for _ in 0..40 {
        nested = group(nested);
    }
    let options = CheckerOptions {
        max_check_depth: 16,
        ..CheckerOptions::default()
    };
    let program = vec![
        var_decl("deep", Some(ty("Number")), Some(nested)),
        var_decl("after", Some(ty("Number")), Some(string("checked"))),
    ];

    let checked = check_with(program, options);
    assert_eq!(
        checked.codes(),
        vec![
            diagnostic_codes::CHECK_DEPTH_EXCEEDED,
            diagnostic_codes::INCOMPATIBLE_TYPES,
        ]
    );
}

#[test]
fn test_value_used_as_type() {
    let program = vec![
        var_decl("count", None, Some(num(1.0))),
        var_decl("x", Some(ty("count")), None),
        var_decl("y", Some(ty("x")), None),
    ];

    let checked = check(program);
    assert_eq!(checked.codes(), vec![diagnostic_codes::NOT_A_TYPE, diagnostic_codes::NOT_A_TYPE]);
    assert_eq!(checked.messages()[0], "'count' is a value, not a type.");
}

#[test]
fn test_calling_a_non_callable() {
    let program = vec![
        var_decl("n", None, Some(num(1.0))),
        expr_stmt(call(var("n"), Vec::new())),
    ];

    let checked = check(program);
    assert_eq!(
        checked.messages(),
        vec!["Can only call functions and classes, not 'Number'."]
    );
}

#[test]
fn test_argument_count_mismatch() {
    let program = vec![
        fun("two", &[], vec![param("a", None), param("b", None)], None, Vec::new()),
        expr_stmt(call(var("two"), vec![num(1.0)])),
    ];

    let checked = check(program);
    assert_eq!(checked.messages(), vec!["Expected 2 arguments but got 1."]);
}
