//! Syntax tree builders and a checking harness shared by the integration
//! tests.
#![allow(dead_code)]

use loxdown_checker::ast::*;
use loxdown_checker::{CheckerOptions, CheckerState};
use loxdown_common::{Diagnostic, Span};
use loxdown_solver::TypeStore;
use rustc_hash::FxHashMap;

pub fn line(line: u32) -> Span {
    Span::new(line, 1, 1)
}

pub fn id(name: &str) -> Identifier {
    Identifier::new(name, Span::DUMMY)
}

// -----------------------------------------------------------------------------
// Type expressions
// -----------------------------------------------------------------------------

pub fn ty(name: &str) -> TypeExpr {
    ty_args(name, Vec::new())
}

pub fn ty_args(name: &str, generic_args: Vec<TypeExpr>) -> TypeExpr {
    TypeExpr::Named {
        name: id(name),
        generic_args,
        span: Span::DUMMY,
    }
}

pub fn ty_union(left: TypeExpr, right: TypeExpr) -> TypeExpr {
    TypeExpr::Union {
        left: Box::new(left),
        right: Box::new(right),
        span: Span::DUMMY,
    }
}

pub fn ty_fun(generic_params: &[&str], params: Vec<TypeExpr>, returns: Option<TypeExpr>) -> TypeExpr {
    TypeExpr::Function {
        generic_params: generic_params.iter().map(|name| id(name)).collect(),
        params,
        return_type: returns.map(Box::new),
        span: Span::DUMMY,
    }
}

// -----------------------------------------------------------------------------
// Expressions
// -----------------------------------------------------------------------------

fn literal(value: LiteralValue) -> Expr {
    Expr::Literal {
        value,
        span: Span::DUMMY,
    }
}

pub fn num(value: f64) -> Expr {
    literal(LiteralValue::Number(value))
}

pub fn string(value: &str) -> Expr {
    literal(LiteralValue::String(value.to_string()))
}

pub fn boolean(value: bool) -> Expr {
    literal(LiteralValue::Bool(value))
}

pub fn nil() -> Expr {
    literal(LiteralValue::Nil)
}

pub fn var(name: &str) -> Expr {
    Expr::Variable { name: id(name) }
}

pub fn var_at(name: &str, span: Span) -> Expr {
    Expr::Variable {
        name: Identifier::new(name, span),
    }
}

pub fn assign(name: &str, value: Expr) -> Expr {
    Expr::Assign {
        name: id(name),
        value: Box::new(value),
        span: Span::DUMMY,
    }
}

pub fn binary(left: Expr, operator: BinaryOp, right: Expr) -> Expr {
    Expr::Binary {
        left: Box::new(left),
        operator,
        right: Box::new(right),
        span: Span::DUMMY,
    }
}

pub fn unary(operator: UnaryOp, right: Expr) -> Expr {
    Expr::Unary {
        operator,
        right: Box::new(right),
        span: Span::DUMMY,
    }
}

pub fn logical(left: Expr, operator: LogicalOp, right: Expr) -> Expr {
    Expr::Logical {
        left: Box::new(left),
        operator,
        right: Box::new(right),
        span: Span::DUMMY,
    }
}

pub fn group(expression: Expr) -> Expr {
    Expr::Grouping {
        expression: Box::new(expression),
        span: Span::DUMMY,
    }
}

pub fn call(callee: Expr, args: Vec<Expr>) -> Expr {
    call_generic(callee, Vec::new(), args)
}

pub fn call_generic(callee: Expr, generic_args: Vec<TypeExpr>, args: Vec<Expr>) -> Expr {
    Expr::Call {
        callee: Box::new(callee),
        generic_args,
        args,
        span: Span::DUMMY,
    }
}

pub fn call_at(callee: Expr, args: Vec<Expr>, span: Span) -> Expr {
    Expr::Call {
        callee: Box::new(callee),
        generic_args: Vec::new(),
        args,
        span,
    }
}

pub fn get(object: Expr, name: &str) -> Expr {
    Expr::Get {
        object: Box::new(object),
        name: id(name),
        span: Span::DUMMY,
    }
}

pub fn set(object: Expr, name: &str, value: Expr) -> Expr {
    Expr::Set {
        object: Box::new(object),
        name: id(name),
        value: Box::new(value),
        span: Span::DUMMY,
    }
}

pub fn this() -> Expr {
    Expr::This { span: Span::DUMMY }
}

pub fn super_method(method: &str) -> Expr {
    Expr::Super {
        method: id(method),
        span: Span::DUMMY,
    }
}

// -----------------------------------------------------------------------------
// Statements
// -----------------------------------------------------------------------------

pub fn expr_stmt(expression: Expr) -> Stmt {
    Stmt::Expression {
        expression,
        span: Span::DUMMY,
    }
}

pub fn print(expression: Expr) -> Stmt {
    Stmt::Print {
        expression,
        span: Span::DUMMY,
    }
}

pub fn var_decl(name: &str, annotation: Option<TypeExpr>, initializer: Option<Expr>) -> Stmt {
    Stmt::Var {
        name: id(name),
        type_annotation: annotation,
        initializer,
        span: Span::DUMMY,
    }
}

pub fn block(statements: Vec<Stmt>) -> Stmt {
    Stmt::Block {
        statements,
        span: Span::DUMMY,
    }
}

pub fn if_stmt(condition: Expr, then_branch: Stmt, else_branch: Option<Stmt>) -> Stmt {
    Stmt::If {
        condition,
        then_branch: Box::new(then_branch),
        else_branch: else_branch.map(Box::new),
        span: Span::DUMMY,
    }
}

pub fn while_stmt(condition: Expr, body: Stmt) -> Stmt {
    Stmt::While {
        condition,
        body: Box::new(body),
        span: Span::DUMMY,
    }
}

pub fn ret(value: Option<Expr>) -> Stmt {
    Stmt::Return {
        value,
        span: Span::DUMMY,
    }
}

pub fn param(name: &str, annotation: Option<TypeExpr>) -> Parameter {
    Parameter {
        name: id(name),
        type_annotation: annotation,
    }
}

pub fn fun_decl(
    name: &str,
    generic_params: &[&str],
    params: Vec<Parameter>,
    returns: Option<TypeExpr>,
    body: Vec<Stmt>,
) -> FunctionDecl {
    FunctionDecl {
        name: id(name),
        generic_params: generic_params.iter().map(|name| id(name)).collect(),
        params,
        return_type: returns,
        body,
        span: Span::DUMMY,
    }
}

pub fn fun(
    name: &str,
    generic_params: &[&str],
    params: Vec<Parameter>,
    returns: Option<TypeExpr>,
    body: Vec<Stmt>,
) -> Stmt {
    Stmt::Function(fun_decl(name, generic_params, params, returns, body))
}

pub fn superclass(name: &str, generic_args: Vec<TypeExpr>) -> SuperclassRef {
    SuperclassRef {
        name: id(name),
        generic_args,
    }
}

pub fn class(
    name: &str,
    generic_params: &[&str],
    superclass: Option<SuperclassRef>,
    fields: Vec<(&str, TypeExpr)>,
    methods: Vec<FunctionDecl>,
) -> Stmt {
    Stmt::Class(ClassStmt {
        name: id(name),
        generic_params: generic_params.iter().map(|name| id(name)).collect(),
        superclass,
        fields: fields
            .into_iter()
            .map(|(name, annotation)| FieldDecl {
                name: id(name),
                type_annotation: annotation,
            })
            .collect(),
        methods,
        span: Span::DUMMY,
    })
}

pub fn type_alias(name: &str, generic_params: &[&str], aliased: TypeExpr) -> Stmt {
    Stmt::TypeAlias {
        name: id(name),
        generic_params: generic_params.iter().map(|name| id(name)).collect(),
        aliased,
        span: Span::DUMMY,
    }
}

// -----------------------------------------------------------------------------
// Harness
// -----------------------------------------------------------------------------

/// The outcome of checking a program: its diagnostics and the rendered
/// types of its top-level declarations.
#[derive(Debug)]
pub struct Checked {
    pub diagnostics: Vec<Diagnostic>,
    globals: FxHashMap<String, String>,
}

impl Checked {
    pub fn codes(&self) -> Vec<u32> {
        self.diagnostics.iter().map(|diag| diag.code).collect()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.diagnostics
            .iter()
            .map(|diag| diag.message_text.as_str())
            .collect()
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// The rendered type of a top-level declaration.
    pub fn type_of(&self, name: &str) -> Option<&str> {
        self.globals.get(name).map(String::as_str)
    }
}

pub fn check(statements: Vec<Stmt>) -> Checked {
    check_with(statements, CheckerOptions::default())
}

pub fn check_with(statements: Vec<Stmt>, options: CheckerOptions) -> Checked {
    let program = Program { statements };
    let store = TypeStore::new();
    let mut checker = CheckerState::new(&store, options);
    checker.check_program(&program);

    let mut globals = FxHashMap::default();
    for stmt in &program.statements {
        let name = match stmt {
            Stmt::Var { name, .. } => name,
            Stmt::Function(decl) => &decl.name,
            Stmt::Class(class) => &class.name,
            _ => continue,
        };
        if let Some(ty) = checker.global_type(&name.name) {
            let rendered = checker.display_type(ty);
            globals.insert(name.name.clone(), rendered);
        }
    }

    Checked {
        diagnostics: checker.into_diagnostics(),
        globals,
    }
}
