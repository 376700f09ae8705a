//! Syntax tree consumed by the checker.
//!
//! This is the contract with the front-end: the parser produces these nodes
//! (or their JSON serialization) and the checker only reads them. Every node
//! carries the `Span` diagnostics are reported at.
//!
//! JSON shape: enums are internally tagged by `"kind"`, fields are
//! camelCase, and optional lists may be omitted.

use loxdown_common::Span;
use serde::{Deserialize, Serialize};

/// A name token.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
    #[serde(default)]
    pub span: Span,
}

impl Identifier {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

// =============================================================================
// Type expressions
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TypeExpr {
    /// `Number`, `Box[String]`, `T`
    Named {
        name: Identifier,
        #[serde(default)]
        generic_args: Vec<TypeExpr>,
        #[serde(default)]
        span: Span,
    },
    /// `A | B`
    Union {
        left: Box<TypeExpr>,
        right: Box<TypeExpr>,
        #[serde(default)]
        span: Span,
    },
    /// `fun[T] (T, Number): T`
    Function {
        #[serde(default)]
        generic_params: Vec<Identifier>,
        params: Vec<TypeExpr>,
        #[serde(default)]
        return_type: Option<Box<TypeExpr>>,
        #[serde(default)]
        span: Span,
    },
}

impl TypeExpr {
    pub fn span(&self) -> Span {
        match self {
            Self::Named { span, .. } | Self::Union { span, .. } | Self::Function { span, .. } => {
                *span
            }
        }
    }
}

// =============================================================================
// Expressions
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Bool(bool),
    Number(f64),
    String(String),
    Nil,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = ">=")]
    GreaterEqual,
    #[serde(rename = "<")]
    Less,
    #[serde(rename = "<=")]
    LessEqual,
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    #[serde(rename = "-")]
    Negate,
    #[serde(rename = "!")]
    Not,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalOp {
    And,
    Or,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Expr {
    Literal {
        value: LiteralValue,
        #[serde(default)]
        span: Span,
    },
    Variable {
        name: Identifier,
    },
    Assign {
        name: Identifier,
        value: Box<Expr>,
        #[serde(default)]
        span: Span,
    },
    Binary {
        left: Box<Expr>,
        operator: BinaryOp,
        right: Box<Expr>,
        #[serde(default)]
        span: Span,
    },
    Unary {
        operator: UnaryOp,
        right: Box<Expr>,
        #[serde(default)]
        span: Span,
    },
    Logical {
        left: Box<Expr>,
        operator: LogicalOp,
        right: Box<Expr>,
        #[serde(default)]
        span: Span,
    },
    Grouping {
        expression: Box<Expr>,
        #[serde(default)]
        span: Span,
    },
    Call {
        callee: Box<Expr>,
        #[serde(default)]
        generic_args: Vec<TypeExpr>,
        args: Vec<Expr>,
        #[serde(default)]
        span: Span,
    },
    Get {
        object: Box<Expr>,
        name: Identifier,
        #[serde(default)]
        span: Span,
    },
    Set {
        object: Box<Expr>,
        name: Identifier,
        value: Box<Expr>,
        #[serde(default)]
        span: Span,
    },
    This {
        #[serde(default)]
        span: Span,
    },
    Super {
        method: Identifier,
        #[serde(default)]
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Self::Variable { name } => name.span,
            Self::Literal { span, .. }
            | Self::Assign { span, .. }
            | Self::Binary { span, .. }
            | Self::Unary { span, .. }
            | Self::Logical { span, .. }
            | Self::Grouping { span, .. }
            | Self::Call { span, .. }
            | Self::Get { span, .. }
            | Self::Set { span, .. }
            | Self::This { span }
            | Self::Super { span, .. } => *span,
        }
    }

    /// The variable this expression names, looking through parentheses.
    pub fn as_variable(&self) -> Option<&Identifier> {
        match self {
            Self::Variable { name } => Some(name),
            Self::Grouping { expression, .. } => expression.as_variable(),
            _ => None,
        }
    }
}

// =============================================================================
// Statements
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: Identifier,
    #[serde(default, rename = "type")]
    pub type_annotation: Option<TypeExpr>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDecl {
    pub name: Identifier,
    #[serde(default)]
    pub generic_params: Vec<Identifier>,
    pub params: Vec<Parameter>,
    #[serde(default)]
    pub return_type: Option<TypeExpr>,
    pub body: Vec<Stmt>,
    #[serde(default)]
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuperclassRef {
    pub name: Identifier,
    #[serde(default)]
    pub generic_args: Vec<TypeExpr>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDecl {
    pub name: Identifier,
    #[serde(rename = "type")]
    pub type_annotation: TypeExpr,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassStmt {
    pub name: Identifier,
    #[serde(default)]
    pub generic_params: Vec<Identifier>,
    #[serde(default)]
    pub superclass: Option<SuperclassRef>,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
    #[serde(default)]
    pub methods: Vec<FunctionDecl>,
    #[serde(default)]
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Stmt {
    Expression {
        expression: Expr,
        #[serde(default)]
        span: Span,
    },
    Print {
        expression: Expr,
        #[serde(default)]
        span: Span,
    },
    Var {
        name: Identifier,
        #[serde(default, rename = "type")]
        type_annotation: Option<TypeExpr>,
        #[serde(default)]
        initializer: Option<Expr>,
        #[serde(default)]
        span: Span,
    },
    Block {
        statements: Vec<Stmt>,
        #[serde(default)]
        span: Span,
    },
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        #[serde(default)]
        else_branch: Option<Box<Stmt>>,
        #[serde(default)]
        span: Span,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
        #[serde(default)]
        span: Span,
    },
    Function(FunctionDecl),
    Return {
        #[serde(default)]
        value: Option<Expr>,
        #[serde(default)]
        span: Span,
    },
    Class(ClassStmt),
    /// `type Name[T] = TypeExpr;`
    TypeAlias {
        name: Identifier,
        #[serde(default)]
        generic_params: Vec<Identifier>,
        #[serde(rename = "type")]
        aliased: TypeExpr,
        #[serde(default)]
        span: Span,
    },
}

impl Stmt {
    /// Whether every path through this statement ends in a `return`.
    pub fn always_returns(&self) -> bool {
        match self {
            Self::Return { .. } => true,
            Self::Block { statements, .. } => statements.iter().any(Self::always_returns),
            Self::If {
                then_branch,
                else_branch: Some(else_branch),
                ..
            } => then_branch.always_returns() && else_branch.always_returns(),
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "../tests/ast_tests.rs"]
mod tests;
