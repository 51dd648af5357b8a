use crate::{lexer::tokens::Token, Span};

use super::{ast::{Expr, TypeExpr}, statements::BlockStmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LiteralKind {
    Nil,
    True,
    False,
    Integer,
    Float,
    String,
}

/// `nil`, `true`, `false`, numbers and strings. `value` is the token text (unquoted for strings).
#[derive(Debug, Clone)]
pub struct LiteralExpr {
    pub kind: LiteralKind,
    pub value: String,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct VarargExpr {
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct SymbolExpr {
    pub value: String,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum IndexKey {
    /// `a.name`
    Name(String),
    /// `a[expr]`
    Expr(Box<Expr>),
}

#[derive(Debug, Clone)]
pub struct IndexExpr {
    pub object: Box<Expr>,
    pub key: IndexKey,
    pub span: Span,
}

/// `f(args)`, or `obj:method(args)` when `method` is set.
#[derive(Debug, Clone)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub method: Option<String>,
    pub arguments: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub explicit_type: Option<TypeExpr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct FunctionBody {
    pub parameters: Vec<Param>,
    pub is_vararg: bool,
    pub return_type: Option<TypeExpr>,
    pub body: BlockStmt,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct FunctionExpr {
    pub function: FunctionBody,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum LambdaBody {
    Expr(Box<Expr>),
    Block(BlockStmt),
}

/// `(a, b) => a + b` or `x => do ... end`. Rewritten into a `FunctionExpr` before checking.
#[derive(Debug, Clone)]
pub struct LambdaExpr {
    pub parameters: Vec<Param>,
    pub is_vararg: bool,
    pub body: LambdaBody,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct PrefixExpr {
    pub operator: Token,
    pub right_expr: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ParenExpr {
    pub inner: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum TableField {
    /// `value`
    Positional(Expr),
    /// `name = value`, or `name: value` while `colon_syntax` is still set
    Named {
        name: String,
        value: Expr,
        colon_syntax: bool,
    },
    /// `'name': value`, before rewriting
    StringKeyed { key: String, value: Expr, span: Span },
    /// `[key] = value`
    Keyed { key: Expr, value: Expr },
}

#[derive(Debug, Clone)]
pub struct TableExpr {
    pub fields: Vec<TableField>,
    /// Written with `[ ... ]`
    pub is_array_literal: bool,
    pub span: Span,
}

/// `Name<T1, T2>` in expression position, e.g. `Contract<Storage>()`.
#[derive(Debug, Clone)]
pub struct GenericInstanceExpr {
    pub name: String,
    pub type_arguments: Vec<TypeExpr>,
    pub span: Span,
}
