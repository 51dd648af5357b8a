use crate::Span;

use super::{ast::TypeExpr, expressions::LiteralExpr};

/// A plain type name: `int`, `string`, `Person`, `T`.
#[derive(Debug, Clone)]
pub struct SymbolType {
    pub name: String,
    pub span: Span,
}

/// `Array<int>`, `Map<string>`, `Person<T, int>`.
#[derive(Debug, Clone)]
pub struct GenericType {
    pub name: String,
    pub arguments: Vec<TypeExpr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct UnionType {
    pub members: Vec<TypeExpr>,
    pub span: Span,
}

/// A single literal option such as `"red"` or `1` inside a literal type.
#[derive(Debug, Clone)]
pub struct LiteralType {
    pub literal: LiteralExpr,
    pub span: Span,
}

/// `(int, string) => bool`
#[derive(Debug, Clone)]
pub struct FunctionType {
    pub parameters: Vec<TypeExpr>,
    pub is_vararg: bool,
    pub return_type: Option<Box<TypeExpr>>,
    pub span: Span,
}
