use std::slice::{Iter, IterMut};

use crate::Span;

use super::{ast::{Expr, Stmt, TypeExpr}, expressions::FunctionBody};

#[derive(Debug, Clone)]
pub struct BlockStmt {
    pub body: Vec<Stmt>,
    pub id: i32,
    pub span: Span
}

impl BlockStmt {
    pub fn iter(&self) -> Iter<'_, Stmt> {
        self.body.iter()
    }
    pub fn iter_mut(&mut self) -> IterMut<'_, Stmt> {
        self.body.iter_mut()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Local,
    Let,
    Var,
}

impl DeclKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            DeclKind::Local => "local",
            DeclKind::Let => "let",
            DeclKind::Var => "var",
        }
    }
}

/// A declared name with its optional annotation, as in `local a: int`.
#[derive(Debug, Clone)]
pub struct LocalName {
    pub name: String,
    pub explicit_type: Option<TypeExpr>,
    pub span: Span
}

#[derive(Debug, Clone)]
pub struct LocalStmt {
    pub kind: DeclKind,
    pub names: Vec<LocalName>,
    pub values: Vec<Expr>,
    pub span: Span
}

#[derive(Debug, Clone)]
pub struct AssignmentStmt {
    pub targets: Vec<Expr>,
    pub values: Vec<Expr>,
    pub span: Span
}

#[derive(Debug, Clone)]
pub struct ExpressionStmt {
    pub expression: Expr,
    pub span: Span
}

#[derive(Debug, Clone)]
pub struct DoStmt {
    pub body: BlockStmt,
    pub span: Span
}

#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: BlockStmt,
    pub span: Span
}

#[derive(Debug, Clone)]
pub struct RepeatStmt {
    pub body: BlockStmt,
    pub condition: Expr,
    pub span: Span
}

#[derive(Debug, Clone)]
pub struct IfBranch {
    pub condition: Expr,
    pub body: BlockStmt
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub branches: Vec<IfBranch>,
    pub else_body: Option<BlockStmt>,
    pub span: Span
}

#[derive(Debug, Clone)]
pub struct NumericForStmt {
    pub variable: LocalName,
    pub start: Expr,
    pub stop: Expr,
    pub step: Option<Expr>,
    pub body: BlockStmt,
    pub span: Span
}

#[derive(Debug, Clone)]
pub struct ForInStmt {
    pub names: Vec<LocalName>,
    pub iterators: Vec<Expr>,
    pub body: BlockStmt,
    pub span: Span
}

/// `a.b.c:d` in `function a.b.c:d() end`.
#[derive(Debug, Clone)]
pub struct FunctionName {
    pub base: String,
    pub fields: Vec<String>,
    pub method: Option<String>
}

impl FunctionName {
    pub fn is_simple(&self) -> bool {
        self.fields.is_empty() && self.method.is_none()
    }

    pub fn full_name(&self) -> String {
        let mut name = self.base.clone();
        for field in &self.fields {
            name.push('.');
            name.push_str(field);
        }
        if let Some(method) = &self.method {
            name.push(':');
            name.push_str(method);
        }
        name
    }
}

#[derive(Debug, Clone)]
pub struct FunctionStmt {
    pub name: FunctionName,
    pub function: FunctionBody,
    pub is_offline: bool,
    pub span: Span
}

#[derive(Debug, Clone)]
pub struct LocalFunctionStmt {
    pub name: String,
    pub function: FunctionBody,
    pub span: Span
}

#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub values: Vec<Expr>,
    pub span: Span
}

#[derive(Debug, Clone)]
pub struct BreakStmt {
    pub span: Span
}

#[derive(Debug, Clone)]
pub struct GotoStmt {
    pub label: String,
    pub span: Span
}

#[derive(Debug, Clone)]
pub struct LabelStmt {
    pub name: String,
    pub span: Span
}

#[derive(Debug, Clone)]
pub struct RecordField {
    pub name: String,
    pub optional: bool,
    pub explicit_type: Option<TypeExpr>,
    pub default_value: Option<Expr>,
    pub span: Span
}

/// `type Name<T> = { ... }` or `record Name<T> { ... }`.
#[derive(Debug, Clone)]
pub struct RecordStmt {
    pub name: String,
    pub generics: Vec<String>,
    pub fields: Vec<RecordField>,
    /// Set by the checker when the record declares `__` meta methods
    pub installs_metatable: bool,
    pub span: Span
}

/// `type Name<T> = OtherType`
#[derive(Debug, Clone)]
pub struct TypeAliasStmt {
    pub name: String,
    pub generics: Vec<String>,
    pub value: TypeExpr,
    pub span: Span
}

#[derive(Debug, Clone)]
pub struct EmitStmt {
    pub event: String,
    pub argument: Option<Expr>,
    pub span: Span
}
