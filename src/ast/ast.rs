use crate::Span;

use super::{
    expressions::{
        CallExpr, FunctionExpr, GenericInstanceExpr, IndexExpr, IndexKey, LambdaBody, LambdaExpr,
        LiteralExpr, ParenExpr, PrefixExpr, SymbolExpr, TableExpr, TableField, VarargExpr,
        BinaryExpr,
    },
    statements::{
        AssignmentStmt, BlockStmt, BreakStmt, DoStmt, EmitStmt, ExpressionStmt, ForInStmt,
        FunctionStmt, GotoStmt, IfStmt, LabelStmt, LocalFunctionStmt, LocalStmt, NumericForStmt,
        RecordStmt, RepeatStmt, ReturnStmt, TypeAliasStmt, WhileStmt,
    },
    types::{FunctionType, GenericType, LiteralType, SymbolType, UnionType},
};

/// Statement kinds.
#[derive(Debug, Clone)]
pub enum Stmt {
    Local(LocalStmt),
    Assignment(AssignmentStmt),
    Expression(ExpressionStmt),
    Do(DoStmt),
    While(WhileStmt),
    Repeat(RepeatStmt),
    If(IfStmt),
    NumericFor(NumericForStmt),
    ForIn(ForInStmt),
    Function(FunctionStmt),
    LocalFunction(LocalFunctionStmt),
    Return(ReturnStmt),
    Break(BreakStmt),
    Goto(GotoStmt),
    Label(LabelStmt),
    Record(RecordStmt),
    TypeAlias(TypeAliasStmt),
    Emit(EmitStmt),
}

/// Expression kinds.
#[derive(Debug, Clone)]
pub enum Expr {
    Literal(LiteralExpr),
    Vararg(VarargExpr),
    Symbol(SymbolExpr),
    Index(IndexExpr),
    Call(CallExpr),
    Function(FunctionExpr),
    Lambda(LambdaExpr),
    Binary(BinaryExpr),
    Prefix(PrefixExpr),
    Paren(ParenExpr),
    Table(TableExpr),
    GenericInstance(GenericInstanceExpr),
}

/// Type annotation kinds.
#[derive(Debug, Clone)]
pub enum TypeExpr {
    Symbol(SymbolType),
    Generic(GenericType),
    Union(UnionType),
    Literal(LiteralType),
    Function(FunctionType),
}

/// The first token of a node, used to locate diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadToken {
    pub text: String,
    pub line: u32,
    pub column: u32,
}

impl HeadToken {
    fn at(text: impl Into<String>, span: &Span) -> Self {
        HeadToken {
            text: text.into(),
            line: span.start.line,
            column: span.start.column,
        }
    }
}

/// A borrowed child of a node.
#[derive(Debug)]
pub enum Node<'a> {
    Expr(&'a Expr),
    Block(&'a BlockStmt),
}

/// A mutably borrowed child of a node.
#[derive(Debug)]
pub enum NodeMut<'a> {
    Expr(&'a mut Expr),
    Block(&'a mut BlockStmt),
}

impl Stmt {
    pub fn get_span(&self) -> &Span {
        match self {
            Stmt::Local(stmt) => &stmt.span,
            Stmt::Assignment(stmt) => &stmt.span,
            Stmt::Expression(stmt) => &stmt.span,
            Stmt::Do(stmt) => &stmt.span,
            Stmt::While(stmt) => &stmt.span,
            Stmt::Repeat(stmt) => &stmt.span,
            Stmt::If(stmt) => &stmt.span,
            Stmt::NumericFor(stmt) => &stmt.span,
            Stmt::ForIn(stmt) => &stmt.span,
            Stmt::Function(stmt) => &stmt.span,
            Stmt::LocalFunction(stmt) => &stmt.span,
            Stmt::Return(stmt) => &stmt.span,
            Stmt::Break(stmt) => &stmt.span,
            Stmt::Goto(stmt) => &stmt.span,
            Stmt::Label(stmt) => &stmt.span,
            Stmt::Record(stmt) => &stmt.span,
            Stmt::TypeAlias(stmt) => &stmt.span,
            Stmt::Emit(stmt) => &stmt.span,
        }
    }

    pub fn node_name(&self) -> &'static str {
        match self {
            Stmt::Local(_) => "local_declaration",
            Stmt::Assignment(_) => "varlist_assign",
            Stmt::Expression(_) => "expression_statement",
            Stmt::Do(_) => "do_stat",
            Stmt::While(_) => "while_stat",
            Stmt::Repeat(_) => "repeat_stat",
            Stmt::If(_) => "if_stat",
            Stmt::NumericFor(_) => "for_step_stat",
            Stmt::ForIn(_) => "for_range_stat",
            Stmt::Function(_) => "named_function_def",
            Stmt::LocalFunction(_) => "local_function_def",
            Stmt::Return(_) => "retstat",
            Stmt::Break(_) => "break_stat",
            Stmt::Goto(_) => "goto_stat",
            Stmt::Label(_) => "label",
            Stmt::Record(_) => "record",
            Stmt::TypeAlias(_) => "typedef",
            Stmt::Emit(_) => "emit",
        }
    }

    pub fn head_token(&self) -> HeadToken {
        let span = self.get_span();
        match self {
            Stmt::Local(stmt) => HeadToken::at(stmt.kind.keyword(), span),
            Stmt::Assignment(stmt) => match stmt.targets.first() {
                Some(target) => target.head_token(),
                None => HeadToken::at("=", span),
            },
            Stmt::Expression(stmt) => stmt.expression.head_token(),
            Stmt::Do(_) => HeadToken::at("do", span),
            Stmt::While(_) => HeadToken::at("while", span),
            Stmt::Repeat(_) => HeadToken::at("repeat", span),
            Stmt::If(_) => HeadToken::at("if", span),
            Stmt::NumericFor(_) | Stmt::ForIn(_) => HeadToken::at("for", span),
            Stmt::Function(stmt) if stmt.is_offline => HeadToken::at("offline", span),
            Stmt::Function(_) => HeadToken::at("function", span),
            Stmt::LocalFunction(_) => HeadToken::at("local", span),
            Stmt::Return(_) => HeadToken::at("return", span),
            Stmt::Break(_) => HeadToken::at("break", span),
            Stmt::Goto(_) => HeadToken::at("goto", span),
            Stmt::Label(_) => HeadToken::at("::", span),
            Stmt::Record(_) => HeadToken::at("type", span),
            Stmt::TypeAlias(_) => HeadToken::at("type", span),
            Stmt::Emit(_) => HeadToken::at("emit", span),
        }
    }

    pub fn children(&self) -> Vec<Node<'_>> {
        let mut children = vec![];
        match self {
            Stmt::Local(stmt) => children.extend(stmt.values.iter().map(Node::Expr)),
            Stmt::Assignment(stmt) => {
                children.extend(stmt.targets.iter().map(Node::Expr));
                children.extend(stmt.values.iter().map(Node::Expr));
            }
            Stmt::Expression(stmt) => children.push(Node::Expr(&stmt.expression)),
            Stmt::Do(stmt) => children.push(Node::Block(&stmt.body)),
            Stmt::While(stmt) => {
                children.push(Node::Expr(&stmt.condition));
                children.push(Node::Block(&stmt.body));
            }
            Stmt::Repeat(stmt) => {
                children.push(Node::Block(&stmt.body));
                children.push(Node::Expr(&stmt.condition));
            }
            Stmt::If(stmt) => {
                for branch in &stmt.branches {
                    children.push(Node::Expr(&branch.condition));
                    children.push(Node::Block(&branch.body));
                }
                if let Some(else_body) = &stmt.else_body {
                    children.push(Node::Block(else_body));
                }
            }
            Stmt::NumericFor(stmt) => {
                children.push(Node::Expr(&stmt.start));
                children.push(Node::Expr(&stmt.stop));
                if let Some(step) = &stmt.step {
                    children.push(Node::Expr(step));
                }
                children.push(Node::Block(&stmt.body));
            }
            Stmt::ForIn(stmt) => {
                children.extend(stmt.iterators.iter().map(Node::Expr));
                children.push(Node::Block(&stmt.body));
            }
            Stmt::Function(stmt) => children.push(Node::Block(&stmt.function.body)),
            Stmt::LocalFunction(stmt) => children.push(Node::Block(&stmt.function.body)),
            Stmt::Return(stmt) => children.extend(stmt.values.iter().map(Node::Expr)),
            Stmt::Record(stmt) => {
                children.extend(stmt.fields.iter().filter_map(|f| f.default_value.as_ref()).map(Node::Expr))
            }
            Stmt::Emit(stmt) => children.extend(stmt.argument.iter().map(Node::Expr)),
            Stmt::Break(_) | Stmt::Goto(_) | Stmt::Label(_) | Stmt::TypeAlias(_) => {}
        }
        children
    }

    pub fn children_mut(&mut self) -> Vec<NodeMut<'_>> {
        let mut children = vec![];
        match self {
            Stmt::Local(stmt) => children.extend(stmt.values.iter_mut().map(NodeMut::Expr)),
            Stmt::Assignment(stmt) => {
                children.extend(stmt.targets.iter_mut().map(NodeMut::Expr));
                children.extend(stmt.values.iter_mut().map(NodeMut::Expr));
            }
            Stmt::Expression(stmt) => children.push(NodeMut::Expr(&mut stmt.expression)),
            Stmt::Do(stmt) => children.push(NodeMut::Block(&mut stmt.body)),
            Stmt::While(stmt) => {
                children.push(NodeMut::Expr(&mut stmt.condition));
                children.push(NodeMut::Block(&mut stmt.body));
            }
            Stmt::Repeat(stmt) => {
                children.push(NodeMut::Block(&mut stmt.body));
                children.push(NodeMut::Expr(&mut stmt.condition));
            }
            Stmt::If(stmt) => {
                for branch in stmt.branches.iter_mut() {
                    children.push(NodeMut::Expr(&mut branch.condition));
                    children.push(NodeMut::Block(&mut branch.body));
                }
                if let Some(else_body) = stmt.else_body.as_mut() {
                    children.push(NodeMut::Block(else_body));
                }
            }
            Stmt::NumericFor(stmt) => {
                children.push(NodeMut::Expr(&mut stmt.start));
                children.push(NodeMut::Expr(&mut stmt.stop));
                if let Some(step) = stmt.step.as_mut() {
                    children.push(NodeMut::Expr(step));
                }
                children.push(NodeMut::Block(&mut stmt.body));
            }
            Stmt::ForIn(stmt) => {
                children.extend(stmt.iterators.iter_mut().map(NodeMut::Expr));
                children.push(NodeMut::Block(&mut stmt.body));
            }
            Stmt::Function(stmt) => children.push(NodeMut::Block(&mut stmt.function.body)),
            Stmt::LocalFunction(stmt) => children.push(NodeMut::Block(&mut stmt.function.body)),
            Stmt::Return(stmt) => children.extend(stmt.values.iter_mut().map(NodeMut::Expr)),
            Stmt::Record(stmt) => children.extend(
                stmt.fields.iter_mut().filter_map(|f| f.default_value.as_mut()).map(NodeMut::Expr),
            ),
            Stmt::Emit(stmt) => children.extend(stmt.argument.iter_mut().map(NodeMut::Expr)),
            Stmt::Break(_) | Stmt::Goto(_) | Stmt::Label(_) | Stmt::TypeAlias(_) => {}
        }
        children
    }
}

impl Expr {
    pub fn get_span(&self) -> &Span {
        match self {
            Expr::Literal(expr) => &expr.span,
            Expr::Vararg(expr) => &expr.span,
            Expr::Symbol(expr) => &expr.span,
            Expr::Index(expr) => &expr.span,
            Expr::Call(expr) => &expr.span,
            Expr::Function(expr) => &expr.span,
            Expr::Lambda(expr) => &expr.span,
            Expr::Binary(expr) => &expr.span,
            Expr::Prefix(expr) => &expr.span,
            Expr::Paren(expr) => &expr.span,
            Expr::Table(expr) => &expr.span,
            Expr::GenericInstance(expr) => &expr.span,
        }
    }

    pub fn node_name(&self) -> &'static str {
        match self {
            Expr::Literal(_) => "literal",
            Expr::Vararg(_) => "vararg",
            Expr::Symbol(_) => "var",
            Expr::Index(_) => "index",
            Expr::Call(expr) if expr.method.is_some() => "method_call",
            Expr::Call(_) => "functioncall",
            Expr::Function(_) => "functiondef",
            Expr::Lambda(_) => "lambda",
            Expr::Binary(_) => "bin_exp",
            Expr::Prefix(_) => "un_exp",
            Expr::Paren(_) => "paren_exp",
            Expr::Table(_) => "tableconstructor",
            Expr::GenericInstance(_) => "generic_instance",
        }
    }

    pub fn head_token(&self) -> HeadToken {
        let span = self.get_span();
        match self {
            Expr::Literal(expr) => HeadToken::at(expr.value.clone(), span),
            Expr::Vararg(_) => HeadToken::at("...", span),
            Expr::Symbol(expr) => HeadToken::at(expr.value.clone(), span),
            Expr::Index(expr) => expr.object.head_token(),
            Expr::Call(expr) => expr.callee.head_token(),
            Expr::Function(_) => HeadToken::at("function", span),
            Expr::Lambda(expr) => match expr.parameters.first() {
                Some(param) => HeadToken::at(param.name.clone(), span),
                None => HeadToken::at("(", span),
            },
            Expr::Binary(expr) => expr.left.head_token(),
            Expr::Prefix(expr) => HeadToken::at(expr.operator.value.clone(), span),
            Expr::Paren(_) => HeadToken::at("(", span),
            Expr::Table(expr) if expr.is_array_literal => HeadToken::at("[", span),
            Expr::Table(_) => HeadToken::at("{", span),
            Expr::GenericInstance(expr) => HeadToken::at(expr.name.clone(), span),
        }
    }

    pub fn children(&self) -> Vec<Node<'_>> {
        let mut children = vec![];
        match self {
            Expr::Literal(_) | Expr::Vararg(_) | Expr::Symbol(_) | Expr::GenericInstance(_) => {}
            Expr::Index(expr) => {
                children.push(Node::Expr(&expr.object));
                if let IndexKey::Expr(key) = &expr.key {
                    children.push(Node::Expr(key));
                }
            }
            Expr::Call(expr) => {
                children.push(Node::Expr(&expr.callee));
                children.extend(expr.arguments.iter().map(Node::Expr));
            }
            Expr::Function(expr) => children.push(Node::Block(&expr.function.body)),
            Expr::Lambda(expr) => match &expr.body {
                LambdaBody::Expr(body) => children.push(Node::Expr(body)),
                LambdaBody::Block(body) => children.push(Node::Block(body)),
            },
            Expr::Binary(expr) => {
                children.push(Node::Expr(&expr.left));
                children.push(Node::Expr(&expr.right));
            }
            Expr::Prefix(expr) => children.push(Node::Expr(&expr.right_expr)),
            Expr::Paren(expr) => children.push(Node::Expr(&expr.inner)),
            Expr::Table(expr) => {
                for field in &expr.fields {
                    match field {
                        TableField::Positional(value)
                        | TableField::Named { value, .. }
                        | TableField::StringKeyed { value, .. } => children.push(Node::Expr(value)),
                        TableField::Keyed { key, value } => {
                            children.push(Node::Expr(key));
                            children.push(Node::Expr(value));
                        }
                    }
                }
            }
        }
        children
    }

    pub fn children_mut(&mut self) -> Vec<NodeMut<'_>> {
        let mut children = vec![];
        match self {
            Expr::Literal(_) | Expr::Vararg(_) | Expr::Symbol(_) | Expr::GenericInstance(_) => {}
            Expr::Index(expr) => {
                children.push(NodeMut::Expr(&mut expr.object));
                if let IndexKey::Expr(key) = &mut expr.key {
                    children.push(NodeMut::Expr(key));
                }
            }
            Expr::Call(expr) => {
                children.push(NodeMut::Expr(&mut expr.callee));
                children.extend(expr.arguments.iter_mut().map(NodeMut::Expr));
            }
            Expr::Function(expr) => children.push(NodeMut::Block(&mut expr.function.body)),
            Expr::Lambda(expr) => match &mut expr.body {
                LambdaBody::Expr(body) => children.push(NodeMut::Expr(body)),
                LambdaBody::Block(body) => children.push(NodeMut::Block(body)),
            },
            Expr::Binary(expr) => {
                children.push(NodeMut::Expr(&mut expr.left));
                children.push(NodeMut::Expr(&mut expr.right));
            }
            Expr::Prefix(expr) => children.push(NodeMut::Expr(&mut expr.right_expr)),
            Expr::Paren(expr) => children.push(NodeMut::Expr(&mut expr.inner)),
            Expr::Table(expr) => {
                for field in expr.fields.iter_mut() {
                    match field {
                        TableField::Positional(value)
                        | TableField::Named { value, .. }
                        | TableField::StringKeyed { value, .. } => children.push(NodeMut::Expr(value)),
                        TableField::Keyed { key, value } => {
                            children.push(NodeMut::Expr(key));
                            children.push(NodeMut::Expr(value));
                        }
                    }
                }
            }
        }
        children
    }

    /// The variable name when the expression is a bare name.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Expr::Symbol(symbol) => Some(&symbol.value),
            _ => None,
        }
    }
}

impl TypeExpr {
    pub fn get_span(&self) -> &Span {
        match self {
            TypeExpr::Symbol(ty) => &ty.span,
            TypeExpr::Generic(ty) => &ty.span,
            TypeExpr::Union(ty) => &ty.span,
            TypeExpr::Literal(ty) => &ty.span,
            TypeExpr::Function(ty) => &ty.span,
        }
    }

    pub fn head_token(&self) -> HeadToken {
        let span = self.get_span();
        match self {
            TypeExpr::Symbol(ty) => HeadToken::at(ty.name.clone(), span),
            TypeExpr::Generic(ty) => HeadToken::at(ty.name.clone(), span),
            TypeExpr::Union(ty) => match ty.members.first() {
                Some(member) => member.head_token(),
                None => HeadToken::at("|", span),
            },
            TypeExpr::Literal(ty) => HeadToken::at(ty.literal.value.clone(), span),
            TypeExpr::Function(_) => HeadToken::at("(", span),
        }
    }
}
