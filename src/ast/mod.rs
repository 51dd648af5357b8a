//! Abstract Syntax Tree (AST) definitions.
//!
//! This module defines the AST node types the parser produces and the
//! checker walks. Every node kind is a variant of a closed enum:
//!
//! - `Stmt` - statements (declarations, control flow, functions, records)
//! - `Expr` - expressions (literals, calls, operators, table constructors)
//! - `TypeExpr` - type annotations (names, generics, unions, literal and function types)
//!
//! Nodes expose `node_name()`, `head_token()` and `children()` so generic
//! passes can walk kinds they do not handle specially.

pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
