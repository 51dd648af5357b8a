//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into an Abstract Syntax Tree. It uses a Pratt parser for expressions
//! with Lua's operator precedence and handles:
//!
//! - Statement parsing (declarations, functions, records, control flow)
//! - Expression parsing (binary ops, calls, tables, lambdas)
//! - Type parsing for annotations
//!
//! glua has no statement terminators, so a few constructs (lambdas, generic
//! instances, keyed table fields) are parsed speculatively and rewound on failure.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;
