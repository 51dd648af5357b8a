//! Lexical analysis module for the checker.
//!
//! This module contains the lexer (tokenizer) that converts glua source code
//! into a stream of tokens for parsing. It handles:
//!
//! - Tokenization of source code using anchored regex patterns
//! - Recognition of keywords, identifiers, literals, and operators
//! - Integer versus float literals (the checker types them differently)
//! - Line and column tracking for diagnostics
//! - `--` line comments, `--[[ ]]` block comments and whitespace

pub mod lexer;
pub mod tokens;

#[cfg(test)]
mod tests;
