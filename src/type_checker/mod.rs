//! Type checking of glua programs.
//!
//! The checker walks the AST once, inferring a type for every expression and
//! validating every statement against the types in scope:
//!
//! - `types` - the type model and the arena that owns every type of a run
//! - `scope` - nested scope frames with variable and type bindings
//! - `matching` - assignability, union merging and common supertypes
//! - `expr` / `stmt` - the inferencer, including lambda and table literal rewriting
//! - `generics` - instantiation of generic records
//! - `contract` - the rules a contract program must satisfy
//!
//! Problems never stop the walk. They are collected as diagnostics and
//! returned together once the whole program has been checked.

pub mod annotations;
pub mod contract;
pub mod expr;
pub mod generics;
pub mod globals;
pub mod matching;
pub mod scope;
pub mod signature;
pub mod stmt;
pub mod type_checker;
pub mod types;

#[cfg(test)]
mod tests;
