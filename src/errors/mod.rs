//! Error types and error handling for the checker.
//!
//! This module defines the error types used throughout a checking run.
//! It includes:
//!
//! - Front-end errors with source position information
//! - Type checking diagnostics with stable numeric codes
//! - Error formatting and display functionality
//! - Helpful error messages and suggestions

pub mod errors;

#[cfg(test)]
mod tests;
