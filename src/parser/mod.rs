//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the recursive descent parser that turns the token
//! stream into an AST while resolving names against lexical scopes. It
//! handles:
//!
//! - A fixed ladder of precedence tiers, each right associative
//! - Atoms, dispatched through a NUD (null denotation) lookup table
//! - Postfix index, member and call chains
//! - Declaration and assignment checks against the scope chain
//! - Type annotations for function parameters and results
//! - Best-effort recovery: problems are recorded and parsing continues

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod types;

#[cfg(test)]
mod tests;
