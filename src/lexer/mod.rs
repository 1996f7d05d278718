//! Lexical analysis module for the front end.
//!
//! This module contains the lexer that turns source text into tokens on
//! demand. It handles:
//!
//! - Recognition of keywords, type keywords, identifiers and literals
//! - One- and two-rune operators
//! - Line comments and whitespace
//! - Recording newline offsets for position tracking

pub mod lexer;
pub mod tokens;
