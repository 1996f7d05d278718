//! Diagnostics produced while scanning and parsing.
//!
//! This module defines:
//!
//! - The error variants and their user-facing messages
//! - `Error`, a diagnostic with its source position and line
//! - `ErrorList`, the ordered and deduplicated collection a parse returns
//! - Single-error and batched rendering

pub mod errors;
