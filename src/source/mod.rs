//! Source positions and file bookkeeping.
//!
//! Every token and AST node carries a [`file::Pos`], an offset into a global
//! offset space shared by all files registered in one [`file::FileSet`]. A
//! [`file::File`] records where its newlines are so a `Pos` can be turned into
//! a human readable row and column for diagnostics.

pub mod file;
