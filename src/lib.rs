#![allow(clippy::module_inception)]

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod source;

extern crate regex;

pub use parser::parser::{parse, parse_expression, parse_in_scope};

/// Returns line `row` (1-based) of `source` without its line break, or an
/// empty string when the source has fewer lines.
pub fn get_line(source: &str, row: usize) -> String {
    if row == 0 {
        return String::new();
    }

    source
        .split_inclusive('\n')
        .nth(row - 1)
        .map(|line| line.trim_end_matches(&['\n', '\r'][..]).to_string())
        .unwrap_or_default()
}
