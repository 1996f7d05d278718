//! Type annotation parsing.
//!
//! Annotations are metadata only; nothing is checked beyond their shape.
//! Each one resolves to a canonical name spelled the way it is written:
//!
//! - Scalar types (`number`, `int`, `float`, `bool`, `string`, `any`)
//! - `object`
//! - `array <element>`
//! - `function(<parameter>, ...) <return>`
//!
//! Like expression atoms, the first token of an annotation selects its
//! handler from a lookup table.

use std::collections::HashMap;

use crate::lexer::tokens::TokenKind;

use super::parser::{with_stack, Parser};

/// Type alias for type null denotation handler functions.
pub type TypeNUDHandler = fn(&mut Parser<'_>) -> String;

/// Type alias for type NUD lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

const TYPE_KINDS: [TokenKind; 9] = [
    TokenKind::NumberType,
    TokenKind::IntType,
    TokenKind::FloatType,
    TokenKind::BoolType,
    TokenKind::StringType,
    TokenKind::FunctionType,
    TokenKind::ArrayType,
    TokenKind::ObjectType,
    TokenKind::AnyType,
];

/// Initializes the type parsing lookup table.
pub fn create_token_type_lookups(parser: &mut Parser<'_>) {
    parser.type_nud(TokenKind::NumberType, parse_named_type);
    parser.type_nud(TokenKind::IntType, parse_named_type);
    parser.type_nud(TokenKind::FloatType, parse_named_type);
    parser.type_nud(TokenKind::BoolType, parse_named_type);
    parser.type_nud(TokenKind::StringType, parse_named_type);
    parser.type_nud(TokenKind::AnyType, parse_named_type);
    parser.type_nud(TokenKind::ObjectType, parse_named_type);
    parser.type_nud(TokenKind::ArrayType, parse_array_type);
    parser.type_nud(TokenKind::FunctionType, parse_function_type);
}

/// Parses one annotation.
///
/// A token that cannot start a type is reported, left in place, and yields
/// an empty name.
pub fn parse_type(parser: &mut Parser<'_>) -> String {
    let token_kind = parser.current_token_kind();

    match parser.get_type_nud_lookup().get(&token_kind).copied() {
        Some(handler) => with_stack(|| handler(parser)),
        None => {
            parser.expect(&TYPE_KINDS);
            String::new()
        }
    }
}

pub fn parse_named_type(parser: &mut Parser<'_>) -> String {
    let name = parser.current_token_kind().as_str();
    parser.next();
    String::from(name)
}

pub fn parse_array_type(parser: &mut Parser<'_>) -> String {
    parser.expect(&[TokenKind::ArrayType]);
    let element = parse_type(parser);

    format!("array {}", element)
}

/// `function(<parameter>, ...) <return>`. The commas between parameter
/// types are optional.
pub fn parse_function_type(parser: &mut Parser<'_>) -> String {
    parser.expect(&[TokenKind::FunctionType]);
    parser.expect(&[TokenKind::OpenParen]);
    let mut parameters = vec![];

    while !parser.accept(&[TokenKind::CloseParen]) {
        let parameter = parse_type(parser);
        if parameter.is_empty() {
            break;
        }
        parameters.push(parameter);
        parser.accept(&[TokenKind::Comma]);
    }

    let return_type = parse_type(parser);

    format!("function({}) {}", parameters.join(", "), return_type)
}
