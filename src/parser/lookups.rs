use std::collections::HashMap;

use crate::{
    ast::{ast::Expr, scope::Scope},
    lexer::tokens::TokenKind,
};

use super::{expr::*, parser::Parser};

/// Precedence tiers, lowest first.
///
/// Every binary tier parses its left operand one tier up and its right
/// operand at its own tier, so operators of equal precedence group to the
/// right: `a - b - c` is `a - (b - c)`.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Hash)]
pub enum BindingPower {
    Assignment,
    Logical,
    Bitwise,
    Relational,
    Additive,
    Multiplicative,
    Unary,
}

impl BindingPower {
    /// The next tighter tier. `Unary` is the tightest.
    pub fn next(self) -> BindingPower {
        match self {
            BindingPower::Assignment => BindingPower::Logical,
            BindingPower::Logical => BindingPower::Bitwise,
            BindingPower::Bitwise => BindingPower::Relational,
            BindingPower::Relational => BindingPower::Additive,
            BindingPower::Additive => BindingPower::Multiplicative,
            BindingPower::Multiplicative | BindingPower::Unary => BindingPower::Unary,
        }
    }
}

pub type NUDHandler = fn(&mut Parser<'_>, &mut Scope<'_>) -> Expr;

// Lookup tables inside parser struct, so it's easier
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;
pub type BPLookup = HashMap<TokenKind, BindingPower>;

pub fn create_token_lookups(parser: &mut Parser<'_>) {
    // Assignment
    parser.led(TokenKind::Assignment, BindingPower::Assignment);
    parser.led(TokenKind::Declare, BindingPower::Assignment);
    parser.led(TokenKind::PlusEquals, BindingPower::Assignment);
    parser.led(TokenKind::MinusEquals, BindingPower::Assignment);
    parser.led(TokenKind::StarEquals, BindingPower::Assignment);
    parser.led(TokenKind::SlashEquals, BindingPower::Assignment);
    parser.led(TokenKind::PercentEquals, BindingPower::Assignment);

    // Logical
    parser.led(TokenKind::And, BindingPower::Logical);
    parser.led(TokenKind::Or, BindingPower::Logical);

    // Bitwise
    parser.led(TokenKind::BitAnd, BindingPower::Bitwise);
    parser.led(TokenKind::BitOr, BindingPower::Bitwise);
    parser.led(TokenKind::BitXor, BindingPower::Bitwise);

    // Relational
    parser.led(TokenKind::Equals, BindingPower::Relational);
    parser.led(TokenKind::NotEquals, BindingPower::Relational);
    parser.led(TokenKind::Less, BindingPower::Relational);
    parser.led(TokenKind::Greater, BindingPower::Relational);
    parser.led(TokenKind::LessEquals, BindingPower::Relational);
    parser.led(TokenKind::GreaterEquals, BindingPower::Relational);

    // Additive and multiplicative
    parser.led(TokenKind::Plus, BindingPower::Additive);
    parser.led(TokenKind::Dash, BindingPower::Additive);
    parser.led(TokenKind::Star, BindingPower::Multiplicative);
    parser.led(TokenKind::Slash, BindingPower::Multiplicative);
    parser.led(TokenKind::Percent, BindingPower::Multiplicative);

    // Literals and symbols
    parser.nud(TokenKind::Identifier, parse_symbol_expr);
    parser.nud(TokenKind::Number, parse_literal_expr);
    parser.nud(TokenKind::String, parse_literal_expr);
    parser.nud(TokenKind::Bool, parse_literal_expr);
    parser.nud(TokenKind::OpenParen, parse_grouping_expr);

    // Scoped constructs
    parser.nud(TokenKind::OpenCurly, parse_block_expr);
    parser.nud(TokenKind::If, parse_if_expr);
    parser.nud(TokenKind::For, parse_loop_expr);
    parser.nud(TokenKind::While, parse_loop_expr);
    parser.nud(TokenKind::Fn, parse_function_expr);

    // Keyword prefixes
    parser.nud(TokenKind::Break, parse_break_expr);
    parser.nud(TokenKind::Return, parse_return_expr);
    parser.nud(TokenKind::Import, parse_import_expr);

    // Collections and bridges
    parser.nud(TokenKind::OpenBracket, parse_array_expr);
    parser.nud(TokenKind::Dollar, parse_object_expr);
    parser.nud(TokenKind::Go, parse_bridge_expr);
}
