//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the parsing entry points.
//! The parser pulls tokens from the lexer on demand, keeping exactly one
//! token of lookahead, and resolves declarations against the scope chain
//! while it builds the tree.
//!
//! It maintains lookup tables for:
//! - NUD (null denotation) handlers for atoms
//! - Binding powers for binary and assignment operators
//! - Type annotation handlers

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::{
    ast::{
        ast::{Expr, Program},
        scope::Scope,
    },
    errors::errors::{Error, ErrorImpl, ErrorList},
    get_line,
    lexer::{lexer::Lexer, tokens::TokenKind},
    source::file::{File, FileSet, Pos, Position},
};

use super::{
    expr::parse_expr_list,
    lookups::{create_token_lookups, BPLookup, BindingPower, NUDHandler, NUDLookup},
    types::{create_token_type_lookups, TypeNUDHandler, TypeNUDLookup},
};

/// Remaining stack below which a recursive rule moves to a new segment.
const STACK_RED_ZONE: usize = 64 * 1024;

/// Size of each heap-allocated stack segment.
const STACK_SEGMENT_SIZE: usize = 1024 * 1024;

/// Runs a recursive grammar rule, growing the stack on the heap when little
/// of it is left. Nesting depth is bounded only by memory.
pub fn with_stack<R>(rule: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT_SIZE, rule)
}

/// The main parser structure that maintains parsing state.
///
/// One parser serves exactly one parse of one file. Scopes are not stored
/// here; every grammar rule receives the scope it runs in.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    /// The text being parsed, used to quote lines in diagnostics
    source: &'a str,
    errors: ErrorList,
    /// Distinct module names referenced by `go{...}` bridges
    bridge_modules: BTreeSet<String>,
    /// Position, kind and lexeme of the current token
    pos: Pos,
    tok: TokenKind,
    lit: String,
    /// Lookup table for null denotation (atom) handlers
    nud_lookup: NUDLookup,
    /// Lookup table for operator binding powers (precedence)
    binding_power_lookup: BPLookup,
    /// Lookup table for type annotation handlers
    type_nud_lookup: TypeNUDLookup,
}

impl<'a> Parser<'a> {
    /// Creates a parser over `source`, registered as `file`, and reads the
    /// first token.
    pub fn new(file: &'a mut File, source: &'a str) -> Self {
        let mut parser = Parser {
            lexer: Lexer::new(file, source),
            source,
            errors: ErrorList::new(),
            bridge_modules: BTreeSet::new(),
            pos: Pos::NONE,
            tok: TokenKind::EOF,
            lit: String::new(),
            nud_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            type_nud_lookup: HashMap::new(),
        };
        create_token_lookups(&mut parser);
        create_token_type_lookups(&mut parser);
        parser.next();
        parser
    }

    /// Advances to the next token.
    pub fn next(&mut self) {
        let token = self.lexer.scan();
        self.pos = token.pos;
        self.tok = token.kind;
        self.lit = token.value;
    }

    pub fn current_token_kind(&self) -> TokenKind {
        self.tok
    }

    pub fn current_literal(&self) -> &str {
        &self.lit
    }

    pub fn current_pos(&self) -> Pos {
        self.pos
    }

    /// Consumes the current token if it is one of `kinds`.
    pub fn accept(&mut self, kinds: &[TokenKind]) -> bool {
        if kinds.contains(&self.tok) {
            self.next();
            true
        } else {
            false
        }
    }

    /// Consumes the current token if it is one of `kinds`, otherwise records
    /// an expected-token diagnostic and leaves it in place.
    ///
    /// # Returns
    ///
    /// The position of the token that was current on entry.
    pub fn expect(&mut self, kinds: &[TokenKind]) -> Pos {
        let pos = self.pos;
        if !self.accept(kinds) {
            let expected = kinds
                .iter()
                .map(TokenKind::as_str)
                .collect::<Vec<_>>()
                .join(" or ");
            let found = if self.tok == TokenKind::EOF {
                String::from(TokenKind::EOF.as_str())
            } else {
                self.lit.clone()
            };
            self.add_error(ErrorImpl::ExpectedToken { expected, found });
        }
        pos
    }

    /// Records a diagnostic at the current token.
    pub fn add_error(&mut self, error: ErrorImpl) {
        let position = self.position(self.pos);
        let line = get_line(self.source, position.row);
        debug!(position = %position, message = %error, "diagnostic");
        self.errors.add(Error::new(error, position, line));
    }

    pub fn position(&self, pos: Pos) -> Position {
        self.lexer.file().position(pos)
    }

    /// Opens a child of `parent`.
    pub fn open_scope<'s>(&self, parent: &'s Scope<'s>) -> Scope<'s> {
        let scope = Scope::new(Some(parent));
        debug!(depth = scope.depth(), "open scope");
        scope
    }

    pub fn close_scope(&self, scope: Scope<'_>) {
        debug!(depth = scope.depth(), declared = scope.len(), "close scope");
    }

    pub fn add_bridge_module(&mut self, module: String) {
        self.bridge_modules.insert(module);
    }

    pub fn get_errors(&self) -> &ErrorList {
        &self.errors
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    /// Returns a reference to the binding power lookup table.
    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    /// Returns a reference to the type NUD lookup table.
    pub fn get_type_nud_lookup(&self) -> &TypeNUDLookup {
        &self.type_nud_lookup
    }

    /// Registers the binding power of a binary or assignment operator.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower) {
        self.binding_power_lookup.insert(kind, binding_power);
    }

    /// Registers the handler for atoms starting with `kind`.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers the handler for type annotations starting with `kind`.
    pub fn type_nud(&mut self, kind: TokenKind, nud_fn: TypeNUDHandler) {
        self.type_nud_lookup.insert(kind, nud_fn);
    }

    /// Ends the parse, handing over the diagnostics and bridge modules.
    pub fn finish(self) -> (ErrorList, BTreeSet<String>) {
        (self.errors, self.bridge_modules)
    }
}

/// Parses a whole file: a `;`-separated expression list followed by end of
/// input.
pub fn parse_program(parser: &mut Parser<'_>, scope: &mut Scope<'_>) -> Program {
    let exprs: Vec<Expr> = parse_expr_list(parser, scope);

    if parser.current_token_kind() != TokenKind::EOF {
        let kind = parser.current_token_kind().to_string();
        let lexeme = parser.current_literal().to_string();
        parser.add_error(ErrorImpl::UnexpectedToken { kind, lexeme });
    }

    Program { exprs }
}

/// Parses `source` in a fresh root scope.
///
/// # Returns
///
/// A tuple containing:
/// - The program. It must be discarded when any diagnostic was recorded
/// - The module names referenced by `go{...}` bridges
/// - The diagnostics, in the order they were found
pub fn parse(name: &str, source: &str) -> (Program, BTreeSet<String>, ErrorList) {
    let mut scope = Scope::new(None);
    parse_in_scope(name, source, &mut scope)
}

/// Parses `source` with `scope` as the root scope, so names the caller
/// declared beforehand resolve and top level declarations stay visible to
/// the caller afterwards.
pub fn parse_in_scope(
    name: &str,
    source: &str,
    scope: &mut Scope<'_>,
) -> (Program, BTreeSet<String>, ErrorList) {
    let mut file_set = FileSet::new();
    let file = file_set.add(name, source);

    let mut parser = Parser::new(file, source);
    let program = parse_program(&mut parser, scope);
    let (errors, bridge_modules) = parser.finish();

    debug!(
        file = name,
        expressions = program.exprs.len(),
        errors = errors.count(),
        "parsed"
    );

    (program, bridge_modules, errors)
}

/// Parses `source`, failing with every diagnostic if there was at least one.
pub fn parse_expression(
    name: &str,
    source: &str,
) -> Result<(Program, BTreeSet<String>), ErrorList> {
    let (program, bridge_modules, errors) = parse(name, source);
    if errors.is_empty() {
        Ok((program, bridge_modules))
    } else {
        Err(errors)
    }
}
