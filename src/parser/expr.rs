use tracing::debug;

use crate::{
    ast::{
        ast::{
            ArrayExpr, AssignmentExpr, BadExpr, BinaryExpr, BlockExpr, BreakExpr, BridgeExpr,
            CallExpr, Expr, FunctionExpr, IfExpr, ImportExpr, IndexExpr, LiteralExpr, LoopExpr,
            LoopKind, MemberExpr, ObjectExpr, ObjectMember, Parameter, ReturnExpr, SymbolExpr,
            UnaryExpr,
        },
        scope::{Object, Scope},
    },
    errors::errors::ErrorImpl,
    lexer::tokens::TokenKind,
    source::file::Pos,
};

use super::{
    lookups::BindingPower,
    parser::{with_stack, Parser},
    types::parse_type,
};

pub fn parse_expr(parser: &mut Parser<'_>, scope: &mut Scope<'_>) -> Expr {
    with_stack(|| parse_assignment_expr(parser, scope))
}

/// `expr (";" expr)*`
pub fn parse_expr_list(parser: &mut Parser<'_>, scope: &mut Scope<'_>) -> Vec<Expr> {
    let mut exprs = vec![parse_expr(parser, scope)];

    while parser.accept(&[TokenKind::Semicolon]) {
        exprs.push(parse_expr(parser, scope));
    }

    exprs
}

/// Assignment tier, where declarations and assignments are checked against
/// the scope chain. A declared name's position is that of its `:=`.
///
/// The target must be a name, or a single index or member access on a name.
/// Any other target is reported and returned as is, leaving the operator
/// unconsumed.
pub fn parse_assignment_expr(parser: &mut Parser<'_>, scope: &mut Scope<'_>) -> Expr {
    let left = parse_binary_expr(parser, scope, BindingPower::Logical);
    let operator = parser.current_token_kind();

    if !operator.is_assign() {
        return left;
    }

    let Some(name) = left.assignee_name().map(String::from) else {
        parser.add_error(ErrorImpl::InvalidAssignment {
            target: left.to_string(),
        });
        return left;
    };

    let operator_pos = parser.current_pos();

    match (&left, operator) {
        (Expr::Symbol(_), TokenKind::Declare) => declare(parser, scope, &name, operator_pos),
        // Declaring through an index only writes into an existing value.
        (_, TokenKind::Declare) => {}
        _ => {
            if scope.lookup(&name).is_none() {
                parser.add_error(ErrorImpl::VariableNotDeclared { variable: name });
            }
        }
    }

    parser.next();
    let value = with_stack(|| parse_assignment_expr(parser, scope));

    Expr::Assignment(AssignmentExpr {
        operator,
        pos: left.get_pos(),
        assignee: Box::new(left),
        value: Box::new(value),
    })
}

fn declare(parser: &mut Parser<'_>, scope: &mut Scope<'_>, name: &str, pos: Pos) {
    let previous = scope.insert(Object::new(name, pos)).map(|object| object.pos);

    if let Some(previous) = previous {
        let declared_at = parser.position(previous).line_col();
        parser.add_error(ErrorImpl::VariableAlreadyDeclared {
            variable: String::from(name),
            declared_at,
        });
        return;
    }

    debug!(name, depth = scope.depth(), "declared");

    if let Some(outer) = scope.parent().and_then(|parent| parent.lookup(name)) {
        debug!(
            name,
            outer = %parser.position(outer.pos).line_col(),
            "declaration shadows an outer binding"
        );
    }
}

/// One binary precedence tier. The right operand recurses into the same
/// tier, making every binary operator right associative.
pub fn parse_binary_expr(
    parser: &mut Parser<'_>,
    scope: &mut Scope<'_>,
    bp: BindingPower,
) -> Expr {
    if bp >= BindingPower::Unary {
        return parse_unary_expr(parser, scope);
    }

    let left = parse_binary_expr(parser, scope, bp.next());
    let operator = parser.current_token_kind();

    if parser.get_bp_lookup().get(&operator) != Some(&bp) {
        return left;
    }

    parser.next();
    let right = with_stack(|| parse_binary_expr(parser, scope, bp));

    Expr::Binary(BinaryExpr {
        operator,
        pos: left.get_pos(),
        left: Box::new(left),
        right: Box::new(right),
    })
}

/// At most one prefix operator, applied to an atom with its postfix chain.
pub fn parse_unary_expr(parser: &mut Parser<'_>, scope: &mut Scope<'_>) -> Expr {
    let pos = parser.current_pos();
    let operator = parser.current_token_kind();

    if parser.accept(&[
        TokenKind::Not,
        TokenKind::Length,
        TokenKind::Dash,
        TokenKind::Plus,
    ]) {
        return Expr::Unary(UnaryExpr {
            operator,
            value: Box::new(parse_postfix_expr(parser, scope)),
            pos,
        });
    }

    parse_postfix_expr(parser, scope)
}

/// An atom followed by any mix of `[index]`, `.member` and `(args)`, applied
/// left to right.
pub fn parse_postfix_expr(parser: &mut Parser<'_>, scope: &mut Scope<'_>) -> Expr {
    let mut expr = parse_atom_expr(parser, scope);

    loop {
        if parser.accept(&[TokenKind::OpenBracket]) {
            expr = parse_index_expr(parser, scope, expr);
        } else if parser.accept(&[TokenKind::Dot]) {
            expr = parse_member_expr(parser, expr);
        } else if parser.accept(&[TokenKind::OpenParen]) {
            expr = parse_call_expr(parser, scope, expr);
        } else {
            return expr;
        }
    }
}

pub fn parse_atom_expr(parser: &mut Parser<'_>, scope: &mut Scope<'_>) -> Expr {
    let token_kind = parser.current_token_kind();

    if let Some(handler) = parser.get_nud_lookup().get(&token_kind).copied() {
        return handler(parser, scope);
    }

    let error = match token_kind {
        TokenKind::EOF => ErrorImpl::UnexpectedEof,
        TokenKind::Illegal => ErrorImpl::IllegalCharacter {
            character: parser.current_literal().to_string(),
        },
        _ => ErrorImpl::UnexpectedToken {
            kind: token_kind.to_string(),
            lexeme: parser.current_literal().to_string(),
        },
    };
    parser.add_error(error);

    Expr::Bad(BadExpr {
        pos: parser.current_pos(),
    })
}

pub fn parse_symbol_expr(parser: &mut Parser<'_>, _scope: &mut Scope<'_>) -> Expr {
    let name = parser.current_literal().to_string();
    let pos = parser.expect(&[TokenKind::Identifier]);

    Expr::Symbol(SymbolExpr { name, pos })
}

pub fn parse_literal_expr(parser: &mut Parser<'_>, _scope: &mut Scope<'_>) -> Expr {
    let kind = parser.current_token_kind();
    let value = parser.current_literal().to_string();
    let pos = parser.expect(&[TokenKind::Number, TokenKind::String, TokenKind::Bool]);

    Expr::Literal(LiteralExpr { kind, value, pos })
}

pub fn parse_grouping_expr(parser: &mut Parser<'_>, scope: &mut Scope<'_>) -> Expr {
    parser.expect(&[TokenKind::OpenParen]);
    let expr = parse_expr(parser, scope);
    parser.expect(&[TokenKind::CloseParen]);

    expr
}

fn parse_index_expr(parser: &mut Parser<'_>, scope: &mut Scope<'_>, base: Expr) -> Expr {
    let index = parse_expr(parser, scope);
    parser.expect(&[TokenKind::CloseBracket]);

    Expr::Index(IndexExpr {
        pos: base.get_pos(),
        base: Box::new(base),
        index: Box::new(index),
    })
}

fn parse_member_expr(parser: &mut Parser<'_>, base: Expr) -> Expr {
    if parser.current_token_kind() != TokenKind::Identifier {
        let lexeme = parser.current_literal().to_string();
        parser.add_error(ErrorImpl::InvalidObjectIndex { lexeme });
        return Expr::Bad(BadExpr {
            pos: parser.current_pos(),
        });
    }

    let member = parser.current_literal().to_string();
    parser.next();

    Expr::Member(MemberExpr {
        pos: base.get_pos(),
        base: Box::new(base),
        member,
    })
}

fn parse_call_expr(parser: &mut Parser<'_>, scope: &mut Scope<'_>, callee: Expr) -> Expr {
    let mut arguments = vec![];

    if !parser.accept(&[TokenKind::CloseParen]) {
        arguments.push(parse_expr(parser, scope));

        while parser.accept(&[TokenKind::Comma]) {
            arguments.push(parse_expr(parser, scope));
        }

        parser.expect(&[TokenKind::CloseParen]);
    }

    Expr::Call(CallExpr {
        pos: callee.get_pos(),
        callee: Box::new(callee),
        arguments,
    })
}

/// `{ exprList }` in a new child scope.
pub fn parse_block(parser: &mut Parser<'_>, scope: &mut Scope<'_>) -> BlockExpr {
    let mut block_scope = parser.open_scope(scope);

    let block = parse_block_in(parser, &mut block_scope);

    parser.close_scope(block_scope);
    block
}

/// `{ exprList }` evaluated directly in `scope`.
fn parse_block_in(parser: &mut Parser<'_>, scope: &mut Scope<'_>) -> BlockExpr {
    let pos = parser.expect(&[TokenKind::OpenCurly]);
    let body = parse_expr_list(parser, scope);
    parser.expect(&[TokenKind::CloseCurly]);

    BlockExpr { body, pos }
}

pub fn parse_block_expr(parser: &mut Parser<'_>, scope: &mut Scope<'_>) -> Expr {
    Expr::Block(parse_block(parser, scope))
}

/// `if exprList block (else block)?`. Conditions and both branches share
/// one scope, so names declared in the conditions are visible in either
/// branch.
pub fn parse_if_expr(parser: &mut Parser<'_>, scope: &mut Scope<'_>) -> Expr {
    let mut if_scope = parser.open_scope(scope);

    let pos = parser.expect(&[TokenKind::If]);
    let conditions = parse_expr_list(parser, &mut if_scope);
    let then = parse_block(parser, &mut if_scope);

    let otherwise = if parser.accept(&[TokenKind::Else]) {
        Some(parse_block(parser, &mut if_scope))
    } else {
        None
    };

    parser.close_scope(if_scope);

    Expr::If(IfExpr {
        conditions,
        then,
        otherwise,
        pos,
    })
}

/// `for` / `while`, optionally tagged `[]` to collect the body's values.
pub fn parse_loop_expr(parser: &mut Parser<'_>, scope: &mut Scope<'_>) -> Expr {
    let mut loop_scope = parser.open_scope(scope);

    let kind = match parser.current_token_kind() {
        TokenKind::While => LoopKind::While,
        _ => LoopKind::For,
    };
    let pos = parser.expect(&[TokenKind::For, TokenKind::While]);

    let collect = parser.accept(&[TokenKind::OpenBracket]);
    if collect {
        parser.expect(&[TokenKind::CloseBracket]);
    }

    let conditions = parse_expr_list(parser, &mut loop_scope);
    let body = parse_block(parser, &mut loop_scope);

    parser.close_scope(loop_scope);

    Expr::Loop(LoopExpr {
        kind,
        collect,
        conditions,
        body,
        pos,
    })
}

pub fn parse_break_expr(parser: &mut Parser<'_>, scope: &mut Scope<'_>) -> Expr {
    let pos = parser.expect(&[TokenKind::Break]);
    let value = Box::new(parse_expr(parser, scope));

    Expr::Break(BreakExpr { value, pos })
}

pub fn parse_return_expr(parser: &mut Parser<'_>, scope: &mut Scope<'_>) -> Expr {
    let pos = parser.expect(&[TokenKind::Return]);
    let value = Box::new(parse_expr(parser, scope));

    Expr::Return(ReturnExpr { value, pos })
}

pub fn parse_import_expr(parser: &mut Parser<'_>, scope: &mut Scope<'_>) -> Expr {
    let pos = parser.expect(&[TokenKind::Import]);
    let path = Box::new(parse_expr(parser, scope));

    Expr::Import(ImportExpr { path, pos })
}

pub fn parse_array_expr(parser: &mut Parser<'_>, scope: &mut Scope<'_>) -> Expr {
    let pos = parser.expect(&[TokenKind::OpenBracket]);
    let mut elements = vec![];

    if !parser.accept(&[TokenKind::CloseBracket]) {
        elements.push(parse_expr(parser, scope));

        while parser.accept(&[TokenKind::Comma]) {
            elements.push(parse_expr(parser, scope));
        }

        parser.expect(&[TokenKind::CloseBracket]);
    }

    Expr::Array(ArrayExpr { elements, pos })
}

pub fn parse_object_expr(parser: &mut Parser<'_>, scope: &mut Scope<'_>) -> Expr {
    let pos = parser.expect(&[TokenKind::Dollar]);
    parser.expect(&[TokenKind::OpenCurly]);
    let mut members = vec![];

    if !parser.accept(&[TokenKind::CloseCurly]) {
        members.push(parse_object_member(parser, scope));

        while parser.accept(&[TokenKind::Comma]) {
            members.push(parse_object_member(parser, scope));
        }

        parser.expect(&[TokenKind::CloseCurly]);
    }

    Expr::Object(ObjectExpr { members, pos })
}

/// `key : value`. A key that is not a plain name is reported but still
/// parsed, so the rest of the object lines up.
fn parse_object_member(parser: &mut Parser<'_>, scope: &mut Scope<'_>) -> ObjectMember {
    let pos = parser.current_pos();

    if parser.current_token_kind() != TokenKind::Identifier {
        let lexeme = parser.current_literal().to_string();
        parser.add_error(ErrorImpl::InvalidObjectIndex { lexeme });
    }

    let key = Box::new(parse_expr(parser, scope));
    parser.expect(&[TokenKind::Colon]);
    let value = Box::new(parse_expr(parser, scope));

    ObjectMember { key, value, pos }
}

/// `fn(name type, ...) return_type { body }`.
///
/// Parameters are declared in the function's own scope, and the body's
/// expressions run in that same scope.
pub fn parse_function_expr(parser: &mut Parser<'_>, scope: &mut Scope<'_>) -> Expr {
    let mut function_scope = parser.open_scope(scope);

    let pos = parser.expect(&[TokenKind::Fn]);
    parser.expect(&[TokenKind::OpenParen]);
    let mut parameters = vec![];

    if !parser.accept(&[TokenKind::CloseParen]) {
        parameters.extend(parse_parameter(parser, &mut function_scope, pos));

        while parser.accept(&[TokenKind::Comma]) {
            parameters.extend(parse_parameter(parser, &mut function_scope, pos));
        }

        parser.expect(&[TokenKind::CloseParen]);
    }

    let return_type = parse_type(parser);
    let body = parse_block_in(parser, &mut function_scope);

    parser.close_scope(function_scope);

    Expr::Function(FunctionExpr {
        parameters,
        return_type,
        body,
        pos,
    })
}

/// Parameters are declared at the position of their function's `fn`.
fn parse_parameter(
    parser: &mut Parser<'_>,
    scope: &mut Scope<'_>,
    declared_at: Pos,
) -> Option<Parameter> {
    if parser.current_token_kind() != TokenKind::Identifier {
        let kind = parser.current_token_kind().to_string();
        let lexeme = parser.current_literal().to_string();
        parser.add_error(ErrorImpl::InvalidParameter { kind, lexeme });
        parse_expr(parser, scope);
        parse_type(parser);
        return None;
    }

    let name = parser.current_literal().to_string();
    let pos = parser.expect(&[TokenKind::Identifier]);

    let previous = scope
        .insert(Object::new(&name, declared_at))
        .map(|object| object.pos);
    match previous {
        Some(previous) => {
            let previous_at = parser.position(previous).line_col();
            parser.add_error(ErrorImpl::ParameterAlreadyDeclared {
                parameter: name.clone(),
                declared_at: previous_at,
            });
        }
        None => debug!(name = %name, depth = scope.depth(), "declared parameter"),
    }

    let type_name = parse_type(parser);

    Some(Parameter {
        name,
        type_name,
        pos,
    })
}

/// `go{"module", "function", "return type"}`. A non-empty module is
/// recorded with the parser's bridge modules.
pub fn parse_bridge_expr(parser: &mut Parser<'_>, scope: &mut Scope<'_>) -> Expr {
    let pos = parser.expect(&[TokenKind::Go]);
    parser.expect(&[TokenKind::OpenCurly]);

    let module = parse_bridge_argument(parser, scope);
    parser.expect(&[TokenKind::Comma]);
    let function = parse_bridge_argument(parser, scope);
    parser.expect(&[TokenKind::Comma]);
    let return_type = parse_bridge_argument(parser, scope);

    parser.expect(&[TokenKind::CloseCurly]);

    if !module.is_empty() {
        parser.add_bridge_module(module.clone());
    }

    Expr::Bridge(BridgeExpr {
        module,
        function,
        return_type,
        pos,
    })
}

fn parse_bridge_argument(parser: &mut Parser<'_>, scope: &mut Scope<'_>) -> String {
    match parse_expr(parser, scope) {
        Expr::Literal(LiteralExpr {
            kind: TokenKind::String,
            value,
            ..
        }) => unquote(&value),
        other => {
            parser.add_error(ErrorImpl::InvalidBridgeArgument {
                argument: other.to_string(),
            });
            String::new()
        }
    }
}

/// Strips the quotes from a string lexeme and decodes its escapes. An
/// unterminated literal has no closing quote to strip.
pub fn unquote(lexeme: &str) -> String {
    let inner = lexeme.strip_prefix('"').unwrap_or(lexeme);
    let inner = if inner.ends_with('"') && !inner.ends_with("\\\"") {
        &inner[..inner.len() - 1]
    } else {
        inner
    };

    let mut result = String::new();
    let mut chars = inner.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        match chars.peek() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('0') => result.push('\0'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            // Keep the backslash
            _ => {
                result.push(ch);
                continue;
            }
        }
        chars.next();
    }

    result
}
