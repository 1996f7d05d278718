//! Unit tests for the parser module.
//!
//! This module contains tests for parsing the language's constructs including:
//! - Declarations, assignments and their scope checks
//! - Operator precedence and associativity
//! - Postfix chains
//! - Blocks, conditionals, loops and functions
//! - Objects, arrays and go bridges
//! - Diagnostics, their positions and deduplication

use std::thread;

use crate::{
    ast::{
        ast::{Expr, ExprType, LoopKind, Program},
        scope::{Object, Scope},
    },
    lexer::tokens::TokenKind,
    source::file::Pos,
};

use super::{
    expr::unquote,
    parser::{parse, parse_expression, parse_in_scope},
};

fn parse_ok(source: &str) -> Program {
    let (program, _, errors) = parse("test.tigr", source);
    assert!(errors.is_empty(), "unexpected diagnostics:\n{}", errors);
    program
}

fn diagnostics(source: &str) -> Vec<String> {
    let (_, _, errors) = parse("test.tigr", source);
    errors
        .iter()
        .map(|error| format!("{} {}", error.get_position().line_col(), error.get_message()))
        .collect()
}

fn single(source: &str) -> Expr {
    let mut program = parse_ok(source);
    assert_eq!(program.exprs.len(), 1);
    program.exprs.remove(0)
}

#[test]
fn test_parse_declaration_then_assignment() {
    let mut scope = Scope::new(None);
    let (program, _, errors) = parse_in_scope("test.tigr", "x := 5; x = x + 1", &mut scope);

    assert!(errors.is_empty());
    assert_eq!(program.exprs.len(), 2);
    assert_eq!(scope.len(), 1);
    assert_eq!(scope.get("x"), Some(&Object::new("x", Pos::new(3))));
}

#[test]
fn test_assignment_to_undeclared_variable() {
    assert_eq!(
        diagnostics("x = 5"),
        vec!["1:3 Cannot assign to undeclared variable 'x'"]
    );
}

#[test]
fn test_redeclaration_cites_first_declaration() {
    assert_eq!(
        diagnostics("x := 5; x := 6"),
        vec!["1:11 Variable 'x' already declared in current scope at 1:3"]
    );
}

#[test]
fn test_redeclaration_keeps_first_object() {
    let mut scope = Scope::new(None);
    parse_in_scope("test.tigr", "x := 5; x := 6", &mut scope);

    assert_eq!(scope.get("x").map(|object| object.pos), Some(Pos::new(3)));
}

#[test]
fn test_unexpected_end_of_input() {
    assert_eq!(diagnostics("1 +"), vec!["1:3 Unexpected end of input"]);
}

#[test]
fn test_empty_source() {
    assert_eq!(diagnostics(""), vec!["1:1 Unexpected end of input"]);
}

#[test]
fn test_parse_function_literal() {
    let expr = single("fn(a int, b int) int { a + b }");

    let Expr::Function(function) = expr else {
        panic!("expected a function literal");
    };
    let parameters: Vec<(&str, &str)> = function
        .parameters
        .iter()
        .map(|p| (p.name.as_str(), p.type_name.as_str()))
        .collect();

    assert_eq!(parameters, vec![("a", "int"), ("b", "int")]);
    assert_eq!(function.return_type, "int");
    assert_eq!(function.body.body.len(), 1);
    assert_eq!(function.body.body[0].get_expr_type(), ExprType::Binary);
}

#[test]
fn test_parse_bridge() {
    let (program, modules, errors) = parse("test.tigr", r#"go{"fmt","fmt.Println","int"}"#);

    assert!(errors.is_empty());
    let Expr::Bridge(bridge) = &program.exprs[0] else {
        panic!("expected a bridge");
    };
    assert_eq!(bridge.module, "fmt");
    assert_eq!(bridge.function, "fmt.Println");
    assert_eq!(bridge.return_type, "int");
    assert!(modules.contains("fmt"));
    assert_eq!(modules.len(), 1);
}

#[test]
fn test_bridge_modules_are_distinct_and_ordered() {
    let (_, modules, errors) = parse(
        "test.tigr",
        r#"go{"os", "a", "int"}; go{"fmt", "b", "int"}; go{"os", "c", "string"}; go{"", "d", "any"}"#,
    );

    assert!(errors.is_empty());
    assert_eq!(
        modules.into_iter().collect::<Vec<_>>(),
        vec!["fmt".to_string(), "os".to_string()]
    );
}

#[test]
fn test_bridge_rejects_non_string_argument() {
    let (program, modules, errors) = parse("test.tigr", r#"x := 1; go{"fmt", x, "int"}"#);

    assert_eq!(errors.count(), 1);
    assert_eq!(
        errors.errors()[0].get_message(),
        "Expected String literal in go expression, got x"
    );
    assert!(modules.contains("fmt"));
    let Expr::Bridge(bridge) = &program.exprs[1] else {
        panic!("expected a bridge");
    };
    assert_eq!(bridge.function, "");
}

#[test]
fn test_bridge_decodes_escapes() {
    let expr = single(r#"go{"a\"b", "f\\g", "int"}"#);

    let Expr::Bridge(bridge) = expr else {
        panic!("expected a bridge");
    };
    assert_eq!(bridge.module, "a\"b");
    assert_eq!(bridge.function, "f\\g");
}

#[test]
fn test_subtraction_is_right_associative() {
    let expr = single("a - b - c");

    let Expr::Binary(outer) = &expr else {
        panic!("expected a binary expression");
    };
    assert_eq!(outer.operator, TokenKind::Dash);
    assert_eq!(outer.left.to_string(), "a");
    assert_eq!(outer.right.to_string(), "(b - c)");
    assert_eq!(expr.to_string(), "(a - (b - c))");
}

#[test]
fn test_division_is_right_associative() {
    assert_eq!(single("a / b / c").to_string(), "(a / (b / c))");
}

#[test]
fn test_operator_precedence() {
    assert_eq!(
        single("a + b * c == d && e").to_string(),
        "(((a + (b * c)) == d) && e)"
    );
    assert_eq!(single("a == b & c").to_string(), "((a == b) & c)");
    assert_eq!(single("a | b || c ^ d").to_string(), "((a | b) || (c ^ d))");
    assert_eq!(single("a % b - c <= d").to_string(), "(((a % b) - c) <= d)");
}

#[test]
fn test_unary_operators() {
    assert_eq!(single("-a + #b").to_string(), "((-a) + (#b))");
    assert_eq!(single("!f(x)").to_string(), "(!f(x))");
    assert_eq!(single("+a[0]").to_string(), "(+a[0])");
}

#[test]
fn test_only_one_prefix_operator() {
    assert_eq!(diagnostics("--a"), vec!["1:2 Unexpected -: -"]);
}

#[test]
fn test_grouping() {
    assert_eq!(single("(a - b) - c").to_string(), "((a - b) - c)");
}

#[test]
fn test_postfix_chain() {
    let expr = single("a.b[c](d)");

    let Expr::Call(call) = &expr else {
        panic!("expected a call");
    };
    assert_eq!(call.arguments.len(), 1);
    let Expr::Index(index) = call.callee.as_ref() else {
        panic!("expected an index");
    };
    let Expr::Member(member) = index.base.as_ref() else {
        panic!("expected a member access");
    };
    assert_eq!(member.member, "b");
    assert_eq!(expr.to_string(), "a.b[c](d)");
}

#[test]
fn test_chained_calls() {
    let expr = single("f()(1, 2)");

    assert_eq!(expr.to_string(), "f()(1, 2)");
    let Expr::Call(call) = expr else {
        panic!("expected a call");
    };
    assert_eq!(call.callee.get_expr_type(), ExprType::Call);
}

#[test]
fn test_number_member_access() {
    assert_eq!(single("1.foo").to_string(), "1.foo");
    assert_eq!(single("1.5.foo").to_string(), "1.5.foo");
}

#[test]
fn test_node_positions() {
    let expr = single("a + b");
    assert_eq!(expr.get_pos(), Pos::new(1));

    let expr = single("  x[0]");
    assert_eq!(expr.get_pos(), Pos::new(3));
}

#[test]
fn test_assignment_is_right_recursive() {
    let program = parse_ok("a := 1; b := 2; a = b = 3");

    let Expr::Assignment(outer) = &program.exprs[2] else {
        panic!("expected an assignment");
    };
    assert_eq!(outer.assignee.to_string(), "a");
    assert_eq!(outer.value.get_expr_type(), ExprType::Assignment);
    assert_eq!(program.exprs[2].to_string(), "(a = (b = 3))");
}

#[test]
fn test_declaration_sees_itself_in_value() {
    parse_ok("x := x");
}

#[test]
fn test_compound_assignments() {
    parse_ok("x := 1; x += 2; x -= 3; x *= 4; x /= 5; x %= 6");
}

#[test]
fn test_indexed_assignment() {
    parse_ok("a := [1, 2]; a[0] = 5; a.b = 1; a[1] += 2");
}

#[test]
fn test_indexed_assignment_to_undeclared() {
    assert_eq!(
        diagnostics("a[0] = 5"),
        vec!["1:6 Cannot assign to undeclared variable 'a'"]
    );
    assert_eq!(
        diagnostics("o.k = 5"),
        vec!["1:5 Cannot assign to undeclared variable 'o'"]
    );
}

#[test]
fn test_indexed_declaration_declares_nothing() {
    let mut scope = Scope::new(None);
    let (_, _, errors) = parse_in_scope("test.tigr", "a[0] := 1", &mut scope);

    assert!(errors.is_empty());
    assert!(scope.is_empty());
}

#[test]
fn test_nested_index_is_not_assignable() {
    assert_eq!(
        diagnostics("a := []; a[0][1] = 5"),
        vec!["1:18 Invalid assignment to a[0][1]"]
    );
}

#[test]
fn test_invalid_assignment_is_reported_once() {
    assert_eq!(diagnostics("1 = 2"), vec!["1:3 Invalid assignment to 1"]);
    assert_eq!(
        diagnostics("a := 1; a + 1 = 2"),
        vec!["1:15 Invalid assignment to (a + 1)"]
    );
}

#[test]
fn test_block_scope_ends_with_block() {
    assert_eq!(
        diagnostics("{ x := 1 }; x = 2"),
        vec!["1:15 Cannot assign to undeclared variable 'x'"]
    );
}

#[test]
fn test_inner_scope_sees_outer_names() {
    parse_ok("x := 1; { x = 2 }");
}

#[test]
fn test_inner_scope_may_shadow() {
    let mut scope = Scope::new(None);
    let (_, _, errors) = parse_in_scope("test.tigr", "x := 1; { x := 2; x = 3 }", &mut scope);

    assert!(errors.is_empty());
    assert_eq!(scope.len(), 1);
}

#[test]
fn test_parse_in_scope_with_predeclared_names() {
    let mut scope = Scope::new(None);
    scope.insert(Object::new("print", Pos::NONE));

    let (_, _, errors) = parse_in_scope("test.tigr", "print = 1", &mut scope);

    assert!(errors.is_empty());
}

#[test]
fn test_parse_in_nested_outer_scope() {
    let mut root = Scope::new(None);
    root.insert(Object::new("global", Pos::NONE));
    let mut child = Scope::new(Some(&root));

    let (_, _, errors) = parse_in_scope("test.tigr", "global = 1; local := 2", &mut child);

    assert!(errors.is_empty());
    assert!(child.get("local").is_some());
    assert!(root.get("local").is_none());
}

#[test]
fn test_parse_if() {
    let expr = single("if x := 1; x > 0 { x = 2 } else { x = 3 }");

    let Expr::If(if_expr) = expr else {
        panic!("expected an if");
    };
    assert_eq!(if_expr.conditions.len(), 2);
    assert_eq!(if_expr.then.body.len(), 1);
    assert!(if_expr.otherwise.is_some());
}

#[test]
fn test_if_scope_ends_with_if() {
    assert_eq!(
        diagnostics("if true { y := 1 }; y = 2"),
        vec!["1:23 Cannot assign to undeclared variable 'y'"]
    );
}

#[test]
fn test_parse_loops() {
    let Expr::Loop(for_loop) = single("for[] i := 0; i < 10 { i += 1 }") else {
        panic!("expected a loop");
    };
    assert_eq!(for_loop.kind, LoopKind::For);
    assert!(for_loop.collect);
    assert_eq!(for_loop.conditions.len(), 2);

    let Expr::Loop(while_loop) = single("while true { break 1 }") else {
        panic!("expected a loop");
    };
    assert_eq!(while_loop.kind, LoopKind::While);
    assert!(!while_loop.collect);
    assert_eq!(while_loop.body.body[0].get_expr_type(), ExprType::Break);
}

#[test]
fn test_loop_tag_needs_close_bracket() {
    assert_eq!(
        diagnostics("for[ true { 1 }"),
        vec!["1:6 Expected ']' got 'true'"]
    );
}

#[test]
fn test_return_and_import() {
    let Expr::Function(function) = single("fn() int { return 1 }") else {
        panic!("expected a function literal");
    };
    assert!(function.parameters.is_empty());
    assert_eq!(function.body.body[0].get_expr_type(), ExprType::Return);

    assert_eq!(single("import \"std\"").get_expr_type(), ExprType::Import);
}

#[test]
fn test_parse_arrays() {
    let Expr::Array(empty) = single("[]") else {
        panic!("expected an array");
    };
    assert!(empty.elements.is_empty());

    let Expr::Array(array) = single("[1, \"two\", true]") else {
        panic!("expected an array");
    };
    assert_eq!(array.elements.len(), 3);
    assert_eq!(array.elements[1].to_string(), "\"two\"");
}

#[test]
fn test_parse_objects() {
    let Expr::Object(empty) = single("${}") else {
        panic!("expected an object");
    };
    assert!(empty.members.is_empty());

    let Expr::Object(object) = single("${a: 1, b: \"two\"}") else {
        panic!("expected an object");
    };
    assert_eq!(object.members.len(), 2);
    assert_eq!(object.members[0].key.to_string(), "a");
    assert_eq!(object.members[1].value.to_string(), "\"two\"");
}

#[test]
fn test_invalid_object_key() {
    assert_eq!(diagnostics("${1: 2}"), vec!["1:3 Invalid Object Index '1'"]);
}

#[test]
fn test_invalid_member_access() {
    assert_eq!(diagnostics("a.1"), vec!["1:3 Invalid Object Index '1'"]);
}

#[test]
fn test_duplicate_parameter() {
    assert_eq!(
        diagnostics("fn(a int, a int) int { a }"),
        vec!["1:13 Parameter 'a' already declared at 1:1"]
    );
}

#[test]
fn test_invalid_parameter() {
    assert_eq!(
        diagnostics("fn(1 int) int { 1 }"),
        vec!["1:4 Invalid Argument Number: '1'"]
    );
}

#[test]
fn test_function_body_shares_parameter_scope() {
    assert_eq!(
        diagnostics("fn(a int) int { a := 1 }"),
        vec!["1:19 Variable 'a' already declared in current scope at 1:1"]
    );
}

#[test]
fn test_function_scope_ends_with_function() {
    assert_eq!(
        diagnostics("fn(a int) int { a }; a = 1"),
        vec!["1:24 Cannot assign to undeclared variable 'a'"]
    );
}

#[test]
fn test_parameter_needs_type() {
    assert_eq!(
        diagnostics("fn(a) int { a }"),
        vec!["1:5 Expected 'number or int or float or bool or string or function or array or object or any' got ')'"]
    );
}

#[test]
fn test_type_annotations() {
    let Expr::Function(function) = single(
        "fn(a array int, f function(int, string) bool, g function() any, o object) array any { a }",
    ) else {
        panic!("expected a function literal");
    };
    let types: Vec<&str> = function
        .parameters
        .iter()
        .map(|p| p.type_name.as_str())
        .collect();

    assert_eq!(
        types,
        vec!["array int", "function(int, string) bool", "function() any", "object"]
    );
    assert_eq!(function.return_type, "array any");
}

#[test]
fn test_missing_close_paren() {
    assert_eq!(diagnostics("(1 + 2"), vec!["1:6 Expected ')' got 'EOF'"]);
    assert_eq!(diagnostics("f(1, 2"), vec!["1:6 Expected ')' got 'EOF'"]);
}

#[test]
fn test_illegal_character() {
    assert_eq!(diagnostics("x := @"), vec!["1:6 Illegal character '@'"]);
}

#[test]
fn test_trailing_input() {
    assert_eq!(diagnostics("1 2"), vec!["1:3 Unexpected Number: 2"]);
}

#[test]
fn test_bad_atom_keeps_tree_shape() {
    let (program, _, errors) = parse("test.tigr", "{ 1; }");

    assert_eq!(errors.count(), 1);
    assert_eq!(
        errors.errors()[0].get_message(),
        "Unexpected }: }"
    );
    let Expr::Block(block) = &program.exprs[0] else {
        panic!("expected a block");
    };
    assert_eq!(block.body[1].get_expr_type(), ExprType::Bad);
}

#[test]
fn test_independent_errors_are_all_reported() {
    assert_eq!(
        diagnostics("x = 1; y = 2"),
        vec![
            "1:3 Cannot assign to undeclared variable 'x'",
            "1:10 Cannot assign to undeclared variable 'y'"
        ]
    );
}

#[test]
fn test_missing_token_cascades() {
    assert_eq!(
        diagnostics("fn(a int int) int { a }"),
        vec!["1:10 Expected ')' got 'int'", "1:13 Expected '{' got ')'"]
    );
}

#[test]
fn test_multiline_positions() {
    assert_eq!(
        diagnostics("x := 1\n// comment\ny = 2"),
        vec!["3:3 Cannot assign to undeclared variable 'y'"]
    );
}

#[test]
fn test_error_renders_source_line() {
    let (_, _, errors) = parse("test.tigr", "a := 1;\n  b = 2");

    assert_eq!(
        errors.errors()[0].to_string(),
        "  b = 2\n    ^\n2:5 Cannot assign to undeclared variable 'b'"
    );
}

#[test]
fn test_parse_expression() {
    assert!(parse_expression("test.tigr", "x := 1").is_ok());

    let errors = parse_expression("test.tigr", "x = 1").unwrap_err();
    assert_eq!(errors.count(), 1);
}

#[test]
fn test_literals() {
    let Expr::Literal(string) = single("\"hi\"") else {
        panic!("expected a literal");
    };
    assert_eq!(string.kind, TokenKind::String);
    assert_eq!(string.value, "\"hi\"");

    let Expr::Literal(boolean) = single("false") else {
        panic!("expected a literal");
    };
    assert_eq!(boolean.kind, TokenKind::Bool);
}

#[test]
fn test_unquote() {
    assert_eq!(unquote("\"a\\nb\""), "a\nb");
    assert_eq!(unquote("\"tab\\there\""), "tab\there");
    assert_eq!(unquote("\"\""), "");
    assert_eq!(unquote("\"abc"), "abc");
    assert_eq!(unquote("\"a\\q\""), "a\\q");
}

#[test]
fn test_declaration_is_placed_at_operator() {
    let mut scope = Scope::new(None);
    let (_, _, errors) = parse_in_scope("test.tigr", "  total  :=  1", &mut scope);

    assert!(errors.is_empty());
    assert_eq!(scope.get("total").map(|object| object.pos), Some(Pos::new(10)));
}

#[test]
fn test_parameters_are_placed_at_fn() {
    assert_eq!(
        diagnostics("f := 1;\n  fn(a int, b int, a int) int { b := 1 }"),
        vec![
            "2:22 Parameter 'a' already declared at 2:3",
            "2:35 Variable 'b' already declared in current scope at 2:3"
        ]
    );
}

#[test]
fn test_keyword_forms_as_operands() {
    let program = parse_ok("a := 1; (break a) + 1; (return a) * 2");

    let Expr::Binary(sum) = &program.exprs[1] else {
        panic!("expected a binary expression");
    };
    assert_eq!(sum.left.get_expr_type(), ExprType::Break);

    let printed = program.to_string();
    assert_eq!(printed, "(a := 1); ((break a) + 1); ((return a) * 2)");

    let reprinted = parse_ok(&printed);
    let Expr::Binary(product) = &reprinted.exprs[2] else {
        panic!("expected a binary expression");
    };
    assert_eq!(product.left.get_expr_type(), ExprType::Return);
    assert_eq!(reprinted.to_string(), printed);
}

const DEEP_NESTING: usize = 10_000;

/// Dropping a deeply nested tree recurses once per level, so it happens on a
/// thread with room for that.
fn drop_deep(program: Program) {
    thread::Builder::new()
        .stack_size(256 * 1024 * 1024)
        .spawn(move || drop(program))
        .unwrap()
        .join()
        .unwrap();
}

#[test]
fn test_deeply_nested_groups() {
    let source = format!(
        "{}1{}",
        "(".repeat(DEEP_NESTING),
        ")".repeat(DEEP_NESTING)
    );

    let expr = single(&source);

    assert_eq!(expr.get_expr_type(), ExprType::Literal);
}

#[test]
fn test_deeply_nested_arrays() {
    let source = format!(
        "{}1{}",
        "[".repeat(DEEP_NESTING),
        "]".repeat(DEEP_NESTING)
    );

    let program = parse_ok(&source);

    assert_eq!(program.exprs[0].get_expr_type(), ExprType::Array);
    drop_deep(program);
}

#[test]
fn test_deeply_nested_blocks() {
    let source = format!(
        "x := 0; {}x = 1{}",
        "{ ".repeat(DEEP_NESTING),
        " }".repeat(DEEP_NESTING)
    );

    let program = parse_ok(&source);

    assert_eq!(program.exprs[1].get_expr_type(), ExprType::Block);
    drop_deep(program);
}

#[test]
fn test_long_operator_chain() {
    let source = vec!["a"; DEEP_NESTING].join(" - ");

    let program = parse_ok(&source);

    assert_eq!(program.exprs[0].get_expr_type(), ExprType::Binary);
    drop_deep(program);
}

#[test]
fn test_first_line_columns_match_later_lines() {
    assert_eq!(
        diagnostics("abc = 1;\nabc = 2"),
        vec![
            "1:5 Cannot assign to undeclared variable 'abc'",
            "2:5 Cannot assign to undeclared variable 'abc'"
        ]
    );
}
