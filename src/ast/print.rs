use std::fmt::{Display, Formatter, Result};

use super::ast::{
    BlockExpr, Expr, FunctionExpr, IfExpr, LoopExpr, LoopKind, ObjectMember, Parameter, Program,
};

fn write_list<T: Display>(f: &mut Formatter<'_>, items: &[T], separator: &str) -> Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", separator)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

/// Quotes `value` as a string literal the lexer reads back unchanged.
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            '\r' => quoted.push_str("\\r"),
            '\0' => quoted.push_str("\\0"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

impl Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write_list(f, &self.exprs, "; ")
    }
}

impl Display for BlockExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{{ ")?;
        write_list(f, &self.body, "; ")?;
        write!(f, " }}")
    }
}

impl Display for IfExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "if ")?;
        write_list(f, &self.conditions, "; ")?;
        write!(f, " {}", self.then)?;
        if let Some(otherwise) = &self.otherwise {
            write!(f, " else {}", otherwise)?;
        }
        Ok(())
    }
}

impl Display for LoopExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self.kind {
            LoopKind::For => write!(f, "for")?,
            LoopKind::While => write!(f, "while")?,
        }
        if self.collect {
            write!(f, "[]")?;
        }
        write!(f, " ")?;
        write_list(f, &self.conditions, "; ")?;
        write!(f, " {}", self.body)
    }
}

impl Display for ObjectMember {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}: {}", self.key, self.value)
    }
}

impl Display for Parameter {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{} {}", self.name, self.type_name)
    }
}

impl Display for FunctionExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "fn(")?;
        write_list(f, &self.parameters, ", ")?;
        write!(f, ") {} {}", self.return_type, self.body)
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        stacker::maybe_grow(PRINT_RED_ZONE, PRINT_SEGMENT_SIZE, || self.write_to(f))
    }
}

const PRINT_RED_ZONE: usize = 64 * 1024;
const PRINT_SEGMENT_SIZE: usize = 1024 * 1024;

impl Expr {
    /// Prefix keyword forms are parenthesized like operators, so an operand
    /// such as `(break a) + 1` keeps its grouping when printed.
    fn write_to(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Expr::Assignment(e) => write!(f, "({} {} {})", e.assignee, e.operator, e.value),
            Expr::Binary(e) => write!(f, "({} {} {})", e.left, e.operator, e.right),
            Expr::Unary(e) => write!(f, "({}{})", e.operator, e.value),
            Expr::Literal(e) => write!(f, "{}", e.value),
            Expr::Symbol(e) => write!(f, "{}", e.name),
            Expr::Index(e) => write!(f, "{}[{}]", e.base, e.index),
            Expr::Member(e) => write!(f, "{}.{}", e.base, e.member),
            Expr::Block(e) => write!(f, "{}", e),
            Expr::If(e) => write!(f, "{}", e),
            Expr::Loop(e) => write!(f, "{}", e),
            Expr::Break(e) => write!(f, "(break {})", e.value),
            Expr::Return(e) => write!(f, "(return {})", e.value),
            Expr::Import(e) => write!(f, "(import {})", e.path),
            Expr::Array(e) => {
                write!(f, "[")?;
                write_list(f, &e.elements, ", ")?;
                write!(f, "]")
            }
            Expr::Object(e) => {
                write!(f, "${{")?;
                write_list(f, &e.members, ", ")?;
                write!(f, "}}")
            }
            Expr::Function(e) => write!(f, "{}", e),
            Expr::Call(e) => {
                write!(f, "{}(", e.callee)?;
                write_list(f, &e.arguments, ", ")?;
                write!(f, ")")
            }
            Expr::Bridge(e) => write!(
                f,
                "go{{{}, {}, {}}}",
                quote(&e.module),
                quote(&e.function),
                quote(&e.return_type)
            ),
            Expr::Bad(_) => write!(f, "<bad>"),
        }
    }
}
