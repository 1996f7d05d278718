use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::source::file::Pos;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("var", TokenKind::Var);
        map.insert("const", TokenKind::Const);
        map.insert("for", TokenKind::For);
        map.insert("range", TokenKind::Range);
        map.insert("while", TokenKind::While);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("break", TokenKind::Break);
        map.insert("continue", TokenKind::Continue);
        map.insert("return", TokenKind::Return);
        map.insert("fn", TokenKind::Fn);
        map.insert("import", TokenKind::Import);
        map.insert("go", TokenKind::Go);

        // Types
        map.insert("number", TokenKind::NumberType);
        map.insert("int", TokenKind::IntType);
        map.insert("float", TokenKind::FloatType);
        map.insert("bool", TokenKind::BoolType);
        map.insert("string", TokenKind::StringType);
        map.insert("function", TokenKind::FunctionType);
        map.insert("array", TokenKind::ArrayType);
        map.insert("object", TokenKind::ObjectType);
        map.insert("any", TokenKind::AnyType);
        map
    };
}

/// Classifies an identifier-shaped word.
pub fn lookup(word: &str) -> TokenKind {
    if word == "true" || word == "false" {
        return TokenKind::Bool;
    }
    RESERVED_LOOKUP
        .get(word)
        .copied()
        .unwrap_or(TokenKind::Identifier)
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Illegal,

    // Literals
    Number,
    String,
    Bool,
    Identifier,

    // Keywords
    Var,
    Const,
    For,
    Range,
    While,
    If,
    Else,
    Break,
    Continue,
    Return,
    Fn,
    Import,
    Go,

    // Operators
    OpenParen,
    CloseParen,
    OpenCurly,
    CloseCurly,
    OpenBracket,
    CloseBracket,

    Comma,
    Colon,
    Semicolon,
    Dot,
    Dollar,

    Plus,
    Dash,
    Star,
    Slash,
    Percent,

    BitAnd,
    BitOr,
    BitXor,
    Not,

    Equals,
    NotEquals,
    Greater,
    Less,
    GreaterEquals,
    LessEquals,

    And,
    Or,

    Length,
    Spread,

    // Assignment
    Assignment,
    Declare,
    PlusEquals,
    MinusEquals,
    StarEquals,
    SlashEquals,
    PercentEquals,

    // Types
    NumberType,
    IntType,
    FloatType,
    BoolType,
    StringType,
    FunctionType,
    ArrayType,
    ObjectType,
    AnyType,
}

impl TokenKind {
    /// Canonical spelling, used for keyword lookup and in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::EOF => "EOF",
            TokenKind::Illegal => "Illegal",
            TokenKind::Number => "Number",
            TokenKind::String => "String",
            TokenKind::Bool => "Boolean",
            TokenKind::Identifier => "Identifier",
            TokenKind::Var => "var",
            TokenKind::Const => "const",
            TokenKind::For => "for",
            TokenKind::Range => "range",
            TokenKind::While => "while",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::Break => "break",
            TokenKind::Continue => "continue",
            TokenKind::Return => "return",
            TokenKind::Fn => "fn",
            TokenKind::Import => "import",
            TokenKind::Go => "go",
            TokenKind::OpenParen => "(",
            TokenKind::CloseParen => ")",
            TokenKind::OpenCurly => "{",
            TokenKind::CloseCurly => "}",
            TokenKind::OpenBracket => "[",
            TokenKind::CloseBracket => "]",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Semicolon => ";",
            TokenKind::Dot => ".",
            TokenKind::Dollar => "$",
            TokenKind::Plus => "+",
            TokenKind::Dash => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::BitAnd => "&",
            TokenKind::BitOr => "|",
            TokenKind::BitXor => "^",
            TokenKind::Not => "!",
            TokenKind::Equals => "==",
            TokenKind::NotEquals => "!=",
            TokenKind::Greater => ">",
            TokenKind::Less => "<",
            TokenKind::GreaterEquals => ">=",
            TokenKind::LessEquals => "<=",
            TokenKind::And => "&&",
            TokenKind::Or => "||",
            TokenKind::Length => "#",
            TokenKind::Spread => "..",
            TokenKind::Assignment => "=",
            TokenKind::Declare => ":=",
            TokenKind::PlusEquals => "+=",
            TokenKind::MinusEquals => "-=",
            TokenKind::StarEquals => "*=",
            TokenKind::SlashEquals => "/=",
            TokenKind::PercentEquals => "%=",
            TokenKind::NumberType => "number",
            TokenKind::IntType => "int",
            TokenKind::FloatType => "float",
            TokenKind::BoolType => "bool",
            TokenKind::StringType => "string",
            TokenKind::FunctionType => "function",
            TokenKind::ArrayType => "array",
            TokenKind::ObjectType => "object",
            TokenKind::AnyType => "any",
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::Number | TokenKind::String | TokenKind::Bool | TokenKind::Identifier
        )
    }

    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Var
                | TokenKind::Const
                | TokenKind::For
                | TokenKind::Range
                | TokenKind::While
                | TokenKind::If
                | TokenKind::Else
                | TokenKind::Break
                | TokenKind::Continue
                | TokenKind::Return
                | TokenKind::Fn
                | TokenKind::Import
                | TokenKind::Go
        )
    }

    pub fn is_assign(&self) -> bool {
        matches!(
            self,
            TokenKind::Assignment
                | TokenKind::Declare
                | TokenKind::PlusEquals
                | TokenKind::MinusEquals
                | TokenKind::StarEquals
                | TokenKind::SlashEquals
                | TokenKind::PercentEquals
        )
    }

    pub fn is_type(&self) -> bool {
        matches!(
            self,
            TokenKind::NumberType
                | TokenKind::IntType
                | TokenKind::FloatType
                | TokenKind::BoolType
                | TokenKind::StringType
                | TokenKind::FunctionType
                | TokenKind::ArrayType
                | TokenKind::ObjectType
                | TokenKind::AnyType
        )
    }

    pub fn is_operator(&self) -> bool {
        !matches!(self, TokenKind::EOF | TokenKind::Illegal)
            && !self.is_literal()
            && !self.is_keyword()
            && !self.is_assign()
            && !self.is_type()
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A scanned token: its kind, the source text it covers and where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub pos: Pos,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token {{\nkind: {},\nvalue: {}}}", self.kind, self.value)
    }
}

impl Token {
    fn is_one_of_many(&self, tokens: &[TokenKind]) -> bool {
        tokens.contains(&self.kind)
    }

    pub fn debug(&self) {
        if self.is_one_of_many(&[
            TokenKind::String,
            TokenKind::Identifier,
            TokenKind::Number,
            TokenKind::Bool,
            TokenKind::Illegal,
        ]) {
            println!("{} ({})", self.kind, self.value);
        } else {
            println!("{} ()", self.kind);
        }
    }
}
