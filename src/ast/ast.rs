use crate::{lexer::tokens::TokenKind, source::file::Pos};

/// Expression Types
///
/// Discriminant of every [`Expr`] variant, for callers that only need to
/// know what kind of node they hold.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum ExprType {
    Assignment,
    Binary,
    Unary,
    Literal,
    Symbol,
    Index,
    Member,
    Block,
    If,
    Loop,
    Break,
    Return,
    Import,
    Array,
    Object,
    Function,
    Call,
    Bridge,
    Bad,
}

/// Expression
///
/// The closed set of nodes the parser builds. The language has no
/// statements; every construct is an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Assignment(AssignmentExpr),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Literal(LiteralExpr),
    Symbol(SymbolExpr),
    Index(IndexExpr),
    Member(MemberExpr),
    Block(BlockExpr),
    If(IfExpr),
    Loop(LoopExpr),
    Break(BreakExpr),
    Return(ReturnExpr),
    Import(ImportExpr),
    Array(ArrayExpr),
    Object(ObjectExpr),
    Function(FunctionExpr),
    Call(CallExpr),
    Bridge(BridgeExpr),
    /// Placeholder for an atom that could not be parsed. A tree containing
    /// one always comes with at least one diagnostic.
    Bad(BadExpr),
}

impl Expr {
    pub fn get_expr_type(&self) -> ExprType {
        match self {
            Expr::Assignment(_) => ExprType::Assignment,
            Expr::Binary(_) => ExprType::Binary,
            Expr::Unary(_) => ExprType::Unary,
            Expr::Literal(_) => ExprType::Literal,
            Expr::Symbol(_) => ExprType::Symbol,
            Expr::Index(_) => ExprType::Index,
            Expr::Member(_) => ExprType::Member,
            Expr::Block(_) => ExprType::Block,
            Expr::If(_) => ExprType::If,
            Expr::Loop(_) => ExprType::Loop,
            Expr::Break(_) => ExprType::Break,
            Expr::Return(_) => ExprType::Return,
            Expr::Import(_) => ExprType::Import,
            Expr::Array(_) => ExprType::Array,
            Expr::Object(_) => ExprType::Object,
            Expr::Function(_) => ExprType::Function,
            Expr::Call(_) => ExprType::Call,
            Expr::Bridge(_) => ExprType::Bridge,
            Expr::Bad(_) => ExprType::Bad,
        }
    }

    /// Position of the token the node starts at.
    pub fn get_pos(&self) -> Pos {
        match self {
            Expr::Assignment(e) => e.pos,
            Expr::Binary(e) => e.pos,
            Expr::Unary(e) => e.pos,
            Expr::Literal(e) => e.pos,
            Expr::Symbol(e) => e.pos,
            Expr::Index(e) => e.pos,
            Expr::Member(e) => e.pos,
            Expr::Block(e) => e.pos,
            Expr::If(e) => e.pos,
            Expr::Loop(e) => e.pos,
            Expr::Break(e) => e.pos,
            Expr::Return(e) => e.pos,
            Expr::Import(e) => e.pos,
            Expr::Array(e) => e.pos,
            Expr::Object(e) => e.pos,
            Expr::Function(e) => e.pos,
            Expr::Call(e) => e.pos,
            Expr::Bridge(e) => e.pos,
            Expr::Bad(e) => e.pos,
        }
    }

    /// Name of a bare identifier, or of the identifier an index or member
    /// access is applied to directly. These are the only assignable shapes.
    pub fn assignee_name(&self) -> Option<&str> {
        match self {
            Expr::Symbol(symbol) => Some(&symbol.name),
            Expr::Index(IndexExpr { base, .. }) | Expr::Member(MemberExpr { base, .. }) => {
                match base.as_ref() {
                    Expr::Symbol(symbol) => Some(&symbol.name),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

/// Root of a parsed source: its `;`-separated top level expressions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub exprs: Vec<Expr>,
}

impl Program {
    pub fn get_pos(&self) -> Pos {
        self.exprs.first().map_or(Pos::NONE, Expr::get_pos)
    }
}

/// `target op value` for every assignment operator, `:=` included.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentExpr {
    pub operator: TokenKind,
    pub assignee: Box<Expr>,
    pub value: Box<Expr>,
    pub pos: Pos,
}

impl AssignmentExpr {
    pub fn is_declaration(&self) -> bool {
        self.operator == TokenKind::Declare
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub operator: TokenKind,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub pos: Pos,
}

/// Prefix `!`, `#`, `-` or `+`.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub operator: TokenKind,
    pub value: Box<Expr>,
    pub pos: Pos,
}

/// Number, string or boolean literal. `value` is the lexeme exactly as
/// written, so string literals keep their quotes and escapes.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpr {
    pub kind: TokenKind,
    pub value: String,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SymbolExpr {
    pub name: String,
    pub pos: Pos,
}

/// `base[index]`
#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpr {
    pub base: Box<Expr>,
    pub index: Box<Expr>,
    pub pos: Pos,
}

/// `base.member`, a string-keyed index spelled as a name.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpr {
    pub base: Box<Expr>,
    pub member: String,
    pub pos: Pos,
}

/// `{ a; b; c }`, evaluated in its own scope.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockExpr {
    pub body: Vec<Expr>,
    pub pos: Pos,
}

/// Every condition is evaluated; the last one selects the branch.
#[derive(Debug, Clone, PartialEq)]
pub struct IfExpr {
    pub conditions: Vec<Expr>,
    pub then: BlockExpr,
    pub otherwise: Option<BlockExpr>,
    pub pos: Pos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopKind {
    For,
    While,
}

/// `for` or `while` loop. With `collect` set (`for[] ...`) the loop yields
/// the array of its body's per-iteration values.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopExpr {
    pub kind: LoopKind,
    pub collect: bool,
    pub conditions: Vec<Expr>,
    pub body: BlockExpr,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BreakExpr {
    pub value: Box<Expr>,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnExpr {
    pub value: Box<Expr>,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportExpr {
    pub path: Box<Expr>,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayExpr {
    pub elements: Vec<Expr>,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectMember {
    pub key: Box<Expr>,
    pub value: Box<Expr>,
    pub pos: Pos,
}

/// `${key: value, ...}`
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectExpr {
    pub members: Vec<ObjectMember>,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub type_name: String,
    pub pos: Pos,
}

/// `fn(name type, ...) return_type { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionExpr {
    pub parameters: Vec<Parameter>,
    pub return_type: String,
    pub body: BlockExpr,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub arguments: Vec<Expr>,
    pub pos: Pos,
}

/// `go{"module", "function", "return type"}`: a reference to a function
/// living outside the language. Fields hold the decoded string contents.
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeExpr {
    pub module: String,
    pub function: String,
    pub return_type: String,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BadExpr {
    pub pos: Pos,
}
