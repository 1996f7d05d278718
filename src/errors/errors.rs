use std::fmt::Display;

use thiserror::Error;

use crate::source::file::Position;

/// Number of diagnostics rendered by [`ErrorList`]'s `Display` before the
/// remainder is summarised.
pub const MAX_RENDERED_ERRORS: usize = 10;

/// One diagnostic: what went wrong, where, and the source line it points
/// into.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
    line: String,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position, line: String) -> Self {
        Error {
            internal_error: error_impl,
            position,
            line,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_line(&self) -> &str {
        &self.line
    }

    pub fn get_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_message(&self) -> String {
        self.internal_error.to_string()
    }

    /// Both coordinates match; the file name is not compared.
    pub fn same_pos(&self, position: &Position) -> bool {
        self.position.row == position.row && self.position.col == position.col
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::IllegalCharacter { .. } => "IllegalCharacter",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedEof => "UnexpectedEof",
            ErrorImpl::ExpectedToken { .. } => "ExpectedToken",
            ErrorImpl::VariableAlreadyDeclared { .. } => "VariableAlreadyDeclared",
            ErrorImpl::ParameterAlreadyDeclared { .. } => "ParameterAlreadyDeclared",
            ErrorImpl::VariableNotDeclared { .. } => "VariableNotDeclared",
            ErrorImpl::InvalidAssignment { .. } => "InvalidAssignment",
            ErrorImpl::InvalidParameter { .. } => "InvalidParameter",
            ErrorImpl::InvalidObjectIndex { .. } => "InvalidObjectIndex",
            ErrorImpl::InvalidBridgeArgument { .. } => "InvalidBridgeArgument",
        }
    }

    pub fn get_category(&self) -> ErrorCategory {
        match &self.internal_error {
            ErrorImpl::IllegalCharacter { .. } => ErrorCategory::Lexical,
            ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::UnexpectedEof
            | ErrorImpl::ExpectedToken { .. } => ErrorCategory::Syntactic,
            ErrorImpl::VariableAlreadyDeclared { .. }
            | ErrorImpl::ParameterAlreadyDeclared { .. }
            | ErrorImpl::VariableNotDeclared { .. }
            | ErrorImpl::InvalidAssignment { .. }
            | ErrorImpl::InvalidParameter { .. }
            | ErrorImpl::InvalidObjectIndex { .. }
            | ErrorImpl::InvalidBridgeArgument { .. } => ErrorCategory::Semantic,
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::IllegalCharacter { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { lexeme, .. } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                lexeme
            )),
            ErrorImpl::UnexpectedEof => {
                ErrorTip::Suggestion(String::from("The expression is incomplete"))
            }
            ErrorImpl::ExpectedToken { .. } => ErrorTip::None,
            ErrorImpl::VariableAlreadyDeclared { variable, .. } => ErrorTip::Suggestion(format!(
                "Use `=` to assign to the existing `{}`",
                variable
            )),
            ErrorImpl::ParameterAlreadyDeclared { parameter, .. } => {
                ErrorTip::Suggestion(format!("Rename one of the `{}` parameters", parameter))
            }
            ErrorImpl::VariableNotDeclared { variable } => {
                ErrorTip::Suggestion(format!("Declare `{}` with `:=` first", variable))
            }
            ErrorImpl::InvalidAssignment { .. } => ErrorTip::Suggestion(String::from(
                "Only a name or a single index of a name can be assigned to",
            )),
            ErrorImpl::InvalidParameter { .. } => ErrorTip::Suggestion(String::from(
                "Parameters are a name followed by a type",
            )),
            ErrorImpl::InvalidObjectIndex { .. } => {
                ErrorTip::Suggestion(String::from("Object keys must be plain names"))
            }
            ErrorImpl::InvalidBridgeArgument { .. } => ErrorTip::Suggestion(String::from(
                "go{\"module\", \"function\", \"type\"} takes three string literals",
            )),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.line)?;
        writeln!(f, "{}^", " ".repeat(self.position.col.saturating_sub(1)))?;
        write!(f, "{} {}", self.position.line_col(), self.internal_error)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Lexical,
    Syntactic,
    Semantic,
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("Illegal character '{character}'")]
    IllegalCharacter { character: String },
    #[error("Unexpected {kind}: {lexeme}")]
    UnexpectedToken { kind: String, lexeme: String },
    #[error("Unexpected end of input")]
    UnexpectedEof,
    #[error("Expected '{expected}' got '{found}'")]
    ExpectedToken { expected: String, found: String },
    #[error("Variable '{variable}' already declared in current scope at {declared_at}")]
    VariableAlreadyDeclared {
        variable: String,
        declared_at: String,
    },
    #[error("Parameter '{parameter}' already declared at {declared_at}")]
    ParameterAlreadyDeclared {
        parameter: String,
        declared_at: String,
    },
    #[error("Cannot assign to undeclared variable '{variable}'")]
    VariableNotDeclared { variable: String },
    #[error("Invalid assignment to {target}")]
    InvalidAssignment { target: String },
    #[error("Invalid Argument {kind}: '{lexeme}'")]
    InvalidParameter { kind: String, lexeme: String },
    #[error("Invalid Object Index '{lexeme}'")]
    InvalidObjectIndex { lexeme: String },
    #[error("Expected String literal in go expression, got {argument}")]
    InvalidBridgeArgument { argument: String },
}

/// Ordered diagnostics of one parse.
///
/// A diagnostic at the same row and column as the one added just before it
/// is dropped; earlier entries are not consulted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorList {
    errors: Vec<Error>,
}

impl ErrorList {
    pub fn new() -> Self {
        ErrorList { errors: vec![] }
    }

    /// Appends `error`, returning whether it was kept.
    pub fn add(&mut self, error: Error) -> bool {
        if let Some(last) = self.errors.last() {
            if last.same_pos(error.get_position()) {
                return false;
            }
        }
        self.errors.push(error);
        true
    }

    pub fn count(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Error> {
        self.errors.iter()
    }
}

impl IntoIterator for ErrorList {
    type Item = Error;
    type IntoIter = std::vec::IntoIter<Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ErrorList {
    type Item = &'a Error;
    type IntoIter = std::slice::Iter<'a, Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl Display for ErrorList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for error in self.errors.iter().take(MAX_RENDERED_ERRORS) {
            writeln!(
                f,
                "{} {}",
                error.get_position().line_col(),
                error.get_error()
            )?;
        }
        if self.errors.len() > MAX_RENDERED_ERRORS {
            write!(
                f,
                "More than {} errors, {} hidden",
                MAX_RENDERED_ERRORS,
                self.errors.len() - MAX_RENDERED_ERRORS
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorList {}
