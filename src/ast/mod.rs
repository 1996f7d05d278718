/// AST (Abstract Syntax Tree) module
/// Contains the tree the parser builds and the scopes it resolves names in
///
/// Submodules:
/// - ast: The closed expression type and its node structs
/// - scope: Lexical scopes and declared objects
/// - print: Canonical source text for every node
pub mod ast;
pub mod print;
pub mod scope;
