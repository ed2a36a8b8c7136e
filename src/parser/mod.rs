//! Rowan-based parser for Go
//!
//! This module provides a lossless parser using:
//! - **logos** for fast lexing
//! - **rowan** for the CST (Concrete Syntax Tree)
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → Tokens with SyntaxKind, trivia included
//!     ↓
//! Parser → GreenNode tree (immutable, cheap to clone, Send + Sync)
//!     ↓
//! SyntaxNode (rowan) → CST with parent pointers
//!     ↓
//! AST layer → Typed wrappers over SyntaxNode
//!     ↓
//! Visitor → kind → category → element dispatch
//! ```
//!
//! Go's automatic semicolon insertion is handled in the parser rather than
//! the lexer: a line break after an identifier, literal, closing bracket or
//! one of `break continue fallthrough return ++ --` ends the statement.

#[allow(clippy::module_inception)]
mod parser;

pub mod ast;
mod lexer;
mod syntax_kind;
pub mod visitor;

pub use ast::AstNode;
pub use lexer::{Lexer, Token, tokenize};
pub use parser::{Parse, SyntaxError, parse};
pub use syntax_kind::{
    GoLanguage, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxNodeChildren, SyntaxToken,
};
pub use visitor::{NodeCategory, Visitor};

/// Re-export rowan types for convenience
pub use rowan::{GreenNode, TextRange, TextSize};
