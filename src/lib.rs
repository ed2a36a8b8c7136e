//! # goscope-base
//!
//! Core library for Go source navigation: a lossless parser, a kind-based
//! syntax visitor, and a reference resolver that maps identifiers to the
//! declarations they name across files, packages and imports.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! project → Loading workspaces and the Go SDK from disk
//!   ↓
//! ide     → IDE features (goto-definition, completion, find-references)
//!   ↓
//! hir     → Workspace model and reference resolution
//!   ↓
//! parser  → Lexer (logos) + parser (rowan CST) + AST + visitor
//!   ↓
//! base    → Primitives (FileId, FileSet, LineIndex)
//! ```
//!
//! Resolution is synchronous and uncached: every query walks the current
//! trees afresh.

/// Foundation types: FileId, FileSet, LineIndex
pub mod base;

/// Semantic model: workspace, scopes, members and references
pub mod hir;

/// IDE features: completion, goto-definition, find-references
pub mod ide;

/// Lexer, parser, typed AST and visitor
pub mod parser;

/// Loading files from disk
pub mod project;

// Re-export commonly needed items
pub use base::{FileId, InFile, LineCol, LineIndex, TextRange, TextSize};
pub use hir::{Declaration, GoReference, Reference, ResolverConfig, Workspace};
pub use ide::{Analysis, AnalysisHost};
pub use parser::{Parse, parse};
