//! Loading Go sources from disk into an [`AnalysisHost`](crate::ide::AnalysisHost).
//!
//! - [`WorkspaceLoader`] loads every `.go` file under a directory.
//! - [`sdk_loader`] loads a Go SDK source tree, which provides the builtin
//!   fallback file and the standard library packages.

pub mod sdk_loader;
mod workspace_loader;

pub use workspace_loader::{LoadError, WorkspaceLoader};
