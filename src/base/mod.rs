//! Foundation types for the goscope toolchain.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`FileId`], [`InFile`] - Interned file identifiers and file-tagged values
//! - [`FileSet`] - Path to `FileId` registry
//! - [`TextRange`], [`TextSize`] - Source positions
//! - [`LineCol`], [`LineIndex`] - Line/column conversion
//!
//! This module has NO dependencies on other goscope modules.

mod file_id;
mod file_set;
mod span;

pub use file_id::{FileId, InFile};
pub use file_set::FileSet;
pub use span::{LineCol, LineIndex, TextRange, TextSize};

// Re-export text-size types for convenience
pub use text_size;
