//! Go-to-definition implementation.

use std::path::PathBuf;

use smol_str::SmolStr;

use crate::base::{FileId, TextRange, TextSize};
use crate::hir::{Declaration, LookupKind, Reference, Workspace};

/// A place to navigate to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationTarget {
    /// The file holding the declaration; `None` for a package directory.
    pub file: Option<FileId>,
    /// The file or directory path.
    pub path: Option<PathBuf>,
    /// The whole declaring node.
    pub full_range: Option<TextRange>,
    /// The declared name.
    pub focus_range: Option<TextRange>,
    pub name: SmolStr,
    pub kind: LookupKind,
}

impl NavigationTarget {
    pub fn from_declaration(ws: &Workspace, declaration: &Declaration) -> Option<Self> {
        let path = match declaration {
            Declaration::Directory(dir) => Some(dir.path.clone()),
            _ => declaration
                .file()
                .and_then(|file| ws.path(file))
                .map(PathBuf::from),
        };
        Some(Self {
            file: declaration.file(),
            path,
            full_range: declaration.full_range(),
            focus_range: declaration.focus_range(),
            name: declaration.name()?,
            kind: declaration.kind(),
        })
    }
}

/// Find the declaration of the reference under `offset`.
pub fn goto_definition(ws: &Workspace, file: FileId, offset: TextSize) -> Option<NavigationTarget> {
    let reference = Reference::at_offset(ws, file, offset)?;
    let Some(declaration) = reference.resolve() else {
        tracing::debug!("`{:?}` at {:?} in {} does not resolve", reference.name(), offset, file);
        return None;
    };
    NavigationTarget::from_declaration(ws, &declaration)
}
