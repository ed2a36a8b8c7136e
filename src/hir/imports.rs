//! Per-file import table.
//!
//! Maps the identifier an import introduces to the import entries that
//! introduce it. Several imports may share a key (two dot imports, or an
//! alias that collides with another path's last segment), so the table is a
//! multimap in declaration order.

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::base::{FileId, InFile};
use crate::parser::ast;

use super::declaration::{Declaration, Directory};
use super::input::Workspace;

/// One import under a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportEntry {
    /// An aliased import; resolves to the spec itself.
    Spec(ast::ImportSpec),
    /// An unaliased import; resolves to the directory of its path.
    Path { spec: ast::ImportSpec, path: String },
}

impl ImportEntry {
    pub fn spec(&self) -> &ast::ImportSpec {
        match self {
            ImportEntry::Spec(spec) | ImportEntry::Path { spec, .. } => spec,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImportTable {
    entries: IndexMap<SmolStr, Vec<ImportEntry>>,
}

impl ImportTable {
    /// Build the table from a file's import declarations.
    pub fn build(file: &ast::SourceFile) -> Self {
        let mut entries: IndexMap<SmolStr, Vec<ImportEntry>> = IndexMap::new();
        for spec in file.imports() {
            let Some(key) = spec.local_name() else {
                continue;
            };
            let entry = if spec.alias().is_some() {
                ImportEntry::Spec(spec)
            } else {
                match spec.path() {
                    Some(path) => ImportEntry::Path { spec, path },
                    None => continue,
                }
            };
            entries.entry(SmolStr::from(key)).or_default().push(entry);
        }
        Self { entries }
    }

    pub fn get(&self, name: &str) -> &[ImportEntry] {
        self.entries.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SmolStr, &[ImportEntry])> {
        self.entries.iter().map(|(key, entries)| (key, entries.as_slice()))
    }

    /// Keys that name a package in source (not `.` or `_`).
    pub fn names(&self) -> impl Iterator<Item = &SmolStr> {
        self.entries.keys().filter(|key| key.as_str() != "." && key.as_str() != "_")
    }

    /// Paths of `.` imports, in declaration order.
    pub fn dot_import_paths(&self) -> impl Iterator<Item = String> + '_ {
        self.get(".").iter().filter_map(|entry| entry.spec().path())
    }

    /// Resolve an import identifier: the first aliased spec wins, otherwise
    /// the first unaliased import whose path resolves to a directory.
    pub fn resolve(&self, ws: &Workspace, file: FileId, name: &str) -> Option<Declaration> {
        for entry in self.get(name) {
            match entry {
                ImportEntry::Spec(spec) => {
                    return Some(Declaration::ImportSpec(InFile::new(file, spec.clone())));
                }
                ImportEntry::Path { path, .. } => {
                    if let Some(dir) = ws.resolve_import_path(file, path) {
                        return Some(Declaration::Directory(Directory::new(dir)));
                    }
                }
            }
        }
        None
    }
}
