//! AnalysisHost and Analysis: state management for IDE features.
//!
//! The `AnalysisHost` owns the workspace and hands out `Analysis`
//! snapshots for querying. A snapshot borrows the host immutably, so
//! every query made through one snapshot sees the same trees.
//!
//! ## Usage
//!
//! ```ignore
//! let mut host = AnalysisHost::new(ResolverConfig::new().with_sdk_src("/usr/lib/go/src"));
//! let file = host.set_file_text("/app/main.go", "package main\n");
//!
//! let analysis = host.analysis();
//! let target = analysis.goto_definition(file, offset);
//! ```

use std::path::Path;

use crate::base::{FileId, LineIndex, TextSize};
use crate::hir::{FileData, Reference, ResolverConfig, Workspace};

use super::{CompletionItem, NavigationTarget, ReferenceResult};

/// Owns all mutable state for the IDE layer.
#[derive(Debug, Default)]
pub struct AnalysisHost {
    workspace: Workspace,
}

impl AnalysisHost {
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            workspace: Workspace::new(config),
        }
    }

    /// Parse `text` as the content of `path`, replacing any earlier version.
    pub fn set_file_text(&mut self, path: impl AsRef<Path>, text: &str) -> FileId {
        self.workspace.set_file_text(path, text)
    }

    /// Store a file parsed elsewhere, e.g. by a loader thread.
    pub fn insert_file(&mut self, file: FileId, data: FileData) {
        self.workspace.insert(file, data);
    }

    pub fn remove_file(&mut self, path: impl AsRef<Path>) -> Option<FileId> {
        self.workspace.remove_file(path)
    }

    pub fn file_id(&self, path: impl AsRef<Path>) -> Option<FileId> {
        self.workspace.file_id(path)
    }

    pub fn file_count(&self) -> usize {
        self.workspace.len()
    }

    pub fn config(&self) -> &ResolverConfig {
        self.workspace.config()
    }

    pub fn set_config(&mut self, config: ResolverConfig) {
        self.workspace.set_config(config);
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Get a consistent snapshot for querying.
    pub fn analysis(&self) -> Analysis<'_> {
        Analysis {
            workspace: &self.workspace,
        }
    }
}

/// An immutable snapshot of the analysis state.
#[derive(Clone, Copy, Debug)]
pub struct Analysis<'a> {
    workspace: &'a Workspace,
}

impl<'a> Analysis<'a> {
    pub fn workspace(&self) -> &'a Workspace {
        self.workspace
    }

    /// The reference whose name covers `offset`.
    pub fn reference_at(&self, file: FileId, offset: TextSize) -> Option<Reference<'a>> {
        Reference::at_offset(self.workspace, file, offset)
    }

    /// Go to definition at a position.
    pub fn goto_definition(&self, file: FileId, offset: TextSize) -> Option<NavigationTarget> {
        super::goto_definition(self.workspace, file, offset)
    }

    /// Completion suggestions at a position.
    pub fn completions(&self, file: FileId, offset: TextSize) -> Vec<CompletionItem> {
        super::completions(self.workspace, file, offset)
    }

    /// Find all references to the declaration at a position.
    pub fn find_references(&self, file: FileId, offset: TextSize) -> ReferenceResult {
        super::find_references(self.workspace, file, offset)
    }

    /// Line index for converting editor positions to offsets.
    pub fn line_index(&self, file: FileId) -> Option<LineIndex> {
        Some(LineIndex::new(self.workspace.file(file)?.text()))
    }
}
