//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::path::Path;

use goscope::base::{FileId, TextSize};
use goscope::hir::{Declaration, ResolverConfig};
use goscope::ide::AnalysisHost;
use goscope::parser::ast::{AstNode, HasName, TypeSpec};

/// Cursor marker in fixture sources.
pub const CURSOR: &str = "$0";

/// Strip the cursor marker from `text`, returning its offset.
pub fn extract_cursor(text: &str) -> (String, Option<TextSize>) {
    match text.find(CURSOR) {
        Some(offset) => {
            let stripped = format!("{}{}", &text[..offset], &text[offset + CURSOR.len()..]);
            (stripped, Some(TextSize::new(offset as u32)))
        }
        None => (text.to_string(), None),
    }
}

/// A host loaded with in-memory files, one of which may carry a cursor.
pub struct Fixture {
    pub host: AnalysisHost,
    pub cursor: Option<(FileId, TextSize)>,
}

impl Fixture {
    pub fn new(config: ResolverConfig, files: &[(&str, &str)]) -> Self {
        let mut host = AnalysisHost::new(config);
        let mut cursor = None;
        for (path, text) in files {
            let (text, offset) = extract_cursor(text);
            let file = host.set_file_text(path, &text);
            if let Some(offset) = offset {
                cursor = Some((file, offset));
            }
        }
        Self { host, cursor }
    }

    pub fn single(text: &str) -> Self {
        Self::new(ResolverConfig::new(), &[("/p/a.go", text)])
    }

    pub fn cursor(&self) -> (FileId, TextSize) {
        self.cursor.expect("fixture has no $0 cursor")
    }

    pub fn file(&self, path: &str) -> FileId {
        self.host.file_id(path).expect("fixture file")
    }

    /// Resolve the reference under the cursor.
    pub fn resolve(&self) -> Option<Declaration> {
        let (file, offset) = self.cursor();
        self.host
            .analysis()
            .reference_at(file, offset)
            .expect("no reference under cursor")
            .resolve()
    }

    /// Candidate names of the reference under the cursor, in order.
    pub fn candidate_names(&self) -> Vec<String> {
        let (file, offset) = self.cursor();
        self.host
            .analysis()
            .reference_at(file, offset)
            .expect("no reference under cursor")
            .candidates()
            .into_iter()
            .map(|item| item.name.to_string())
            .collect()
    }

    /// Path of the file holding `declaration`.
    pub fn path_of(&self, declaration: &Declaration) -> Option<&Path> {
        self.host.workspace().path(declaration.file()?)
    }
}

/// Name of the type whose declaration encloses `declaration`.
pub fn owner_type(declaration: &Declaration) -> Option<String> {
    declaration
        .syntax()?
        .ancestors()
        .find_map(TypeSpec::cast)?
        .name_text()
}
