//! Completion suggestions implementation.
//!
//! A placeholder identifier is spliced in at the cursor so that the cursor
//! always sits on a reference node, the file is reparsed in a scratch copy
//! of the workspace, and the reference's candidates are filtered by the
//! prefix already typed.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use crate::base::{FileId, TextSize};
use crate::hir::{Declaration, LookupItem, LookupKind, Reference, Workspace};
use crate::parser::AstNode;

/// Spliced in at the cursor before reparsing.
const PLACEHOLDER: &str = "goscopeCompletionPlaceholder";

/// A completion suggestion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionItem {
    /// The text to insert.
    pub label: SmolStr,
    pub kind: LookupKind,
    /// The declared type, when the declaration has one.
    pub detail: Option<String>,
    /// Sort priority (lower = higher priority).
    pub sort_priority: u32,
}

impl CompletionItem {
    pub fn new(label: impl Into<SmolStr>, kind: LookupKind) -> Self {
        Self {
            label: label.into(),
            kind,
            detail: None,
            sort_priority: 100,
        }
    }

    /// Set the detail text.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Set the sort priority.
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.sort_priority = priority;
        self
    }

    fn from_lookup(item: &LookupItem, priority: u32) -> Self {
        let completion = Self::new(item.name.clone(), item.kind).with_priority(priority);
        let detail = item
            .declaration
            .as_ref()
            .and_then(Declaration::go_type)
            .map(|ty| ty.value.syntax().text().to_string());
        match detail {
            Some(detail) => completion.with_detail(detail),
            None => completion,
        }
    }
}

/// Names the cursor position can complete to, nearest scope first.
///
/// A name visible through several scopes is offered once, for the
/// declaration that shadows the others.
pub fn completions(ws: &Workspace, file: FileId, offset: TextSize) -> Vec<CompletionItem> {
    let Some(data) = ws.file(file) else {
        return Vec::new();
    };
    let text: &str = data.text();
    let cursor = usize::from(offset);
    if cursor > text.len() || !text.is_char_boundary(cursor) {
        return Vec::new();
    }

    let prefix_start = text[..cursor]
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_alphanumeric() || *c == '_')
        .last()
        .map_or(cursor, |(i, _)| i);
    let prefix = &text[prefix_start..cursor];

    let mut spliced = String::with_capacity(text.len() + PLACEHOLDER.len());
    spliced.push_str(&text[..cursor]);
    spliced.push_str(PLACEHOLDER);
    spliced.push_str(&text[cursor..]);

    let mut scratch = ws.clone();
    let path = data.path().to_path_buf();
    let scratch_file = scratch.set_file_text(&path, &spliced);

    let Some(reference) = Reference::at_offset(&scratch, scratch_file, offset) else {
        tracing::debug!("no reference at {:?} in {}", offset, file);
        return Vec::new();
    };

    let candidates = reference.candidates();
    let mut seen = FxHashSet::default();
    candidates
        .iter()
        .enumerate()
        .filter(|(_, item)| item.name.starts_with(prefix))
        .filter(|(_, item)| seen.insert(item.name.clone()))
        .map(|(index, item)| CompletionItem::from_lookup(item, index as u32))
        .collect()
}
