//! Find references implementation.

use crate::base::{FileId, TextRange, TextSize};
use crate::hir::{Declaration, Reference, Workspace};
use crate::parser::visitor::{Visitor, walk};
use crate::parser::{SyntaxKind, SyntaxNode};

/// Result of a find-references request.
#[derive(Clone, Debug, Default)]
pub struct ReferenceResult {
    /// The declaration every reference resolves to.
    pub declaration: Option<Declaration>,
    /// All references found, in workspace file order.
    pub references: Vec<FileRange>,
}

impl ReferenceResult {
    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }
}

/// A range in one file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FileRange {
    pub file: FileId,
    pub range: TextRange,
}

/// The declaration under `offset`: the target of a reference there, or
/// the declaration whose name is there.
pub fn declaration_at(ws: &Workspace, file: FileId, offset: TextSize) -> Option<Declaration> {
    if let Some(reference) = Reference::at_offset(ws, file, offset) {
        return reference.resolve();
    }
    let root = ws.file(file)?.parse().syntax();
    if !root.text_range().contains_inclusive(offset) {
        return None;
    }
    let token = root
        .token_at_offset(offset)
        .find(|token| token.kind() == SyntaxKind::IDENT)?;
    Declaration::for_node(file, token.parent()?)
}

/// Every reference in the workspace that resolves to the declaration
/// under `offset`.
pub fn find_references(ws: &Workspace, file: FileId, offset: TextSize) -> ReferenceResult {
    let Some(target) = declaration_at(ws, file, offset) else {
        return ReferenceResult::default();
    };
    let name = target.name();

    let mut references = Vec::new();
    for candidate in ws.files() {
        let Some(data) = ws.file(candidate) else {
            continue;
        };
        let mut collector = ReferenceCollector {
            ws,
            file: candidate,
            name: name.as_deref(),
            target: &target,
            found: &mut references,
        };
        walk(&mut collector, &data.parse().syntax());
    }

    tracing::debug!("{} reference(s) to {:?}", references.len(), name);
    ReferenceResult {
        declaration: Some(target),
        references,
    }
}

struct ReferenceCollector<'a> {
    ws: &'a Workspace,
    file: FileId,
    name: Option<&'a str>,
    target: &'a Declaration,
    found: &'a mut Vec<FileRange>,
}

impl ReferenceCollector<'_> {
    fn check(&mut self, node: &SyntaxNode) {
        let Some(reference) = Reference::for_node(self.ws, self.file, node.clone()) else {
            return;
        };
        // Import strings are named by path, not by package name.
        let by_name = !matches!(reference, Reference::Import(_));
        if by_name && self.name.is_some() && reference.name().as_deref() != self.name {
            return;
        }
        if reference.resolve().as_ref() == Some(self.target) {
            self.found.push(FileRange {
                file: self.file,
                range: reference.range(),
            });
        }
    }
}

impl Visitor for ReferenceCollector<'_> {
    fn visit_reference_expression(&mut self, node: &SyntaxNode) {
        self.check(node);
    }

    fn visit_type_reference(&mut self, node: &SyntaxNode) {
        self.check(node);
    }

    fn visit_import_string(&mut self, node: &SyntaxNode) {
        self.check(node);
    }
}
