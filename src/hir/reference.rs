//! References and their resolution.
//!
//! A reference is a value that borrows the workspace and points at one
//! reference node in one file. It is built on demand and never stored in
//! the tree. Three node kinds are references:
//!
//! - `REFERENCE_EXPR` (`x`, `x.y`) through [`ExprReference`],
//! - `TYPE_REFERENCE` (`T`, `pkg.T`) through [`TypeNameReference`],
//! - `IMPORT_STRING` (`"fmt"`) through [`ImportReference`].
//!
//! Qualified and unqualified lookups share one algorithm, written once as
//! default methods of [`GoReference`].

use std::ops::ControlFlow;

use smol_str::SmolStr;

use crate::base::{FileId, InFile, TextRange, TextSize};
use crate::parser::ast::{self, AstNode};
use crate::parser::{SyntaxKind, SyntaxNode, SyntaxToken};

use super::declaration::{Declaration, Directory};
use super::input::Workspace;
use super::lookup::{CollectProcessor, LookupItem, ResolveProcessor, ScopeProcessor};
use super::members::{collect_members, resolve_member};
use super::scope::{
    ScopeFilter, package_directory, package_files, process_file_scope, unqualified_files,
};

/// What stands left of the dot in a qualified reference.
#[derive(Debug, Clone)]
pub enum Qualifier<'a> {
    /// Another reference, resolved first.
    Reference(Box<Reference<'a>>),
    /// A composite literal, whose members are those of its literal type.
    Literal(InFile<ast::Type>),
    /// Any other expression. Nothing resolves through it.
    Opaque,
}

/// Shared resolution protocol.
///
/// Implementors supply the syntax accessors and per-file processing; the
/// default methods run the unqualified/qualified dispatch.
pub trait GoReference {
    fn workspace(&self) -> &Workspace;

    fn file(&self) -> FileId;

    /// The reference node itself.
    fn element(&self) -> &SyntaxNode;

    fn identifier(&self) -> Option<SyntaxToken>;

    fn qualifier(&self) -> Option<Qualifier<'_>>;

    /// Offer the declarations of `file` visible to this reference.
    fn process_file(
        &self,
        acc: &mut dyn ScopeProcessor,
        file: FileId,
        local: bool,
    ) -> ControlFlow<()>;

    fn name(&self) -> Option<SmolStr> {
        self.identifier().map(|token| SmolStr::from(token.text()))
    }

    /// Resolve this reference's name against a single file.
    fn process_unqualified(&self, file: FileId, local: bool) -> Option<Declaration> {
        let mut acc = ResolveProcessor::new(self.name()?);
        let _ = self.process_file(&mut acc, file, local);
        acc.into_result()
    }

    fn resolve(&self) -> Option<Declaration> {
        let name = self.name()?;
        tracing::trace!("resolve `{}` in {}", name, self.file());
        match self.qualifier() {
            None => unqualified_files(self.workspace(), self.file())
                .into_iter()
                .find_map(|(file, local)| self.process_unqualified(file, local)),
            Some(Qualifier::Reference(qualifier)) => {
                let target = qualifier.resolve()?;
                tracing::trace!("qualifier of `{}` is {:?}", name, target.kind());
                self.resolve_in(&target, &name)
            }
            Some(Qualifier::Literal(ty)) => resolve_member(self.workspace(), ty, &name),
            Some(Qualifier::Opaque) => None,
        }
    }

    /// Resolve `name` as a member of `target`: its type's members first,
    /// then, for packages, the package's files.
    fn resolve_in(&self, target: &Declaration, name: &str) -> Option<Declaration> {
        let ws = self.workspace();
        if let Some(ty) = target.go_type() {
            if let Some(found) = resolve_member(ws, ty, name) {
                return Some(found);
            }
        }
        let dir = package_directory(ws, target)?;
        package_files(ws, &dir)
            .into_iter()
            .filter(|&file| file != self.file())
            .find_map(|file| self.process_unqualified(file, false))
    }

    /// Every name this reference could resolve to, in scope order.
    fn candidates(&self) -> Vec<LookupItem> {
        let ws = self.workspace();
        let mut acc = CollectProcessor::new();
        match self.qualifier() {
            None => {
                for (file, local) in unqualified_files(ws, self.file()) {
                    let _ = self.process_file(&mut acc, file, local);
                }
            }
            Some(Qualifier::Reference(qualifier)) => {
                if let Some(target) = qualifier.resolve() {
                    self.collect_in(&target, &mut acc);
                }
            }
            Some(Qualifier::Literal(ty)) => {
                let _ = collect_members(ws, ty, &mut acc);
            }
            Some(Qualifier::Opaque) => {}
        }
        acc.into_items()
    }

    fn collect_in(&self, target: &Declaration, acc: &mut dyn ScopeProcessor) {
        let ws = self.workspace();
        if let Some(ty) = target.go_type() {
            let _ = collect_members(ws, ty, acc);
        } else if let Some(dir) = package_directory(ws, target) {
            for file in package_files(ws, &dir) {
                if file != self.file() {
                    let _ = self.process_file(acc, file, false);
                }
            }
        }
    }
}

// ============================================================================
// EXPRESSIONS
// ============================================================================

/// `x` or `q.x` in expression position.
#[derive(Debug, Clone)]
pub struct ExprReference<'a> {
    ws: &'a Workspace,
    file: FileId,
    node: ast::ReferenceExpr,
}

impl<'a> ExprReference<'a> {
    pub fn new(ws: &'a Workspace, file: FileId, node: ast::ReferenceExpr) -> Self {
        Self { ws, file, node }
    }

    pub fn node(&self) -> &ast::ReferenceExpr {
        &self.node
    }
}

impl GoReference for ExprReference<'_> {
    fn workspace(&self) -> &Workspace {
        self.ws
    }

    fn file(&self) -> FileId {
        self.file
    }

    fn element(&self) -> &SyntaxNode {
        self.node.syntax()
    }

    fn identifier(&self) -> Option<SyntaxToken> {
        self.node.identifier()
    }

    fn qualifier(&self) -> Option<Qualifier<'_>> {
        let qualifier = self.node.qualifier()?;
        if let Some(inner) = ast::ReferenceExpr::cast(qualifier.syntax().clone()) {
            let reference = ExprReference::new(self.ws, self.file, inner);
            return Some(Qualifier::Reference(Box::new(Reference::Expr(reference))));
        }
        Some(match qualifier.composite_type() {
            Some(ty) => Qualifier::Literal(InFile::new(self.file, ty)),
            None => Qualifier::Opaque,
        })
    }

    fn process_file(
        &self,
        acc: &mut dyn ScopeProcessor,
        file: FileId,
        local: bool,
    ) -> ControlFlow<()> {
        process_file_scope(self, acc, file, local, ScopeFilter::All)
    }
}

// ============================================================================
// TYPE NAMES
// ============================================================================

/// `T` or `pkg.T` in type position. Sees only type and package names.
#[derive(Debug, Clone)]
pub struct TypeNameReference<'a> {
    ws: &'a Workspace,
    file: FileId,
    node: ast::TypeReference,
}

impl<'a> TypeNameReference<'a> {
    pub fn new(ws: &'a Workspace, file: FileId, node: ast::TypeReference) -> Self {
        Self { ws, file, node }
    }

    pub fn node(&self) -> &ast::TypeReference {
        &self.node
    }
}

impl GoReference for TypeNameReference<'_> {
    fn workspace(&self) -> &Workspace {
        self.ws
    }

    fn file(&self) -> FileId {
        self.file
    }

    fn element(&self) -> &SyntaxNode {
        self.node.syntax()
    }

    fn identifier(&self) -> Option<SyntaxToken> {
        self.node.identifier()
    }

    fn qualifier(&self) -> Option<Qualifier<'_>> {
        let inner = self.node.qualifier()?;
        let reference = TypeNameReference::new(self.ws, self.file, inner);
        Some(Qualifier::Reference(Box::new(Reference::TypeName(reference))))
    }

    fn process_file(
        &self,
        acc: &mut dyn ScopeProcessor,
        file: FileId,
        local: bool,
    ) -> ControlFlow<()> {
        process_file_scope(self, acc, file, local, ScopeFilter::Types)
    }
}

// ============================================================================
// IMPORT STRINGS
// ============================================================================

/// The path string of an import spec. Resolves to the imported directory.
#[derive(Debug, Clone)]
pub struct ImportReference<'a> {
    ws: &'a Workspace,
    file: FileId,
    node: ast::ImportString,
}

impl<'a> ImportReference<'a> {
    pub fn new(ws: &'a Workspace, file: FileId, node: ast::ImportString) -> Self {
        Self { ws, file, node }
    }

    pub fn path(&self) -> String {
        self.node.path()
    }
}

impl GoReference for ImportReference<'_> {
    fn workspace(&self) -> &Workspace {
        self.ws
    }

    fn file(&self) -> FileId {
        self.file
    }

    fn element(&self) -> &SyntaxNode {
        self.node.syntax()
    }

    fn identifier(&self) -> Option<SyntaxToken> {
        self.node
            .syntax()
            .children_with_tokens()
            .filter_map(|element| element.into_token())
            .find(|token| matches!(token.kind(), SyntaxKind::STRING | SyntaxKind::RAW_STRING))
    }

    fn qualifier(&self) -> Option<Qualifier<'_>> {
        None
    }

    fn process_file(
        &self,
        _acc: &mut dyn ScopeProcessor,
        _file: FileId,
        _local: bool,
    ) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn name(&self) -> Option<SmolStr> {
        Some(SmolStr::from(self.path()))
    }

    fn resolve(&self) -> Option<Declaration> {
        let dir = self.ws.resolve_import_path(self.file, &self.path())?;
        Some(Declaration::Directory(Directory::new(dir)))
    }

    fn candidates(&self) -> Vec<LookupItem> {
        Vec::new()
    }
}

// ============================================================================
// ANY REFERENCE
// ============================================================================

#[derive(Debug, Clone)]
pub enum Reference<'a> {
    Expr(ExprReference<'a>),
    TypeName(TypeNameReference<'a>),
    Import(ImportReference<'a>),
}

impl<'a> Reference<'a> {
    /// The reference a node stands for, if it is a reference node.
    pub fn for_node(ws: &'a Workspace, file: FileId, node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::REFERENCE_EXPR => {
                let node = ast::ReferenceExpr::cast(node)?;
                Some(Reference::Expr(ExprReference::new(ws, file, node)))
            }
            SyntaxKind::TYPE_REFERENCE => {
                let node = ast::TypeReference::cast(node)?;
                Some(Reference::TypeName(TypeNameReference::new(ws, file, node)))
            }
            SyntaxKind::IMPORT_STRING => {
                let node = ast::ImportString::cast(node)?;
                Some(Reference::Import(ImportReference::new(ws, file, node)))
            }
            _ => None,
        }
    }

    /// The reference whose identifier or import string covers `offset`.
    pub fn at_offset(ws: &'a Workspace, file: FileId, offset: TextSize) -> Option<Self> {
        let root = ws.file(file)?.parse().syntax();
        if !root.text_range().contains_inclusive(offset) {
            return None;
        }
        let token = root.token_at_offset(offset).find(|token| {
            matches!(
                token.kind(),
                SyntaxKind::IDENT | SyntaxKind::STRING | SyntaxKind::RAW_STRING
            )
        })?;
        Self::for_node(ws, file, token.parent()?)
    }

    pub fn as_dyn(&self) -> &dyn GoReference {
        match self {
            Reference::Expr(reference) => reference,
            Reference::TypeName(reference) => reference,
            Reference::Import(reference) => reference,
        }
    }

    pub fn resolve(&self) -> Option<Declaration> {
        self.as_dyn().resolve()
    }

    pub fn candidates(&self) -> Vec<LookupItem> {
        self.as_dyn().candidates()
    }

    pub fn name(&self) -> Option<SmolStr> {
        self.as_dyn().name()
    }

    pub fn file(&self) -> FileId {
        self.as_dyn().file()
    }

    /// Range of the identifier, or of the whole node when it has none.
    pub fn range(&self) -> TextRange {
        let reference = self.as_dyn();
        reference
            .identifier()
            .map(|token| token.text_range())
            .unwrap_or_else(|| reference.element().text_range())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::ResolverConfig;

    fn reference_at<'a>(ws: &'a Workspace, file: FileId, marker: &str) -> Reference<'a> {
        let text = ws.file(file).unwrap().text().clone();
        let offset = text.find(marker).unwrap();
        Reference::at_offset(ws, file, TextSize::new(offset as u32)).unwrap()
    }

    #[test]
    fn test_local_shadows_package_level() {
        let mut ws = Workspace::new(ResolverConfig::new());
        let file = ws.set_file_text(
            "/p/a.go",
            "package p\n\nvar count = 0\n\nfunc f() {\n\tcount := 1\n\t_ = count\n}\n",
        );
        let reference = reference_at(&ws, file, "count\n}");

        let Some(Declaration::Var(var)) = reference.resolve() else {
            panic!("expected a local var");
        };
        assert!(var.value.syntax().parent().unwrap().kind() == SyntaxKind::SHORT_VAR_DECL);
    }

    #[test]
    fn test_selector_on_variable_finds_field() {
        let mut ws = Workspace::new(ResolverConfig::new());
        let file = ws.set_file_text(
            "/p/a.go",
            "package p\n\ntype S struct {\n\tName string\n}\n\nfunc f(s *S) string {\n\treturn s.Name\n}\n",
        );
        let reference = reference_at(&ws, file, "Name\n}");

        assert!(matches!(reference.resolve(), Some(Declaration::Field(_))));
        let names: Vec<_> = reference.candidates().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["Name"]);
    }

    #[test]
    fn test_composite_literal_qualifier() {
        let mut ws = Workspace::new(ResolverConfig::new());
        let file = ws.set_file_text(
            "/p/a.go",
            "package p\n\ntype S struct{}\n\nfunc (S) Run() {}\n\nfunc f() {\n\tS{}.Run()\n}\n",
        );
        let reference = reference_at(&ws, file, "Run()\n}");

        assert!(matches!(reference.resolve(), Some(Declaration::Method(_))));
    }

    #[test]
    fn test_type_reference_ignores_values() {
        let mut ws = Workspace::new(ResolverConfig::new());
        let file = ws.set_file_text(
            "/p/a.go",
            "package p\n\ntype T int\n\nfunc f(T int) {\n\tvar x T\n\t_ = x\n}\n",
        );
        let reference = reference_at(&ws, file, "T\n\t_");

        assert!(matches!(reference, Reference::TypeName(_)));
        assert!(matches!(reference.resolve(), Some(Declaration::TypeSpec(_))));
    }

    #[test]
    fn test_import_string_resolves_to_directory() {
        let mut ws = Workspace::new(ResolverConfig::new().with_sdk_src("/sdk/src"));
        let file = ws.set_file_text("/app/main.go", "package main\n\nimport \"fmt\"\n");
        ws.set_file_text("/sdk/src/fmt/print.go", "package fmt\n");
        let reference = reference_at(&ws, file, "\"fmt\"");

        assert_eq!(
            reference.resolve(),
            Some(Declaration::Directory(Directory::new("/sdk/src/fmt")))
        );
        assert!(reference.candidates().is_empty());
    }
}
