//! Scope enumeration: what an unqualified name can see.
//!
//! Order for a reference in file `F`:
//!
//! 1. the lexical walk-up from the reference to the top of `F`,
//! 2. `F`'s top-level declarations (consts, vars, functions, types),
//! 3. `F`'s import names, then the packages of its `.` imports,
//! 4. top-level declarations of the other files of `F`'s package,
//! 5. the builtin file, unless `F` is itself named like it.
//!
//! Steps 1 and 3 only happen in local mode. Every step feeds a
//! [`ScopeProcessor`] and stops when it breaks.

use std::ops::ControlFlow;
use std::path::Path;

use crate::base::{FileId, InFile};
use crate::parser::ast::{self, AstNode, HasName};
use crate::parser::{SyntaxKind, SyntaxNode};

use super::declaration::Declaration;
use super::imports::ImportTable;
use super::input::Workspace;
use super::lookup::{LookupItem, LookupKind, ScopeProcessor};
use super::reference::GoReference;

/// Which declarations a reference can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeFilter {
    All,
    /// Type names and the package names that qualify them.
    Types,
}

impl ScopeFilter {
    pub fn accepts(self, declaration: &Declaration) -> bool {
        match self {
            ScopeFilter::All => true,
            ScopeFilter::Types => matches!(
                declaration,
                Declaration::TypeSpec(_) | Declaration::ImportSpec(_) | Declaration::Directory(_)
            ),
        }
    }
}

/// Offer one declaration to `acc`.
pub(crate) fn offer(
    acc: &mut dyn ScopeProcessor,
    filter: ScopeFilter,
    declaration: Declaration,
) -> ControlFlow<()> {
    if !filter.accepts(&declaration) {
        return ControlFlow::Continue(());
    }
    let Some(name) = declaration.name() else {
        return ControlFlow::Continue(());
    };
    if !acc.wants(&name) {
        return ControlFlow::Continue(());
    }
    acc.process(LookupItem {
        kind: declaration.kind(),
        name,
        declaration: Some(declaration),
    })
}

// ============================================================================
// FILE ORDER
// ============================================================================

/// Files an unqualified reference in `file` looks at, each with its mode.
pub fn unqualified_files(ws: &Workspace, file: FileId) -> Vec<(FileId, bool)> {
    let mut files = vec![(file, true)];

    if let Some(dir) = ws.directory_of(file) {
        let package = ws.package_name(file);
        files.extend(
            ws.files_in(dir)
                .into_iter()
                .filter(|&sibling| sibling != file)
                .filter(|&sibling| package.is_none() || ws.package_name(sibling) == package)
                .map(|sibling| (sibling, false)),
        );
    }

    if ws.is_builtin_file(file) {
        tracing::trace!("{} is the builtin file, no fallback", file);
    } else if let Some(builtin) = ws.builtin_file() {
        files.push((builtin, true));
    } else {
        tracing::debug!("no builtin file loaded, skipping fallback for {}", file);
    }

    files
}

/// Files of the package held by `dir`.
pub fn package_files(ws: &Workspace, dir: &Path) -> Vec<FileId> {
    let package = ws.package_name_of_directory(dir);
    ws.files_in(dir)
        .into_iter()
        .filter(|&file| package.is_none() || ws.package_name(file) == package.as_deref())
        .collect()
}

/// The directory a package-like declaration stands for.
pub fn package_directory(ws: &Workspace, declaration: &Declaration) -> Option<std::path::PathBuf> {
    match declaration {
        Declaration::ImportSpec(spec) => ws.resolve_import_path(spec.file, &spec.value.path()?),
        Declaration::Directory(dir) => Some(dir.path.clone()),
        _ => None,
    }
}

// ============================================================================
// PER-FILE PROCESSING
// ============================================================================

/// The declarations of `file` visible to `reference`, in scope order.
pub fn process_file_scope<R: GoReference + ?Sized>(
    reference: &R,
    acc: &mut dyn ScopeProcessor,
    file: FileId,
    local: bool,
    filter: ScopeFilter,
) -> ControlFlow<()> {
    let ws = reference.workspace();
    let Some(source) = ws.source_file(file) else {
        return ControlFlow::Continue(());
    };

    if local && file == reference.file() {
        walk_up(file, reference.element(), filter, acc)?;
    }
    top_level(file, &source, filter, acc)?;

    if local {
        let table = ImportTable::build(&source);
        import_names(ws, file, &table, acc)?;
        for path in table.dot_import_paths() {
            let Some(dir) = ws.resolve_import_path(file, &path) else {
                tracing::debug!("dot import {:?} in {} does not resolve", path, file);
                continue;
            };
            for imported in package_files(ws, &dir) {
                process_file_scope(reference, acc, imported, false, filter)?;
            }
        }
    }
    ControlFlow::Continue(())
}

/// Declarations introduced before `element` by its enclosing blocks,
/// clauses and function signatures, innermost first.
pub fn walk_up(
    file: FileId,
    element: &SyntaxNode,
    filter: ScopeFilter,
    acc: &mut dyn ScopeProcessor,
) -> ControlFlow<()> {
    let start = element.text_range().start();
    for ancestor in element.ancestors().skip(1) {
        if ancestor.kind() == SyntaxKind::SOURCE_FILE {
            break;
        }
        let preceding: Vec<SyntaxNode> = ancestor
            .children()
            .take_while(|child| child.text_range().end() <= start)
            .collect();
        for child in preceding.iter().rev() {
            introduced_by(file, child, filter, acc)?;
        }
    }
    ControlFlow::Continue(())
}

fn introduced_by(
    file: FileId,
    node: &SyntaxNode,
    filter: ScopeFilter,
    acc: &mut dyn ScopeProcessor,
) -> ControlFlow<()> {
    match node.kind() {
        SyntaxKind::SHORT_VAR_DECL | SyntaxKind::RANGE_CLAUSE => {
            for def in node.children().filter_map(ast::VarDefinition::cast) {
                offer(acc, filter, Declaration::Var(InFile::new(file, def)))?;
            }
        }
        SyntaxKind::DECLARATION_STATEMENT => {
            for decl in node.children() {
                local_declaration(file, &decl, filter, acc)?;
            }
        }
        SyntaxKind::FOR_CLAUSE => {
            for init in node.children().filter(|n| n.kind() == SyntaxKind::SHORT_VAR_DECL) {
                introduced_by(file, &init, filter, acc)?;
            }
        }
        SyntaxKind::SIGNATURE => {
            let Some(signature) = ast::Signature::cast(node.clone()) else {
                return ControlFlow::Continue(());
            };
            let results = signature.result().and_then(|r| r.parameters());
            for params in signature.parameters().into_iter().chain(results) {
                for def in params.definitions() {
                    offer(acc, filter, Declaration::Param(InFile::new(file, def)))?;
                }
            }
        }
        SyntaxKind::RECEIVER => {
            if let Some(receiver) = ast::Receiver::cast(node.clone()) {
                if receiver.name().is_some() {
                    offer(acc, filter, Declaration::Receiver(InFile::new(file, receiver)))?;
                }
            }
        }
        _ => {}
    }
    ControlFlow::Continue(())
}

fn local_declaration(
    file: FileId,
    decl: &SyntaxNode,
    filter: ScopeFilter,
    acc: &mut dyn ScopeProcessor,
) -> ControlFlow<()> {
    if let Some(vars) = ast::VarDecl::cast(decl.clone()) {
        for def in vars.specs().flat_map(|spec| spec.definitions()) {
            offer(acc, filter, Declaration::Var(InFile::new(file, def)))?;
        }
    } else if let Some(consts) = ast::ConstDecl::cast(decl.clone()) {
        for def in consts.specs().flat_map(|spec| spec.definitions()) {
            offer(acc, filter, Declaration::Const(InFile::new(file, def)))?;
        }
    } else if let Some(types) = ast::TypeDecl::cast(decl.clone()) {
        for spec in types.specs() {
            offer(acc, filter, Declaration::TypeSpec(InFile::new(file, spec)))?;
        }
    }
    ControlFlow::Continue(())
}

/// Package-level names of one file. Methods are not package-level names.
pub fn top_level(
    file: FileId,
    source: &ast::SourceFile,
    filter: ScopeFilter,
    acc: &mut dyn ScopeProcessor,
) -> ControlFlow<()> {
    for def in source.const_specs().flat_map(|spec| spec.definitions()) {
        offer(acc, filter, Declaration::Const(InFile::new(file, def)))?;
    }
    for def in source.var_specs().flat_map(|spec| spec.definitions()) {
        offer(acc, filter, Declaration::Var(InFile::new(file, def)))?;
    }
    for function in source.functions() {
        offer(acc, filter, Declaration::Function(InFile::new(file, function)))?;
    }
    for spec in source.type_specs() {
        offer(acc, filter, Declaration::TypeSpec(InFile::new(file, spec)))?;
    }
    ControlFlow::Continue(())
}

fn import_names(
    ws: &Workspace,
    file: FileId,
    table: &ImportTable,
    acc: &mut dyn ScopeProcessor,
) -> ControlFlow<()> {
    for name in table.names() {
        if !acc.wants(name) {
            continue;
        }
        let declaration = table.resolve(ws, file, name);
        acc.process(LookupItem {
            kind: declaration
                .as_ref()
                .map(Declaration::kind)
                .unwrap_or(LookupKind::Import),
            name: name.clone(),
            declaration,
        })?;
    }
    ControlFlow::Continue(())
}
