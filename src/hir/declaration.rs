//! Declarations references resolve to.

use std::path::{Path, PathBuf};

use smol_str::SmolStr;

use crate::base::{FileId, InFile, TextRange};
use crate::parser::ast::{self, AstNode, HasName};
use crate::parser::{SyntaxKind, SyntaxNode, SyntaxToken};

use super::input::Workspace;
use super::lookup::LookupKind;

/// A package directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Directory {
    pub path: PathBuf,
}

impl Directory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> Option<&str> {
        self.path.file_name()?.to_str()
    }
}

/// The declaring element of a name.
///
/// Every variant except `Directory` is a node in some file's tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Declaration {
    ImportSpec(InFile<ast::ImportSpec>),
    TypeSpec(InFile<ast::TypeSpec>),
    Function(InFile<ast::FunctionDecl>),
    Method(InFile<ast::MethodDecl>),
    Field(InFile<ast::FieldDefinition>),
    /// Named after the last segment of its type reference.
    AnonymousField(InFile<ast::AnonymousFieldDefinition>),
    Var(InFile<ast::VarDefinition>),
    Const(InFile<ast::ConstDefinition>),
    Param(InFile<ast::ParamDefinition>),
    Receiver(InFile<ast::Receiver>),
    /// A method of an interface type.
    MethodSpec(InFile<ast::MethodSpec>),
    Directory(Directory),
}

impl Declaration {
    /// The declaration a declaring node stands for.
    pub fn for_node(file: FileId, node: SyntaxNode) -> Option<Self> {
        fn wrap<N: AstNode>(
            file: FileId,
            node: SyntaxNode,
            variant: fn(InFile<N>) -> Declaration,
        ) -> Option<Declaration> {
            N::cast(node).map(|value| variant(InFile::new(file, value)))
        }

        match node.kind() {
            SyntaxKind::IMPORT_SPEC => wrap(file, node, Declaration::ImportSpec),
            SyntaxKind::TYPE_SPEC => wrap(file, node, Declaration::TypeSpec),
            SyntaxKind::FUNCTION_DECL => wrap(file, node, Declaration::Function),
            SyntaxKind::METHOD_DECL => wrap(file, node, Declaration::Method),
            SyntaxKind::FIELD_DEF => wrap(file, node, Declaration::Field),
            SyntaxKind::ANON_FIELD_DEF => wrap(file, node, Declaration::AnonymousField),
            SyntaxKind::VAR_DEF => wrap(file, node, Declaration::Var),
            SyntaxKind::CONST_DEF => wrap(file, node, Declaration::Const),
            SyntaxKind::PARAM_DEF => wrap(file, node, Declaration::Param),
            SyntaxKind::RECEIVER => wrap(file, node, Declaration::Receiver),
            SyntaxKind::METHOD_SPEC => wrap(file, node, Declaration::MethodSpec),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<SmolStr> {
        let name = match self {
            Declaration::ImportSpec(spec) => spec.value.local_name(),
            Declaration::Directory(dir) => dir.name().map(str::to_string),
            _ => self.name_token().map(|token| token.text().to_string()),
        };
        name.map(SmolStr::from)
    }

    /// The identifier token that introduces the name.
    pub fn name_token(&self) -> Option<SyntaxToken> {
        match self {
            Declaration::ImportSpec(spec) => spec.value.alias(),
            Declaration::TypeSpec(spec) => spec.value.name(),
            Declaration::Function(function) => function.value.name(),
            Declaration::Method(method) => method.value.name(),
            Declaration::Field(field) => field.value.name(),
            Declaration::AnonymousField(field) => field.value.name(),
            Declaration::Var(var) => var.value.name(),
            Declaration::Const(constant) => constant.value.name(),
            Declaration::Param(param) => param.value.name(),
            Declaration::Receiver(receiver) => receiver.value.name(),
            Declaration::MethodSpec(spec) => spec.value.name(),
            Declaration::Directory(_) => None,
        }
    }

    pub fn file(&self) -> Option<FileId> {
        Some(match self {
            Declaration::ImportSpec(n) => n.file,
            Declaration::TypeSpec(n) => n.file,
            Declaration::Function(n) => n.file,
            Declaration::Method(n) => n.file,
            Declaration::Field(n) => n.file,
            Declaration::AnonymousField(n) => n.file,
            Declaration::Var(n) => n.file,
            Declaration::Const(n) => n.file,
            Declaration::Param(n) => n.file,
            Declaration::Receiver(n) => n.file,
            Declaration::MethodSpec(n) => n.file,
            Declaration::Directory(_) => return None,
        })
    }

    pub fn syntax(&self) -> Option<&SyntaxNode> {
        Some(match self {
            Declaration::ImportSpec(n) => n.value.syntax(),
            Declaration::TypeSpec(n) => n.value.syntax(),
            Declaration::Function(n) => n.value.syntax(),
            Declaration::Method(n) => n.value.syntax(),
            Declaration::Field(n) => n.value.syntax(),
            Declaration::AnonymousField(n) => n.value.syntax(),
            Declaration::Var(n) => n.value.syntax(),
            Declaration::Const(n) => n.value.syntax(),
            Declaration::Param(n) => n.value.syntax(),
            Declaration::Receiver(n) => n.value.syntax(),
            Declaration::MethodSpec(n) => n.value.syntax(),
            Declaration::Directory(_) => return None,
        })
    }

    /// Range of the whole declaring node.
    pub fn full_range(&self) -> Option<TextRange> {
        self.syntax().map(|node| node.text_range())
    }

    /// Range of the name, falling back to the whole node.
    pub fn focus_range(&self) -> Option<TextRange> {
        self.name_token()
            .map(|token| token.text_range())
            .or_else(|| self.full_range())
    }

    pub fn kind(&self) -> LookupKind {
        match self {
            Declaration::ImportSpec(_) => LookupKind::Import,
            Declaration::TypeSpec(_) => LookupKind::Type,
            Declaration::Function(_) => LookupKind::Function,
            Declaration::Method(_) | Declaration::MethodSpec(_) => LookupKind::Method,
            Declaration::Field(_) | Declaration::AnonymousField(_) => LookupKind::Field,
            Declaration::Var(_) => LookupKind::Variable,
            Declaration::Const(_) => LookupKind::Constant,
            Declaration::Param(_) => LookupKind::Parameter,
            Declaration::Receiver(_) => LookupKind::Receiver,
            Declaration::Directory(_) => LookupKind::Package,
        }
    }

    /// The declared type, where the declaration carries one.
    ///
    /// Variables without an explicit type take the type of a `T{}` or
    /// `&T{}` initializer; nothing else is inferred.
    pub fn go_type(&self) -> Option<InFile<ast::Type>> {
        match self {
            Declaration::Var(var) => {
                let def = &var.value;
                let ty = def
                    .declared_type()
                    .or_else(|| def.value()?.composite_type())?;
                Some(var.with_value(ty))
            }
            Declaration::Const(constant) => {
                Some(constant.with_value(constant.value.declared_type()?))
            }
            Declaration::Param(param) => {
                Some(param.with_value(param.value.declaration()?.ty()?))
            }
            Declaration::Receiver(receiver) => Some(receiver.with_value(receiver.value.ty()?)),
            Declaration::Field(field) => Some(field.with_value(field.value.declared_type()?)),
            Declaration::AnonymousField(field) => Some(field.with_value(field.value.ty()?)),
            Declaration::TypeSpec(spec) => Some(spec.with_value(spec.value.ty()?)),
            Declaration::ImportSpec(_)
            | Declaration::Function(_)
            | Declaration::Method(_)
            | Declaration::MethodSpec(_)
            | Declaration::Directory(_) => None,
        }
    }

    /// Lookup key: `pkg.Name` for declarations in a package, the import
    /// path for imports, the directory path for packages.
    pub fn qualified_name(&self, ws: &Workspace) -> Option<String> {
        match self {
            Declaration::ImportSpec(spec) => spec.value.path(),
            Declaration::Directory(dir) => Some(dir.path.display().to_string()),
            _ => {
                let package = ws.package_name(self.file()?)?;
                Some(format!("{}.{}", package, self.name()?))
            }
        }
    }
}
