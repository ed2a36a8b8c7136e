//! Inputs to resolution: the parsed files of a workspace and where to find
//! the SDK.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::base::{FileId, FileSet};
use crate::parser::{self, Parse, ast};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Where import paths and the builtin file are looked up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolverConfig {
    /// The SDK's `src` directory (e.g. `/usr/local/go/src`).
    sdk_src: Option<PathBuf>,
    /// GOPATH roots; each contributes `<root>/src` as an import root.
    gopath: Vec<PathBuf>,
    /// Builtin file, relative to `sdk_src`.
    builtin_path: PathBuf,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            sdk_src: None,
            gopath: Vec::new(),
            builtin_path: PathBuf::from("builtin/builtin.go"),
        }
    }
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sdk_src(mut self, sdk_src: impl Into<PathBuf>) -> Self {
        self.sdk_src = Some(sdk_src.into());
        self
    }

    pub fn with_gopath(mut self, root: impl Into<PathBuf>) -> Self {
        self.gopath.push(root.into());
        self
    }

    pub fn with_builtin_path(mut self, relative: impl Into<PathBuf>) -> Self {
        self.builtin_path = relative.into();
        self
    }

    pub fn sdk_src(&self) -> Option<&Path> {
        self.sdk_src.as_deref()
    }

    pub fn gopath(&self) -> &[PathBuf] {
        &self.gopath
    }

    /// Roots non-relative import paths are resolved against, in order.
    pub fn import_roots(&self) -> Vec<PathBuf> {
        self.sdk_src
            .iter()
            .cloned()
            .chain(self.gopath.iter().map(|root| root.join("src")))
            .collect()
    }

    /// Absolute path of the builtin fallback file, if an SDK is configured.
    pub fn builtin_file(&self) -> Option<PathBuf> {
        Some(self.sdk_src.as_ref()?.join(&self.builtin_path))
    }

    /// File name of the builtin file (`builtin.go`).
    pub fn builtin_file_name(&self) -> Option<&str> {
        self.builtin_path.file_name()?.to_str()
    }
}

// ============================================================================
// FILES
// ============================================================================

/// One parsed source file.
#[derive(Clone, Debug)]
pub struct FileData {
    path: PathBuf,
    text: Arc<str>,
    parse: Parse,
    package: Option<SmolStr>,
}

impl FileData {
    pub fn new(path: PathBuf, text: impl Into<Arc<str>>, parse: Parse) -> Self {
        let package = parse.tree().package_name().map(SmolStr::from);
        Self {
            path,
            text: text.into(),
            parse,
            package,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &Arc<str> {
        &self.text
    }

    pub fn parse(&self) -> &Parse {
        &self.parse
    }

    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name()?.to_str()
    }
}

/// All parsed files, keyed by a stable `FileId`.
///
/// Directories are implicit: a directory exists when at least one file
/// lives in it. Every query walks the stored trees afresh.
#[derive(Clone, Debug, Default)]
pub struct Workspace {
    file_set: FileSet,
    files: IndexMap<FileId, FileData>,
    config: ResolverConfig,
}

impl Workspace {
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ResolverConfig) {
        self.config = config;
    }

    pub fn file_set(&self) -> &FileSet {
        &self.file_set
    }

    /// Parse `text` and store it under `path`, replacing any previous tree.
    pub fn set_file_text(&mut self, path: impl AsRef<Path>, text: &str) -> FileId {
        let path = normalize(path.as_ref());
        let parse = parser::parse(text);
        let file = self.file_set.file_id(&path);
        self.files.insert(file, FileData::new(path, text, parse));
        file
    }

    /// Store an already parsed file.
    pub fn insert(&mut self, file: FileId, data: FileData) {
        self.files.insert(file, data);
    }

    pub fn remove_file(&mut self, path: impl AsRef<Path>) -> Option<FileId> {
        let file = self.file_set.get(&normalize(path.as_ref()))?;
        self.files.shift_remove(&file).map(|_| file)
    }

    /// The id of a file currently in the workspace.
    pub fn file_id(&self, path: impl AsRef<Path>) -> Option<FileId> {
        let file = self.file_set.get(&normalize(path.as_ref()))?;
        self.files.contains_key(&file).then_some(file)
    }

    pub fn file(&self, file: FileId) -> Option<&FileData> {
        self.files.get(&file)
    }

    pub fn files(&self) -> impl Iterator<Item = FileId> + '_ {
        self.files.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn path(&self, file: FileId) -> Option<&Path> {
        self.file(file).map(FileData::path)
    }

    pub fn source_file(&self, file: FileId) -> Option<ast::SourceFile> {
        self.file(file).map(|data| data.parse.tree())
    }

    pub fn package_name(&self, file: FileId) -> Option<&str> {
        self.file(file)?.package()
    }

    // ------------------------------------------------------------------------
    // Directories
    // ------------------------------------------------------------------------

    pub fn directory_of(&self, file: FileId) -> Option<&Path> {
        self.path(file)?.parent()
    }

    /// Files directly inside `dir`, in path order.
    pub fn files_in(&self, dir: &Path) -> Vec<FileId> {
        let mut files: Vec<_> = self
            .files
            .iter()
            .filter(|(_, data)| data.path.parent() == Some(dir))
            .map(|(&id, data)| (data.path.as_path(), id))
            .collect();
        files.sort();
        files.into_iter().map(|(_, id)| id).collect()
    }

    pub fn has_directory(&self, dir: &Path) -> bool {
        self.files.values().any(|data| data.path.parent() == Some(dir))
    }

    pub fn file_by_path(&self, path: &Path) -> Option<FileId> {
        self.file_id(path)
    }

    pub fn resolve_relative(&self, root: &Path, relative: &Path) -> Option<FileId> {
        self.file_id(root.join(relative))
    }

    /// The package a directory holds.
    ///
    /// Prefers a package named after the directory, then the first file
    /// (by path) whose package is not a `_test` package, then the first file.
    pub fn package_name_of_directory(&self, dir: &Path) -> Option<SmolStr> {
        let files = self.files_in(dir);
        let packages: Vec<&str> = files
            .iter()
            .filter_map(|&file| self.package_name(file))
            .collect();
        let base = dir.file_name().and_then(|name| name.to_str());

        packages
            .iter()
            .find(|package| Some(**package) == base)
            .or_else(|| packages.iter().find(|package| !package.ends_with("_test")))
            .or_else(|| packages.first())
            .map(|package| SmolStr::from(*package))
    }

    /// Resolve an import path, as written in `file`, to a directory.
    pub fn resolve_import_path(&self, file: FileId, import_path: &str) -> Option<PathBuf> {
        if import_path.is_empty() {
            return None;
        }
        if import_path.starts_with("./") || import_path.starts_with("../") || import_path == "." || import_path == ".." {
            let dir = normalize(&self.directory_of(file)?.join(import_path));
            return self.has_directory(&dir).then_some(dir);
        }
        self.config
            .import_roots()
            .into_iter()
            .map(|root| normalize(&root.join(import_path)))
            .find(|dir| self.has_directory(dir))
    }

    /// The builtin fallback file, when the SDK is loaded.
    pub fn builtin_file(&self) -> Option<FileId> {
        self.file_id(self.config.builtin_file()?)
    }

    /// Whether `file` is itself the builtin file; those never fall back.
    pub fn is_builtin_file(&self, file: FileId) -> bool {
        match (self.file(file).and_then(FileData::file_name), self.config.builtin_file_name()) {
            (Some(name), Some(builtin)) => name == builtin,
            _ => false,
        }
    }
}

/// Lexically normalize `.` and `..` components.
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}
