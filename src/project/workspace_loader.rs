use std::path::{Path, PathBuf};

use rayon::prelude::*;
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

use crate::base::{FileId, FileSet};
use crate::hir::{FileData, normalize};
use crate::ide::AnalysisHost;
use crate::parser;

/// Errors from loading sources off disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("directory not found: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("failed to walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Loads `.go` files from disk.
///
/// Directories the go tool ignores are skipped: `testdata` and anything
/// whose name starts with `.` or `_`.
#[derive(Debug, Clone)]
pub struct WorkspaceLoader {
    include_tests: bool,
}

impl WorkspaceLoader {
    pub fn new() -> Self {
        Self {
            include_tests: true,
        }
    }

    /// Whether `_test.go` files are loaded.
    pub fn with_tests(mut self, include_tests: bool) -> Self {
        self.include_tests = include_tests;
        self
    }

    /// Loads every Go file under `path` into `host`.
    ///
    /// Files that cannot be read are logged and skipped. Returns the
    /// number of files loaded.
    pub fn load_directory(
        &self,
        path: impl AsRef<Path>,
        host: &mut AnalysisHost,
    ) -> Result<usize, LoadError> {
        let root = path.as_ref();
        if !root.is_dir() {
            return Err(LoadError::NotADirectory(root.to_path_buf()));
        }

        let paths = self.collect_file_paths(root)?;
        tracing::debug!("loading {} file(s) from {}", paths.len(), root.display());

        // Parse files in parallel
        let file_set = host.workspace().file_set();
        let loaded: Vec<(FileId, FileData)> = paths
            .par_iter()
            .filter_map(|path| match load_and_parse(file_set, path) {
                Ok(loaded) => Some(loaded),
                Err(err) => {
                    tracing::warn!("skipping file: {}", err);
                    None
                }
            })
            .collect();

        let count = loaded.len();
        for (file, data) in loaded {
            host.insert_file(file, data);
        }
        Ok(count)
    }

    /// Loads a single file into `host`.
    pub fn load_file(
        &self,
        path: impl AsRef<Path>,
        host: &mut AnalysisHost,
    ) -> Result<FileId, LoadError> {
        let (file, data) = load_and_parse(host.workspace().file_set(), path.as_ref())?;
        host.insert_file(file, data);
        Ok(file)
    }

    /// Go files under `root`, sorted by path.
    pub fn collect_file_paths(&self, root: &Path) -> Result<Vec<PathBuf>, LoadError> {
        let mut paths = Vec::new();
        let walker = WalkDir::new(root)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_ignored_dir(entry));
        for entry in walker {
            let entry = entry.map_err(|source| LoadError::Walk {
                path: root.to_path_buf(),
                source,
            })?;
            if entry.file_type().is_file() && self.wants(entry.path()) {
                paths.push(entry.into_path());
            }
        }
        paths.sort();
        Ok(paths)
    }

    fn wants(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            return false;
        };
        name.ends_with(".go") && (self.include_tests || !name.ends_with("_test.go"))
    }
}

impl Default for WorkspaceLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn is_ignored_dir(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name == "testdata" || name.starts_with('.') || name.starts_with('_')
}

fn load_and_parse(file_set: &FileSet, path: &Path) -> Result<(FileId, FileData), LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let path = normalize(path);
    let parse = parser::parse(&text);
    if !parse.ok() {
        tracing::trace!("{} has {} syntax error(s)", path.display(), parse.errors.len());
    }
    let file = file_set.file_id(&path);
    Ok((file, FileData::new(path, text, parse)))
}
