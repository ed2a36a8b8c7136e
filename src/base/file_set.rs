//! Stable path to `FileId` assignment.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use parking_lot::RwLock;

use super::FileId;

/// Assigns stable `FileId`s to paths.
///
/// Ids are never reused: removing a path and adding it again yields the
/// same id, so references held by callers across an edit keep pointing at
/// the same file. Interior locking lets the project loader assign ids from
/// worker threads while files are parsed in parallel.
#[derive(Debug, Default)]
pub struct FileSet {
    inner: RwLock<FileSetInner>,
}

#[derive(Debug, Default)]
struct FileSetInner {
    path_to_id: IndexMap<PathBuf, FileId>,
    id_to_path: IndexMap<FileId, PathBuf>,
    next_id: u32,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the `FileId` for a path.
    pub fn file_id(&self, path: &Path) -> FileId {
        // Fast path: read lock
        {
            let inner = self.inner.read();
            if let Some(&id) = inner.path_to_id.get(path) {
                return id;
            }
        }

        let mut inner = self.inner.write();

        // Another writer may have won the race.
        if let Some(&id) = inner.path_to_id.get(path) {
            return id;
        }

        let id = FileId::new(inner.next_id);
        inner.next_id += 1;
        inner.path_to_id.insert(path.to_owned(), id);
        inner.id_to_path.insert(id, path.to_owned());
        id
    }

    /// Look up an existing id without assigning one.
    pub fn get(&self, path: &Path) -> Option<FileId> {
        self.inner.read().path_to_id.get(path).copied()
    }

    /// Get the path for a `FileId`.
    pub fn path(&self, file: FileId) -> Option<PathBuf> {
        self.inner.read().id_to_path.get(&file).cloned()
    }

    /// Number of paths ever registered.
    pub fn len(&self) -> usize {
        self.inner.read().path_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Clone for FileSet {
    fn clone(&self) -> Self {
        let inner = self.inner.read();
        Self {
            inner: RwLock::new(FileSetInner {
                path_to_id: inner.path_to_id.clone(),
                id_to_path: inner.id_to_path.clone(),
                next_id: inner.next_id,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_set_id_assignment() {
        let files = FileSet::new();

        let id1 = files.file_id(Path::new("/src/a.go"));
        let id2 = files.file_id(Path::new("/src/b.go"));
        let id3 = files.file_id(Path::new("/src/a.go"));

        assert_ne!(id1, id2);
        assert_eq!(id1, id3);
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_file_set_lookup_does_not_assign() {
        let files = FileSet::new();

        assert!(files.get(Path::new("/src/a.go")).is_none());
        assert!(files.is_empty());
    }

    #[test]
    fn test_file_set_path_lookup() {
        let files = FileSet::new();
        let path = Path::new("/src/main.go");
        let id = files.file_id(path);

        assert_eq!(files.path(id).as_deref(), Some(path));
    }

    #[test]
    fn test_file_set_parallel_assignment_is_stable() {
        use rayon::prelude::*;

        let files = FileSet::new();
        let ids: Vec<FileId> = (0..64)
            .into_par_iter()
            .map(|i| files.file_id(Path::new(&format!("/src/f{}.go", i % 8))))
            .collect();

        assert_eq!(files.len(), 8);
        for (i, id) in ids.iter().enumerate() {
            assert_eq!(files.get(Path::new(&format!("/src/f{}.go", i % 8))), Some(*id));
        }
    }
}
