//! File identifiers and file-tagged values.

use std::fmt;

/// An interned identifier for a source file.
///
/// `FileId` is a 4-byte handle assigned by [`FileSet`](super::FileSet).
/// Paths and parse trees are stored by the workspace and looked up by id,
/// so anything that needs to remember "which file" carries one of these
/// instead of a `PathBuf`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct FileId(pub u32);

impl FileId {
    /// Create a new FileId from a raw index.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileId({})", self.0)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file#{}", self.0)
    }
}

impl From<u32> for FileId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// A value paired with the file it was found in.
///
/// Syntax nodes do not know which file they belong to, so every node that
/// crosses a file boundary during resolution travels as `InFile<T>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InFile<T> {
    pub file: FileId,
    pub value: T,
}

impl<T> InFile<T> {
    #[inline]
    pub const fn new(file: FileId, value: T) -> Self {
        Self { file, value }
    }

    /// Replace the value, keeping the file.
    pub fn with_value<U>(&self, value: U) -> InFile<U> {
        InFile::new(self.file, value)
    }

    /// Transform the value, keeping the file.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> InFile<U> {
        InFile::new(self.file, f(self.value))
    }

    pub fn as_ref(&self) -> InFile<&T> {
        InFile::new(self.file, &self.value)
    }
}
