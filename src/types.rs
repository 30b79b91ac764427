//! Shared types used across the catalog, matrix, and template stages.
//!
//! Paths are modelled as segments rather than strings. Switching a path from
//! one category to another replaces the category segment by position, so a
//! category name that happens to appear inside a file name or another folder
//! never gets rewritten.

use std::path::{Path, PathBuf};

/// One parallel collection of files: a folder name plus the label shown to users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Directory name under the gallery root.
    pub id: String,
    /// Display label (defaults to `id`).
    pub label: String,
}

impl Category {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }

    /// A category displayed under its own directory name.
    pub fn plain(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
        }
    }
}

/// A file path relative to a category root, e.g. `scenes/001.png`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FileEntry {
    segments: Vec<String>,
}

impl FileEntry {
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Build an entry from a `/`-separated relative path. Empty segments are dropped.
    pub fn from_slash_path(path: &str) -> Self {
        Self {
            segments: path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Build an entry from a filesystem path relative to the category root.
    pub fn from_relative(path: &Path) -> Self {
        Self {
            segments: path
                .components()
                .map(|c| c.as_os_str().to_string_lossy().to_string())
                .collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// `/`-joined relative path. This is the "tag" used by the viewer.
    pub fn as_slash_path(&self) -> String {
        self.segments.join("/")
    }
}

/// A path of the form `base / category / relative`.
///
/// `base` is empty for source files (they sit directly under the gallery root)
/// and holds the cache directory for thumbnails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPath {
    pub base: Vec<String>,
    pub category: String,
    pub file: FileEntry,
}

impl CategoryPath {
    pub fn new(base: Vec<String>, category: impl Into<String>, file: FileEntry) -> Self {
        Self {
            base,
            category: category.into(),
            file,
        }
    }

    /// Source file of `file` in `category`, directly under the gallery root.
    pub fn source(category: impl Into<String>, file: FileEntry) -> Self {
        Self::new(Vec::new(), category, file)
    }

    /// Same base and relative path, different category segment.
    pub fn with_category(&self, category: &str) -> Self {
        Self {
            base: self.base.clone(),
            category: category.to_string(),
            file: self.file.clone(),
        }
    }

    /// Same category and relative path under a different base.
    pub fn rebased(&self, base: &[String]) -> Self {
        Self {
            base: base.to_vec(),
            category: self.category.clone(),
            file: self.file.clone(),
        }
    }

    /// `/`-joined path as written into HTML documents.
    pub fn display(&self) -> String {
        self.base
            .iter()
            .chain(std::iter::once(&self.category))
            .chain(self.file.segments())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Filesystem location under `root`.
    pub fn resolve(&self, root: &Path) -> PathBuf {
        let mut path = root.to_path_buf();
        for segment in &self.base {
            path.push(segment);
        }
        path.push(&self.category);
        for segment in self.file.segments() {
            path.push(segment);
        }
        path
    }
}
