//! Category discovery and the canonical file catalog.
//!
//! A gallery root holds one directory per category, each mirroring the same
//! relative file tree:
//!
//! ```text
//! gallery/
//! ├── compare.toml        # Optional config
//! ├── comp.html           # Viewer template (optional, built-in fallback)
//! ├── real/               # Category (reference when first)
//! │   ├── img1.png
//! │   └── scenes/
//! │       └── 002.png
//! ├── fake/               # Category, same relative paths
//! │   ├── img1.png
//! │   └── scenes/
//! │       └── 002.png
//! ├── thumb/              # Thumbnail cache (reserved)
//! └── __pycache__/        # Reserved
//! ```
//!
//! Only the reference category (the first one) is listed. Other categories
//! are assumed to mirror it; nothing checks that they do, so a file missing
//! from one category shows up as a broken image in that column.

use crate::config::GalleryConfig;
use crate::types::{Category, FileEntry};
use std::fs;
use std::path::Path;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("No categories found in {0}")]
    NoCategories(String),
    #[error("{labels} labels given for {categories} categories")]
    LabelCountMismatch { labels: usize, categories: usize },
}

/// Resolved categories plus the reference category's files.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub categories: Vec<Category>,
    pub files: Vec<FileEntry>,
}

impl Catalog {
    /// Resolve categories for `root` and list the reference category's files.
    pub fn load(root: &Path, config: &GalleryConfig) -> Result<Self, CatalogError> {
        let order = (!config.categories.is_empty()).then_some(config.categories.as_slice());
        let labels = (!config.labels.is_empty()).then_some(config.labels.as_slice());
        let categories = resolve_categories(root, order, labels, &config.reserved_dirs())?;
        let files = list_files(root, &categories[0].id)?;
        Ok(Self { categories, files })
    }

    /// The first category; its files define the rows.
    pub fn reference(&self) -> &Category {
        &self.categories[0]
    }

    pub fn category_ids(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.id.as_str()).collect()
    }
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

/// Immediate subdirectories of `root`, sorted, minus reserved and hidden names.
pub fn discover_categories(root: &Path, reserved: &[String]) -> Result<Vec<String>, CatalogError> {
    let mut names: Vec<String> = fs::read_dir(root)?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|name| !name.starts_with('.') && !reserved.iter().any(|r| r == name))
        .collect();

    names.sort();
    Ok(names)
}

/// Decide the category order and labels.
///
/// An explicit `order` is used verbatim, without checking the directories
/// exist. Labels default to the category names.
pub fn resolve_categories(
    root: &Path,
    order: Option<&[String]>,
    labels: Option<&[String]>,
    reserved: &[String],
) -> Result<Vec<Category>, CatalogError> {
    let ids = match order {
        Some(ids) => ids.to_vec(),
        None => discover_categories(root, reserved)?,
    };
    if ids.is_empty() {
        return Err(CatalogError::NoCategories(root.display().to_string()));
    }

    match labels {
        Some(labels) if labels.len() != ids.len() => Err(CatalogError::LabelCountMismatch {
            labels: labels.len(),
            categories: ids.len(),
        }),
        Some(labels) => Ok(ids
            .into_iter()
            .zip(labels)
            .map(|(id, label)| Category::new(id, label.clone()))
            .collect()),
        None => Ok(ids.into_iter().map(Category::plain).collect()),
    }
}

/// Every file under `root/<category>`, recursively, sorted by relative path.
///
/// Hidden files and directories (`.DS_Store`, `.ipynb_checkpoints/`) are
/// skipped at every depth. A category without a directory yields an empty
/// list.
pub fn list_files(root: &Path, category: &str) -> Result<Vec<FileEntry>, CatalogError> {
    let category_root = root.join(category);
    if !category_root.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(&category_root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));
    for entry in walker {
        let entry = entry.map_err(|e| CatalogError::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(rel) = entry.path().strip_prefix(&category_root) {
            files.push(FileEntry::from_relative(rel));
        }
    }

    files.sort_by_key(FileEntry::as_slash_path);
    Ok(files)
}
