//! Shared test utilities for the compare-gal test suite.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_gallery(&["real", "fake"], &["img1.png", "scenes/002.png"]);
//! let catalog = Catalog::load(tmp.path(), &GalleryConfig::default()).unwrap();
//! assert_eq!(file_paths(&catalog), vec!["img1.png", "scenes/002.png"]);
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::catalog::Catalog;
use crate::types::{Category, FileEntry};

// =========================================================================
// Fixture setup
// =========================================================================

/// Create a gallery root where every category holds the same relative files.
///
/// File contents are placeholder text tagged with the category, so each
/// category's copy hashes differently.
pub fn setup_gallery(categories: &[&str], files: &[&str]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for cat in categories {
        for file in files {
            write_file(&tmp.path().join(cat).join(file), &format!("{cat}:{file}"));
        }
    }
    tmp
}

/// Write `content` to `path`, creating parent directories.
pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Write a small valid JPEG with a horizontal gradient.
pub fn write_test_jpeg(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    img.save(path).unwrap();
}

// =========================================================================
// Builders and extractors
// =========================================================================

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn categories(ids: &[&str]) -> Vec<Category> {
    ids.iter().map(|id| Category::plain(*id)).collect()
}

pub fn entries(paths: &[&str]) -> Vec<FileEntry> {
    paths.iter().map(|p| FileEntry::from_slash_path(p)).collect()
}

pub fn category_ids(cats: &[Category]) -> Vec<&str> {
    cats.iter().map(|c| c.id.as_str()).collect()
}

pub fn category_labels(cats: &[Category]) -> Vec<&str> {
    cats.iter().map(|c| c.label.as_str()).collect()
}

/// Relative paths of the catalog's files, in catalog order.
pub fn file_paths(catalog: &Catalog) -> Vec<String> {
    catalog.files.iter().map(FileEntry::as_slash_path).collect()
}
