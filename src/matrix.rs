//! Cross-category matrix: one row per catalog file, one cell per category.
//!
//! Every row starts from the reference category's path, either the source
//! file itself or its cached thumbnail. Each column swaps the category
//! segment for its own, so `thumb/real/a/b.png` becomes
//! `thumb/fake/a/b.png` in the `fake` column. Each cell links to the toggle
//! viewer preselected on that file and category:
//!
//! ```text
//! ./toggle_index.html?tag=a/b.png&type=fake
//! ```

use crate::imaging::{BackendError, ImageBackend};
use crate::thumbs::Thumbnailer;
use crate::types::{Category, CategoryPath, FileEntry};
use rayon::prelude::*;

/// One category's version of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixCell {
    pub category: String,
    pub label: String,
    /// Image path as written into the grid page.
    pub display: String,
    /// Viewer link for this file and category.
    pub link: String,
}

/// One file across all categories, in category order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixRow {
    pub cells: Vec<MatrixCell>,
}

/// Viewer query link for `path`: the tag is the path below the category.
pub fn viewer_link(viewer_href: &str, path: &CategoryPath) -> String {
    format!(
        "{}?tag={}&type={}",
        viewer_href,
        path.file.as_slash_path(),
        path.category
    )
}

/// Expand reference-category paths into full rows.
pub fn build_rows(
    sources: &[CategoryPath],
    categories: &[Category],
    viewer_href: &str,
) -> Vec<MatrixRow> {
    sources
        .iter()
        .map(|source| MatrixRow {
            cells: categories
                .iter()
                .map(|cat| {
                    let path = source.with_category(&cat.id);
                    MatrixCell {
                        category: cat.id.clone(),
                        label: cat.label.clone(),
                        display: path.display(),
                        link: viewer_link(viewer_href, &path),
                    }
                })
                .collect(),
        })
        .collect()
}

/// Reference-category source paths, one per catalog file.
pub fn source_paths(reference: &Category, files: &[FileEntry]) -> Vec<CategoryPath> {
    files
        .iter()
        .map(|file| CategoryPath::source(reference.id.clone(), file.clone()))
        .collect()
}

/// Make a thumbnail for every file in every category.
///
/// Files are processed in parallel; categories of one file run in order.
/// Returns the reference category's thumbnails in catalog order.
pub fn precompute_thumbnails<B: ImageBackend>(
    thumbnailer: &Thumbnailer<'_, B>,
    categories: &[Category],
    files: &[FileEntry],
) -> Result<Vec<CategoryPath>, BackendError> {
    let Some((reference, others)) = categories.split_first() else {
        return Ok(Vec::new());
    };

    files
        .par_iter()
        .map(|file| {
            let source = CategoryPath::source(reference.id.clone(), file.clone());
            let thumb = thumbnailer.make_thumb(&source)?;
            for cat in others {
                thumbnailer.make_thumb(&source.with_category(&cat.id))?;
            }
            Ok(thumb)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::ThumbnailConfig;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::test_helpers::*;

    fn links(row: &MatrixRow) -> Vec<&str> {
        row.cells.iter().map(|c| c.link.as_str()).collect()
    }

    fn displays(row: &MatrixRow) -> Vec<&str> {
        row.cells.iter().map(|c| c.display.as_str()).collect()
    }

    #[test]
    fn real_fake_single_file() {
        let cats = categories(&["real", "fake"]);
        let sources = source_paths(&cats[0], &entries(&["img1.png"]));

        let rows = build_rows(&sources, &cats, "./toggle_index.html");
        assert_eq!(rows.len(), 1);
        assert_eq!(displays(&rows[0]), vec!["real/img1.png", "fake/img1.png"]);
        assert_eq!(
            links(&rows[0]),
            vec![
                "./toggle_index.html?tag=img1.png&type=real",
                "./toggle_index.html?tag=img1.png&type=fake",
            ]
        );
    }

    #[test]
    fn rows_follow_catalog_order_and_cells_follow_category_order() {
        let cats = categories(&["c", "a", "b"]);
        let sources = source_paths(&cats[0], &entries(&["x/1.png", "x/2.png", "y.png"]));

        let rows = build_rows(&sources, &cats, "v.html");
        assert_eq!(rows.len(), 3);
        assert_eq!(displays(&rows[1]), vec!["c/x/2.png", "a/x/2.png", "b/x/2.png"]);
        assert_eq!(rows[2].cells[1].link, "v.html?tag=y.png&type=a");
    }

    #[test]
    fn category_name_inside_path_is_left_alone() {
        let cats = categories(&["cat", "cat2"]);
        let sources = source_paths(&cats[0], &entries(&["cat/cat.png"]));

        let rows = build_rows(&sources, &cats, "v.html");
        assert_eq!(displays(&rows[0]), vec!["cat/cat/cat.png", "cat2/cat/cat.png"]);
        assert_eq!(rows[0].cells[1].link, "v.html?tag=cat/cat.png&type=cat2");
    }

    #[test]
    fn labels_travel_with_cells() {
        let cats = vec![
            crate::types::Category::new("gt", "Ground truth"),
            crate::types::Category::new("ours", "Ours"),
        ];
        let rows = build_rows(&source_paths(&cats[0], &entries(&["a.png"])), &cats, "v");
        let labels: Vec<&str> = rows[0].cells.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Ground truth", "Ours"]);
    }

    #[test]
    fn empty_catalog_has_no_rows() {
        let cats = categories(&["a", "b"]);
        assert!(build_rows(&[], &cats, "v").is_empty());
    }

    #[test]
    fn thumbnail_rows_point_into_cache() {
        let cats = categories(&["real", "fake"]);
        let files = entries(&["img1.png"]);
        let tmp = setup_gallery(&["real", "fake"], &["img1.png"]);
        let backend = MockBackend::new();
        let thumbs = Thumbnailer::new(
            &backend,
            tmp.path(),
            "./thumb",
            ThumbnailConfig::default(),
            true,
        );

        let sources = precompute_thumbnails(&thumbs, &cats, &files).unwrap();
        let rows = build_rows(&sources, &cats, "./toggle_index.html");

        assert_eq!(
            displays(&rows[0]),
            vec!["thumb/real/img1.png", "thumb/fake/img1.png"]
        );
        // Links carry the tag below the category, not the cache prefix
        assert_eq!(
            links(&rows[0]),
            vec![
                "./toggle_index.html?tag=img1.png&type=real",
                "./toggle_index.html?tag=img1.png&type=fake",
            ]
        );
    }

    #[test]
    fn thumbnails_made_once_per_category_with_same_settings() {
        let cats = categories(&["real", "fake"]);
        let files = entries(&["img1.png"]);
        let tmp = setup_gallery(&["real", "fake"], &["img1.png"]);
        let backend = MockBackend::new();
        let thumbs = Thumbnailer::new(
            &backend,
            tmp.path(),
            "thumb",
            ThumbnailConfig::default(),
            true,
        );

        precompute_thumbnails(&thumbs, &cats, &files).unwrap();

        let ops = backend.thumbnail_ops();
        assert_eq!(ops.len(), 2);
        let settings: Vec<(u32, u32, u32)> = ops
            .iter()
            .map(|op| match op {
                RecordedOp::Thumbnail {
                    width,
                    height,
                    quality,
                    ..
                } => (*width, *height, *quality),
                other => panic!("unexpected op {other:?}"),
            })
            .collect();
        assert_eq!(settings, vec![(512, 384, 95), (512, 384, 95)]);

        let sources: Vec<String> = ops
            .iter()
            .filter_map(|op| match op {
                RecordedOp::Thumbnail { source, .. } => Some(source.clone()),
                _ => None,
            })
            .collect();
        assert!(sources[0].ends_with("real/img1.png"));
        assert!(sources[1].ends_with("fake/img1.png"));
    }

    #[test]
    fn missing_category_file_aborts_precompute() {
        let cats = categories(&["real", "fake"]);
        let files = entries(&["img1.png"]);
        let tmp = setup_gallery(&["real"], &["img1.png"]);
        let backend = MockBackend::new();
        let thumbs = Thumbnailer::new(
            &backend,
            tmp.path(),
            "thumb",
            ThumbnailConfig::default(),
            true,
        );

        assert!(precompute_thumbnails(&thumbs, &cats, &files).is_err());
    }
}
