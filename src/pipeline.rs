//! Build orchestration: catalog → grid page, catalog → viewer page.
//!
//! The two documents are independent. The grid needs the matrix (and the
//! thumbnail cache when enabled); the viewer needs only the catalog and the
//! template. Both are rewritten from scratch on every run.

use crate::cache::CacheStats;
use crate::catalog::{Catalog, CatalogError};
use crate::config::{ConfigError, GalleryConfig, ViewerConfig};
use crate::grid::render_grid;
use crate::imaging::{BackendError, ImageBackend, ThumbnailConfig};
use crate::matrix::{build_rows, precompute_thumbnails, source_paths};
use crate::template::{self, ExpandContext, MarkerHit, TemplateError, TemplateSource};
use crate::thumbs::{ThumbEvent, Thumbnailer};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Image processing failed: {0}")]
    Imaging(#[from] BackendError),
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
}

/// What the grid stage wrote.
#[derive(Debug, Clone)]
pub struct GridResult {
    pub output: PathBuf,
    pub rows: usize,
    pub columns: usize,
    /// Present when thumbnails were used.
    pub cache_stats: Option<CacheStats>,
}

/// What the viewer stage wrote.
#[derive(Debug, Clone)]
pub struct ViewerResult {
    pub output: PathBuf,
    pub template: TemplateSource,
    pub hits: Vec<MarkerHit>,
    pub input_lines: usize,
    pub output_lines: usize,
}

/// Link target of grid cells, relative to the grid page.
pub fn viewer_href(viewer: &ViewerConfig) -> String {
    format!("./{}", viewer.output)
}

/// Resolve categories and the reference file list for `root`.
pub fn load_catalog(root: &Path, config: &GalleryConfig) -> Result<Catalog, BuildError> {
    Ok(Catalog::load(root, config)?)
}

/// Write the grid page to `root/<grid.output>`.
///
/// With thumbnails enabled, every file of every category is thumbnailed
/// first (in parallel on the global rayon pool) and the grid shows the
/// cached copies. `events` receives one [`ThumbEvent`] per thumbnail.
pub fn build_grid<B: ImageBackend>(
    root: &Path,
    config: &GalleryConfig,
    catalog: &Catalog,
    backend: &B,
    use_cache: bool,
    events: Option<Sender<ThumbEvent>>,
) -> Result<GridResult, BuildError> {
    let (sources, cache_stats) = if config.thumbnails.enabled {
        let mut thumbnailer = Thumbnailer::new(
            backend,
            root,
            &config.thumbnails.dir,
            ThumbnailConfig::from_settings(&config.thumbnails),
            use_cache,
        );
        if let Some(tx) = events {
            thumbnailer = thumbnailer.with_events(tx);
        }
        let sources = precompute_thumbnails(&thumbnailer, &catalog.categories, &catalog.files)?;
        (sources, Some(thumbnailer.finish()?))
    } else {
        (source_paths(catalog.reference(), &catalog.files), None)
    };

    let rows = build_rows(&sources, &catalog.categories, &viewer_href(&config.viewer));
    let html = render_grid(&rows, &config.grid).into_string();
    let output = root.join(&config.grid.output);
    fs::write(&output, html)?;

    Ok(GridResult {
        output,
        rows: rows.len(),
        columns: catalog.categories.len(),
        cache_stats,
    })
}

/// Expand the viewer template and write it to `root/<viewer.output>`.
///
/// The viewer always points at the full-size files, never at thumbnails.
pub fn build_viewer(
    root: &Path,
    config: &GalleryConfig,
    catalog: &Catalog,
) -> Result<ViewerResult, BuildError> {
    let (text, source) = template::load_template(root, &config.template)?;
    let ctx = ExpandContext {
        categories: &catalog.categories,
        files: &catalog.files,
    };
    let expanded = template::expand(&text, &ctx)?;
    let output = root.join(&config.viewer.output);
    fs::write(&output, &expanded.text)?;

    Ok(ViewerResult {
        output,
        template: source,
        hits: expanded.hits,
        input_lines: expanded.input_lines,
        output_lines: expanded.output_lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::MockBackend;
    use crate::test_helpers::*;
    use std::sync::mpsc;

    fn config_for(ids: &[&str]) -> GalleryConfig {
        GalleryConfig {
            categories: strings(ids),
            ..GalleryConfig::default()
        }
    }

    #[test]
    fn grid_written_with_source_paths() {
        let tmp = setup_gallery(&["real", "fake"], &["img1.png"]);
        let config = config_for(&["real", "fake"]);
        let catalog = load_catalog(tmp.path(), &config).unwrap();

        let result =
            build_grid(tmp.path(), &config, &catalog, &MockBackend::new(), true, None).unwrap();

        assert_eq!(result.output, tmp.path().join("index.html"));
        assert_eq!((result.rows, result.columns), (1, 2));
        assert!(result.cache_stats.is_none());
        let html = fs::read_to_string(&result.output).unwrap();
        assert!(html.contains(r#"src="fake/img1.png""#));
        assert!(html.contains("./toggle_index.html?tag=img1.png&amp;type=fake"));
    }

    #[test]
    fn grid_with_thumbnails_uses_cache_paths() {
        let tmp = setup_gallery(&["real", "fake"], &["img1.png"]);
        let mut config = config_for(&["real", "fake"]);
        config.thumbnails.enabled = true;
        let catalog = load_catalog(tmp.path(), &config).unwrap();
        let backend = MockBackend::new();
        let (tx, rx) = mpsc::channel();

        let result = build_grid(tmp.path(), &config, &catalog, &backend, true, Some(tx)).unwrap();

        assert_eq!(backend.thumbnail_ops().len(), 2);
        assert_eq!(result.cache_stats.map(|s| s.misses), Some(2));
        assert_eq!(rx.iter().count(), 2);
        let html = fs::read_to_string(&result.output).unwrap();
        assert!(html.contains(r#"src="thumb/real/img1.png""#));
        assert!(html.contains(r#"src="thumb/fake/img1.png""#));
        assert!(tmp.path().join("thumb/.cache-manifest.json").exists());
    }

    #[test]
    fn custom_viewer_name_changes_links() {
        let tmp = setup_gallery(&["a"], &["x.png"]);
        let mut config = config_for(&["a"]);
        config.viewer.output = "view.html".into();
        let catalog = load_catalog(tmp.path(), &config).unwrap();

        let grid = build_grid(tmp.path(), &config, &catalog, &MockBackend::new(), true, None)
            .unwrap();
        let viewer = build_viewer(tmp.path(), &config, &catalog).unwrap();

        let html = fs::read_to_string(grid.output).unwrap();
        assert!(html.contains("./view.html?tag=x.png&amp;type=a"));
        assert_eq!(viewer.output, tmp.path().join("view.html"));
    }

    #[test]
    fn viewer_from_gallery_template() {
        let tmp = setup_gallery(&["real", "fake"], &["img1.png"]);
        write_file(
            &tmp.path().join("comp.html"),
            &format!(
                "<select>\n{}\n</select>\n<script>{}</script>\n",
                template::OPTION_PLACEHOLDER,
                template::TYPE_DECLARATION
            ),
        );
        let config = config_for(&["real", "fake"]);
        let catalog = load_catalog(tmp.path(), &config).unwrap();

        let result = build_viewer(tmp.path(), &config, &catalog).unwrap();

        assert_eq!(
            result.template,
            TemplateSource::File(tmp.path().join("comp.html"))
        );
        let html = fs::read_to_string(&result.output).unwrap();
        assert_eq!(
            html,
            "<select>\n<option value=\"img1.png\">img1.png</option>\n</select>\n<script>var types = [\"real\",\"fake\"]</script>\n"
        );
    }

    #[test]
    fn viewer_falls_back_to_stock_template() {
        let tmp = setup_gallery(&["real", "fake"], &["img1.png"]);
        let config = config_for(&["real", "fake"]);
        let catalog = load_catalog(tmp.path(), &config).unwrap();

        let result = build_viewer(tmp.path(), &config, &catalog).unwrap();

        assert_eq!(result.template, TemplateSource::BuiltIn);
        assert_eq!(result.hits.len(), template::RULES.len());
        let html = fs::read_to_string(&result.output).unwrap();
        assert!(html.contains(r#"var types = ["real","fake"]"#));
        assert!(html.contains("typeText_fake"));
        assert!(!html.contains("Sample_01"));
    }

    #[test]
    fn viewer_ignores_thumbnail_setting() {
        let tmp = setup_gallery(&["real"], &["a.png"]);
        let mut config = config_for(&["real"]);
        config.thumbnails.enabled = true;
        let catalog = load_catalog(tmp.path(), &config).unwrap();

        build_viewer(tmp.path(), &config, &catalog).unwrap();
        let html = fs::read_to_string(tmp.path().join("toggle_index.html")).unwrap();
        assert!(html.contains(r#"<option value="a.png">a.png</option>"#));
        assert!(!html.contains("thumb/"));
    }
}
