//! CLI output formatting for every build stage.
//!
//! # Output Format
//!
//! ## Catalog
//!
//! ```text
//! Categories
//! 001 real
//! 002 fake (Generated)
//! Files (from real)
//! 001 img1.png
//! 002 scenes/002.png
//! ```
//!
//! Labels are shown in parentheses only when they differ from the directory
//! name.
//!
//! ## Thumbnails
//!
//! ```text
//!     real/img1.png → thumb/real/img1.png: encoded
//!     fake/img1.png → thumb/fake/img1.png: cached
//! ```
//!
//! ## Documents
//!
//! ```text
//! Grid: 2 rows × 2 categories → index.html
//! Cache: 2 cached, 2 encoded (4 total)
//! Template: comp.html
//!     line 20 type-declaration → 1 line
//!     line 32 rest-conditional → 1 line
//! Viewer: 71 → 71 lines → toggle_index.html
//! ```
//!
//! Each section has a `format_*` function (returns lines) for testability and
//! a `print_*` wrapper that writes to stdout.

use crate::catalog::Catalog;
use crate::pipeline::{GridResult, ViewerResult};
use crate::template::TemplateSource;
use crate::thumbs::{ThumbEvent, ThumbStatus};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// File name of `path` for display, falling back to the full path.
fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ============================================================================
// Catalog
// ============================================================================

pub fn format_catalog(catalog: &Catalog) -> Vec<String> {
    let mut lines = vec!["Categories".to_string()];
    for (i, cat) in catalog.categories.iter().enumerate() {
        if cat.label == cat.id {
            lines.push(format!("{} {}", format_index(i + 1), cat.id));
        } else {
            lines.push(format!("{} {} ({})", format_index(i + 1), cat.id, cat.label));
        }
    }

    lines.push(format!("Files (from {})", catalog.reference().id));
    if catalog.files.is_empty() {
        lines.push("    (none)".to_string());
    }
    for (i, file) in catalog.files.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), file.as_slash_path()));
    }
    lines
}

pub fn print_catalog(catalog: &Catalog) {
    for line in format_catalog(catalog) {
        println!("{}", line);
    }
}

// ============================================================================
// Thumbnails
// ============================================================================

pub fn format_thumb_event(event: &ThumbEvent) -> String {
    let status = match event.status {
        ThumbStatus::Cached => "cached",
        ThumbStatus::Encoded => "encoded",
    };
    format!(
        "    {} \u{2192} {}: {}",
        event.source, event.thumbnail, status
    )
}

// ============================================================================
// Documents
// ============================================================================

pub fn format_grid_output(result: &GridResult) -> Vec<String> {
    let mut lines = vec![format!(
        "Grid: {} \u{00d7} {} \u{2192} {}",
        plural(result.rows, "row", "rows"),
        plural(result.columns, "category", "categories"),
        file_name(&result.output)
    )];
    if let Some(stats) = &result.cache_stats {
        lines.push(format!("Cache: {}", stats));
    }
    lines
}

pub fn print_grid_output(result: &GridResult) {
    for line in format_grid_output(result) {
        println!("{}", line);
    }
}

pub fn format_viewer_output(result: &ViewerResult) -> Vec<String> {
    let mut lines = Vec::new();
    match &result.template {
        TemplateSource::File(path) => lines.push(format!("Template: {}", file_name(path))),
        TemplateSource::BuiltIn => {
            lines.push("Template: built-in (no template in gallery root)".to_string())
        }
    }
    if result.hits.is_empty() {
        lines.push("    no markers found".to_string());
    }
    for hit in &result.hits {
        lines.push(format!(
            "    line {} {} \u{2192} {}",
            hit.line,
            hit.rule,
            plural(hit.emitted, "line", "lines")
        ));
    }
    lines.push(format!(
        "Viewer: {} \u{2192} {} lines \u{2192} {}",
        result.input_lines,
        result.output_lines,
        file_name(&result.output)
    ));
    lines
}

pub fn print_viewer_output(result: &ViewerResult) {
    for line in format_viewer_output(result) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStats;
    use crate::template::MarkerHit;
    use crate::test_helpers::*;
    use crate::types::Category;
    use std::path::PathBuf;

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1234), "1234");
    }

    #[test]
    fn catalog_lists_categories_and_files() {
        let catalog = Catalog {
            categories: vec![Category::plain("real"), Category::new("fake", "Generated")],
            files: entries(&["img1.png", "scenes/002.png"]),
        };
        assert_eq!(
            format_catalog(&catalog),
            vec![
                "Categories",
                "001 real",
                "002 fake (Generated)",
                "Files (from real)",
                "001 img1.png",
                "002 scenes/002.png",
            ]
        );
    }

    #[test]
    fn catalog_without_files() {
        let catalog = Catalog {
            categories: categories(&["empty"]),
            files: Vec::new(),
        };
        let lines = format_catalog(&catalog);
        assert_eq!(lines.last().unwrap(), "    (none)");
    }

    #[test]
    fn thumb_event_line() {
        let event = ThumbEvent {
            source: "fake/a.png".into(),
            thumbnail: "thumb/fake/a.png".into(),
            status: ThumbStatus::Cached,
        };
        assert_eq!(
            format_thumb_event(&event),
            "    fake/a.png \u{2192} thumb/fake/a.png: cached"
        );
    }

    #[test]
    fn grid_output_with_and_without_cache() {
        let mut result = GridResult {
            output: PathBuf::from("/g/index.html"),
            rows: 1,
            columns: 2,
            cache_stats: None,
        };
        assert_eq!(
            format_grid_output(&result),
            vec!["Grid: 1 row \u{00d7} 2 categories \u{2192} index.html"]
        );

        result.cache_stats = Some(CacheStats { hits: 1, misses: 1 });
        let lines = format_grid_output(&result);
        assert_eq!(lines[1], "Cache: 1 cached, 1 encoded (2 total)");
    }

    #[test]
    fn viewer_output_lists_markers() {
        let result = ViewerResult {
            output: PathBuf::from("/g/toggle_index.html"),
            template: TemplateSource::BuiltIn,
            hits: vec![
                MarkerHit {
                    rule: "rest-toggle",
                    line: 12,
                    emitted: 0,
                },
                MarkerHit {
                    rule: "options",
                    line: 20,
                    emitted: 3,
                },
            ],
            input_lines: 30,
            output_lines: 31,
        };
        assert_eq!(
            format_viewer_output(&result),
            vec![
                "Template: built-in (no template in gallery root)",
                "    line 12 rest-toggle \u{2192} 0 lines",
                "    line 20 options \u{2192} 3 lines",
                "Viewer: 30 \u{2192} 31 lines \u{2192} toggle_index.html",
            ]
        );
    }

    #[test]
    fn viewer_output_without_markers() {
        let result = ViewerResult {
            output: PathBuf::from("out.html"),
            template: TemplateSource::File(PathBuf::from("/g/comp.html")),
            hits: Vec::new(),
            input_lines: 3,
            output_lines: 3,
        };
        let lines = format_viewer_output(&result);
        assert_eq!(lines[0], "Template: comp.html");
        assert_eq!(lines[1], "    no markers found");
    }
}
