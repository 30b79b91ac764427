//! Gallery configuration.
//!
//! Settings come from three layers, later layers winning:
//!
//! ```text
//! stock defaults  →  <root>/compare.toml  →  command-line flags
//! ```
//!
//! The merged result is a single [`GalleryConfig`] that is handed to every
//! stage explicitly. Nothing reads the current directory behind its back.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! categories = []             # Column order; empty = every subdirectory, sorted
//! labels = []                 # Column labels; empty = category names
//! reserved = ["__pycache__"]  # Subdirectories that are never categories
//! template = "comp.html"      # Viewer template, relative to the root
//!
//! [grid]
//! output = "index.html"
//! title = "table_html"
//! heading = "Visualization Tools in Table"
//! image_width = 300           # Pixel width of every image in the grid
//! highlight = false           # Pale yellow table background
//! refresh = 0                 # Meta refresh interval in seconds (0 = off)
//!
//! [viewer]
//! output = "toggle_index.html"
//!
//! [thumbnails]
//! enabled = false
//! dir = "thumb"               # Cache root, relative to the gallery root
//! max_size = [512, 512]       # Bounding box [width, height]
//! preserve_aspect = true
//! quality = 95                # JPEG quality (1-100)
//!
//! [processing]
//! max_processes = 4           # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path};
use thiserror::Error;

/// Name of the optional config file in the gallery root.
pub const CONFIG_FILENAME: &str = "compare.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Gallery configuration loaded from `compare.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Explicit category order. Empty means auto-discovery.
    pub categories: Vec<String>,
    /// Display labels, one per category. Empty means "use the category names".
    pub labels: Vec<String>,
    /// Directory names excluded from auto-discovery (the thumbnail cache is
    /// always excluded as well).
    pub reserved: Vec<String>,
    /// Viewer template path, relative to the gallery root.
    pub template: String,
    pub grid: GridConfig,
    pub viewer: ViewerConfig,
    pub thumbnails: ThumbnailsConfig,
    pub processing: ProcessingConfig,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            labels: Vec::new(),
            reserved: vec!["__pycache__".to_string()],
            template: "comp.html".to_string(),
            grid: GridConfig::default(),
            viewer: ViewerConfig::default(),
            thumbnails: ThumbnailsConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl GalleryConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let q = self.thumbnails.quality;
        if q == 0 || q > 100 {
            return Err(ConfigError::Validation(
                "thumbnails.quality must be 1-100".into(),
            ));
        }
        if self.thumbnails.max_size[0] == 0 || self.thumbnails.max_size[1] == 0 {
            return Err(ConfigError::Validation(
                "thumbnails.max_size values must be non-zero".into(),
            ));
        }
        if self.thumbnails.dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "thumbnails.dir must not be empty".into(),
            ));
        }
        let mut seen = HashSet::new();
        for id in &self.categories {
            if id.is_empty() || id.contains('/') {
                return Err(ConfigError::Validation(format!(
                    "invalid category name {id:?}: must be a single directory name"
                )));
            }
            if !seen.insert(id.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "category {id:?} listed more than once"
                )));
            }
        }
        if !self.categories.is_empty()
            && !self.labels.is_empty()
            && self.labels.len() != self.categories.len()
        {
            return Err(ConfigError::Validation(format!(
                "{} labels given for {} categories",
                self.labels.len(),
                self.categories.len()
            )));
        }
        Ok(())
    }

    /// Directory names that never count as categories.
    ///
    /// The thumbnail cache is added when it lives directly under the root.
    pub fn reserved_dirs(&self) -> Vec<String> {
        let mut reserved = self.reserved.clone();
        if let Some(name) = cache_dir_name(&self.thumbnails.dir)
            && !reserved.contains(&name)
        {
            reserved.push(name);
        }
        reserved
    }

    /// Apply command-line flags on top of the loaded file config.
    pub fn with_overrides(mut self, overrides: &CliOverrides) -> Result<Self, ConfigError> {
        if let Some(categories) = &overrides.categories {
            self.categories = categories.clone();
            // Labels from the file describe the file's category list
            self.labels.clear();
        }
        if let Some(labels) = &overrides.labels {
            self.labels = labels.clone();
        }
        if overrides.thumb {
            self.thumbnails.enabled = true;
        }
        if let Some(dir) = &overrides.thumb_dir {
            self.thumbnails.dir = dir.clone();
        }
        self.validate()?;
        Ok(self)
    }
}

/// Single normal path component of a relative cache dir (`./thumb` → `thumb`).
fn cache_dir_name(dir: &str) -> Option<String> {
    let mut normal = Path::new(dir)
        .components()
        .filter(|c| !matches!(c, Component::CurDir));
    match (normal.next(), normal.next()) {
        (Some(Component::Normal(name)), None) => Some(name.to_string_lossy().to_string()),
        _ => None,
    }
}

/// Values taken from the command line. `None`/`false` leaves the file value alone.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub categories: Option<Vec<String>>,
    pub labels: Option<Vec<String>>,
    pub thumb: bool,
    pub thumb_dir: Option<String>,
}

/// Static grid page settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    /// Output file name, relative to the gallery root.
    pub output: String,
    /// Document `<title>`.
    pub title: String,
    /// `<h3>` heading above the table.
    pub heading: String,
    /// Pixel width of every image cell.
    pub image_width: u32,
    /// Pale yellow table background.
    pub highlight: bool,
    /// Meta refresh interval in seconds. 0 disables it.
    pub refresh: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            output: "index.html".to_string(),
            title: "table_html".to_string(),
            heading: "Visualization Tools in Table".to_string(),
            image_width: 300,
            highlight: false,
            refresh: 0,
        }
    }
}

/// Toggle viewer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Output file name, relative to the gallery root. Grid links point here.
    pub output: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            output: "toggle_index.html".to_string(),
        }
    }
}

/// Thumbnail precomputation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    /// Use cached thumbnails in the grid instead of the full-size files.
    pub enabled: bool,
    /// Cache root, relative to the gallery root.
    pub dir: String,
    /// Bounding box as `[width, height]`.
    pub max_size: [u32; 2],
    /// Fit inside the box keeping the aspect ratio, instead of stretching to it.
    pub preserve_aspect: bool,
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub quality: u32,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: "thumb".to_string(),
            max_size: [512, 512],
            preserve_aspect: true,
            quality: 95,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel thumbnail workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(GalleryConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key by key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `compare.toml` from `root` as a raw TOML value, `None` if absent.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load config from the gallery root, merged over stock defaults and validated.
pub fn load_config(root: &Path) -> Result<GalleryConfig, ConfigError> {
    let merged = match load_raw_config(root)? {
        Some(overlay) => merge_toml(stock_defaults_value(), overlay),
        None => stock_defaults_value(),
    };
    let config: GalleryConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Fully commented stock `compare.toml`, printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# compare-gal configuration
# =========================
# Place this file as compare.toml in the gallery root. Every setting is
# optional; the values below are the defaults. Command-line flags win over
# anything set here. Unknown keys cause an error.

# Column order. Each entry is a subdirectory of the gallery root. The first
# one is the reference: its files decide which rows exist.
# Empty = every subdirectory, sorted by name.
categories = []

# Column labels, one per category. Empty = the category names themselves.
labels = []

# Subdirectories that are never treated as categories. The thumbnail cache
# directory is always excluded too.
reserved = ["__pycache__"]

# Viewer template, relative to the gallery root. When the file is missing the
# built-in template is used (print it with `compare-gal gen-template`).
template = "comp.html"

# ---------------------------------------------------------------------------
# Static grid page
# ---------------------------------------------------------------------------
[grid]
output = "index.html"
title = "table_html"
heading = "Visualization Tools in Table"

# Pixel width of every image in the grid.
image_width = 300

# Pale yellow table background.
highlight = false

# Reload the page every N seconds (0 = never).
refresh = 0

# ---------------------------------------------------------------------------
# Toggle viewer page
# ---------------------------------------------------------------------------
[viewer]
output = "toggle_index.html"

# ---------------------------------------------------------------------------
# Thumbnails (grid only; the viewer always shows the full-size files)
# ---------------------------------------------------------------------------
[thumbnails]
enabled = false

# Cache root, relative to the gallery root.
dir = "thumb"

# Bounding box as [width, height]. Images are never upscaled.
max_size = [512, 512]

# Keep the aspect ratio when fitting into the box.
preserve_aspect = true

# JPEG encoding quality (1 = worst, 100 = best).
quality = 95

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel thumbnail workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
