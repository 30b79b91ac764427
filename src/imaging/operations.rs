//! High-level image operations.
//!
//! These functions combine calculations with backend execution.

use super::backend::{BackendError, ImageBackend};
use super::calculations::calculate_fit_dimensions;
use super::params::{Bounds, Quality, ThumbnailParams};
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<(u32, u32)> {
    let dims = backend.identify(path)?;
    Ok((dims.width, dims.height))
}

/// Configuration for thumbnail generation, fixed for a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailConfig {
    pub bounds: Bounds,
    pub preserve_aspect: bool,
    pub quality: Quality,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            bounds: Bounds::new(512, 512),
            preserve_aspect: true,
            quality: Quality::default(),
        }
    }
}

impl ThumbnailConfig {
    pub fn from_settings(settings: &crate::config::ThumbnailsConfig) -> Self {
        Self {
            bounds: Bounds::from(settings.max_size),
            preserve_aspect: settings.preserve_aspect,
            quality: Quality::new(settings.quality),
        }
    }
}

/// Plan a thumbnail operation without executing it.
pub fn plan_thumbnail(
    source: &Path,
    output: &Path,
    source_dims: (u32, u32),
    config: &ThumbnailConfig,
) -> ThumbnailParams {
    let (width, height) =
        calculate_fit_dimensions(source_dims, config.bounds, config.preserve_aspect);

    ThumbnailParams {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        width,
        height,
        quality: config.quality,
    }
}

/// Create a thumbnail of `source` at `output`.
pub fn create_thumbnail(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    config: &ThumbnailConfig,
) -> Result<()> {
    let dims = get_dimensions(backend, source)?;
    let params = plan_thumbnail(source, output, dims, config);
    backend.thumbnail(&params)
}
