//! Parameter types for thumbnail operations.
//!
//! These structs describe *what* to do, not *how*. [`operations`](super::operations)
//! decides the output size; the [`backend`](super::backend) does the pixel work.
//!
//! - [`Quality`]: lossy encoding quality (1–100, default 95). Clamped on construction.
//! - [`Bounds`]: the box a thumbnail must fit inside.
//! - [`ThumbnailParams`]: source, output, final dimensions, quality.

use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(95)
    }
}

/// Maximum thumbnail size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl From<[u32; 2]> for Bounds {
    fn from([width, height]: [u32; 2]) -> Self {
        Self { width, height }
    }
}

/// Parameters for a thumbnail operation (resize to exact dimensions).
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
}
