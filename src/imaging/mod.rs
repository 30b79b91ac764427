//! Image processing in pure Rust, no external tools.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Thumbnail** | `resize_exact` (Lanczos3) to a bounded size |
//!
//! The module is split into:
//! - **Calculations**: pure functions for dimension math (unit testable)
//! - **Parameters**: data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: high-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use calculations::calculate_fit_dimensions;
pub use rust_backend::RustBackend;
#[cfg(test)]
pub use backend::Dimensions;
pub use operations::{ThumbnailConfig, create_thumbnail, get_dimensions, plan_thumbnail};
pub use params::{Bounds, Quality, ThumbnailParams};
