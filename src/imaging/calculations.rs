//! Pure calculation functions for thumbnail dimensions.

use super::params::Bounds;

/// Calculate the output size of a thumbnail.
///
/// With `preserve_aspect`, the source is scaled down to fit inside `bounds`
/// keeping its aspect ratio; sources already inside the box keep their size.
/// Without it, the output is exactly `bounds`.
///
/// # Examples
/// ```
/// # use compare_gal::imaging::{Bounds, calculate_fit_dimensions};
/// // 2048x1024 into 512x512 → 512x256
/// assert_eq!(calculate_fit_dimensions((2048, 1024), Bounds::new(512, 512), true), (512, 256));
///
/// // Already small: untouched
/// assert_eq!(calculate_fit_dimensions((300, 200), Bounds::new(512, 512), true), (300, 200));
/// ```
pub fn calculate_fit_dimensions(
    source: (u32, u32),
    bounds: Bounds,
    preserve_aspect: bool,
) -> (u32, u32) {
    if !preserve_aspect {
        return (bounds.width, bounds.height);
    }

    let (src_w, src_h) = source;
    if src_w <= bounds.width && src_h <= bounds.height {
        return (src_w, src_h);
    }

    let scale = f64::min(
        bounds.width as f64 / src_w as f64,
        bounds.height as f64 / src_h as f64,
    );
    let w = ((src_w as f64 * scale).round() as u32).clamp(1, bounds.width);
    let h = ((src_h as f64 * scale).round() as u32).clamp(1, bounds.height);
    (w, h)
}
