//! # compare-gal
//!
//! Builds a static comparison gallery for files kept in parallel "category"
//! folders that share the same relative paths: `real/scenes/002.png`,
//! `fake/scenes/002.png`, and so on. Two documents are written into the
//! gallery root:
//!
//! - **`index.html`**: a grid with one row per file and one image per
//!   category. Clicking an image opens the viewer on it.
//! - **`toggle_index.html`**: a single-page viewer that switches between the
//!   categories' versions of one file without reloading.
//!
//! # Pipeline
//!
//! ```text
//! gallery/ ──catalog──► categories + files ──matrix──► rows ──grid──► index.html
//!                               │
//!                               └──────template (comp.html)──► toggle_index.html
//! ```
//!
//! The first category is the *reference*: its file tree decides which rows
//! and viewer options exist. Other categories are expected to mirror it.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`catalog`] | Category discovery, ordering, labels, and the reference file list |
//! | [`matrix`] | Per-file rows of category paths and viewer links |
//! | [`grid`] | Grid page rendering with Maud |
//! | [`template`] | Marker-driven expansion of the viewer template |
//! | [`thumbs`] | Cached thumbnails mirroring the gallery layout |
//! | [`cache`] | Content-hash cache manifest behind [`thumbs`] |
//! | [`imaging`] | Pure-Rust image operations behind an [`imaging::ImageBackend`] trait |
//! | [`config`] | `compare.toml` loading, merging over stock defaults, validation |
//! | [`pipeline`] | Stage orchestration and output writing |
//! | [`output`] | CLI report formatting |
//! | [`types`] | Categories and segment-based paths shared by all stages |
//!
//! # Design Decisions
//!
//! ## Paths as Segments
//!
//! A file in another category is found by swapping the category segment of
//! a [`types::CategoryPath`], never by searching the path text. Category
//! names that also occur inside file or folder names are left alone.
//!
//! ## Templates as Plain Text
//!
//! The viewer is an ordinary HTML page written for two placeholder
//! categories. Lines carrying known markers are rewritten; everything else is
//! copied through untouched, so the page can be restyled freely without
//! touching this crate. A stock template is embedded for galleries that don't
//! ship one.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod grid;
pub mod imaging;
pub mod matrix;
pub mod output;
pub mod pipeline;
pub mod template;
pub mod thumbs;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
