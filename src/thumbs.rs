//! Cached, bounded-size copies of category files.
//!
//! A [`Thumbnailer`] is configured once per run (cache root, bounds, aspect
//! handling, quality) and then asked for thumbnails one source at a time.
//! The cache mirrors the gallery layout:
//!
//! ```text
//! gallery/
//! ├── real/scenes/002.png
//! ├── fake/scenes/002.png
//! └── thumb/
//!     ├── .cache-manifest.json
//!     ├── real/scenes/002.png
//!     └── fake/scenes/002.png
//! ```
//!
//! Calls are idempotent: a source whose content and settings match the cache
//! manifest gets its existing thumbnail back without re-encoding. The
//! thumbnailer is `Sync`, so rayon workers can share it.

use crate::cache::{self, CacheManifest, CacheStats};
use crate::imaging::{BackendError, ImageBackend, ThumbnailConfig, create_thumbnail};
use crate::types::CategoryPath;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;
use std::sync::mpsc::Sender;

/// Progress report for one thumbnail request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbEvent {
    /// Source path as displayed, e.g. `fake/scenes/002.png`.
    pub source: String,
    /// Thumbnail path as displayed, e.g. `thumb/fake/scenes/002.png`.
    pub thumbnail: String,
    pub status: ThumbStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbStatus {
    Cached,
    Encoded,
}

struct CacheState {
    manifest: CacheManifest,
    stats: CacheStats,
}

pub struct Thumbnailer<'a, B: ImageBackend> {
    backend: &'a B,
    root: PathBuf,
    cache_base: Vec<String>,
    cache_root: PathBuf,
    config: ThumbnailConfig,
    params_hash: String,
    state: Mutex<CacheState>,
    events: Option<Sender<ThumbEvent>>,
}

impl<'a, B: ImageBackend> Thumbnailer<'a, B> {
    /// `cache_dir` is relative to `root` (or absolute). With `use_cache` off,
    /// every thumbnail is re-encoded.
    pub fn new(
        backend: &'a B,
        root: &Path,
        cache_dir: &str,
        config: ThumbnailConfig,
        use_cache: bool,
    ) -> Self {
        let cache_base = cache_base(cache_dir);
        let cache_root = root.join(cache_dir);
        let manifest = if use_cache {
            CacheManifest::load(&cache_root)
        } else {
            CacheManifest::empty()
        };
        Self {
            backend,
            root: root.to_path_buf(),
            cache_base,
            cache_root,
            params_hash: cache::hash_thumbnail_params(&config),
            config,
            state: Mutex::new(CacheState {
                manifest,
                stats: CacheStats::default(),
            }),
            events: None,
        }
    }

    /// Send a [`ThumbEvent`] for every request.
    pub fn with_events(mut self, events: Sender<ThumbEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Return the cached thumbnail of `source`, encoding it if needed.
    pub fn make_thumb(&self, source: &CategoryPath) -> Result<CategoryPath, BackendError> {
        let source_path = source.resolve(&self.root);
        let thumb = source.rebased(&self.cache_base);
        let key = source.rebased(&[]).display();
        let source_hash = cache::hash_file(&source_path)?;

        let cached = {
            let mut state = self.lock();
            let fresh =
                state
                    .manifest
                    .is_fresh(&key, &source_hash, &self.params_hash, &self.cache_root);
            if fresh {
                state.stats.hit();
            }
            fresh
        };

        let status = if cached {
            ThumbStatus::Cached
        } else {
            create_thumbnail(
                self.backend,
                &source_path,
                &thumb.resolve(&self.root),
                &self.config,
            )?;
            let mut state = self.lock();
            state
                .manifest
                .insert(key, source_hash, self.params_hash.clone());
            state.stats.miss();
            ThumbStatus::Encoded
        };

        if let Some(tx) = &self.events {
            // A dropped receiver only means nobody is printing progress
            let _ = tx.send(ThumbEvent {
                source: source.display(),
                thumbnail: thumb.display(),
                status,
            });
        }
        Ok(thumb)
    }

    /// Persist the cache manifest and return the run's hit/miss counts.
    pub fn finish(self) -> std::io::Result<CacheStats> {
        let state = self
            .state
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        state.manifest.save(&self.cache_root)?;
        Ok(state.stats)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Path segments placed before the category in thumbnail paths.
///
/// Relative dirs keep their components (`./thumb` → `["thumb"]`); an absolute
/// dir stays one segment so joining it under the root yields the dir itself.
fn cache_base(dir: &str) -> Vec<String> {
    let path = Path::new(dir);
    if path.is_absolute() {
        return vec![dir.trim_end_matches('/').to_string()];
    }
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().to_string()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect()
}
