//! Thumbnail cache manifest.
//!
//! Thumbnail paths mirror their sources (`real/a/b.png` →
//! `thumb/real/a/b.png`), so the cache is keyed by output path. Each entry
//! records what the file was made from:
//!
//! - **`source_hash`**: SHA-256 of the source file contents. Content-based
//!   rather than mtime-based so it survives `git checkout` and copies.
//! - **`params_hash`**: SHA-256 of the thumbnail settings (bounds,
//!   aspect handling, quality).
//!
//! A hit needs a matching entry **and** the thumbnail still on disk. Anything
//! else is re-encoded and the entry overwritten, so repeated runs with the
//! same inputs return the same path without touching pixels.
//!
//! The manifest is a JSON file at `<cache root>/.cache-manifest.json`.

use crate::imaging::ThumbnailConfig;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::Path;

/// Name of the cache manifest file within the cache root.
pub const MANIFEST_FILENAME: &str = ".cache-manifest.json";

/// Bump to invalidate all existing caches when the format or key computation changes.
const MANIFEST_VERSION: u32 = 1;

/// What a cached thumbnail was made from.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct CacheEntry {
    pub source_hash: String,
    pub params_hash: String,
}

/// On-disk cache manifest: thumbnail path (relative to the cache root) → entry.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CacheManifest {
    pub version: u32,
    pub entries: HashMap<String, CacheEntry>,
}

impl CacheManifest {
    pub fn empty() -> Self {
        Self {
            version: MANIFEST_VERSION,
            entries: HashMap::new(),
        }
    }

    /// Load from the cache root. Missing, corrupt, or outdated manifests load empty.
    pub fn load(cache_root: &Path) -> Self {
        let content = match std::fs::read_to_string(cache_root.join(MANIFEST_FILENAME)) {
            Ok(c) => c,
            Err(_) => return Self::empty(),
        };
        match serde_json::from_str::<Self>(&content) {
            Ok(m) if m.version == MANIFEST_VERSION => m,
            _ => Self::empty(),
        }
    }

    /// Save to the cache root, creating it if needed.
    pub fn save(&self, cache_root: &Path) -> io::Result<()> {
        std::fs::create_dir_all(cache_root)?;
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(cache_root.join(MANIFEST_FILENAME), json)
    }

    /// Whether `output` (relative to `cache_root`) was made from this source
    /// with these parameters and still exists.
    pub fn is_fresh(
        &self,
        output: &str,
        source_hash: &str,
        params_hash: &str,
        cache_root: &Path,
    ) -> bool {
        self.entries.get(output).is_some_and(|entry| {
            entry.source_hash == source_hash && entry.params_hash == params_hash
        }) && cache_root.join(output).exists()
    }

    pub fn insert(&mut self, output: String, source_hash: String, params_hash: String) {
        self.entries.insert(
            output,
            CacheEntry {
                source_hash,
                params_hash,
            },
        );
    }
}

/// SHA-256 hash of a file's contents, returned as a hex string.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    let digest = Sha256::digest(&bytes);
    Ok(format!("{:x}", digest))
}

/// SHA-256 hash of the thumbnail settings.
pub fn hash_thumbnail_params(config: &ThumbnailConfig) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"thumbnail\0");
    hasher.update(config.bounds.width.to_le_bytes());
    hasher.update(config.bounds.height.to_le_bytes());
    hasher.update([config.preserve_aspect as u8]);
    hasher.update(config.quality.value().to_le_bytes());
    format!("{:x}", hasher.finalize())
}

/// Summary of cache performance for a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u32,
    pub misses: u32,
}

impl CacheStats {
    pub fn hit(&mut self) {
        self.hits += 1;
    }

    pub fn miss(&mut self) {
        self.misses += 1;
    }

    pub fn total(&self) -> u32 {
        self.hits + self.misses
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hits > 0 {
            write!(
                f,
                "{} cached, {} encoded ({} total)",
                self.hits,
                self.misses,
                self.total()
            )
        } else {
            write!(f, "{} encoded", self.misses)
        }
    }
}
