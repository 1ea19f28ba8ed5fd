//! Content-addressed cache of rendered blends.
//!
//! Each cached blend is one JPEG file under `<cache_root>/blends/`, indexed
//! by `metadata.json` alongside it. Entries record the sha256 content hash
//! of both source wallpapers at render time; lookups re-hash the sources so
//! the cache self-heals when a wallpaper file is replaced on disk without
//! restarting the daemon. Aggregate size is bounded by a byte ceiling with
//! oldest-created-first eviction.
//!
//! The cache survives process restarts and assumes a single writer (one
//! daemon instance, enforced by the lock file). Index load failures degrade
//! to an empty cache; save failures are logged and swallowed so a usable
//! in-memory index can reconcile on a later successful save.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::constants::JPEG_QUALITY;
use crate::logger::Log;

/// Index record for one rendered blend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub from_hash: String,
    pub to_hash: String,
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
}

/// Size-bounded store of rendered blends, persisted in the cache directory.
pub struct BlendCache {
    blends_dir: PathBuf,
    index_path: PathBuf,
    max_bytes: u64,
    index: BTreeMap<String, CacheEntry>,
    log: Log,
}

impl BlendCache {
    /// Open (or create) the cache rooted at `cache_root` with the given
    /// byte ceiling.
    pub fn new(cache_root: &Path, max_bytes: u64, log: Log) -> Result<Self> {
        let blends_dir = cache_root.join("blends");
        fs::create_dir_all(&blends_dir).with_context(|| {
            format!("Failed to create cache directory {}", blends_dir.display())
        })?;
        let index_path = cache_root.join("metadata.json");
        let index = load_index(&index_path, &log);
        Ok(Self {
            blends_dir,
            index_path,
            max_bytes,
            index,
            log,
        })
    }

    /// Cache key for a blend of the two wallpapers at `ratio`.
    ///
    /// The ratio is rounded to 2 decimals, so the scheduler's finer ratios
    /// collapse onto ~1% steps: at most 101 distinct slots per wallpaper
    /// pair, trading a little smoothness for bounded cache cardinality.
    pub fn key_for(from: &Path, to: &Path, ratio: f32) -> String {
        format!("{}-{}_{ratio:.2}.jpg", stem(from), stem(to))
    }

    /// Number of indexed entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Return the cached blend for `key` if it exists and both source files
    /// still hash to what they hashed when the blend was rendered.
    ///
    /// A stale or orphaned entry is deleted on the way out, so the next
    /// `store` starts clean.
    pub fn lookup(&mut self, key: &str, from: &Path, to: &Path) -> Option<PathBuf> {
        let entry = self.index.get(key)?.clone();
        let cached = self.blends_dir.join(key);
        if !cached.exists() {
            self.index.remove(key);
            self.save_index();
            return None;
        }

        // A vanished or unreadable source counts as a mismatch: re-render.
        let valid = match (file_hash(from), file_hash(to)) {
            (Some(from_hash), Some(to_hash)) => {
                entry.from_hash == from_hash && entry.to_hash == to_hash
            }
            _ => false,
        };

        if !valid {
            self.log
                .debug(format!("Cache entry stale, regenerating: {key}"));
            let _ = fs::remove_file(&cached);
            self.index.remove(key);
            self.save_index();
            return None;
        }

        self.log.debug(format!("Using cached blend: {key}"));
        Some(cached)
    }

    /// Persist a rendered blend under `key`, index it, and enforce the size
    /// ceiling.
    pub fn store(
        &mut self,
        image: &RgbImage,
        key: &str,
        from: &Path,
        to: &Path,
    ) -> Result<PathBuf> {
        let path = self.blends_dir.join(key);
        write_jpeg(image, &path)?;
        let size_bytes = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

        self.index.insert(
            key.to_string(),
            CacheEntry {
                from_hash: file_hash(from).unwrap_or_default(),
                to_hash: file_hash(to).unwrap_or_default(),
                created_at: Utc::now(),
                size_bytes,
            },
        );
        self.save_index();
        self.log.debug(format!("Saved blend to cache: {key}"));

        self.enforce_limit();
        Ok(path)
    }

    /// Evict oldest-created entries until the total size of existing cache
    /// files is at or below the ceiling. The index is persisted once after
    /// the sweep.
    pub fn enforce_limit(&mut self) {
        let mut total: u64 = self
            .index
            .keys()
            .filter_map(|key| fs::metadata(self.blends_dir.join(key)).ok())
            .map(|m| m.len())
            .sum();
        if total <= self.max_bytes {
            return;
        }

        self.log.decorated(format!(
            "Cache size ({:.1} MB) exceeds limit, cleaning up...",
            total as f64 / 1024.0 / 1024.0
        ));

        let mut by_age: Vec<(String, DateTime<Utc>)> = self
            .index
            .iter()
            .map(|(key, entry)| (key.clone(), entry.created_at))
            .collect();
        by_age.sort_by_key(|(_, created_at)| *created_at);

        for (key, _) in by_age {
            let path = self.blends_dir.join(&key);
            if let Ok(meta) = fs::metadata(&path) {
                let _ = fs::remove_file(&path);
                total = total.saturating_sub(meta.len());
            }
            self.index.remove(&key);
            if total <= self.max_bytes {
                break;
            }
        }

        self.save_index();
        self.log.decorated(format!(
            "Cache cleanup complete, new size: {:.1} MB",
            total as f64 / 1024.0 / 1024.0
        ));
    }

    /// Delete every cached blend and empty the index.
    pub fn clear(&mut self) {
        let mut removed = 0usize;
        if let Ok(entries) = fs::read_dir(&self.blends_dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "jpg")
                    && fs::remove_file(&path).is_ok()
                {
                    removed += 1;
                }
            }
        }
        self.index.clear();
        self.save_index();
        self.log.decorated(format!("Cleared {removed} cached blends"));
    }

    fn save_index(&self) {
        let result = serde_json::to_string_pretty(&self.index)
            .map_err(anyhow::Error::from)
            .and_then(|json| fs::write(&self.index_path, json).map_err(anyhow::Error::from));
        if let Err(e) = result {
            self.log.warning(format!("Failed to save cache index: {e}"));
        }
    }
}

fn load_index(path: &Path, log: &Log) -> BTreeMap<String, CacheEntry> {
    if !path.exists() {
        return BTreeMap::new();
    }
    match fs::read_to_string(path)
        .map_err(anyhow::Error::from)
        .and_then(|text| serde_json::from_str(&text).map_err(anyhow::Error::from))
    {
        Ok(index) => index,
        Err(e) => {
            // Corrupt index is not worth dying over: start empty, the next
            // save rewrites it.
            log.warning(format!("Failed to load cache index, starting empty: {e}"));
            BTreeMap::new()
        }
    }
}

/// sha256 of a file's full contents; `None` when the file cannot be read.
fn file_hash(path: &Path) -> Option<String> {
    sha256::try_digest(path).ok()
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "wallpaper".to_string())
}

/// Encode an RGB image as a high-quality JPEG cache artifact.
pub(crate) fn write_jpeg(image: &RgbImage, path: &Path) -> Result<()> {
    use std::io::Write;

    let file = fs::File::create(path)
        .with_context(|| format!("Failed to create cache file {}", path.display()))?;
    let mut writer = std::io::BufWriter::new(file);
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY);
    image
        .write_with_encoder(encoder)
        .with_context(|| format!("Failed to encode blend to {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush cache file {}", path.display()))?;
    Ok(())
}
