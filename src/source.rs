//! Wallpaper sources: file-backed or generated.
//!
//! A source answers one question per period: which image file represents it.
//! Only two variants exist and no third is anticipated, so the source is a
//! closed tagged variant rather than an open trait hierarchy.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use image::{Rgb, RgbImage};

use crate::blend::cache::write_jpeg;
use crate::config::{Config, GeneratedConfig, SourceMode, WallpaperPaths};
use crate::logger::Log;
use crate::transition::Period;

/// Where period wallpapers come from.
pub enum WallpaperSource {
    /// User-provided image files, one per period.
    File(FileSource),
    /// Solid backgrounds rendered from configured colors.
    Generated(GeneratedSource),
}

impl WallpaperSource {
    /// Build the source selected by the configuration.
    pub fn from_config(config: &Config, cache_root: &Path, log: Log) -> Result<Self> {
        match config.mode {
            SourceMode::File => {
                let wallpapers = config
                    .wallpapers
                    .clone()
                    .context("File mode requires a [wallpapers] section")?;
                Ok(Self::File(FileSource::new(wallpapers)))
            }
            SourceMode::Generated => {
                let generated = config
                    .generated
                    .clone()
                    .context("Generated mode requires a [generated] section")?;
                Ok(Self::Generated(GeneratedSource::new(
                    generated, cache_root, log,
                )?))
            }
        }
    }

    /// Path of the wallpaper representing `period`, rendering it first if
    /// this source generates its images.
    pub fn wallpaper(&self, period: Period) -> Result<PathBuf> {
        match self {
            Self::File(source) => source.wallpaper(period),
            Self::Generated(source) => source.wallpaper(period),
        }
    }

    /// Whether the source's images are stable files worth preloading into
    /// the display server.
    pub fn supports_preload(&self) -> bool {
        match self {
            Self::File(_) => true,
            // Generated images are rendered on demand; preloading them all
            // up front would force rendering before it is needed.
            Self::Generated(_) => false,
        }
    }

    /// All period wallpapers, in cycle order.
    pub fn all_wallpapers(&self) -> Result<Vec<PathBuf>> {
        Period::ALL
            .iter()
            .map(|&period| self.wallpaper(period))
            .collect()
    }
}

/// Wallpapers read from configured image files.
pub struct FileSource {
    wallpapers: WallpaperPaths,
}

impl FileSource {
    pub fn new(wallpapers: WallpaperPaths) -> Self {
        Self { wallpapers }
    }

    fn wallpaper(&self, period: Period) -> Result<PathBuf> {
        let path = self.wallpapers.path_for(period);
        if !path.is_file() {
            bail!(
                "Wallpaper file for '{period}' no longer exists: {}",
                path.display()
            );
        }
        Ok(path)
    }
}

/// Wallpapers rendered from per-period background colors and cached under
/// `<cache_root>/generated/`. Filenames embed a hash of the generation
/// parameters, so a config change invalidates the cache automatically.
pub struct GeneratedSource {
    config: GeneratedConfig,
    cache_dir: PathBuf,
    params_hash: String,
    log: Log,
}

impl GeneratedSource {
    pub fn new(config: GeneratedConfig, cache_root: &Path, log: Log) -> Result<Self> {
        let cache_dir = cache_root.join("generated");
        fs::create_dir_all(&cache_dir).with_context(|| {
            format!(
                "Failed to create generated wallpaper directory {}",
                cache_dir.display()
            )
        })?;
        let params_hash = params_hash(&config);
        Ok(Self {
            config,
            cache_dir,
            params_hash,
            log,
        })
    }

    fn wallpaper(&self, period: Period) -> Result<PathBuf> {
        let path = self
            .cache_dir
            .join(format!("{period}_{}.jpg", self.params_hash));
        if path.exists() {
            return Ok(path);
        }

        self.log
            .decorated(format!("Generating wallpaper for {period}..."));
        let color = parse_hex_color(self.config.background_colors.color_for(period))?;
        let image = RgbImage::from_pixel(
            self.config.screen_width,
            self.config.screen_height,
            Rgb(color),
        );
        write_jpeg(&image, &path)?;
        Ok(path)
    }
}

/// Stable hash of everything that affects the rendered output.
fn params_hash(config: &GeneratedConfig) -> String {
    let canonical = serde_json::json!({
        "screen": [config.screen_width, config.screen_height],
        "colors": {
            "night": config.background_colors.night,
            "morning": config.background_colors.morning,
            "afternoon": config.background_colors.afternoon,
        },
    });
    let digest = sha256::digest(canonical.to_string());
    digest[..16].to_string()
}

/// Parse `#rrggbb` into RGB bytes. Rejects anything config validation
/// would also reject, so direct construction gets the same errors.
fn parse_hex_color(color: &str) -> Result<[u8; 3]> {
    let hex = color
        .strip_prefix('#')
        .with_context(|| format!("Invalid hex color: {color}"))?;
    if hex.len() != 6 {
        bail!("Invalid hex color: {color}");
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16)
            .with_context(|| format!("Invalid hex color: {color}"))
    };
    Ok([channel(0..2)?, channel(2..4)?, channel(4..6)?])
}
