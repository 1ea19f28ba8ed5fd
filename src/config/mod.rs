//! Configuration system for switchback with validation and template generation.
//!
//! Configuration lives in `switchback.toml` under
//! `XDG_CONFIG_HOME/switchback/` (or a path given with `--config`). The file
//! describes the observer location, the wallpaper source, and the optional
//! gradual-transition settings:
//!
//! ```toml
//! [location]
//! latitude = 37.7749       # Observer latitude (-90 to 90)
//! longitude = -122.4194    # Observer longitude (-180 to 180)
//! timezone = "America/Los_Angeles"  # IANA timezone name
//!
//! mode = "file"            # Wallpaper source: "file" or "generated"
//!
//! [wallpapers]
//! night = "~/Pictures/backgrounds/night.jpg"
//! morning = "~/Pictures/backgrounds/morning.jpg"
//! afternoon = "~/Pictures/backgrounds/afternoon.jpg"
//!
//! [settings]
//! check_interval_fallback = 300  # Safety check interval in seconds
//! preload_all = true             # Preload all wallpapers at startup
//! monitor = ""                   # Monitor name (empty = all monitors)
//!
//! [settings.transitions]
//! enabled = false                # Gradual crossfades between periods
//! granularity = 3600             # Seconds between blend updates (60-86400)
//! cache_blends = true            # Cache rendered blends on disk
//! cache_dir = "~/.cache/switchback"
//! max_cache_mb = 500             # Blend cache ceiling in megabytes
//! ```
//!
//! All values are validated during loading: coordinate ranges, timezone
//! names, hex colors, granularity bounds, and (in file mode) that every
//! configured wallpaper actually exists. Invalid configurations produce
//! errors naming the offending field.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono_tz::Tz;
use regex::Regex;
use serde::Deserialize;

use crate::constants::{
    DEFAULT_CACHE_DIR, DEFAULT_CHECK_INTERVAL_FALLBACK_SECS, DEFAULT_GRANULARITY_SECS,
    DEFAULT_MAX_CACHE_MB, DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH, MAX_GRANULARITY_SECS,
    MIN_GRANULARITY_SECS,
};
use crate::transition::Period;

/// Wallpaper source selection.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// Period wallpapers are user-provided image files.
    #[default]
    File,
    /// Period wallpapers are rendered from configured colors.
    Generated,
}

/// Top-level configuration, deserialized from `switchback.toml`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub location: LocationConfig,

    /// Wallpaper source mode; defaults to file-backed wallpapers.
    #[serde(default)]
    pub mode: SourceMode,

    /// Per-period wallpaper files (required in file mode).
    pub wallpapers: Option<WallpaperPaths>,

    /// Generation parameters (required in generated mode).
    pub generated: Option<GeneratedConfig>,

    #[serde(default)]
    pub settings: Settings,
}

/// Observer location for the ephemeris.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
    /// IANA timezone name, e.g. "Europe/Berlin".
    pub timezone: String,
}

/// One wallpaper path per period. `~` and environment-free relative paths
/// are expanded at access time.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct WallpaperPaths {
    pub night: String,
    pub morning: String,
    pub afternoon: String,
}

impl WallpaperPaths {
    /// Expanded path for a period's wallpaper.
    pub fn path_for(&self, period: Period) -> PathBuf {
        let raw = match period {
            Period::Night => &self.night,
            Period::Morning => &self.morning,
            Period::Afternoon => &self.afternoon,
        };
        expand_path(raw)
    }
}

/// Parameters for generated wallpapers.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GeneratedConfig {
    #[serde(default = "default_screen_width")]
    pub screen_width: u32,
    #[serde(default = "default_screen_height")]
    pub screen_height: u32,
    pub background_colors: PeriodColors,
}

/// One `#rrggbb` color per period.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PeriodColors {
    pub night: String,
    pub morning: String,
    pub afternoon: String,
}

impl PeriodColors {
    pub fn color_for(&self, period: Period) -> &str {
        match period {
            Period::Night => &self.night,
            Period::Morning => &self.morning,
            Period::Afternoon => &self.afternoon,
        }
    }
}

/// Daemon behavior settings.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Safety check interval in seconds; also the upper bound on any sleep.
    pub check_interval_fallback: u64,
    /// Preload all wallpapers at startup (hard-cut mode only).
    pub preload_all: bool,
    /// Monitor name; empty applies to all monitors.
    pub monitor: String,
    pub transitions: Transitions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            check_interval_fallback: DEFAULT_CHECK_INTERVAL_FALLBACK_SECS,
            preload_all: true,
            monitor: String::new(),
            transitions: Transitions::default(),
        }
    }
}

/// Gradual-transition settings.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Transitions {
    pub enabled: bool,
    /// Seconds between blend updates while transitioning.
    pub granularity: u64,
    pub cache_blends: bool,
    pub cache_dir: String,
    pub max_cache_mb: u64,
}

impl Default for Transitions {
    fn default() -> Self {
        Self {
            enabled: false,
            granularity: DEFAULT_GRANULARITY_SECS,
            cache_blends: true,
            cache_dir: DEFAULT_CACHE_DIR.to_string(),
            max_cache_mb: DEFAULT_MAX_CACHE_MB,
        }
    }
}

fn default_screen_width() -> u32 {
    DEFAULT_SCREEN_WIDTH
}

fn default_screen_height() -> u32 {
    DEFAULT_SCREEN_HEIGHT
}

impl Config {
    /// Load and validate configuration from `path`, or from the default
    /// location when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => default_config_path()?,
        };

        if !config_path.exists() {
            bail!(
                "Configuration file not found: {}\nRun 'switchback init' to create a template.",
                config_path.display()
            );
        }

        let text = fs::read_to_string(&config_path).with_context(|| {
            format!("Failed to read configuration from {}", config_path.display())
        })?;
        let config: Config = toml::from_str(&text).with_context(|| {
            format!("Failed to parse configuration at {}", config_path.display())
        })?;

        validate_config(&config)?;
        Ok(config)
    }

    /// Parsed IANA timezone of the configured location.
    pub fn timezone(&self) -> Result<Tz> {
        self.location
            .timezone
            .parse::<Tz>()
            .map_err(|_| {
                anyhow::anyhow!(
                    "Invalid timezone: {}. Must be a valid IANA timezone (e.g., 'America/Los_Angeles', 'Europe/London')",
                    self.location.timezone
                )
            })
    }

    /// Expanded cache directory.
    pub fn cache_dir(&self) -> PathBuf {
        expand_path(&self.settings.transitions.cache_dir)
    }

    /// Blend cache ceiling in bytes.
    pub fn max_cache_bytes(&self) -> u64 {
        self.settings.transitions.max_cache_mb * 1024 * 1024
    }
}

/// Validate a configuration against ranges and mode requirements.
pub fn validate_config(config: &Config) -> Result<()> {
    let lat = config.location.latitude;
    let lon = config.location.longitude;
    if !(-90.0..=90.0).contains(&lat) {
        bail!("Latitude must be between -90 and 90, got: {lat}");
    }
    if !(-180.0..=180.0).contains(&lon) {
        bail!("Longitude must be between -180 and 180, got: {lon}");
    }
    config.timezone()?;

    match config.mode {
        SourceMode::File => {
            let wallpapers = config
                .wallpapers
                .as_ref()
                .context("File mode requires a [wallpapers] section")?;
            for period in Period::ALL {
                let path = wallpapers.path_for(period);
                if !path.is_file() {
                    bail!(
                        "Wallpaper file not found for '{period}': {}",
                        path.display()
                    );
                }
            }
        }
        SourceMode::Generated => {
            let generated = config
                .generated
                .as_ref()
                .context("Generated mode requires a [generated] section")?;
            let hex = Regex::new("^#[0-9a-fA-F]{6}$").expect("static hex color pattern");
            for period in Period::ALL {
                let color = generated.background_colors.color_for(period);
                if !hex.is_match(color) {
                    bail!("Invalid hex color for background {period}: {color}");
                }
            }
            if generated.screen_width == 0 || generated.screen_height == 0 {
                bail!(
                    "Screen size must be non-zero, got: {}x{}",
                    generated.screen_width,
                    generated.screen_height
                );
            }
        }
    }

    let granularity = config.settings.transitions.granularity;
    if granularity < MIN_GRANULARITY_SECS {
        bail!("Transition granularity must be at least {MIN_GRANULARITY_SECS} seconds, got: {granularity}");
    }
    if granularity > MAX_GRANULARITY_SECS {
        bail!("Transition granularity cannot exceed {MAX_GRANULARITY_SECS} seconds (24 hours), got: {granularity}");
    }
    if config.settings.check_interval_fallback < MIN_GRANULARITY_SECS {
        bail!(
            "Check interval fallback must be at least {MIN_GRANULARITY_SECS} seconds, got: {}",
            config.settings.check_interval_fallback
        );
    }

    Ok(())
}

/// Default configuration file location:
/// `XDG_CONFIG_HOME/switchback/switchback.toml`.
pub fn default_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("Could not determine config directory")?;
    Ok(config_dir.join("switchback").join("switchback.toml"))
}

/// Write a commented default configuration template to `path`.
/// Refuses to overwrite an existing file.
pub fn create_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("Configuration file already exists at {}", path.display());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }

    let template = r##"# switchback configuration

[location]
latitude = 37.7749       # Observer latitude
longitude = -122.4194    # Observer longitude
timezone = "America/Los_Angeles"  # IANA timezone name

# Wallpaper source: "file" uses the [wallpapers] paths below,
# "generated" renders solid backgrounds from [generated] colors.
mode = "file"

[wallpapers]
night = "~/Pictures/backgrounds/night.jpg"
morning = "~/Pictures/backgrounds/morning.jpg"
afternoon = "~/Pictures/backgrounds/afternoon.jpg"

#[generated]
#screen_width = 1920
#screen_height = 1080
#[generated.background_colors]
#night = "#1a1b26"
#morning = "#7aa2f7"
#afternoon = "#e0af68"

[settings]
check_interval_fallback = 300  # Safety check interval (seconds)
preload_all = true             # Preload all wallpapers at startup
monitor = ""                   # Monitor name (empty = all monitors)

[settings.transitions]
enabled = false                # Gradual crossfades between periods
granularity = 3600             # Seconds between blend updates (60-86400)
cache_blends = true            # Cache rendered blends for performance
cache_dir = "~/.cache/switchback"
max_cache_mb = 500             # Blend cache ceiling (megabytes)
"##;

    fs::write(path, template)
        .with_context(|| format!("Failed to write config template to {}", path.display()))?;
    Ok(())
}

/// Expand a leading `~/` against the home directory.
pub fn expand_path(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}

#[cfg(test)]
mod tests;
