//! Shared constants and defaults for switchback.

/// Default interval between gradual-mode wallpaper updates, in seconds.
pub const DEFAULT_GRANULARITY_SECS: u64 = 3600;

/// Minimum accepted transition granularity, in seconds.
pub const MIN_GRANULARITY_SECS: u64 = 60;

/// Maximum accepted transition granularity (24 hours), in seconds.
pub const MAX_GRANULARITY_SECS: u64 = 86400;

/// Default safety interval between period checks in hard-cut mode, and the
/// upper bound on any daemon sleep, in seconds.
pub const DEFAULT_CHECK_INTERVAL_FALLBACK_SECS: u64 = 300;

/// Minimum sleep between daemon ticks, to avoid busy-looping.
pub const MINIMUM_SLEEP_SECS: u64 = 60;

/// Buffer added when sleeping until a period boundary, so the wake-up lands
/// just past the transition instant.
pub const BOUNDARY_SLEEP_BUFFER_SECS: u64 = 5;

/// Default cache directory (expanded relative to the home directory).
pub const DEFAULT_CACHE_DIR: &str = "~/.cache/switchback";

/// Default ceiling on the blend cache, in megabytes.
pub const DEFAULT_MAX_CACHE_MB: u64 = 500;

/// JPEG quality for cache artifacts. High enough that repeated display of
/// re-encoded blends shows no visible banding.
pub const JPEG_QUALITY: u8 = 98;

/// Fallback local sun times used when the location has no well-defined
/// sunrise/sunset (polar day or night): 06:00 / 12:00 / 18:00.
pub const FALLBACK_SUNRISE_HOUR: u32 = 6;
pub const FALLBACK_NOON_HOUR: u32 = 12;
pub const FALLBACK_SUNSET_HOUR: u32 = 18;

/// Default screen size for generated wallpapers.
pub const DEFAULT_SCREEN_WIDTH: u32 = 1920;
pub const DEFAULT_SCREEN_HEIGHT: u32 = 1080;

/// Seconds to wait for hyprpaper to become responsive at startup.
pub const HYPRPAPER_WAIT_SECS: u64 = 30;

/// Process exit code for unrecoverable failures.
pub const EXIT_FAILURE: i32 = 1;
