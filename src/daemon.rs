//! Application coordinator that manages the complete lifecycle of switchback.
//!
//! This module handles resource acquisition, initialization, and the daemon
//! loop. It manages:
//! - Configuration loading
//! - Lock file management for single-instance enforcement
//! - Signal handler setup
//! - The poll-driven tick: classify → resolve boundaries → schedule →
//!   cache lookup → blend on miss → apply
//!
//! The `Switchback` struct uses a builder pattern to support the different
//! startup contexts:
//! - Daemon run: `Switchback::new(verbose).run()`
//! - Single-shot apply: `Switchback::new(true).run_once(None)`
//! - Diagnostics: `Switchback::new(true).run_test()`

use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration as StdDuration;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::blend::{BlendCache, ImageBlender};
use crate::config::{Config, SourceMode};
use crate::constants::{
    BOUNDARY_SLEEP_BUFFER_SECS, EXIT_FAILURE, HYPRPAPER_WAIT_SECS, MINIMUM_SLEEP_SECS,
};
use crate::hyprpaper::WallpaperManager;
use crate::instance;
use crate::logger::Log;
use crate::signals::{SignalMessage, setup_signal_handler};
use crate::solar::{Ephemeris, SolarEphemeris, SunTimes};
use crate::source::WallpaperSource;
use crate::transition::{BlendScheduler, BoundaryResolver, Period, TransitionState, classify};

/// Builder for configuring and running the switchback application.
pub struct Switchback {
    verbose: bool,
    config_path: Option<PathBuf>,
    create_lock: bool,
}

impl Switchback {
    /// Create a runner with defaults matching a normal daemon run.
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            config_path: None,
            create_lock: true,
        }
    }

    /// Load configuration from an explicit path instead of the default.
    pub fn with_config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    /// Skip lock file creation (single-shot commands).
    pub fn without_lock(mut self) -> Self {
        self.create_lock = false;
        self
    }

    /// Run the wallpaper switching daemon until a shutdown signal arrives.
    pub fn run(self) -> Result<()> {
        let log = Log::new(self.verbose);
        log.version();

        let config = match Config::load(self.config_path.as_deref()) {
            Ok(config) => config,
            Err(e) => {
                log.error_exit("Configuration failed");
                eprintln!("{e:?}");
                log.end();
                std::process::exit(EXIT_FAILURE);
            }
        };

        let _lock = if self.create_lock {
            match instance::acquire_lock() {
                Ok(lock) => Some(lock),
                Err(e) => {
                    log.error_exit(e.to_string());
                    log.end();
                    std::process::exit(EXIT_FAILURE);
                }
            }
        } else {
            None
        };

        let signal_state = setup_signal_handler(&log)?;
        log_config(&config, &log);

        let mut engine = Engine::new(&config, log.clone())?;

        if !engine.manager.wait_ready(HYPRPAPER_WAIT_SECS) {
            log.error_exit("Hyprpaper is not running. Please start hyprpaper first.");
            log.end();
            std::process::exit(EXIT_FAILURE);
        }

        engine.log_sun_times(engine.now());

        // Preloading every period image only pays off when wallpapers are
        // stable files and swaps are hard cuts.
        if config.settings.preload_all
            && !config.settings.transitions.enabled
            && engine.source.supports_preload()
        {
            match engine.source.all_wallpapers() {
                Ok(paths) => {
                    if !engine.manager.preload_all(&paths) {
                        log.warning("Some wallpapers failed to preload, but continuing...");
                    }
                }
                Err(e) => log.warning(format!("Preload skipped: {e:#}")),
            }
        }

        log.block_start("Daemon loop started");
        let mut last_period: Option<Period> = None;

        while signal_state.running.load(Ordering::SeqCst) {
            let now = engine.now();
            let period = classify(&engine.ephemeris.sun_times(now.date_naive()), now);

            let sleep_secs = if config.settings.transitions.enabled {
                if let Err(e) = engine.tick_gradual(now, period) {
                    log.pipe();
                    log.warning(format!("Skipping tick: {e:#}"));
                }
                config.settings.transitions.granularity
            } else {
                if last_period != Some(period) {
                    if let Some(previous) = last_period {
                        log.block_start(format!("Period changed: {previous} → {period}"));
                    }
                    if engine.tick_hard(period) {
                        last_period = Some(period);
                    } else {
                        log.error("Failed to change wallpaper, will retry...");
                    }
                }
                let boundary =
                    BoundaryResolver::new(engine.ephemeris.as_ref()).boundaries(now, period);
                boundary.end.signed_duration_since(now).num_seconds().max(0) as u64
                    + BOUNDARY_SLEEP_BUFFER_SECS
            };

            // Bounded below to avoid busy-looping and above by the safety
            // interval so a missed estimate never sleeps through a boundary.
            let fallback = config.settings.check_interval_fallback.max(MINIMUM_SLEEP_SECS);
            let sleep_secs = sleep_secs.clamp(MINIMUM_SLEEP_SECS, fallback);
            log.debug(format!("Sleeping for {sleep_secs}s"));

            match signal_state
                .receiver
                .recv_timeout(StdDuration::from_secs(sleep_secs))
            {
                Ok(SignalMessage::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {}
            }
        }

        log.block_start("Goodbye!");
        log.end();
        Ok(())
    }

    /// Apply the wallpaper once and exit. With a period override the image
    /// is applied as a hard cut; otherwise the current schedule decides.
    pub fn run_once(self, period_override: Option<Period>) -> Result<()> {
        let log = Log::new(true);
        log.version();

        let config = Config::load(self.config_path.as_deref())?;
        log_config(&config, &log);
        let mut engine = Engine::new(&config, log.clone())?;

        if !engine.manager.wait_ready(5) {
            log.end();
            bail!("Hyprpaper is not running");
        }

        let applied = match period_override {
            Some(period) => {
                log.block_start(format!("Setting wallpaper for period: {period}"));
                engine.tick_hard(period)
            }
            None => {
                let now = engine.now();
                let period = classify(&engine.ephemeris.sun_times(now.date_naive()), now);
                engine.log_sun_times(now);
                if config.settings.transitions.enabled {
                    match engine.tick_gradual(now, period) {
                        Ok(()) => true,
                        Err(e) => {
                            log.error(format!("{e:#}"));
                            false
                        }
                    }
                } else {
                    engine.tick_hard(period)
                }
            }
        };

        log.end();
        if !applied {
            bail!("Failed to set wallpaper");
        }
        Ok(())
    }

    /// Delete every cached blend and exit. Blends are re-rendered on demand
    /// the next time the daemon needs them.
    pub fn run_clear_cache(self) -> Result<()> {
        let log = Log::new(true);
        log.version();

        let config = Config::load(self.config_path.as_deref())?;
        let cache_root = config.cache_dir();
        let mut cache = BlendCache::new(&cache_root, config.max_cache_bytes(), log.clone())?;
        cache.clear();

        log.end();
        Ok(())
    }

    /// Show the current period and next transition without touching the
    /// display.
    pub fn run_test(self) -> Result<()> {
        let log = Log::new(true);
        log.version();

        let config = Config::load(self.config_path.as_deref())?;
        let engine = Engine::new(&config, log.clone())?;

        let now = engine.now();
        let sun = engine.ephemeris.sun_times(now.date_naive());
        let period = classify(&sun, now);

        log.block_start(format!("Current time: {}", now.format("%Y-%m-%d %H:%M:%S %Z")));
        engine.log_sun_times(now);

        let state = engine.transition_for(now, period);
        log.block_start(format!(
            "Active blend: {} → {} ({:.2})",
            state.from, state.to, state.ratio
        ));

        let boundary = BoundaryResolver::new(engine.ephemeris.as_ref()).boundaries(now, period);
        let until = boundary.end.signed_duration_since(now);
        log.decorated(format!(
            "Next transition: {}",
            boundary.end.format("%Y-%m-%d %H:%M:%S")
        ));
        log.indented(format!(
            "Time until transition: {}h {}m",
            until.num_hours(),
            until.num_minutes() % 60
        ));

        log.end();
        Ok(())
    }
}

/// Assembled runtime components of one daemon process.
struct Engine {
    log: Log,
    tz: Tz,
    ephemeris: Box<dyn Ephemeris>,
    source: WallpaperSource,
    manager: WallpaperManager,
    blender: ImageBlender,
    cache: Option<BlendCache>,
    scheduler: BlendScheduler,
}

impl Engine {
    fn new(config: &Config, log: Log) -> Result<Self> {
        let tz = config.timezone()?;
        let ephemeris: Box<dyn Ephemeris> = Box::new(
            SolarEphemeris::new(config.location.latitude, config.location.longitude, tz)
                .context("Failed to initialize the solar ephemeris")?,
        );
        let cache_root = config.cache_dir();
        let source = WallpaperSource::from_config(config, &cache_root, log.clone())?;
        let manager = WallpaperManager::new(config.settings.monitor.clone(), log.clone());
        let blender = ImageBlender::new(log.clone());
        let cache = if config.settings.transitions.enabled
            && config.settings.transitions.cache_blends
        {
            log.decorated(format!("Blend cache enabled at: {}", cache_root.display()));
            Some(BlendCache::new(&cache_root, config.max_cache_bytes(), log.clone())?)
        } else {
            None
        };
        let scheduler = BlendScheduler::new(log.clone());

        Ok(Self {
            log,
            tz,
            ephemeris,
            source,
            manager,
            blender,
            cache,
            scheduler,
        })
    }

    fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.tz)
    }

    fn log_sun_times(&self, now: DateTime<Tz>) {
        let sun: SunTimes = self.ephemeris.sun_times(now.date_naive());
        let period = classify(&sun, now);
        self.log.block_start(format!("Current period: {period}"));
        self.log
            .indented(format!("Sunrise:    {}", sun.sunrise.format("%H:%M")));
        self.log
            .indented(format!("Solar noon: {}", sun.noon.format("%H:%M")));
        self.log
            .indented(format!("Sunset:     {}", sun.sunset.format("%H:%M")));
    }

    /// The active transition for `now`, per the half-period schedule.
    fn transition_for(&self, now: DateTime<Tz>, period: Period) -> TransitionState {
        let resolver = BoundaryResolver::new(self.ephemeris.as_ref());
        let boundary = resolver.boundaries(now, period);
        let progress = self.scheduler.progress(now, boundary.start, boundary.end);
        self.scheduler.remap(period, progress)
    }

    /// Produce the blended wallpaper for the active transition: cache
    /// lookup first, render and store on miss.
    fn render_transition(&mut self, state: TransitionState) -> Result<PathBuf> {
        let from_path = self.source.wallpaper(state.from)?;
        let to_path = self.source.wallpaper(state.to)?;
        self.log.debug(format!(
            "Blend: {} → {} ({:.2})",
            state.from, state.to, state.ratio
        ));

        let key = BlendCache::key_for(&from_path, &to_path, state.ratio);
        if let Some(cache) = self.cache.as_mut()
            && let Some(path) = cache.lookup(&key, &from_path, &to_path)
        {
            return Ok(path);
        }

        let image = self.blender.blend(&from_path, &to_path, state.ratio)?;
        match self.cache.as_mut() {
            Some(cache) => cache.store(&image, &key, &from_path, &to_path),
            None => {
                let path = std::env::temp_dir().join("switchback_blend.jpg");
                crate::blend::cache::write_jpeg(&image, &path)?;
                Ok(path)
            }
        }
    }

    fn tick_gradual(&mut self, now: DateTime<Tz>, period: Period) -> Result<()> {
        let state = self.transition_for(now, period);
        let path = self.render_transition(state)?;
        self.manager.set_wallpaper(&path);
        Ok(())
    }

    fn tick_hard(&mut self, period: Period) -> bool {
        match self.source.wallpaper(period) {
            Ok(path) => self.manager.set_wallpaper(&path),
            Err(e) => {
                self.log.error(format!("{e:#}"));
                false
            }
        }
    }
}

/// Log the loaded configuration in the block style.
fn log_config(config: &Config, log: &Log) {
    log.block_start("Loaded configuration");
    log.indented(format!(
        "Location: {:.4}°, {:.4}° ({})",
        config.location.latitude, config.location.longitude, config.location.timezone
    ));
    log.indented(format!(
        "Source mode: {}",
        match config.mode {
            SourceMode::File => "file",
            SourceMode::Generated => "generated",
        }
    ));
    let transitions = &config.settings.transitions;
    if transitions.enabled {
        log.indented(format!(
            "Gradual transitions: every {}s (cache: {})",
            transitions.granularity,
            if transitions.cache_blends { "on" } else { "off" }
        ));
    } else {
        log.indented("Gradual transitions: disabled (hard cuts)");
    }
}
