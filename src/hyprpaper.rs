//! Wallpaper application via hyprpaper IPC.
//!
//! The daemon hands rendered images to hyprpaper through `hyprctl`. Every
//! operation here is non-fatal: a failed apply is logged and the daemon
//! retries naturally on its next tick.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use crate::logger::Log;

/// Manages wallpaper switching through hyprpaper IPC.
pub struct WallpaperManager {
    monitor: String,
    current: Option<PathBuf>,
    preloaded: HashSet<PathBuf>,
    log: Log,
}

impl WallpaperManager {
    /// `monitor` is the output name; empty applies to all monitors.
    pub fn new(monitor: impl Into<String>, log: Log) -> Self {
        Self {
            monitor: monitor.into(),
            current: None,
            preloaded: HashSet::new(),
            log,
        }
    }

    /// The wallpaper most recently applied successfully.
    pub fn current(&self) -> Option<&Path> {
        self.current.as_deref()
    }

    fn run_command(&self, args: &[&str]) -> bool {
        let output = match Command::new("hyprctl").args(args).output() {
            Ok(output) => output,
            Err(e) => {
                self.log.error(format!("Failed to run hyprctl: {e}"));
                return false;
            }
        };
        if output.status.success() {
            return true;
        }

        let mut message = String::from_utf8_lossy(&output.stderr).into_owned();
        message.push_str(&String::from_utf8_lossy(&output.stdout));
        let lowered = message.to_lowercase();

        if lowered.contains("disabled") || (lowered.contains("ipc") && lowered.contains("off")) {
            self.log.pipe();
            self.log.error("Hyprpaper IPC appears to be disabled");
            self.log
                .indented("1. Edit ~/.config/hypr/hyprpaper.conf");
            self.log.indented("2. Change 'ipc = off' to 'ipc = on'");
            self.log
                .indented("3. Restart hyprpaper: systemctl --user restart hyprpaper.service");
        } else if lowered.contains("unknown") && lowered.contains("request") {
            // Older hyprpaper releases reject preload over IPC; the
            // wallpaper command loads images itself, so this is ignorable.
            self.log
                .debug(format!("Command not supported (ignored): {}", args.join(" ")));
        } else {
            self.log
                .error(format!("Command failed: hyprctl {}", args.join(" ")));
            self.log.indented(message.trim().to_string());
        }
        false
    }

    /// Whether hyprpaper is running and reachable.
    pub fn is_running(&self) -> bool {
        Command::new("pgrep")
            .args(["-x", "hyprpaper"])
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// Wait up to `max_wait_secs` for hyprpaper to come up.
    pub fn wait_ready(&self, max_wait_secs: u64) -> bool {
        self.log.decorated("Waiting for hyprpaper to be ready...");
        for _ in 0..max_wait_secs {
            if self.is_running() {
                self.log.decorated("Hyprpaper is ready");
                return true;
            }
            std::thread::sleep(Duration::from_secs(1));
        }
        self.log
            .error(format!("Hyprpaper not ready after {max_wait_secs} seconds"));
        false
    }

    /// Preload a wallpaper into hyprpaper's memory. Non-fatal: unsupported
    /// or failing preloads are only logged.
    pub fn preload(&mut self, path: &Path) -> bool {
        if self.preloaded.contains(path) {
            return true;
        }
        let success = self.run_command(&["hyprpaper", "preload", &path.to_string_lossy()]);
        if success {
            self.preloaded.insert(path.to_path_buf());
        }
        success
    }

    /// Preload several wallpapers; returns false if any failed.
    pub fn preload_all(&mut self, paths: &[PathBuf]) -> bool {
        self.log
            .decorated(format!("Preloading {} wallpapers...", paths.len()));
        let mut all_ok = true;
        for path in paths {
            if !self.preload(path) {
                all_ok = false;
            }
        }
        all_ok
    }

    /// Apply a wallpaper. Attempts a preload first (optional on older
    /// hyprpaper releases), then issues the wallpaper command.
    pub fn set_wallpaper(&mut self, path: &Path) -> bool {
        if !path.exists() {
            self.log
                .error(format!("Wallpaper file not found: {}", path.display()));
            return false;
        }

        if !self.preloaded.contains(path) {
            self.preload(path);
        }

        let target = format!("{},{}", self.monitor, path.display());
        let success = self.run_command(&["hyprpaper", "wallpaper", &target]);
        if success {
            self.current = Some(path.to_path_buf());
            self.log.decorated(format!(
                "Wallpaper changed to: {}",
                path.file_name().unwrap_or(path.as_os_str()).to_string_lossy()
            ));
        } else {
            self.log
                .error(format!("Failed to set wallpaper: {}", path.display()));
        }
        success
    }

    /// Release a previously preloaded wallpaper from hyprpaper's memory.
    pub fn unload(&mut self, path: &Path) -> bool {
        if !self.preloaded.contains(path) {
            return true;
        }
        let success = self.run_command(&["hyprpaper", "unload", &path.to_string_lossy()]);
        if success {
            self.preloaded.remove(path);
        }
        success
    }
}
