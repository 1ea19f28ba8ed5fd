//! Structured logging with visual formatting.
//!
//! This module provides the logging surface for switchback's visual output
//! style: Unicode box-drawing pipes for structured blocks plus `[LEVEL]`
//! prefixed semantic messages. The `Log` handle is constructed once at
//! startup and injected into each component at construction, so log state
//! lives with the daemon process rather than in ambient globals.
//!
//! ## Conventions
//!
//! - `block_start` initiates a new conceptual block (major state changes,
//!   phase indications): prints an empty pipe for spacing, then `┣ message`.
//! - `decorated` continues an existing block, or logs a simple standalone
//!   status line: `┣ message`.
//! - `indented` lists nested details under a parent message: `┃   message`.
//! - `pipe` inserts a single empty `┃` line, typically before a warning or
//!   error that interrupts the flow.
//! - `version` / `end` print the startup header and the final `╹` marker.
//! - `warning` / `error` / `info` / `debug` are the semantic levels with a
//!   colored `[LEVEL]` prefix; `debug` is gated on verbose mode.

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

struct LogInner {
    enabled: AtomicBool,
    verbose: bool,
}

/// Cheaply clonable logging handle shared by all components of one process.
#[derive(Clone)]
pub struct Log {
    inner: Arc<LogInner>,
}

impl Log {
    /// Create a handle. `verbose` gates debug-level output.
    pub fn new(verbose: bool) -> Self {
        Self {
            inner: Arc::new(LogInner {
                enabled: AtomicBool::new(true),
                verbose,
            }),
        }
    }

    /// Enable or disable output temporarily (quiet operation for tests or
    /// automated processes).
    pub fn set_enabled(&self, enabled: bool) {
        self.inner.enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.enabled.load(Ordering::SeqCst)
    }

    pub fn is_verbose(&self) -> bool {
        self.inner.verbose
    }

    fn write(&self, text: &str) {
        if self.is_enabled() {
            print!("{text}");
            let _ = std::io::stdout().flush();
        }
    }

    /// Print the application startup header: `┏ switchback vX.Y.Z ━━╸`.
    pub fn version(&self) {
        let version = env!("CARGO_PKG_VERSION");
        self.write(&format!("┏ switchback v{version} ━━╸\n"));
    }

    /// Print the final log termination marker.
    pub fn end(&self) {
        self.write("╹\n");
    }

    /// Insert an empty pipe line for vertical spacing.
    pub fn pipe(&self) {
        self.write("┃\n");
    }

    /// Start a new conceptual block of log output.
    pub fn block_start(&self, message: impl std::fmt::Display) {
        self.write(&format!("┃\n┣ {message}\n"));
    }

    /// Log a message within the current block.
    pub fn decorated(&self, message: impl std::fmt::Display) {
        self.write(&format!("┣ {message}\n"));
    }

    /// Log a nested detail line under a parent message.
    pub fn indented(&self, message: impl std::fmt::Display) {
        self.write(&format!("┃   {message}\n"));
    }

    /// Log an informational message with a green `[INFO]` prefix.
    pub fn info(&self, message: impl std::fmt::Display) {
        self.write(&format!("┣[\x1b[32mINFO\x1b[0m] {message}\n"));
    }

    /// Log an operational detail with a green `[DEBUG]` prefix.
    /// Suppressed unless the handle was created in verbose mode.
    pub fn debug(&self, message: impl std::fmt::Display) {
        if self.inner.verbose {
            self.write(&format!("┣[\x1b[32mDEBUG\x1b[0m] {message}\n"));
        }
    }

    /// Log a warning with a yellow `[WARNING]` prefix.
    pub fn warning(&self, message: impl std::fmt::Display) {
        self.write(&format!("┣[\x1b[33mWARNING\x1b[0m] {message}\n"));
    }

    /// Log an error with a red `[ERROR]` prefix.
    pub fn error(&self, message: impl std::fmt::Display) {
        self.write(&format!("┣[\x1b[31mERROR\x1b[0m] {message}\n"));
    }

    /// Log a terminal error: pipe spacing, then `┗[ERROR] message`.
    /// Used when the flow is about to exit.
    pub fn error_exit(&self, message: impl std::fmt::Display) {
        self.write(&format!("┃\n┗[\x1b[31mERROR\x1b[0m] {message}\n"));
    }
}

impl std::fmt::Debug for Log {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Log")
            .field("enabled", &self.is_enabled())
            .field("verbose", &self.inner.verbose)
            .finish()
    }
}
