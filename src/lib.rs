//! # Switchback Library
//!
//! Internal library for the switchback binary.
//!
//! This library exists to enable testing of the transition engine and to
//! keep CLI dispatch (main.rs) separate from application logic.
//!
//! ## Architecture
//!
//! - **Entry Point**: `Switchback` struct provides the application API with
//!   resource management (lock, signals, daemon loop)
//! - **Transition Engine**: `transition` for period classification, boundary
//!   resolution and blend scheduling; `blend` for image blending and the
//!   content-addressed blend cache
//! - **Collaborators**: `solar` for ephemeris lookups, `source` for
//!   wallpaper sources, `hyprpaper` for the display-apply IPC client
//! - **Configuration**: `config` module for TOML-based settings
//! - **Infrastructure**: signal handling, single-instance locking, logging

pub mod args;
pub mod blend;
pub mod config;
pub mod constants;
pub mod hyprpaper;
pub mod instance;
pub mod logger;
pub mod signals;
pub mod solar;
pub mod source;
pub mod transition;

mod daemon;

// Re-export for the binary and integration tests
pub use daemon::Switchback;
pub use logger::Log;
pub use transition::Period;
