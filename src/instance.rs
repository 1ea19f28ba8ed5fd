//! Lock file management for single-instance enforcement.
//!
//! The blend cache assumes exactly one writer, so only one switchback daemon
//! may run at a time. The lock lives in the runtime directory and is held
//! for the process lifetime; dropping the returned file releases it.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};

use anyhow::{Context, Result, bail};
use fs2::FileExt;

/// Acquire the exclusive daemon lock.
///
/// Returns the held lock file and its path. Fails when another instance
/// already holds the lock, naming its PID when readable.
pub fn acquire_lock() -> Result<(File, String)> {
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".to_string());
    let lock_path = format!("{runtime_dir}/switchback.lock");

    // Open without truncating so a holder's PID stays readable on conflict.
    let mut lock_file = std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&lock_path)
        .with_context(|| format!("Failed to open lock file {lock_path}"))?;

    match lock_file.try_lock_exclusive() {
        Ok(()) => {
            lock_file.set_len(0)?;
            lock_file.seek(SeekFrom::Start(0))?;
            writeln!(&lock_file, "{}", std::process::id())?;
            lock_file.flush()?;
            Ok((lock_file, lock_path))
        }
        Err(_) => {
            let mut contents = String::new();
            let _ = lock_file.seek(SeekFrom::Start(0));
            let _ = lock_file.read_to_string(&mut contents);
            let holder = contents.lines().next().unwrap_or("unknown").trim();
            bail!("Another switchback instance is already running (PID {holder})");
        }
    }
}
