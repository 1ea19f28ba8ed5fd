//! Signal handling for graceful daemon shutdown.
//!
//! SIGINT, SIGTERM and SIGHUP all drain the daemon loop through a channel so
//! in-progress sleeps are interrupted instead of delaying shutdown by up to
//! a full tick.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;

use anyhow::{Context, Result};
use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGTERM};
use signal_hook::iterator::Signals;

use crate::logger::Log;

/// Messages delivered to the daemon loop from the signal thread.
#[derive(Debug, Clone)]
pub enum SignalMessage {
    Shutdown,
}

/// Signal handling state shared between the handler thread and the loop.
pub struct SignalState {
    /// Cleared when a shutdown signal arrives.
    pub running: Arc<AtomicBool>,
    /// Receiver the daemon loop sleeps on via `recv_timeout`.
    pub receiver: Receiver<SignalMessage>,
    /// Kept for symmetry with future senders (config watcher, IPC).
    pub sender: Sender<SignalMessage>,
}

/// Install the signal handler thread.
pub fn setup_signal_handler(log: &Log) -> Result<SignalState> {
    let (sender, receiver) = channel();
    let running = Arc::new(AtomicBool::new(true));

    let mut signals =
        Signals::new([SIGINT, SIGTERM, SIGHUP]).context("Failed to register signal handlers")?;
    let thread_running = Arc::clone(&running);
    let thread_sender = sender.clone();
    let thread_log = log.clone();

    thread::spawn(move || {
        for signal in signals.forever() {
            thread_log.block_start(format!("Received signal {signal}, shutting down..."));
            thread_running.store(false, std::sync::atomic::Ordering::SeqCst);
            if thread_sender.send(SignalMessage::Shutdown).is_err() {
                break;
            }
        }
    });

    Ok(SignalState {
        running,
        receiver,
        sender,
    })
}
