//! Blend scheduling: linear period progress and the half-period remap.
//!
//! A period's raw progress runs linearly from 0.0 at its start to 1.0 at its
//! end. The blend schedule splits each period at the midpoint: the first
//! half finishes the crossfade *into* the current period's image, the second
//! half begins the crossfade *out* toward the next period. The wallpaper is
//! therefore fully settled on the current period's own image exactly at the
//! period midpoint, producing two crossfades per period, each spanning half
//! the period's duration.

use chrono::DateTime;
use chrono_tz::Tz;

use crate::logger::Log;
use crate::transition::Period;

/// The externally consumed transition unit: blend `from`'s image toward
/// `to`'s image at `ratio`. `from != to` always; `ratio` is progress through
/// a half-period segment, in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionState {
    pub from: Period,
    pub to: Period,
    pub ratio: f32,
}

/// Computes blend ratios from wall-clock time and period boundaries.
pub struct BlendScheduler {
    log: Log,
}

impl BlendScheduler {
    pub fn new(log: Log) -> Self {
        Self { log }
    }

    /// Linear progress of `now` through `[start, end)`, clamped to `[0, 1]`.
    ///
    /// A degenerate interval (`end <= start`) yields 0.0 and a logged
    /// warning; it never raises.
    pub fn progress(&self, now: DateTime<Tz>, start: DateTime<Tz>, end: DateTime<Tz>) -> f32 {
        let total_ms = end.timestamp_millis() - start.timestamp_millis();
        if total_ms <= 0 {
            self.log
                .warning(format!("Degenerate period duration: {total_ms}ms"));
            return 0.0;
        }
        let elapsed_ms = now.timestamp_millis() - start.timestamp_millis();
        (elapsed_ms as f32 / total_ms as f32).clamp(0.0, 1.0)
    }

    /// Remap raw period progress onto the half-period blend schedule.
    ///
    /// Progress below 0.5 is the tail of the previous period's crossfade
    /// (previous → current); progress at or above 0.5 begins the next one
    /// (current → next). Exactly 0.5 routes to the second branch so the
    /// adjusted ratio is a well-defined 0.0.
    pub fn remap(&self, period: Period, progress: f32) -> TransitionState {
        if progress < 0.5 {
            TransitionState {
                from: period.previous(),
                to: period,
                ratio: progress * 2.0,
            }
        } else {
            TransitionState {
                from: period,
                to: period.next(),
                ratio: (progress - 0.5) * 2.0,
            }
        }
    }
}
