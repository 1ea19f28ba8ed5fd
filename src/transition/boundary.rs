//! Period boundary resolution.
//!
//! Given the current instant and its classified period, resolve the instants
//! at which that period started and will end. Morning and afternoon are
//! bounded by the same date's sun times; night crosses the calendar boundary
//! and draws one edge from the previous or next day's ephemeris.

use chrono::{DateTime, Duration};
use chrono_tz::Tz;

use crate::solar::Ephemeris;
use crate::transition::Period;

/// The half-open interval `[start, end)` during which a period is active.
/// `start < end` always, even when the interval crosses midnight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodBoundary {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl PeriodBoundary {
    /// Duration of the period.
    pub fn duration(&self) -> Duration {
        self.end.signed_duration_since(self.start)
    }
}

/// Resolves period boundaries against an ephemeris.
///
/// The resolver queries the ephemeris fresh on every call: "now" moves
/// between invocations and per-date sun times are cheap and deterministic,
/// so caching here would only risk staleness.
pub struct BoundaryResolver<'a> {
    ephemeris: &'a dyn Ephemeris,
}

impl<'a> BoundaryResolver<'a> {
    pub fn new(ephemeris: &'a dyn Ephemeris) -> Self {
        Self { ephemeris }
    }

    /// Boundaries of `period` around `now`.
    ///
    /// Requires `period == classify(sun_times_for(now), now)`; consistency
    /// is the caller's responsibility and is not re-checked here.
    pub fn boundaries(&self, now: DateTime<Tz>, period: Period) -> PeriodBoundary {
        let today = now.date_naive();
        let sun = self.ephemeris.sun_times(today);

        let boundary = match period {
            Period::Morning => PeriodBoundary {
                start: sun.sunrise,
                end: sun.noon,
            },
            Period::Afternoon => PeriodBoundary {
                start: sun.noon,
                end: sun.sunset,
            },
            Period::Night => {
                if now < sun.sunrise {
                    // Night before sunrise: yesterday's sunset → today's sunrise.
                    let yesterday = self.ephemeris.sun_times(today - Duration::days(1));
                    PeriodBoundary {
                        start: yesterday.sunset,
                        end: sun.sunrise,
                    }
                } else {
                    // Night after sunset: today's sunset → tomorrow's sunrise.
                    let tomorrow = self.ephemeris.sun_times(today + Duration::days(1));
                    PeriodBoundary {
                        start: sun.sunset,
                        end: tomorrow.sunrise,
                    }
                }
            }
        };

        debug_assert!(
            boundary.start < boundary.end,
            "period boundary inverted: {:?}",
            boundary
        );
        debug_assert!(
            boundary.duration() <= Duration::hours(25),
            "period spans more than a day: {:?}",
            boundary
        );

        boundary
    }
}
