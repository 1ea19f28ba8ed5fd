//! Period classification and transition scheduling.
//!
//! This module tree contains the transition engine: mapping wall-clock time
//! onto the three solar periods, resolving each period's boundaries across
//! midnight, and remapping linear progress onto the two-crossfades-per-period
//! blend schedule.
//!
//! ## Key Functionality
//! - **Period Detection**: classifying an instant as night, morning or
//!   afternoon from that date's sun times
//! - **Boundary Resolution**: the active period's start/end instants,
//!   including night's wraparound across the calendar boundary
//! - **Blend Scheduling**: linear progress through a period and the
//!   half-period remap into a (from, to, ratio) transition state

pub mod boundary;
pub mod schedule;

pub use boundary::{BoundaryResolver, PeriodBoundary};
pub use schedule::{BlendScheduler, TransitionState};

use std::fmt;

use chrono::DateTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::solar::SunTimes;

/// The three solar periods of the wallpaper cycle.
///
/// Cyclic ordering: Night → Morning → Afternoon → Night. Night spans the
/// calendar-date boundary (sunset through the next sunrise).
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Before sunrise or past sunset.
    Night,

    /// Sunrise up to solar noon.
    Morning,

    /// Solar noon up to sunset.
    Afternoon,
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl Period {
    /// All periods in cycle order.
    pub const ALL: [Period; 3] = [Period::Night, Period::Morning, Period::Afternoon];

    /// Returns the display name for this period.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Night => "night",
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
        }
    }

    /// Returns the next period in the cycle.
    pub fn next(&self) -> Self {
        match self {
            Self::Night => Self::Morning,
            Self::Morning => Self::Afternoon,
            Self::Afternoon => Self::Night,
        }
    }

    /// Returns the previous period in the cycle.
    pub fn previous(&self) -> Self {
        match self {
            Self::Night => Self::Afternoon,
            Self::Morning => Self::Night,
            Self::Afternoon => Self::Morning,
        }
    }

    /// Parse a period name as accepted on the CLI.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "night" => Some(Self::Night),
            "morning" => Some(Self::Morning),
            "afternoon" => Some(Self::Afternoon),
            _ => None,
        }
    }
}

/// Classify an instant against that date's sun times.
///
/// Total over any well-ordered (sunrise ≤ noon ≤ sunset) triple; callers
/// must not feed a degenerate ordering.
pub fn classify(sun_times: &SunTimes, now: DateTime<Tz>) -> Period {
    if now < sun_times.sunrise || now >= sun_times.sunset {
        Period::Night
    } else if now < sun_times.noon {
        Period::Morning
    } else {
        Period::Afternoon
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solar::{Ephemeris, FixedEphemeris};
    use chrono::{Duration, NaiveDate, TimeZone};
    use chrono_tz::Tz;

    fn at(hour: u32, minute: u32) -> DateTime<Tz> {
        chrono_tz::UTC
            .with_ymd_and_hms(2024, 6, 1, hour, minute, 0)
            .unwrap()
    }

    fn sun_times() -> SunTimes {
        FixedEphemeris::new(chrono_tz::UTC)
            .sun_times(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
    }

    #[test]
    fn classify_boundaries_are_half_open() {
        let times = sun_times();
        assert_eq!(classify(&times, at(5, 59)), Period::Night);
        assert_eq!(classify(&times, at(6, 0)), Period::Morning);
        assert_eq!(classify(&times, at(11, 59)), Period::Morning);
        assert_eq!(classify(&times, at(12, 0)), Period::Afternoon);
        assert_eq!(classify(&times, at(17, 59)), Period::Afternoon);
        assert_eq!(classify(&times, at(18, 0)), Period::Night);
        assert_eq!(classify(&times, at(23, 59)), Period::Night);
        assert_eq!(classify(&times, at(0, 0)), Period::Night);
    }

    #[test]
    fn classify_partitions_the_whole_day() {
        // Every minute of the day lands in exactly one period, and the
        // sequence of periods over the day is night, morning, afternoon,
        // night with no other switches.
        let times = sun_times();
        let midnight = at(0, 0);
        let mut switches = Vec::new();
        let mut last = classify(&times, midnight);
        for minute in 1..(24 * 60) {
            let current = classify(&times, midnight + Duration::minutes(minute));
            if current != last {
                switches.push(current);
                last = current;
            }
        }
        assert_eq!(switches, vec![Period::Morning, Period::Afternoon, Period::Night]);
    }

    #[test]
    fn cycle_is_consistent() {
        for period in Period::ALL {
            assert_eq!(period.next().previous(), period);
            assert_eq!(period.previous().next(), period);
            // Three steps return home.
            assert_eq!(period.next().next().next(), period);
        }
    }

    #[test]
    fn period_names_round_trip() {
        for period in Period::ALL {
            assert_eq!(Period::from_name(period.display_name()), Some(period));
        }
        assert_eq!(Period::from_name("noon"), None);
    }
}
