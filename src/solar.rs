//! Sun time calculation for a fixed geographic location.
//!
//! This module provides the `SunTimes` value type and the `Ephemeris` seam
//! the transition engine consumes: a per-date lookup of sunrise, solar noon
//! and sunset as timezone-aware instants. `SolarEphemeris` computes the
//! events astronomically; `FixedEphemeris` produces a constant
//! 06:00/12:00/18:00 schedule and doubles as the polar fallback and the
//! deterministic ephemeris for tests.
//!
//! Storing `DateTime<Tz>` rather than naive times preserves full date and
//! timezone information, so comparisons across midnight and duration
//! arithmetic need no special casing downstream.

use anyhow::{Result, anyhow};
use chrono::{DateTime, Duration, NaiveDate, TimeZone};
use chrono_tz::Tz;
use sunrise::{Coordinates, SolarDay, SolarEvent};

use crate::constants::{FALLBACK_NOON_HOUR, FALLBACK_SUNRISE_HOUR, FALLBACK_SUNSET_HOUR};

/// Sun event instants for one calendar date at one location.
///
/// Always well-ordered: `sunrise < noon < sunset`. May hold the fixed
/// fallback schedule in polar conditions; consumers cannot tell and must
/// not care.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunTimes {
    pub sunrise: DateTime<Tz>,
    pub noon: DateTime<Tz>,
    pub sunset: DateTime<Tz>,
}

/// Per-date sun time lookup. Implementations are deterministic for a given
/// date and cheap enough to query fresh on every scheduling tick.
pub trait Ephemeris {
    /// The timezone all returned instants are expressed in.
    fn timezone(&self) -> Tz;

    /// Sun times for `date` at this location.
    fn sun_times(&self, date: NaiveDate) -> SunTimes;
}

/// Astronomical ephemeris for a configured latitude/longitude.
pub struct SolarEphemeris {
    coordinates: Coordinates,
    tz: Tz,
}

impl SolarEphemeris {
    /// Create an ephemeris for the given location.
    ///
    /// Coordinates are validated here so every later lookup is infallible.
    pub fn new(latitude: f64, longitude: f64, tz: Tz) -> Result<Self> {
        let coordinates = Coordinates::new(latitude, longitude).ok_or_else(|| {
            anyhow!("Invalid coordinates: lat={latitude:.4}, lon={longitude:.4}")
        })?;
        Ok(Self { coordinates, tz })
    }
}

impl Ephemeris for SolarEphemeris {
    fn timezone(&self) -> Tz {
        self.tz
    }

    fn sun_times(&self, date: NaiveDate) -> SunTimes {
        let solar_day = SolarDay::new(self.coordinates, date);
        let sunrise = solar_day
            .event_time(SolarEvent::Sunrise)
            .with_timezone(&self.tz);
        let sunset = solar_day
            .event_time(SolarEvent::Sunset)
            .with_timezone(&self.tz);

        // Polar day/night: the solar math degenerates (events collapse or
        // invert). Substitute the fixed fallback schedule for that date.
        let daylight = sunset.signed_duration_since(sunrise);
        if daylight < Duration::minutes(15) || daylight > Duration::hours(23) {
            return fixed_sun_times(self.tz, date);
        }

        // The solar library exposes no noon event; true solar noon sits at
        // the sunrise/sunset midpoint to within a few minutes.
        let noon = sunrise + daylight / 2;

        SunTimes {
            sunrise,
            noon,
            sunset,
        }
    }
}

/// Ephemeris producing the fixed 06:00/12:00/18:00 local schedule for every
/// date. Used directly in tests and shared with the polar fallback path.
pub struct FixedEphemeris {
    tz: Tz,
}

impl FixedEphemeris {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }
}

impl Ephemeris for FixedEphemeris {
    fn timezone(&self) -> Tz {
        self.tz
    }

    fn sun_times(&self, date: NaiveDate) -> SunTimes {
        fixed_sun_times(self.tz, date)
    }
}

fn fixed_sun_times(tz: Tz, date: NaiveDate) -> SunTimes {
    SunTimes {
        sunrise: local_instant(tz, date, FALLBACK_SUNRISE_HOUR),
        noon: local_instant(tz, date, FALLBACK_NOON_HOUR),
        sunset: local_instant(tz, date, FALLBACK_SUNSET_HOUR),
    }
}

/// Resolve a local wall-clock hour on `date` to an instant, tolerating DST
/// folds (earliest occurrence wins) and gaps (interpreted as UTC).
fn local_instant(tz: Tz, date: NaiveDate, hour: u32) -> DateTime<Tz> {
    let naive = date
        .and_hms_opt(hour, 0, 0)
        .unwrap_or_else(|| date.and_hms_opt(12, 0, 0).unwrap());
    match tz.from_local_datetime(&naive) {
        chrono::LocalResult::Single(dt) => dt,
        chrono::LocalResult::Ambiguous(earliest, _) => earliest,
        chrono::LocalResult::None => tz.from_utc_datetime(&naive),
    }
}
