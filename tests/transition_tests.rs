//! Full-day transition engine properties driven through the public API.

use chrono::{DateTime, Duration, TimeZone};
use chrono_tz::Tz;
use switchback::Log;
use switchback::solar::{Ephemeris, FixedEphemeris};
use switchback::transition::{BlendScheduler, BoundaryResolver, Period, classify};

fn quiet_log() -> Log {
    let log = Log::new(false);
    log.set_enabled(false);
    log
}

fn at(day: u32, hour: u32, minute: u32) -> DateTime<Tz> {
    chrono_tz::UTC
        .with_ymd_and_hms(2024, 6, day, hour, minute, 0)
        .unwrap()
}

/// One scheduling tick as the daemon performs it.
fn tick(
    ephemeris: &FixedEphemeris,
    scheduler: &BlendScheduler,
    now: DateTime<Tz>,
) -> (Period, f32, switchback::transition::TransitionState) {
    let sun = ephemeris.sun_times(now.date_naive());
    let period = classify(&sun, now);
    let boundary = BoundaryResolver::new(ephemeris).boundaries(now, period);
    assert!(boundary.start < boundary.end);
    let progress = scheduler.progress(now, boundary.start, boundary.end);
    (period, progress, scheduler.remap(period, progress))
}

#[test]
fn full_day_trace_visits_six_half_period_segments() {
    let ephemeris = FixedEphemeris::new(chrono_tz::UTC);
    let scheduler = BlendScheduler::new(quiet_log());

    // With sunrise 06:00 / noon 12:00 / sunset 18:00, the half-period
    // segments over one day are:
    //   00:00-06:00  night second half      night → morning
    //   06:00-09:00  morning first half     night → morning
    //   09:00-12:00  morning second half    morning → afternoon
    //   12:00-15:00  afternoon first half   morning → afternoon
    //   15:00-18:00  afternoon second half  afternoon → night
    //   18:00-24:00  night first half       afternoon → night
    let mut segments: Vec<(Period, bool, Period, Period)> = Vec::new();
    let mut last_ratio_in_segment = -1.0f32;

    let midnight = at(1, 0, 0);
    for minute in 0..(24 * 60) {
        let now = midnight + Duration::minutes(minute);
        let (period, progress, state) = tick(&ephemeris, &scheduler, now);
        let second_half = progress >= 0.5;

        let segment = (period, second_half, state.from, state.to);
        if segments.last() != Some(&segment) {
            segments.push(segment);
            last_ratio_in_segment = -1.0;
        }

        // Ratio is monotonically non-decreasing within a half-period.
        assert!(
            state.ratio >= last_ratio_in_segment,
            "ratio regressed at minute {minute}: {} < {}",
            state.ratio,
            last_ratio_in_segment
        );
        last_ratio_in_segment = state.ratio;
    }

    assert_eq!(
        segments,
        vec![
            (Period::Night, true, Period::Night, Period::Morning),
            (Period::Morning, false, Period::Night, Period::Morning),
            (Period::Morning, true, Period::Morning, Period::Afternoon),
            (Period::Afternoon, false, Period::Morning, Period::Afternoon),
            (Period::Afternoon, true, Period::Afternoon, Period::Night),
            (Period::Night, false, Period::Afternoon, Period::Night),
        ]
    );

    // Each directed pair appears exactly twice: once framed previous →
    // current, once framed current → next.
    for pair in [
        (Period::Night, Period::Morning),
        (Period::Morning, Period::Afternoon),
        (Period::Afternoon, Period::Night),
    ] {
        let count = segments
            .iter()
            .filter(|(_, _, from, to)| (*from, *to) == pair)
            .count();
        assert_eq!(count, 2, "pair {pair:?} seen {count} times");
    }
}

#[test]
fn five_am_is_night_spanning_midnight() {
    let ephemeris = FixedEphemeris::new(chrono_tz::UTC);
    let now = at(2, 5, 0);
    let sun = ephemeris.sun_times(now.date_naive());
    assert_eq!(classify(&sun, now), Period::Night);

    let boundary = BoundaryResolver::new(&ephemeris).boundaries(now, Period::Night);
    assert_eq!(boundary.start, at(1, 18, 0));
    assert_eq!(boundary.end, at(2, 6, 0));
}

#[test]
fn eleven_am_blends_morning_toward_afternoon() {
    let ephemeris = FixedEphemeris::new(chrono_tz::UTC);
    let scheduler = BlendScheduler::new(quiet_log());

    let (period, progress, state) = tick(&ephemeris, &scheduler, at(1, 11, 0));
    assert_eq!(period, Period::Morning);
    assert!((progress - 5.0 / 6.0).abs() < 1e-4);
    assert_eq!(state.from, Period::Morning);
    assert_eq!(state.to, Period::Afternoon);
    assert!((state.ratio - 2.0 / 3.0).abs() < 1e-3);
}

#[test]
fn schedule_is_continuous_across_midnight() {
    let ephemeris = FixedEphemeris::new(chrono_tz::UTC);
    let scheduler = BlendScheduler::new(quiet_log());

    let (_, _, before) = tick(&ephemeris, &scheduler, at(1, 23, 59));
    let (_, _, after) = tick(&ephemeris, &scheduler, at(2, 0, 1));

    // Same transition pair on both sides of midnight, ratio crossing the
    // 0.5 segment boundary of the night period smoothly.
    assert_eq!((before.from, before.to), (Period::Afternoon, Period::Night));
    assert_eq!((after.from, after.to), (Period::Night, Period::Morning));
    assert!(before.ratio > 0.99);
    assert!(after.ratio < 0.01);
}

#[test]
fn wallpaper_settles_on_own_image_at_period_midpoints() {
    let ephemeris = FixedEphemeris::new(chrono_tz::UTC);
    let scheduler = BlendScheduler::new(quiet_log());

    // Morning midpoint 09:00: blend morning → afternoon at 0.0, i.e. the
    // displayed image is exactly the morning wallpaper.
    let (_, progress, state) = tick(&ephemeris, &scheduler, at(1, 9, 0));
    assert!((progress - 0.5).abs() < 1e-6);
    assert_eq!(state.from, Period::Morning);
    assert_eq!(state.ratio, 0.0);

    // Night midpoint falls on midnight for the fixed schedule.
    let (_, progress, state) = tick(&ephemeris, &scheduler, at(2, 0, 0));
    assert!((progress - 0.5).abs() < 1e-6);
    assert_eq!(state.from, Period::Night);
    assert_eq!(state.ratio, 0.0);
}
