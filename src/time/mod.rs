//! Ephemeris time to UTC calendar strings
//!
//! Epochs throughout the crate are TDB seconds past J2000. Snapshots also carry
//! the matching UTC date, formatted in ISO calendar form with millisecond
//! precision (`2000-01-01T11:58:55.816`).
//!
//! The conversion runs TDB -> TT -> TAI -> UTC:
//!
//! - TDB - TT uses the single periodic term of the Earth's orbital eccentricity
//! - TT - TAI is the fixed 32.184 s
//! - TAI - UTC comes from the built-in leap second table, which ends with the
//!   2017-01-01 leap second. Epochs before 1972 use the first table offset.

use crate::constants::TT_MINUS_TAI_S;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use lazy_static::lazy_static;
use thiserror::Error;

/// Error type for time conversions
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TimeError {
    #[error("Time out of range: {0}")]
    OutOfRange(String),
}

/// Result type for time conversions
pub type Result<T> = std::result::Result<T, TimeError>;

/// Amplitude of the periodic TDB - TT term (s)
const TDB_TT_AMPLITUDE_S: f64 = 1.657e-3;
/// Eccentricity of the Earth-Moon barycenter orbit
const EARTH_ORBIT_ECCENTRICITY: f64 = 1.671e-2;
/// Mean anomaly of the Earth-Moon barycenter at J2000 (rad)
const MEAN_ANOMALY_J2000: f64 = 6.239996;
/// Rate of the mean anomaly (rad/s)
const MEAN_ANOMALY_RATE: f64 = 1.99096871e-7;

/// Format used for snapshot dates
const ISO_CALENDAR_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// UTC dates on which TAI - UTC stepped to the given number of seconds
const LEAP_SECONDS: [(i32, u32, i32); 28] = [
    (1972, 1, 10),
    (1972, 7, 11),
    (1973, 1, 12),
    (1974, 1, 13),
    (1975, 1, 14),
    (1976, 1, 15),
    (1977, 1, 16),
    (1978, 1, 17),
    (1979, 1, 18),
    (1980, 1, 19),
    (1981, 7, 20),
    (1982, 7, 21),
    (1983, 7, 22),
    (1985, 7, 23),
    (1988, 1, 24),
    (1990, 1, 25),
    (1991, 1, 26),
    (1992, 7, 27),
    (1993, 7, 28),
    (1994, 7, 29),
    (1996, 1, 30),
    (1997, 7, 31),
    (1999, 1, 32),
    (2006, 1, 33),
    (2009, 1, 34),
    (2012, 7, 35),
    (2015, 7, 36),
    (2017, 1, 37),
];

/// One step of TAI - UTC
#[derive(Debug, Clone, Copy)]
struct LeapStep {
    /// TAI seconds past J2000 noon at which the step takes effect
    tai: f64,
    /// TAI - UTC from then on (s)
    offset: f64,
}

fn j2000_noon() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2000, 1, 1)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .unwrap_or_default()
}

lazy_static! {
    static ref LEAP_STEPS: Vec<LeapStep> = LEAP_SECONDS
        .iter()
        .filter_map(|&(year, month, offset)| {
            let midnight = NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)?;
            let utc = (midnight - j2000_noon()).num_seconds() as f64;
            Some(LeapStep {
                tai: utc + offset as f64,
                offset: offset as f64,
            })
        })
        .collect();
}

/// TDB - TT in seconds at an ephemeris time
pub fn tdb_minus_tt(et: f64) -> f64 {
    let mean_anomaly = MEAN_ANOMALY_J2000 + MEAN_ANOMALY_RATE * et;
    let eccentric_anomaly = mean_anomaly + EARTH_ORBIT_ECCENTRICITY * mean_anomaly.sin();
    TDB_TT_AMPLITUDE_S * eccentric_anomaly.sin()
}

/// TAI - UTC in seconds at a TAI instant, and whether the instant falls inside
/// the inserted leap second that precedes the step
fn tai_minus_utc(tai: f64) -> (f64, bool) {
    let steps = &*LEAP_STEPS;
    let first = steps.first().map_or(0.0, |s| s.offset);
    match steps.iter().rposition(|s| tai >= s.tai) {
        Some(i) => {
            let in_next_leap = steps
                .get(i + 1)
                .map_or(false, |next| tai >= next.tai - 1.0);
            (steps[i].offset, in_next_leap)
        }
        None => (first, false),
    }
}

/// UTC calendar string for an ephemeris time, ISO calendar form with
/// milliseconds
///
/// A time inside an inserted leap second is reported as second 60 of the last
/// minute of the day.
pub fn et_to_utc_iso(et: f64) -> Result<String> {
    if !et.is_finite() {
        return Err(TimeError::OutOfRange(format!("epoch {et} is not finite")));
    }

    let tai = et - tdb_minus_tt(et) - TT_MINUS_TAI_S;
    let (offset, in_leap) = tai_minus_utc(tai);
    let millis = ((tai - offset) * 1000.0).round();
    if millis.abs() > (i64::MAX / 2) as f64 {
        return Err(TimeError::OutOfRange(format!("epoch {et}")));
    }

    let out_of_range = || TimeError::OutOfRange(format!("epoch {et}"));
    let utc = j2000_noon()
        .checked_add_signed(Duration::milliseconds(millis as i64))
        .ok_or_else(out_of_range)?;

    // Under the old offset the leap second reads as the first second of the
    // next day; move it back onto 23:59:60
    let utc = if in_leap && utc.num_seconds_from_midnight() == 0 {
        let leap_nanos = utc.nanosecond() + 1_000_000_000;
        let time = NaiveTime::from_hms_nano_opt(23, 59, 59, leap_nanos).ok_or_else(out_of_range)?;
        let day = utc.date().pred_opt().ok_or_else(out_of_range)?;
        day.and_time(time)
    } else if in_leap {
        // Rounded up out of the leap second
        utc - Duration::seconds(1)
    } else {
        utc
    };

    Ok(utc.format(ISO_CALENDAR_FORMAT).to_string())
}

/// Ephemeris time of a UTC calendar instant
///
/// Inverse of [`et_to_utc_iso`] to within the precision of the periodic term.
/// Leap seconds are not representable as input.
pub fn utc_to_et(utc: &NaiveDateTime) -> f64 {
    let utc_s = (*utc - j2000_noon()).num_milliseconds() as f64 / 1000.0;
    let steps = &*LEAP_STEPS;
    let offset = steps
        .iter()
        .rev()
        .find(|s| utc_s + s.offset >= s.tai)
        .or_else(|| steps.first())
        .map_or(0.0, |s| s.offset);

    let tt = utc_s + offset + TT_MINUS_TAI_S;
    // One fixed-point pass is well below a microsecond
    let et = tt + tdb_minus_tt(tt);
    tt + tdb_minus_tt(et)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DAY_S;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_j2000_epoch() {
        // TDB noon is 64.184 s minus the periodic term ahead of UTC
        assert_eq!(et_to_utc_iso(0.0).unwrap(), "2000-01-01T11:58:55.816");
    }

    #[test]
    fn test_periodic_term_bounds() {
        assert_relative_eq!(tdb_minus_tt(0.0), -7.27e-5, epsilon = 1e-6);
        for day in 0..366 {
            assert!(tdb_minus_tt(day as f64 * DAY_S).abs() <= TDB_TT_AMPLITUDE_S * 1.001);
        }
    }

    #[rstest]
    #[case(utc(1999, 6, 15, 0, 0, 0), "1999-06-15T00:00:00.000")]
    #[case(utc(2012, 6, 30, 23, 59, 59), "2012-06-30T23:59:59.000")]
    #[case(utc(2012, 7, 1, 0, 0, 0), "2012-07-01T00:00:00.000")]
    #[case(utc(2020, 2, 29, 6, 30, 15), "2020-02-29T06:30:15.000")]
    #[case(utc(1965, 3, 1, 0, 0, 0), "1965-03-01T00:00:00.000")]
    fn test_utc_round_trip(#[case] instant: NaiveDateTime, #[case] expected: &str) {
        assert_eq!(et_to_utc_iso(utc_to_et(&instant)).unwrap(), expected);
    }

    #[test]
    fn test_inserted_leap_second() {
        let last_regular = utc_to_et(&utc(2016, 12, 31, 23, 59, 59));
        assert_eq!(
            et_to_utc_iso(last_regular + 1.5).unwrap(),
            "2016-12-31T23:59:60.500"
        );
        assert_eq!(
            et_to_utc_iso(last_regular + 2.0).unwrap(),
            "2017-01-01T00:00:00.000"
        );
    }

    #[test]
    fn test_offset_grows_across_table() {
        // Same UTC reading is 37 - 32 = 5 s further from TDB after 2017
        let before = utc_to_et(&utc(1999, 6, 1, 0, 0, 0));
        let after = utc_to_et(&utc(2019, 6, 1, 0, 0, 0));
        let utc_span = (utc(2019, 6, 1, 0, 0, 0) - utc(1999, 6, 1, 0, 0, 0)).num_seconds() as f64;
        assert_relative_eq!(after - before - utc_span, 5.0, epsilon = 1e-2);
    }

    #[test]
    fn test_non_finite_epoch() {
        assert!(matches!(et_to_utc_iso(f64::NAN), Err(TimeError::OutOfRange(_))));
        assert!(et_to_utc_iso(f64::INFINITY).is_err());
    }
}
