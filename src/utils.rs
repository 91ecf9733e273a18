//! Shared calendrical equations.
//!
//! Everything in this module is a pure function of its inputs. The epoch-day
//! conversions are the safety-critical core: they must be exact two-way
//! bijections over the whole supported year range.

use crate::{TemporaError, TemporaResult};

// ==== Time-of-day constants ====

pub(crate) const NANOS_PER_SECOND: i64 = 1_000_000_000;
pub(crate) const NANOS_PER_MINUTE: i64 = 60 * NANOS_PER_SECOND;
pub(crate) const NANOS_PER_HOUR: i64 = 60 * NANOS_PER_MINUTE;
pub(crate) const NANOS_PER_DAY: i64 = 24 * NANOS_PER_HOUR;
pub(crate) const MILLIS_PER_SECOND: i64 = 1_000;
pub(crate) const SECONDS_PER_MINUTE: i64 = 60;
pub(crate) const SECONDS_PER_HOUR: i64 = 3_600;
pub(crate) const SECONDS_PER_DAY: i64 = 86_400;
pub(crate) const MINUTES_PER_DAY: i64 = 24 * 60;
pub(crate) const HOURS_PER_DAY: i64 = 24;

// ==== Epoch-day constants ====

/// Days in a full 400-year Gregorian cycle.
const DAYS_PER_CYCLE: i64 = 146_097;
/// Days from 0000-01-01 to 1970-01-01.
const DAYS_0000_TO_1970: i64 = (DAYS_PER_CYCLE * 5) - (30 * 365 + 7);

// ==== Checked arithmetic ====

#[inline]
pub(crate) fn checked_add(a: i64, b: i64) -> TemporaResult<i64> {
    a.checked_add(b)
        .ok_or_else(|| TemporaError::overflow().with_message("integer addition overflowed"))
}

#[inline]
pub(crate) fn checked_sub(a: i64, b: i64) -> TemporaResult<i64> {
    a.checked_sub(b)
        .ok_or_else(|| TemporaError::overflow().with_message("integer subtraction overflowed"))
}

#[inline]
pub(crate) fn checked_mul(a: i64, b: i64) -> TemporaResult<i64> {
    a.checked_mul(b)
        .ok_or_else(|| TemporaError::overflow().with_message("integer multiplication overflowed"))
}

// ==== Gregorian calendar equations ====

/// Proleptic Gregorian leap-year rule: divisible by 4, not by 100 unless
/// by 400.
#[inline]
pub(crate) const fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Returns the length of a month for the given year.
pub(crate) const fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

#[inline]
pub(crate) const fn days_in_year(year: i32) -> u16 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Returns the day-of-year of the first day of the given month.
pub(crate) const fn first_day_of_year(month: u8, leap: bool) -> u16 {
    const STARTS: [u16; 12] = [1, 32, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335];
    let start = STARTS[(month - 1) as usize];
    if leap && month > 2 {
        start + 1
    } else {
        start
    }
}

/// Converts a valid (year, month, day) triple to its signed day count from
/// 1970-01-01.
pub(crate) const fn epoch_days_from_civil(year: i32, month: u8, day: u8) -> i64 {
    let y = year as i64;
    let m = month as i64;
    let mut total = 365 * y;
    if y >= 0 {
        total += (y + 3) / 4 - (y + 99) / 100 + (y + 399) / 400;
    } else {
        total -= y / -4 - y / -100 + y / -400;
    }
    total += (367 * m - 362) / 12;
    total += day as i64 - 1;
    if m > 2 {
        total -= 1;
        if !is_leap_year(year) {
            total -= 1;
        }
    }
    total - DAYS_0000_TO_1970
}

/// Converts a signed day count from 1970-01-01 back to a (year, month, day)
/// triple.
///
/// The year of the result is *not* range checked; callers constructing a
/// `CivilDate` bound the input instead. The day count is first shifted to a
/// March-based year zero so the leap day sits at the end of each four-year
/// slice of the 400-year cycle, and negative counts are adjusted into the
/// positive range before the division-based year estimate.
pub(crate) const fn civil_from_epoch_days(epoch_day: i64) -> (i32, u8, u8) {
    let mut zero_day = epoch_day + DAYS_0000_TO_1970 - 60;
    let mut adjust = 0;
    if zero_day < 0 {
        let adjust_cycles = (zero_day + 1) / DAYS_PER_CYCLE - 1;
        adjust = adjust_cycles * 400;
        zero_day += -adjust_cycles * DAYS_PER_CYCLE;
    }
    let mut year_est = (400 * zero_day + 591) / DAYS_PER_CYCLE;
    let mut doy_est = zero_day - (365 * year_est + year_est / 4 - year_est / 100 + year_est / 400);
    if doy_est < 0 {
        year_est -= 1;
        doy_est = zero_day - (365 * year_est + year_est / 4 - year_est / 100 + year_est / 400);
    }
    year_est += adjust;
    let march_doy0 = doy_est;

    // Fold the March-based month index back to January-based, carrying any
    // overflow month into the next year.
    let march_month0 = (march_doy0 * 5 + 2) / 153;
    let month = ((march_month0 + 2) % 12) + 1;
    let dom = march_doy0 - (march_month0 * 306 + 5) / 10 + 1;
    year_est += march_month0 / 10;

    (year_est as i32, month as u8, dom as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leap_year_rule() {
        assert!(!is_leap_year(1900));
        assert!(is_leap_year(2000));
        assert!(is_leap_year(2004));
        assert!(!is_leap_year(1999));
        assert!(is_leap_year(-4));
        assert!(!is_leap_year(-100));
        assert!(is_leap_year(-400));
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(2021, 2), 28);
        assert_eq!(days_in_month(2020, 2), 29);
        assert_eq!(days_in_month(2021, 4), 30);
        assert_eq!(days_in_month(2021, 12), 31);
    }

    #[test]
    fn epoch_day_fixed_points() {
        assert_eq!(epoch_days_from_civil(1970, 1, 1), 0);
        assert_eq!(epoch_days_from_civil(1970, 1, 2), 1);
        assert_eq!(epoch_days_from_civil(1969, 12, 31), -1);
        assert_eq!(epoch_days_from_civil(2000, 1, 1), 10_957);
        assert_eq!(epoch_days_from_civil(0, 1, 1), -719_528);
        assert_eq!(epoch_days_from_civil(1858, 11, 17), -40_587);
    }

    #[test]
    fn epoch_day_round_trips() {
        // One day either side of every month boundary across several years,
        // including a century non-leap and a 400-year leap.
        for year in [-400, -101, -1, 0, 1, 1899, 1900, 1970, 2000, 2024, 999_999] {
            for month in 1u8..=12 {
                for day in [1, 27, days_in_month(year, month)] {
                    let epoch_day = epoch_days_from_civil(year, month, day);
                    assert_eq!(
                        civil_from_epoch_days(epoch_day),
                        (year, month, day),
                        "round trip failed for {year}-{month}-{day}"
                    );
                }
            }
        }
    }

    #[test]
    fn epoch_day_bijection_over_window() {
        // Every day across a few full years, negative and positive.
        for epoch_day in -150_000..-149_000 {
            let (y, m, d) = civil_from_epoch_days(epoch_day);
            assert_eq!(epoch_days_from_civil(y, m, d), epoch_day);
        }
        for epoch_day in 10_000..12_000 {
            let (y, m, d) = civil_from_epoch_days(epoch_day);
            assert_eq!(epoch_days_from_civil(y, m, d), epoch_day);
        }
    }

    #[test]
    fn first_day_of_year_table() {
        assert_eq!(first_day_of_year(1, false), 1);
        assert_eq!(first_day_of_year(3, false), 60);
        assert_eq!(first_day_of_year(3, true), 61);
        assert_eq!(first_day_of_year(12, false), 335);
        assert_eq!(first_day_of_year(12, true), 336);
    }
}
