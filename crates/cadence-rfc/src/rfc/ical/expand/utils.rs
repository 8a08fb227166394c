//! Calendar arithmetic helpers.

use chrono::NaiveDate;

#[must_use]
pub const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

#[must_use]
pub const fn year_len(year: i32) -> usize {
    if is_leap_year(year) { 366 } else { 365 }
}

/// Number of days in `month` (1-12) of `year`.
#[must_use]
pub const fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Date `offset` days after `date`, or `None` past the end of the calendar.
#[must_use]
pub fn add_days(date: NaiveDate, offset: usize) -> Option<NaiveDate> {
    date.checked_add_days(chrono::Days::new(u64::try_from(offset).ok()?))
}

/// Python-style `divmod`: the remainder takes the sign of the divisor.
#[must_use]
pub const fn div_mod(value: i64, divisor: i64) -> (i64, i64) {
    (value.div_euclid(divisor), value.rem_euclid(divisor))
}

/// Greatest common divisor.
#[must_use]
pub const fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}
