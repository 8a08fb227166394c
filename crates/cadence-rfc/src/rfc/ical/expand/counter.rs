//! The period cursor of the generator and how it steps by INTERVAL.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use cadence_core::constants::MAX_YEAR;

use super::utils::{days_in_month, div_mod, gcd};
use crate::rfc::ical::core::Frequency;
use crate::rfc::ical::validate::NormalizedRule;

/// Outcome of moving the counter to the next period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Same year and month as before.
    Continue,
    /// Year or month changed; cached masks must be refreshed.
    Rebuild,
    /// Past the last representable year, or the rule can never match again.
    Exhausted,
}

/// Wall-clock fields of the current period.
///
/// For MONTHLY and YEARLY rules `day` is carried over from DTSTART and may
/// exceed the length of the current month; it is never read for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counter {
    pub year: i64,
    pub month: i64,
    pub day: i64,
    pub hour: i64,
    pub minute: i64,
    pub second: i64,
}

impl Counter {
    #[must_use]
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            year: i64::from(start.year()),
            month: i64::from(start.month()),
            day: i64::from(start.day()),
            hour: i64::from(start.hour()),
            minute: i64::from(start.minute()),
            second: i64::from(start.second()),
        }
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        i32::try_from(self.year).unwrap_or(i32::MAX)
    }

    #[must_use]
    pub fn month(&self) -> u32 {
        u32::try_from(self.month).unwrap_or(1)
    }

    #[must_use]
    pub fn day(&self) -> u32 {
        u32::try_from(self.day).unwrap_or(1)
    }

    fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year(), self.month(), self.day())
    }

    /// Times of day the current period yields, ascending.
    ///
    /// `fixed` is the precomputed set for DAILY and coarser rules. Finer rules
    /// yield nothing when the counter's own hour, minute or second is excluded
    /// by a limiting BYHOUR/BYMINUTE/BYSECOND.
    #[must_use]
    pub fn time_set(&self, rule: &NormalizedRule, fixed: &[NaiveTime]) -> Vec<NaiveTime> {
        if !rule.freq.is_sub_daily() {
            return fixed.to_vec();
        }

        let excluded = |list: &[u8], value: i64| {
            !list.is_empty() && !list.iter().any(|&v| i64::from(v) == value)
        };
        if excluded(&rule.by_hour, self.hour)
            || (rule.freq != Frequency::Hourly && excluded(&rule.by_minute, self.minute))
            || (rule.freq == Frequency::Secondly && excluded(&rule.by_second, self.second))
        {
            return Vec::new();
        }

        let (hour, minute, second) = (self.hour, self.minute, self.second);
        let make = |h: i64, m: i64, s: i64| {
            NaiveTime::from_hms_opt(
                u32::try_from(h).ok()?,
                u32::try_from(m).ok()?,
                u32::try_from(s).ok()?,
            )
        };

        match rule.freq {
            Frequency::Hourly => {
                let mut set: Vec<NaiveTime> = rule
                    .by_minute
                    .iter()
                    .flat_map(|&m| {
                        rule.by_second
                            .iter()
                            .filter_map(move |&s| make(hour, i64::from(m), i64::from(s)))
                    })
                    .collect();
                set.sort_unstable();
                set
            }
            Frequency::Minutely => rule
                .by_second
                .iter()
                .filter_map(|&s| make(hour, minute, i64::from(s)))
                .collect(),
            _ => make(hour, minute, second).into_iter().collect(),
        }
    }

    /// Moves to the next period, `interval` periods ahead.
    ///
    /// `filtered` tells finer-than-daily rules that the current day was
    /// rejected, so the rest of it can be skipped in one jump.
    pub fn advance(&mut self, rule: &NormalizedRule, filtered: bool) -> Step {
        let interval = i64::from(rule.interval);
        let mut fix_day = false;

        match rule.freq {
            Frequency::Yearly => {
                self.year += interval;
                if self.year > i64::from(MAX_YEAR) {
                    return Step::Exhausted;
                }
                return Step::Rebuild;
            }
            Frequency::Monthly => {
                self.month += interval;
                if self.month > 12 {
                    let (years, month) = div_mod(self.month, 12);
                    self.month = month;
                    self.year += years;
                    if self.month == 0 {
                        self.month = 12;
                        self.year -= 1;
                    }
                    if self.year > i64::from(MAX_YEAR) {
                        return Step::Exhausted;
                    }
                }
                return Step::Rebuild;
            }
            Frequency::Weekly => {
                let Some(date) = self.date() else {
                    return Step::Exhausted;
                };
                let weekday = i64::from(date.weekday().num_days_from_monday());
                let week_start = i64::from(rule.week_start);
                // Back to the start of the week, then forward
                let back = if week_start > weekday {
                    weekday + 1 + (6 - week_start)
                } else {
                    weekday - week_start
                };
                self.day += interval * 7 - back;
                fix_day = true;
            }
            Frequency::Daily => {
                self.day += interval;
                fix_day = true;
            }
            Frequency::Hourly => {
                if filtered {
                    self.hour += ((23 - self.hour) / interval) * interval;
                }
                let Some((days, hour)) = next_value(self.hour, interval, &rule.by_hour, 24) else {
                    return Step::Exhausted;
                };
                self.hour = hour;
                if days > 0 {
                    self.day += days;
                    fix_day = true;
                }
            }
            Frequency::Minutely => {
                if filtered {
                    self.minute +=
                        ((1439 - (self.hour * 60 + self.minute)) / interval) * interval;
                }
                if !self.step_minutes(rule, interval, &mut fix_day) {
                    return Step::Exhausted;
                }
            }
            Frequency::Secondly => {
                if filtered {
                    self.second += ((86399 - (self.hour * 3600 + self.minute * 60 + self.second))
                        / interval)
                        * interval;
                }
                if !self.step_seconds(rule, interval, &mut fix_day) {
                    return Step::Exhausted;
                }
            }
        }

        if fix_day { self.fix_day() } else { Step::Continue }
    }

    /// Steps MINUTELY until BYHOUR is satisfied. Returns `false` if it never is.
    fn step_minutes(&mut self, rule: &NormalizedRule, interval: i64, fix_day: &mut bool) -> bool {
        const MINUTES_PER_DAY: u32 = 24 * 60;
        let tries = MINUTES_PER_DAY / gcd(rule.interval, MINUTES_PER_DAY);
        for _ in 0..tries {
            let Some((hours, minute)) = next_value(self.minute, interval, &rule.by_minute, 60)
            else {
                return false;
            };
            self.minute = minute;
            let (days, hour) = div_mod(self.hour + hours, 24);
            self.hour = hour;
            if days > 0 {
                self.day += days;
                *fix_day = true;
            }
            if allows(&rule.by_hour, self.hour) {
                return true;
            }
        }
        false
    }

    /// Steps SECONDLY until BYHOUR and BYMINUTE are satisfied.
    fn step_seconds(&mut self, rule: &NormalizedRule, interval: i64, fix_day: &mut bool) -> bool {
        const SECONDS_PER_DAY: u32 = 24 * 3600;
        let tries = SECONDS_PER_DAY / gcd(rule.interval, SECONDS_PER_DAY);
        for _ in 0..tries {
            let Some((minutes, second)) = next_value(self.second, interval, &rule.by_second, 60)
            else {
                return false;
            };
            self.second = second;
            let (hours, minute) = div_mod(self.minute + minutes, 60);
            self.minute = minute;
            if hours > 0 {
                let (days, hour) = div_mod(self.hour + hours, 24);
                self.hour = hour;
                if days > 0 {
                    self.day += days;
                    *fix_day = true;
                }
            }
            if allows(&rule.by_hour, self.hour) && allows(&rule.by_minute, self.minute) {
                return true;
            }
        }
        false
    }

    /// Rolls an overflowing day into the following months.
    fn fix_day(&mut self) -> Step {
        if self.day <= 28 {
            return Step::Continue;
        }
        let mut month_len = self.month_len();
        if self.day <= month_len {
            return Step::Continue;
        }
        while self.day > month_len {
            self.day -= month_len;
            self.month += 1;
            if self.month == 13 {
                self.month = 1;
                self.year += 1;
                if self.year > i64::from(MAX_YEAR) {
                    return Step::Exhausted;
                }
            }
            month_len = self.month_len();
        }
        Step::Rebuild
    }

    fn month_len(&self) -> i64 {
        i64::from(days_in_month(self.year(), self.month()))
    }
}

/// Whether `value` passes a limiting list; an empty list passes everything.
fn allows(list: &[u8], value: i64) -> bool {
    list.is_empty() || list.iter().any(|&v| i64::from(v) == value)
}

/// Adds `interval` to `value` (mod `base`) until it lands on a member of
/// `allowed`, or once if `allowed` is empty.
///
/// Returns the number of times `base` was wrapped and the new value, or
/// `None` if no member of `allowed` is reachable.
fn next_value(value: i64, interval: i64, allowed: &[u8], base: i64) -> Option<(i64, i64)> {
    if allowed.is_empty() {
        return Some(div_mod(value + interval, base));
    }
    let mut wraps = 0;
    let mut value = value;
    for _ in 0..base {
        let (carry, next) = div_mod(value + interval, base);
        wraps += carry;
        value = next;
        if allowed.iter().any(|&v| i64::from(v) == value) {
            return Some((wraps, value));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::ical::core::{RecurrenceRule, Zone};
    use chrono::TimeZone;

    fn setup(rule: RecurrenceRule, y: i32, m: u32, d: u32) -> (Counter, NormalizedRule) {
        let start = Zone::Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap();
        let rule = NormalizedRule::new(&rule, &start);
        (Counter::new(start.naive_local()), rule)
    }

    #[test]
    fn monthly_wraps_year() {
        let (mut counter, rule) =
            setup(RecurrenceRule::new(Frequency::Monthly).with_interval(5), 2026, 11, 30);
        assert_eq!(counter.advance(&rule, false), Step::Rebuild);
        assert_eq!((counter.year, counter.month, counter.day), (2027, 4, 30));

        let (mut counter, rule) =
            setup(RecurrenceRule::new(Frequency::Monthly).with_interval(13), 2026, 11, 1);
        counter.advance(&rule, false);
        assert_eq!((counter.year, counter.month), (2027, 12));
    }

    #[test]
    fn weekly_lands_on_week_start() {
        // Wednesday 2026-01-07, WKST=MO, INTERVAL=2: Monday two weeks on
        let (mut counter, rule) =
            setup(RecurrenceRule::new(Frequency::Weekly).with_interval(2), 2026, 1, 7);
        assert_eq!(counter.advance(&rule, false), Step::Continue);
        assert_eq!((counter.month, counter.day), (1, 19));
    }

    #[test]
    fn daily_rolls_into_next_year() {
        let (mut counter, rule) = setup(RecurrenceRule::new(Frequency::Daily), 2026, 12, 31);
        assert_eq!(counter.advance(&rule, false), Step::Rebuild);
        assert_eq!((counter.year, counter.month, counter.day), (2027, 1, 1));
    }

    #[test]
    fn hourly_with_byhour_skips_ahead() {
        let mut rule = RecurrenceRule::new(Frequency::Hourly).with_interval(3);
        rule.by_hour = vec![3];
        let (mut counter, rule) = setup(rule, 2026, 1, 1);
        // 9 -> 12 -> ... -> 24 (next day 0) -> 3
        assert_eq!(counter.advance(&rule, false), Step::Continue);
        assert_eq!((counter.day, counter.hour), (2, 3));
    }

    #[test]
    fn unreachable_byhour_exhausts() {
        let mut rule = RecurrenceRule::new(Frequency::Hourly).with_interval(2);
        rule.by_hour = vec![4];
        // Starting at odd hour 9 with step 2 only reaches odd hours
        let (mut counter, rule) = setup(rule, 2026, 1, 1);
        assert_eq!(counter.advance(&rule, false), Step::Exhausted);
    }

    #[test]
    fn year_limit_exhausts() {
        let (mut counter, rule) = setup(RecurrenceRule::new(Frequency::Yearly), 9999, 1, 1);
        assert_eq!(counter.advance(&rule, false), Step::Exhausted);
    }

    #[test]
    fn minutely_time_set_respects_limits() {
        let mut rule = RecurrenceRule::new(Frequency::Minutely);
        rule.by_hour = vec![10];
        let (counter, rule) = setup(rule, 2026, 1, 1);
        assert!(counter.time_set(&rule, &[]).is_empty());
    }

    #[test]
    fn next_value_wraps() {
        assert_eq!(next_value(22, 3, &[], 24), Some((1, 1)));
        assert_eq!(next_value(22, 3, &[7], 24), Some((1, 7)));
        assert_eq!(next_value(0, 2, &[3], 24), None);
    }
}
