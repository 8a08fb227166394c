//! Cached calendar data for the year and month the generator is in.

use std::ops::Range;

use super::month_info::MonthInfo;
use super::year_info::YearInfo;
use crate::rfc::ical::core::Frequency;
use crate::rfc::ical::validate::NormalizedRule;

#[derive(Debug)]
pub struct IterInfo {
    pub year_info: YearInfo,
    pub month_info: Option<MonthInfo>,
}

impl IterInfo {
    /// Builds the cache for `year`/`month`, or `None` outside chrono's range.
    #[must_use]
    pub fn new(year: i32, month: u32, rule: &NormalizedRule) -> Option<Self> {
        let year_info = YearInfo::new(year, rule)?;
        let month_info = needs_month_info(rule).then(|| MonthInfo::new(&year_info, month, rule));
        Some(Self {
            year_info,
            month_info,
        })
    }

    /// Refreshes the cache after the counter moved. Only rebuilds what changed.
    ///
    /// Returns `false` if the year is outside chrono's range.
    pub fn rebuild(&mut self, year: i32, month: u32, rule: &NormalizedRule) -> bool {
        let year_changed = year != self.year_info.year;
        if year_changed {
            let Some(info) = YearInfo::new(year, rule) else {
                return false;
            };
            self.year_info = info;
        }

        if needs_month_info(rule) {
            let stale = self
                .month_info
                .as_ref()
                .is_none_or(|m| year_changed || m.month != month || m.year != year);
            if stale {
                tracing::trace!(year, month, "Rebuilding nth-weekday mask");
                self.month_info = Some(MonthInfo::new(&self.year_info, month, rule));
            }
        }
        true
    }

    /// Day indexes making up the period that contains `month`/`day`.
    ///
    /// `day` is only read for WEEKLY and finer rules, where it is always a
    /// valid day of `month`.
    #[must_use]
    pub fn day_set(&self, freq: Frequency, month: u32, day: u32, week_start: u8) -> Range<usize> {
        let info = &self.year_info;
        let months = info.month_days(month);
        let index = months.start + usize::try_from(day.saturating_sub(1)).unwrap_or(0);
        match freq {
            Frequency::Yearly => 0..info.year_len,
            Frequency::Monthly => months,
            Frequency::Weekly => {
                // Up to the next week start, possibly into next year's overflow days
                let mut end = index;
                for _ in 0..7 {
                    end += 1;
                    if info.weekday_mask.get(end).is_none_or(|&wd| wd == week_start) {
                        break;
                    }
                }
                index..end
            }
            Frequency::Daily | Frequency::Hourly | Frequency::Minutely | Frequency::Secondly => {
                index..index + 1
            }
        }
    }

    /// Whether day `i` fails any of the rule's day-level parts.
    #[must_use]
    pub fn is_filtered(&self, rule: &NormalizedRule, i: usize) -> bool {
        let info = &self.year_info;

        if !rule.by_month.is_empty()
            && !info
                .month_mask
                .get(i)
                .is_some_and(|m| rule.by_month.contains(m))
        {
            return true;
        }

        if let Some(mask) = &info.week_no_mask
            && !mask.get(i).copied().unwrap_or(false)
        {
            return true;
        }

        // Plain and ordinal BYDAY entries are alternatives
        let nth_mask = self.month_info.as_ref().map(|m| &m.nth_weekday_mask);
        if !rule.by_weekday.is_empty() || nth_mask.is_some() {
            let plain = info
                .weekday_mask
                .get(i)
                .is_some_and(|wd| rule.by_weekday.contains(wd));
            let nth = nth_mask.is_some_and(|mask| mask.get(i).copied().unwrap_or(false));
            if !plain && !nth {
                return true;
            }
        }

        if !(rule.by_month_day.is_empty() && rule.by_n_month_day.is_empty()) {
            let positive = info
                .month_day_mask
                .get(i)
                .is_some_and(|d| rule.by_month_day.contains(d));
            let negative = info
                .neg_month_day_mask
                .get(i)
                .is_some_and(|d| rule.by_n_month_day.contains(d));
            if !positive && !negative {
                return true;
            }
        }

        if !rule.by_year_day.is_empty() && !self.matches_year_day(rule, i) {
            return true;
        }

        false
    }

    /// BYYEARDAY check; overflow days count in the next year.
    fn matches_year_day(&self, rule: &NormalizedRule, i: usize) -> bool {
        let info = &self.year_info;
        let (Ok(i), Ok(len), Ok(next_len)) = (
            i64::try_from(i),
            i64::try_from(info.year_len),
            i64::try_from(info.next_year_len),
        ) else {
            return false;
        };
        let (forward, backward) = if i < len {
            (i + 1, i - len)
        } else {
            (i + 1 - len, i - len - next_len)
        };
        rule.by_year_day
            .iter()
            .any(|&d| i64::from(d) == forward || i64::from(d) == backward)
    }
}

fn needs_month_info(rule: &NormalizedRule) -> bool {
    !rule.by_n_weekday.is_empty() && matches!(rule.freq, Frequency::Monthly | Frequency::Yearly)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::rfc::ical::core::{RecurrenceRule, Weekday, WeekdayNum, Zone};

    // 2026-01-01 is a Thursday
    fn normalized(rule: RecurrenceRule) -> NormalizedRule {
        let start = Zone::Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap();
        NormalizedRule::new(&rule, &start)
    }

    fn kept(info: &IterInfo, rule: &NormalizedRule, days: Range<usize>) -> Vec<usize> {
        days.filter(|&i| !info.is_filtered(rule, i)).collect()
    }

    #[test]
    fn period_sizes() {
        let rule = normalized(RecurrenceRule::new(Frequency::Daily));
        let info = IterInfo::new(2026, 1, &rule).unwrap();
        assert_eq!(info.day_set(Frequency::Yearly, 1, 1, 0), 0..365);
        assert_eq!(info.day_set(Frequency::Monthly, 2, 1, 0), 31..59);
        assert_eq!(info.day_set(Frequency::Daily, 1, 10, 0), 9..10);
        assert_eq!(info.day_set(Frequency::Hourly, 3, 1, 0), 59..60);
    }

    #[test]
    fn weekly_period_stops_at_week_start() {
        let rule = normalized(RecurrenceRule::new(Frequency::Weekly));
        let info = IterInfo::new(2026, 1, &rule).unwrap();
        // Thursday to the following Monday
        assert_eq!(info.day_set(Frequency::Weekly, 1, 1, 0), 0..4);
        // Sunday start: up to Sunday the 4th
        assert_eq!(info.day_set(Frequency::Weekly, 1, 1, 6), 0..3);
        // Last days of December spill into next year's overflow
        assert_eq!(info.day_set(Frequency::Weekly, 12, 28, 0), 361..368);
    }

    #[test]
    fn month_day_filter_takes_both_signs() {
        let rule = normalized(RecurrenceRule::new(Frequency::Monthly).with_by_month_day(vec![1, -1]));
        let info = IterInfo::new(2026, 1, &rule).unwrap();
        assert_eq!(kept(&info, &rule, 0..59), [0, 30, 31, 58]);
    }

    #[test]
    fn plain_and_ordinal_weekdays_are_alternatives() {
        let rule = normalized(RecurrenceRule::new(Frequency::Monthly).with_by_day(vec![
            WeekdayNum::every(Weekday::Monday),
            WeekdayNum::nth(1, Weekday::Friday),
        ]));
        let info = IterInfo::new(2026, 1, &rule).unwrap();
        assert!(info.month_info.is_some());
        // Fri 2nd plus every Monday in January
        assert_eq!(kept(&info, &rule, 0..31), [1, 4, 11, 18, 25]);
    }

    #[test]
    fn year_day_counts_overflow_in_next_year() {
        let mut rule = RecurrenceRule::new(Frequency::Yearly);
        rule.by_year_day = vec![1, -1];
        let rule = normalized(rule);
        let info = IterInfo::new(2026, 1, &rule).unwrap();
        assert!(!info.is_filtered(&rule, 0));
        assert!(!info.is_filtered(&rule, 364));
        assert!(info.is_filtered(&rule, 100));
        assert!(!info.is_filtered(&rule, 365));
    }

    #[test]
    fn rebuild_tracks_year_and_month() {
        let rule = normalized(
            RecurrenceRule::new(Frequency::Monthly).with_by_day(vec![WeekdayNum::nth(-1, Weekday::Friday)]),
        );
        let mut info = IterInfo::new(2026, 1, &rule).unwrap();
        assert!(info.rebuild(2026, 2, &rule));
        assert_eq!(info.month_info.as_ref().map(|m| m.month), Some(2));
        assert!(info.rebuild(2027, 2, &rule));
        assert_eq!(info.year_info.year, 2027);
        assert!(!info.rebuild(300_000, 1, &rule));
    }
}
