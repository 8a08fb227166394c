//! Per-year day masks.
//!
//! Day `i` of a year is `first_day + i`. Masks run seven days past the end of
//! the year so that a WEEKLY period straddling New Year can be filtered with
//! the same year's data.

use chrono::{Datelike, NaiveDate};

use super::utils::{days_in_month, year_len};
use crate::rfc::ical::validate::NormalizedRule;

#[derive(Debug, Clone)]
pub struct YearInfo {
    pub year: i32,
    pub year_len: usize,
    pub next_year_len: usize,
    pub first_day: NaiveDate,
    /// Month (1-12) of each day.
    pub month_mask: Vec<u8>,
    /// Day of month (1-31) of each day.
    pub month_day_mask: Vec<i8>,
    /// Day of month counted from the end (-31..-1) of each day.
    pub neg_month_day_mask: Vec<i8>,
    /// Weekday (Monday = 0) of each day.
    pub weekday_mask: Vec<u8>,
    /// `month_range[m - 1]..month_range[m]` are the days of month `m`.
    pub month_range: [usize; 13],
    /// Days selected by BYWEEKNO, if the rule has it.
    pub week_no_mask: Option<Vec<bool>>,
}

impl YearInfo {
    /// Builds the masks for `year`. Returns `None` outside chrono's range.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        reason = "Month, day and weekday numbers are at most 31"
    )]
    #[must_use]
    pub fn new(year: i32, rule: &NormalizedRule) -> Option<Self> {
        let first_day = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let len = year_len(year);
        let span = len + 7;

        let mut month_mask = Vec::with_capacity(span);
        let mut month_day_mask = Vec::with_capacity(span);
        let mut neg_month_day_mask = Vec::with_capacity(span);
        let mut weekday_mask = Vec::with_capacity(span);

        let mut date = first_day;
        for _ in 0..span {
            let dim = days_in_month(date.year(), date.month());
            month_mask.push(date.month() as u8);
            month_day_mask.push(date.day() as i8);
            neg_month_day_mask.push(date.day() as i8 - dim as i8 - 1);
            weekday_mask.push(date.weekday().num_days_from_monday() as u8);
            date = date.succ_opt()?;
        }

        let mut month_range = [0; 13];
        for month in 1..=12 {
            month_range[month] = month_range[month - 1] + days_in_month(year, month as u32) as usize;
        }

        let mut info = Self {
            year,
            year_len: len,
            next_year_len: year_len(year + 1),
            first_day,
            month_mask,
            month_day_mask,
            neg_month_day_mask,
            weekday_mask,
            month_range,
            week_no_mask: None,
        };

        if !rule.by_week_no.is_empty() {
            info.week_no_mask = Some(info.build_week_no_mask(&rule.by_week_no, rule.week_start));
        }

        Some(info)
    }

    /// Days of month `month` (1-12).
    #[must_use]
    pub fn month_days(&self, month: u32) -> std::ops::Range<usize> {
        let m = usize::try_from(month).unwrap_or(1).clamp(1, 12);
        self.month_range[m - 1]..self.month_range[m]
    }

    /// Date of day `index`.
    #[must_use]
    pub fn date(&self, index: usize) -> Option<NaiveDate> {
        super::utils::add_days(self.first_day, index)
    }

    /// Marks the days of the requested week numbers (RFC 5545 §3.3.10 BYWEEKNO).
    ///
    /// Week 1 is the first week with at least four days in the year. Week 1
    /// of the next year and the last week of the previous year are marked too
    /// when they overlap this year's days.
    fn build_week_no_mask(&self, by_week_no: &[i8], week_start: u8) -> Vec<bool> {
        let mut mask = vec![false; self.year_len + 7];
        let len = self.year_len as i64;
        let wkst = i64::from(week_start);
        let year_weekday = i64::from(self.weekday_mask[0]);

        // Offset of the first week start in the year
        let first_wkst = (7 - year_weekday + wkst).rem_euclid(7);
        let (week_one, week_year_len) = if first_wkst >= 4 {
            // Week 1 began last year and took its days
            (0, len + (year_weekday - wkst).rem_euclid(7))
        } else {
            (first_wkst, len - first_wkst)
        };
        let num_weeks = week_year_len / 7 + (week_year_len % 7) / 4;

        let week_offset = |n: i64| {
            let mut i = week_one + (n - 1) * 7;
            if week_one != first_wkst {
                i -= 7 - first_wkst;
            }
            i
        };

        for &n in by_week_no {
            let mut n = i64::from(n);
            if n < 0 {
                n += num_weeks + 1;
            }
            if !(1..=num_weeks).contains(&n) {
                continue;
            }
            let start = if n > 1 { week_offset(n) } else { week_one };
            self.mark_week(&mut mask, start, week_start);
        }

        if by_week_no.contains(&1) {
            let start = week_offset(num_weeks + 1);
            if start < len {
                self.mark_week(&mut mask, start, week_start);
            }
        }

        if week_one > 0 {
            let last_year_weeks = if by_week_no.contains(&-1) {
                -1
            } else {
                let prev_len = year_len(self.year - 1) as i64;
                let prev_weekday = NaiveDate::from_ymd_opt(self.year - 1, 1, 1)
                    .map_or(0, |d| i64::from(d.weekday().num_days_from_monday()));
                if (7 - prev_weekday + wkst).rem_euclid(7) >= 4 {
                    52 + ((prev_len + (prev_weekday - wkst).rem_euclid(7)) % 7) / 4
                } else {
                    52 + ((len - week_one) % 7) / 4
                }
            };
            if by_week_no.iter().any(|&n| i64::from(n) == last_year_weeks) {
                for slot in mask.iter_mut().take(usize::try_from(week_one).unwrap_or(0)) {
                    *slot = true;
                }
            }
        }

        mask
    }

    fn mark_week(&self, mask: &mut [bool], start: i64, week_start: u8) {
        let Ok(mut i) = usize::try_from(start) else {
            return;
        };
        for _ in 0..7 {
            if let Some(slot) = mask.get_mut(i) {
                *slot = true;
            }
            i += 1;
            if self.weekday_mask.get(i).is_none_or(|&wd| wd == week_start) {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::ical::core::{Frequency, RecurrenceRule, Zone};
    use chrono::TimeZone;

    fn rule(by_week_no: Vec<i8>) -> NormalizedRule {
        let start = Zone::Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut rule = RecurrenceRule::new(Frequency::Yearly);
        rule.by_week_no = by_week_no;
        NormalizedRule::new(&rule, &start)
    }

    fn index_of(info: &YearInfo, date: NaiveDate) -> usize {
        usize::try_from((date - info.first_day).num_days()).unwrap()
    }

    #[test]
    fn masks_for_leap_year() {
        let info = YearInfo::new(2024, &rule(Vec::new())).unwrap();
        assert_eq!(info.year_len, 366);
        assert_eq!(info.next_year_len, 365);
        assert_eq!(info.month_mask.len(), 373);
        assert_eq!(info.month_days(2), 31..60);
        assert_eq!(info.month_day_mask[59], 29);
        assert_eq!(info.neg_month_day_mask[59], -1);
        // 2024-01-01 was a Monday
        assert_eq!(info.weekday_mask[0], 0);
        // Overflow days belong to January of the next year
        assert_eq!(info.month_mask[366], 1);
        assert!(info.week_no_mask.is_none());
    }

    #[test]
    fn last_index_is_new_years_eve() {
        let info = YearInfo::new(2023, &rule(Vec::new())).unwrap();
        let date = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        assert_eq!(index_of(&info, date), 364);
        assert_eq!(info.date(364), Some(date));
    }

    #[test]
    fn week_one_follows_iso_rule() {
        // 2026-01-01 is a Thursday, so ISO week 1 starts 2025-12-29
        let info = YearInfo::new(2026, &rule(vec![1])).unwrap();
        let mask = info.week_no_mask.as_ref().unwrap();
        assert!(mask[0..4].iter().all(|&d| d));
        assert!(!mask[4]);
    }

    #[test]
    fn week_twenty() {
        // ISO week 20 of 1997 is May 12-18
        let info = YearInfo::new(1997, &rule(vec![20])).unwrap();
        let mask = info.week_no_mask.as_ref().unwrap();
        let days: Vec<usize> = (0..info.year_len).filter(|&i| mask[i]).collect();
        let may_12 = index_of(&info, NaiveDate::from_ymd_opt(1997, 5, 12).unwrap());
        assert_eq!(days, (may_12..may_12 + 7).collect::<Vec<_>>());
    }

    #[test]
    fn last_week_of_previous_year() {
        // 2027-01-01 is a Friday: Jan 1-3 belong to ISO week 53 of 2026
        let info = YearInfo::new(2027, &rule(vec![53])).unwrap();
        let mask = info.week_no_mask.as_ref().unwrap();
        assert!(mask[0..3].iter().all(|&d| d));
        assert!(!mask[3]);
    }
}
