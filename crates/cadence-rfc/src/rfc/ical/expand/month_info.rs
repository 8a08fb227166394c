//! Days selected by ordinal BYDAY entries (`2TU`, `-1FR`).

use super::year_info::YearInfo;
use crate::rfc::ical::core::Frequency;
use crate::rfc::ical::validate::NormalizedRule;

#[derive(Debug, Clone)]
pub struct MonthInfo {
    pub year: i32,
    pub month: u32,
    /// Indexed like the [`YearInfo`] masks.
    pub nth_weekday_mask: Vec<bool>,
}

impl MonthInfo {
    /// Builds the mask for the period containing `month`.
    ///
    /// Ordinals count within each BYMONTH month for YEARLY rules that have
    /// one, within the whole year for other YEARLY rules, and within the
    /// month for MONTHLY rules.
    #[must_use]
    pub fn new(year_info: &YearInfo, month: u32, rule: &NormalizedRule) -> Self {
        let ranges: Vec<std::ops::Range<usize>> = match rule.freq {
            Frequency::Yearly if rule.by_month.is_empty() => vec![0..year_info.year_len],
            Frequency::Yearly => rule
                .by_month
                .iter()
                .map(|&m| year_info.month_days(u32::from(m)))
                .collect(),
            _ => vec![year_info.month_days(month)],
        };

        let mut mask = vec![false; year_info.year_len];
        for range in ranges {
            let (Ok(first), Ok(last)) = (i64::try_from(range.start), i64::try_from(range.end))
            else {
                continue;
            };
            let last = last - 1;

            for &(n, weekday) in &rule.by_n_weekday {
                let n = i64::from(n);
                let wday = i64::from(weekday);
                let day = if n < 0 {
                    let i = last + (n + 1) * 7;
                    if i < first {
                        continue;
                    }
                    i - (weekday_at(year_info, i) - wday).rem_euclid(7)
                } else {
                    let i = first + (n - 1) * 7;
                    if i > last {
                        continue;
                    }
                    i + (7 - weekday_at(year_info, i) + wday).rem_euclid(7)
                };
                if (first..=last).contains(&day)
                    && let Some(slot) = usize::try_from(day).ok().and_then(|d| mask.get_mut(d))
                {
                    *slot = true;
                }
            }
        }

        Self {
            year: year_info.year,
            month,
            nth_weekday_mask: mask,
        }
    }
}

fn weekday_at(year_info: &YearInfo, index: i64) -> i64 {
    usize::try_from(index)
        .ok()
        .and_then(|i| year_info.weekday_mask.get(i))
        .map_or(0, |&wd| i64::from(wd))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::ical::core::{RecurrenceRule, Weekday, WeekdayNum, Zone};
    use chrono::{NaiveDate, TimeZone};

    fn normalized(rule: RecurrenceRule) -> NormalizedRule {
        let start = Zone::Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap();
        NormalizedRule::new(&rule, &start)
    }

    fn marked(info: &YearInfo, month: &MonthInfo) -> Vec<NaiveDate> {
        (0..info.year_len)
            .filter(|&i| month.nth_weekday_mask[i])
            .filter_map(|i| info.date(i))
            .collect()
    }

    #[test]
    fn monthly_first_and_last() {
        let rule = normalized(RecurrenceRule::new(Frequency::Monthly).with_by_day(vec![
            WeekdayNum::nth(1, Weekday::Friday),
            WeekdayNum::nth(-1, Weekday::Sunday),
        ]));
        let info = YearInfo::new(2026, &rule).unwrap();
        let month = MonthInfo::new(&info, 2, &rule);
        assert_eq!(
            marked(&info, &month),
            vec![
                NaiveDate::from_ymd_opt(2026, 2, 6).unwrap(),
                NaiveDate::from_ymd_opt(2026, 2, 22).unwrap(),
            ]
        );
    }

    #[test]
    fn fifth_weekday_missing_in_short_month() {
        let rule = normalized(
            RecurrenceRule::new(Frequency::Monthly)
                .with_by_day(vec![WeekdayNum::nth(5, Weekday::Monday)]),
        );
        let info = YearInfo::new(2026, &rule).unwrap();
        // February 2026 has four Mondays
        assert!(marked(&info, &MonthInfo::new(&info, 2, &rule)).is_empty());
        // March 2026 has five
        assert_eq!(
            marked(&info, &MonthInfo::new(&info, 3, &rule)),
            vec![NaiveDate::from_ymd_opt(2026, 3, 30).unwrap()]
        );
    }

    #[test]
    fn yearly_counts_within_year() {
        let rule = normalized(
            RecurrenceRule::new(Frequency::Yearly)
                .with_by_day(vec![WeekdayNum::nth(20, Weekday::Monday)]),
        );
        let info = YearInfo::new(1997, &rule).unwrap();
        assert_eq!(
            marked(&info, &MonthInfo::new(&info, 1, &rule)),
            vec![NaiveDate::from_ymd_opt(1997, 5, 19).unwrap()]
        );
    }
}
