//! DTSTART-derived defaults and the split lists the generator works from.

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike};

use super::roles::{ByPart, Role, role};
use crate::rfc::ical::core::{Frequency, RecurrenceRule, Weekday, Zone};

/// A rule with every default applied, ready for expansion.
///
/// Weekdays are numbered from Monday (0) to Sunday (6). Time lists are
/// sorted and deduplicated.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRule {
    pub freq: Frequency,
    pub interval: u32,
    pub count: Option<u32>,
    pub until: Option<DateTime<Zone>>,
    pub week_start: u8,
    /// DTSTART as wall-clock time in its zone.
    pub dt_start: NaiveDateTime,
    pub zone: Zone,
    pub by_month: Vec<u8>,
    pub by_week_no: Vec<i8>,
    pub by_year_day: Vec<i16>,
    /// Positive BYMONTHDAY values.
    pub by_month_day: Vec<i8>,
    /// Negative BYMONTHDAY values.
    pub by_n_month_day: Vec<i8>,
    /// BYDAY entries without an ordinal (or whose ordinal is ignored).
    pub by_weekday: Vec<u8>,
    /// BYDAY entries with an ordinal, as `(ordinal, weekday)`.
    pub by_n_weekday: Vec<(i8, u8)>,
    pub by_hour: Vec<u8>,
    pub by_minute: Vec<u8>,
    pub by_second: Vec<u8>,
    pub by_set_pos: Vec<i16>,
}

impl NormalizedRule {
    /// Applies the RFC 5545 §3.3.10 defaults for `rule` anchored at `dt_start`.
    ///
    /// Day-level defaults (month day, month, weekday) are taken from DTSTART
    /// only when no day-selecting part is present. Time-of-day parts default
    /// to DTSTART's fields whenever they would expand the period.
    #[must_use]
    pub fn new(rule: &RecurrenceRule, dt_start: &DateTime<Zone>) -> Self {
        let start = dt_start.naive_local();
        let freq = rule.freq;

        let mut by_month = rule.by_month.clone();
        let mut month_days = rule.by_month_day.clone();
        let mut by_weekday = Vec::new();
        let mut by_n_weekday = Vec::new();

        let honours_ordinal = role(freq, ByPart::ByDay) == Role::ExpandInPeriod;
        for day in &rule.by_day {
            let weekday = day.weekday.num_days_from_monday();
            match day.ordinal {
                Some(n) if honours_ordinal => by_n_weekday.push((n, weekday)),
                _ => by_weekday.push(weekday),
            }
        }

        let has_day_selector = !(rule.by_week_no.is_empty()
            && rule.by_year_day.is_empty()
            && rule.by_month_day.is_empty()
            && rule.by_day.is_empty());

        if !has_day_selector {
            let month = u8::try_from(start.month()).ok();
            let day = i8::try_from(start.day()).ok();
            match freq {
                Frequency::Yearly => {
                    if by_month.is_empty() {
                        by_month.extend(month);
                    }
                    month_days.extend(day);
                }
                Frequency::Monthly => month_days.extend(day),
                Frequency::Weekly => {
                    by_weekday.push(Weekday::from(start.weekday()).num_days_from_monday());
                }
                _ => {}
            }
        }

        let (by_month_day, by_n_month_day): (Vec<i8>, Vec<i8>) =
            month_days.into_iter().partition(|d| *d > 0);

        Self {
            freq,
            interval: u32::from(rule.interval),
            count: rule.count,
            until: rule.until,
            week_start: rule.week_start.num_days_from_monday(),
            dt_start: start,
            zone: dt_start.timezone(),
            by_month: sorted(by_month),
            by_week_no: rule.by_week_no.clone(),
            by_year_day: rule.by_year_day.clone(),
            by_month_day,
            by_n_month_day,
            by_weekday: sorted(by_weekday),
            by_n_weekday,
            by_hour: time_list(freq, ByPart::ByHour, &rule.by_hour, start.hour()),
            by_minute: time_list(freq, ByPart::ByMinute, &rule.by_minute, start.minute()),
            by_second: time_list(freq, ByPart::BySecond, &rule.by_second, start.second()),
            by_set_pos: rule.by_set_pos.clone(),
        }
    }
}

fn sorted(mut values: Vec<u8>) -> Vec<u8> {
    values.sort_unstable();
    values.dedup();
    values
}

/// Time-of-day list, defaulted from DTSTART when the part expands.
fn time_list(freq: Frequency, part: ByPart, given: &[u8], start_value: u32) -> Vec<u8> {
    if !given.is_empty() {
        return sorted(given.to_vec());
    }
    match (role(freq, part), u8::try_from(start_value)) {
        (Role::Expand, Ok(value)) => vec![value],
        _ => Vec::new(),
    }
}
