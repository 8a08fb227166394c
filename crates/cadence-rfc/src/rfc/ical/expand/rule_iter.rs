//! Lazy occurrence generator for a single recurrence rule.

use std::collections::VecDeque;

use chrono::{DateTime, NaiveDateTime, NaiveTime};

use cadence_core::constants::MAX_EMPTY_PERIODS;

use super::counter::{Counter, Step};
use super::iter_info::IterInfo;
use super::timezone::localize;
use super::utils::div_mod;
use crate::rfc::ical::core::{RecurrenceRule, Zone};
use crate::rfc::ical::validate::NormalizedRule;

/// Iterator over the occurrences of one rule, in ascending order.
///
/// Works one period at a time: the days of the period are filtered, combined
/// with the period's times of day, narrowed by BYSETPOS, and buffered.
/// Wall-clock candidates are then placed in the DTSTART zone; those that fall
/// in a DST gap are skipped.
#[derive(Debug)]
pub struct RuleIter {
    rule: NormalizedRule,
    info: Option<IterInfo>,
    counter: Counter,
    /// Times of day for DAILY and coarser rules.
    fixed_times: Vec<NaiveTime>,
    buffer: VecDeque<DateTime<Zone>>,
    until: Option<NaiveDateTime>,
    remaining: Option<u32>,
    empty_periods: u32,
    finished: bool,
    limited: bool,
}

impl RuleIter {
    /// Creates a generator for `rule` anchored at `dt_start`.
    ///
    /// DTSTART is only an occurrence if it matches the rule's pattern.
    #[must_use]
    pub fn new(rule: &RecurrenceRule, dt_start: &DateTime<Zone>) -> Self {
        let rule = NormalizedRule::new(rule, dt_start);
        let counter = Counter::new(rule.dt_start);
        let info = IterInfo::new(counter.year(), counter.month(), &rule);
        let fixed_times = fixed_times(&rule);

        Self {
            until: rule.until.map(|u| u.naive_local()),
            remaining: rule.count,
            info,
            counter,
            fixed_times,
            buffer: VecDeque::new(),
            empty_periods: 0,
            finished: false,
            limited: false,
            rule,
        }
    }

    /// Whether generation was cut short by the empty-period guard rather than
    /// by COUNT, UNTIL or the end of the calendar.
    #[must_use]
    pub fn is_limited(&self) -> bool {
        self.limited
    }

    /// Expands the current period into the buffer and advances the counter.
    fn generate_period(&mut self) {
        let Some(info) = &self.info else {
            self.finished = true;
            return;
        };

        let range = info.day_set(
            self.rule.freq,
            self.counter.month(),
            self.counter.day(),
            self.rule.week_start,
        );
        let mut filtered = false;
        let mut days = Vec::with_capacity(range.len());
        for i in range {
            if info.is_filtered(&self.rule, i) {
                filtered = true;
            } else {
                days.push(i);
            }
        }

        let times = self.counter.time_set(&self.rule, &self.fixed_times);
        let candidates = if self.rule.by_set_pos.is_empty() || times.is_empty() {
            days.iter()
                .filter_map(|&i| info.year_info.date(i))
                .flat_map(|date| times.iter().map(move |&t| date.and_time(t)))
                .collect()
        } else {
            self.select_positions(info, &days, &times)
        };

        let before = self.buffer.len();
        for candidate in candidates {
            if !self.accept(candidate) {
                self.finished = true;
                break;
            }
        }

        if self.buffer.len() == before {
            self.empty_periods += 1;
            if self.empty_periods >= MAX_EMPTY_PERIODS {
                tracing::warn!(
                    freq = %self.rule.freq,
                    periods = self.empty_periods,
                    "Rule produced no occurrences for too long, stopping"
                );
                self.limited = true;
                self.finished = true;
            }
        } else {
            self.empty_periods = 0;
        }

        if self.finished {
            return;
        }

        match self.counter.advance(&self.rule, filtered) {
            Step::Continue => {}
            Step::Rebuild => {
                let (year, month) = (self.counter.year(), self.counter.month());
                let rebuilt = self
                    .info
                    .as_mut()
                    .is_some_and(|info| info.rebuild(year, month, &self.rule));
                if !rebuilt {
                    self.finished = true;
                }
            }
            Step::Exhausted => self.finished = true,
        }
    }

    /// Picks the BYSETPOS entries out of the period's sorted candidates.
    fn select_positions(
        &self,
        info: &IterInfo,
        days: &[usize],
        times: &[NaiveTime],
    ) -> Vec<NaiveDateTime> {
        let (Ok(n_days), Ok(n_times)) = (i64::try_from(days.len()), i64::try_from(times.len()))
        else {
            return Vec::new();
        };

        let mut selected = Vec::new();
        for &pos in &self.rule.by_set_pos {
            let pos = i64::from(pos);
            let (day_pos, time_pos) = if pos < 0 {
                div_mod(pos, n_times)
            } else {
                div_mod(pos - 1, n_times)
            };
            let day_pos = if day_pos < 0 { n_days + day_pos } else { day_pos };

            let day = usize::try_from(day_pos).ok().and_then(|d| days.get(d));
            let time = usize::try_from(time_pos).ok().and_then(|t| times.get(t));
            if let (Some(&day), Some(&time)) = (day, time)
                && let Some(date) = info.year_info.date(day)
            {
                let candidate = date.and_time(time);
                if !selected.contains(&candidate) {
                    selected.push(candidate);
                }
            }
        }
        selected.sort_unstable();
        selected
    }

    /// Buffers one candidate. Returns `false` once COUNT or UNTIL ends the rule.
    fn accept(&mut self, candidate: NaiveDateTime) -> bool {
        if self.until.is_some_and(|until| candidate > until) {
            return false;
        }

        if candidate < self.rule.dt_start {
            return true;
        }

        let Ok(instant) = localize(self.rule.zone, candidate) else {
            tracing::trace!(%candidate, "Skipping nonexistent local time");
            return true;
        };

        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                return false;
            }
            *remaining -= 1;
        }
        self.buffer.push_back(instant);
        self.remaining != Some(0)
    }
}

/// Every BYHOUR × BYMINUTE × BYSECOND combination, ascending.
fn fixed_times(rule: &NormalizedRule) -> Vec<NaiveTime> {
    let (by_minute, by_second) = (&rule.by_minute, &rule.by_second);
    let mut times: Vec<NaiveTime> = rule
        .by_hour
        .iter()
        .flat_map(|&h| {
            by_minute.iter().flat_map(move |&m| {
                by_second.iter().filter_map(move |&s| {
                    NaiveTime::from_hms_opt(u32::from(h), u32::from(m), u32::from(s))
                })
            })
        })
        .collect();
    times.sort_unstable();
    times
}

impl Iterator for RuleIter {
    type Item = DateTime<Zone>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(occurrence) = self.buffer.pop_front() {
                return Some(occurrence);
            }
            if self.finished {
                return None;
            }
            self.generate_period();
        }
    }
}

#[cfg(test)]
#[path = "rule_iter_tests.rs"]
mod tests;
