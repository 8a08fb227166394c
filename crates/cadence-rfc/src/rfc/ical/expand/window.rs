//! Window and limit filtering over an occurrence stream.

use chrono::DateTime;

use super::rule_set_iter::RuleSetIter;
use crate::rfc::ical::core::Zone;

/// Time bounds applied to an occurrence stream.
///
/// A missing bound leaves that side open. `inclusive` applies to both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub after: Option<DateTime<Zone>>,
    pub before: Option<DateTime<Zone>>,
    pub inclusive: bool,
}

impl Window {
    /// A window with neither bound.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            after: None,
            before: None,
            inclusive: true,
        }
    }

    #[must_use]
    pub const fn between(after: DateTime<Zone>, before: DateTime<Zone>, inclusive: bool) -> Self {
        Self {
            after: Some(after),
            before: Some(before),
            inclusive,
        }
    }

    #[must_use]
    pub const fn before(before: DateTime<Zone>, inclusive: bool) -> Self {
        Self {
            after: None,
            before: Some(before),
            inclusive,
        }
    }

    #[must_use]
    pub const fn after(after: DateTime<Zone>, inclusive: bool) -> Self {
        Self {
            after: Some(after),
            before: None,
            inclusive,
        }
    }

    /// Whether `instant` comes before the lower bound.
    fn is_early(&self, instant: &DateTime<Zone>) -> bool {
        self.after.is_some_and(|after| {
            if self.inclusive {
                *instant < after
            } else {
                *instant <= after
            }
        })
    }

    /// Whether `instant` is beyond the upper bound. Nothing later can match.
    fn is_late(&self, instant: &DateTime<Zone>) -> bool {
        self.before.is_some_and(|before| {
            if self.inclusive {
                *instant > before
            } else {
                *instant >= before
            }
        })
    }

    #[must_use]
    pub fn contains(&self, instant: &DateTime<Zone>) -> bool {
        !self.is_early(instant) && !self.is_late(instant)
    }

    /// Whether the bounds leave room for any instant at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match (self.after, self.before) {
            (Some(after), Some(before)) if self.inclusive => after > before,
            (Some(after), Some(before)) => after >= before,
            _ => false,
        }
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Materialized result of a bounded query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrences {
    pub dates: Vec<DateTime<Zone>>,
    /// More occurrences remained past the limit, or a rule was stopped by
    /// the empty-period guard.
    pub limited: bool,
}

/// Drains `iter` through `window`, keeping at most `limit` occurrences.
///
/// Stops at the first occurrence past the upper bound, so an unbounded
/// stream is only consumed as far as the window or limit requires.
#[must_use]
pub fn collect(mut iter: RuleSetIter, window: &Window, limit: Option<u16>) -> Occurrences {
    let mut dates = Vec::new();
    if window.is_empty() || limit == Some(0) {
        return Occurrences {
            dates,
            limited: false,
        };
    }

    let mut more = false;
    for instant in iter.by_ref() {
        if window.is_late(&instant) {
            break;
        }
        if window.is_early(&instant) {
            continue;
        }
        if limit.is_some_and(|limit| dates.len() >= usize::from(limit)) {
            more = true;
            break;
        }
        dates.push(instant);
    }

    let limited = more || iter.is_limited();
    if limited {
        tracing::debug!(count = dates.len(), ?limit, "Occurrence list was truncated");
    }
    Occurrences { dates, limited }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::rfc::ical::core::{Frequency, RecurrenceRule, RuleSet};

    fn at(d: u32) -> DateTime<Zone> {
        Zone::Utc.with_ymd_and_hms(2026, 1, d, 9, 0, 0).unwrap()
    }

    fn daily() -> RuleSet {
        RuleSet::new(at(1)).with_rrule(RecurrenceRule::new(Frequency::Daily))
    }

    #[test]
    fn inclusive_window_keeps_bounds() {
        let got = collect(daily().iter(), &Window::between(at(3), at(5), true), None);
        assert_eq!(got.dates, [at(3), at(4), at(5)]);
        assert!(!got.limited);
    }

    #[test]
    fn exclusive_window_drops_bounds() {
        let got = collect(daily().iter(), &Window::between(at(3), at(5), false), None);
        assert_eq!(got.dates, [at(4)]);
    }

    #[test]
    fn limit_caps_and_reports_more() {
        let got = collect(daily().iter(), &Window::after(at(10), true), Some(2));
        assert_eq!(got.dates, [at(10), at(11)]);
        assert!(got.limited);
    }

    #[test]
    fn limit_equal_to_total_is_not_limited() {
        let set = RuleSet::new(at(1))
            .with_rrule(RecurrenceRule::new(Frequency::Daily).with_count(3));
        let got = collect(set.iter(), &Window::unbounded(), Some(3));
        assert_eq!(got.dates.len(), 3);
        assert!(!got.limited);
    }

    #[test]
    fn before_bound_terminates_unbounded_rule() {
        let got = collect(daily().iter(), &Window::before(at(2), false), None);
        assert_eq!(got.dates, [at(1)]);
    }

    #[test]
    fn empty_window_yields_nothing() {
        let window = Window::between(at(5), at(5), false);
        assert!(window.is_empty());
        assert!(collect(daily().iter(), &window, None).dates.is_empty());
        assert!(Window::between(at(5), at(5), true).contains(&at(5)));
    }
}
