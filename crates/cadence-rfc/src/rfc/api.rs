//! Entry points of the recurrence engine.

use std::str::FromStr;

use chrono::{DateTime, TimeZone};

use cadence_core::constants::DEFAULT_INCLUSIVE;

use crate::error::{RfcError, RfcResult};
use crate::rfc::ical::core::{RecurrenceRule, RuleSet, Zone};
use crate::rfc::ical::expand::{Occurrences, Window, collect};
use crate::rfc::ical::parse::{parse_rule_parts, parse_rule_set};
use crate::rfc::ical::validate::{rule_from_parts, validate_rule_set};

/// ## Summary
/// Parses and validates rule-set text.
///
/// ## Errors
///
/// Returns [`RfcError::Parse`] for malformed text and
/// [`RfcError::InvalidField`] for an illegal rule part.
#[tracing::instrument(skip(text), fields(text_len = text.len()))]
pub fn parse(text: &str) -> RfcResult<RuleSet> {
    let parsed = parse_rule_set(text)?;
    let set = validate_rule_set(parsed)?;
    tracing::debug!(
        zone = %set.zone(),
        rrules = set.rrules.len(),
        rdates = set.rdates.len(),
        "Rule set parsed"
    );
    Ok(set)
}

/// ## Summary
/// Returns every occurrence of `set`, at most `limit` of them.
///
/// ## Errors
///
/// Returns [`RfcError::UnboundedGeneration`] if `limit` is `None` and some
/// RRULE has neither COUNT nor UNTIL.
pub fn all_occurrences(set: &RuleSet, limit: Option<u16>) -> RfcResult<Occurrences> {
    occurrences_in(set, &Window::unbounded(), limit)
}

/// ## Summary
/// Returns the occurrences of `set` from `after` to `before`, both included,
/// at most `limit` of them.
///
/// The bounds may be in any zone; results are in the DTSTART zone.
///
/// ## Errors
///
/// Fails like [`occurrences_in`], which with an upper bound in place means
/// it does not fail.
pub fn occurrences_between<Tz: TimeZone>(
    set: &RuleSet,
    limit: Option<u16>,
    after: &DateTime<Tz>,
    before: &DateTime<Tz>,
) -> RfcResult<Occurrences> {
    let zone = set.zone();
    let window = Window::between(
        after.with_timezone(&zone),
        before.with_timezone(&zone),
        DEFAULT_INCLUSIVE,
    );
    occurrences_in(set, &window, limit)
}

/// ## Summary
/// Returns the occurrences of `set` inside `window`, at most `limit` of them.
///
/// ## Errors
///
/// Returns [`RfcError::UnboundedGeneration`] if neither `limit` nor the
/// window's upper bound ends an unbounded rule set.
#[tracing::instrument(skip(set), fields(zone = %set.zone()))]
pub fn occurrences_in(
    set: &RuleSet,
    window: &Window,
    limit: Option<u16>,
) -> RfcResult<Occurrences> {
    if limit.is_none() && window.before.is_none() && !set.is_bounded() {
        tracing::warn!("Refusing to expand an unbounded rule set without a limit");
        return Err(RfcError::UnboundedGeneration);
    }

    let found = collect(set.iter(), window, limit);
    tracing::debug!(count = found.dates.len(), limited = found.limited, "Expanded rule set");
    Ok(found)
}

/// Last occurrence before `instant` (or at it, when `inclusive`).
///
/// Walks forward from DTSTART, so the cost grows with the distance.
#[must_use]
pub fn just_before<Tz: TimeZone>(
    set: &RuleSet,
    instant: &DateTime<Tz>,
    inclusive: bool,
) -> Option<DateTime<Zone>> {
    let window = Window::before(instant.with_timezone(&set.zone()), inclusive);
    collect(set.iter(), &window, None).dates.pop()
}

/// First occurrence after `instant` (or at it, when `inclusive`).
#[must_use]
pub fn just_after<Tz: TimeZone>(
    set: &RuleSet,
    instant: &DateTime<Tz>,
    inclusive: bool,
) -> Option<DateTime<Zone>> {
    let window = Window::after(instant.with_timezone(&set.zone()), inclusive);
    collect(set.iter(), &window, Some(1)).dates.into_iter().next()
}

impl FromStr for RuleSet {
    type Err = RfcError;

    fn from_str(s: &str) -> RfcResult<Self> {
        parse(s)
    }
}

/// Parses a lone rule value such as `FREQ=WEEKLY;BYDAY=MO`, optionally
/// prefixed with `RRULE:`.
///
/// There is no DTSTART, so UNTIL is kept floating and never checked against
/// a start.
impl FromStr for RecurrenceRule {
    type Err = RfcError;

    fn from_str(s: &str) -> RfcResult<Self> {
        let value = s
            .split_at_checked(6)
            .filter(|(prefix, _)| prefix.eq_ignore_ascii_case("RRULE:"))
            .map_or(s, |(_, rest)| rest);
        let col = s.len() - value.len() + 1;
        let parts = parse_rule_parts(value.trim_end(), 1, col)?;
        Ok(rule_from_parts(&parts, Zone::Floating)?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    const DAILY_3: &str = "DTSTART:20120201T093000Z\nRRULE:FREQ=DAILY;COUNT=3";

    #[test_log::test]
    fn daily_count_three() {
        let set = parse(DAILY_3).unwrap();
        let got = all_occurrences(&set, None).unwrap();
        let expected: Vec<_> = [1, 2, 3]
            .into_iter()
            .map(|d| Utc.with_ymd_and_hms(2012, 2, d, 9, 30, 0).unwrap())
            .collect();
        assert_eq!(got.dates, expected);
        assert!(!got.limited);
    }

    #[test_log::test]
    fn unbounded_needs_limit() {
        let set = parse("DTSTART:20120201T093000Z\nRRULE:FREQ=DAILY").unwrap();
        assert_eq!(all_occurrences(&set, None), Err(RfcError::UnboundedGeneration));

        let got = all_occurrences(&set, Some(5)).unwrap();
        assert_eq!(got.dates.len(), 5);
        assert!(got.limited);
    }

    #[test_log::test]
    fn between_is_inclusive_and_terminates() {
        let set = parse("DTSTART:20120201T093000Z\nRRULE:FREQ=DAILY").unwrap();
        let after = Utc.with_ymd_and_hms(2012, 2, 3, 9, 30, 0).unwrap();
        let before = Utc.with_ymd_and_hms(2012, 2, 5, 9, 30, 0).unwrap();
        let got = occurrences_between(&set, None, &after, &before).unwrap();
        assert_eq!(got.dates.first(), Some(&after.with_timezone(&Zone::Utc)));
        assert_eq!(got.dates.last(), Some(&before.with_timezone(&Zone::Utc)));
        assert_eq!(got.dates.len(), 3);
    }

    #[test_log::test]
    fn neighbours_of_an_instant() {
        let set = parse(DAILY_3).unwrap();
        let middle = Utc.with_ymd_and_hms(2012, 2, 2, 9, 30, 0).unwrap();
        let first = Utc.with_ymd_and_hms(2012, 2, 1, 9, 30, 0).unwrap();
        let last = Utc.with_ymd_and_hms(2012, 2, 3, 9, 30, 0).unwrap();

        assert_eq!(just_before(&set, &middle, false), Some(first.with_timezone(&Zone::Utc)));
        assert_eq!(just_before(&set, &middle, true), Some(middle.with_timezone(&Zone::Utc)));
        assert_eq!(just_after(&set, &middle, false), Some(last.with_timezone(&Zone::Utc)));
        assert_eq!(just_after(&set, &last, false), None);
    }

    #[test_log::test]
    fn from_str_matches_parse() {
        let set: RuleSet = DAILY_3.parse().unwrap();
        assert_eq!(set, parse(DAILY_3).unwrap());
        assert!(matches!("RRULE:FREQ=DAILY".parse::<RuleSet>(), Err(RfcError::Parse(_))));
    }

    #[test_log::test]
    fn bare_rule_without_dtstart() {
        let rule: RecurrenceRule = "FREQ=WEEKLY;COUNT=4;BYDAY=MO,WE".parse().unwrap();
        assert_eq!(rule.count, Some(4));
        assert_eq!(rule.by_day.len(), 2);
        assert_eq!(rule.to_string(), "FREQ=WEEKLY;COUNT=4;BYDAY=MO,WE");

        let prefixed: RecurrenceRule = "rrule:FREQ=WEEKLY;COUNT=4;BYDAY=MO,WE".parse().unwrap();
        assert_eq!(prefixed, rule);

        let early: RecurrenceRule = "FREQ=DAILY;UNTIL=19000101T000000".parse().unwrap();
        assert_eq!(early.until.map(|u| u.timezone()), Some(Zone::Floating));

        assert!(matches!(
            "FREQ=DAILY;BYEASTER=0".parse::<RecurrenceRule>(),
            Err(RfcError::Parse(_))
        ));
        assert!(matches!(
            "FREQ=DAILY;INTERVAL=0".parse::<RecurrenceRule>(),
            Err(RfcError::InvalidField(_))
        ));
    }

    #[test_log::test]
    fn errors_are_classified() {
        assert!(matches!(parse("RRULE:FREQ=DAILY"), Err(RfcError::Parse(_))));
        assert!(matches!(
            parse("DTSTART:20120201T093000Z\nRRULE:FREQ=DAILY;INTERVAL=0"),
            Err(RfcError::InvalidField(_))
        ));
    }
}
