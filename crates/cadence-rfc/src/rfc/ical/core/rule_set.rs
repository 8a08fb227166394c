//! Rule set model: DTSTART plus inclusion and exclusion rules and dates.

use chrono::DateTime;

use super::{RecurrenceRule, Zone};

/// A complete recurrence definition (RFC 5545 §3.8.5).
///
/// Every instant held by a rule set is expressed in the DTSTART zone.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    pub dt_start: DateTime<Zone>,
    pub rrules: Vec<RecurrenceRule>,
    pub exrules: Vec<RecurrenceRule>,
    pub rdates: Vec<DateTime<Zone>>,
    pub exdates: Vec<DateTime<Zone>>,
}

impl RuleSet {
    #[must_use]
    pub fn new(dt_start: DateTime<Zone>) -> Self {
        Self {
            dt_start,
            rrules: Vec::new(),
            exrules: Vec::new(),
            rdates: Vec::new(),
            exdates: Vec::new(),
        }
    }

    /// Zone every occurrence of this set is reported in.
    #[must_use]
    pub fn zone(&self) -> Zone {
        self.dt_start.timezone()
    }

    #[must_use]
    pub fn with_rrule(mut self, rule: RecurrenceRule) -> Self {
        self.rrules.push(rule);
        self
    }

    #[must_use]
    pub fn with_exrule(mut self, rule: RecurrenceRule) -> Self {
        self.exrules.push(rule);
        self
    }

    #[must_use]
    pub fn with_rdate<Tz: chrono::TimeZone>(mut self, rdate: &DateTime<Tz>) -> Self {
        let zone = self.zone();
        self.rdates.push(rdate.with_timezone(&zone));
        self
    }

    #[must_use]
    pub fn with_exdate<Tz: chrono::TimeZone>(mut self, exdate: &DateTime<Tz>) -> Self {
        let zone = self.zone();
        self.exdates.push(exdate.with_timezone(&zone));
        self
    }

    /// Whether the set yields a finite number of occurrences.
    ///
    /// RDATEs are finite, so only an RRULE without COUNT or UNTIL makes the
    /// set unbounded.
    #[must_use]
    pub fn is_bounded(&self) -> bool {
        self.rrules.iter().all(RecurrenceRule::is_bounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::ical::core::Frequency;
    use chrono::TimeZone;

    #[test]
    fn rdates_are_moved_into_dtstart_zone() {
        let zone = Zone::Iana(chrono_tz::Europe::Paris);
        let start = zone.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap();
        let rdate = chrono::Utc.with_ymd_and_hms(2026, 1, 5, 8, 0, 0).unwrap();

        let set = RuleSet::new(start).with_rdate(&rdate);
        assert_eq!(set.rdates[0].timezone(), zone);
        assert_eq!(set.rdates[0], rdate);
    }

    #[test]
    fn unbounded_when_any_rrule_is_open() {
        let start = Zone::Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap();
        let set = RuleSet::new(start)
            .with_rrule(RecurrenceRule::new(Frequency::Daily).with_count(2))
            .with_rrule(RecurrenceRule::new(Frequency::Weekly));
        assert!(!set.is_bounded());
        assert!(RuleSet::new(start).is_bounded());
    }
}
