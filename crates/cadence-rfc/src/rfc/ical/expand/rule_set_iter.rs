//! Combines the rules and dates of a [`RuleSet`] into one ordered stream.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use chrono::DateTime;

use super::rule_iter::RuleIter;
use crate::rfc::ical::core::{RuleSet, Zone};

/// A rule iterator together with its next occurrence.
#[derive(Debug)]
struct Lookahead {
    iter: RuleIter,
    head: Option<DateTime<Zone>>,
}

impl Lookahead {
    fn new(mut iter: RuleIter) -> Self {
        let head = iter.next();
        Self { iter, head }
    }

    /// Advances past everything earlier than `instant` and reports whether
    /// `instant` itself is produced.
    fn produces(&mut self, instant: &DateTime<Zone>) -> bool {
        while let Some(head) = self.head {
            if head >= *instant {
                return head == *instant;
            }
            self.head = self.iter.next();
        }
        false
    }
}

/// Ordered, deduplicated occurrences of a [`RuleSet`].
///
/// RRULE streams are merged with the RDATEs through a min-heap holding one
/// head per source. A candidate is dropped when it equals the previous
/// output, appears in EXDATE, or is produced by an EXRULE.
///
/// DTSTART is an occurrence only where some RRULE matches it, or when the set
/// has no RRULE at all.
#[derive(Debug)]
pub struct RuleSetIter {
    rrules: Vec<RuleIter>,
    rdates: std::vec::IntoIter<DateTime<Zone>>,
    heap: BinaryHeap<Reverse<(DateTime<Zone>, usize)>>,
    exrules: Vec<Lookahead>,
    exdates: HashSet<DateTime<Zone>>,
    last: Option<DateTime<Zone>>,
}

impl RuleSetIter {
    #[must_use]
    pub fn new(set: &RuleSet) -> Self {
        let mut rrules: Vec<RuleIter> = set
            .rrules
            .iter()
            .map(|rule| RuleIter::new(rule, &set.dt_start))
            .collect();

        let mut rdates = set.rdates.clone();
        if rrules.is_empty() {
            rdates.push(set.dt_start);
        }
        rdates.sort_unstable();
        rdates.dedup();
        let mut rdates = rdates.into_iter();

        let mut heap = BinaryHeap::with_capacity(rrules.len() + 1);
        for (index, iter) in rrules.iter_mut().enumerate() {
            if let Some(head) = iter.next() {
                heap.push(Reverse((head, index)));
            }
        }
        let rdate_source = rrules.len();
        if let Some(head) = rdates.next() {
            heap.push(Reverse((head, rdate_source)));
        }

        let exrules = set
            .exrules
            .iter()
            .map(|rule| Lookahead::new(RuleIter::new(rule, &set.dt_start)))
            .collect();

        tracing::trace!(
            rrules = set.rrules.len(),
            exrules = set.exrules.len(),
            rdates = set.rdates.len(),
            exdates = set.exdates.len(),
            "Expanding rule set"
        );

        Self {
            rrules,
            rdates,
            heap,
            exrules,
            exdates: set.exdates.iter().copied().collect(),
            last: None,
        }
    }

    /// Whether any rule stopped early on the empty-period guard.
    #[must_use]
    pub fn is_limited(&self) -> bool {
        self.rrules.iter().any(RuleIter::is_limited)
            || self.exrules.iter().any(|ex| ex.iter.is_limited())
    }

    fn pop(&mut self) -> Option<DateTime<Zone>> {
        let Reverse((instant, source)) = self.heap.pop()?;
        let next = match self.rrules.get_mut(source) {
            Some(iter) => iter.next(),
            None => self.rdates.next(),
        };
        if let Some(next) = next {
            self.heap.push(Reverse((next, source)));
        }
        Some(instant)
    }

    fn is_excluded(&mut self, instant: &DateTime<Zone>) -> bool {
        if self.exdates.contains(instant) {
            return true;
        }
        // every lookahead has to advance, so no short-circuit
        self.exrules
            .iter_mut()
            .fold(false, |excluded, ex| ex.produces(instant) || excluded)
    }
}

impl Iterator for RuleSetIter {
    type Item = DateTime<Zone>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let instant = self.pop()?;
            if self.last == Some(instant) {
                continue;
            }
            self.last = Some(instant);
            if self.is_excluded(&instant) {
                tracing::trace!(%instant, "Occurrence excluded");
                continue;
            }
            return Some(instant);
        }
    }
}

impl RuleSet {
    /// Lazily iterates the occurrences of this set in ascending order.
    #[must_use]
    pub fn iter(&self) -> RuleSetIter {
        RuleSetIter::new(self)
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = DateTime<Zone>;
    type IntoIter = RuleSetIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
