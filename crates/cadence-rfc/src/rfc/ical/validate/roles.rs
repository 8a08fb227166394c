//! Expand/limit behavior of each BYxxx rule part per frequency
//! (RFC 5545 §3.3.10, table on page 44).

use std::fmt;

use crate::rfc::ical::core::Frequency;
use crate::rfc::ical::parse::RuleKey;

/// A BYxxx rule part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByPart {
    ByMonth,
    ByWeekNo,
    ByYearDay,
    ByMonthDay,
    ByDay,
    ByHour,
    ByMinute,
    BySecond,
    BySetPos,
}

impl ByPart {
    #[must_use]
    pub const fn all() -> [Self; 9] {
        [
            Self::ByMonth,
            Self::ByWeekNo,
            Self::ByYearDay,
            Self::ByMonthDay,
            Self::ByDay,
            Self::ByHour,
            Self::ByMinute,
            Self::BySecond,
            Self::BySetPos,
        ]
    }

    const fn index(self) -> usize {
        match self {
            Self::ByMonth => 0,
            Self::ByWeekNo => 1,
            Self::ByYearDay => 2,
            Self::ByMonthDay => 3,
            Self::ByDay => 4,
            Self::ByHour => 5,
            Self::ByMinute => 6,
            Self::BySecond => 7,
            Self::BySetPos => 8,
        }
    }

    #[must_use]
    pub const fn key(self) -> RuleKey {
        match self {
            Self::ByMonth => RuleKey::ByMonth,
            Self::ByWeekNo => RuleKey::ByWeekNo,
            Self::ByYearDay => RuleKey::ByYearDay,
            Self::ByMonthDay => RuleKey::ByMonthDay,
            Self::ByDay => RuleKey::ByDay,
            Self::ByHour => RuleKey::ByHour,
            Self::ByMinute => RuleKey::ByMinute,
            Self::BySecond => RuleKey::BySecond,
            Self::BySetPos => RuleKey::BySetPos,
        }
    }
}

impl fmt::Display for ByPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// What a BYxxx part does to the candidate set of a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Produces more candidates per period.
    Expand,
    /// Removes candidates that do not match.
    Limit,
    /// Not allowed with this frequency.
    NotApplicable,
    /// BYDAY with MONTHLY or YEARLY: expands to the matching weekdays of the
    /// period, and only limits when BYMONTHDAY/BYYEARDAY/BYWEEKNO are given.
    /// Ordinals (`2TU`, `-1FR`) count within the period.
    ExpandInPeriod,
}

use Role::{Expand as E, ExpandInPeriod as P, Limit as L, NotApplicable as N};

/// Rows follow [`ByPart`], columns follow [`Frequency::all`] (SECONDLY first).
const ROLES: [[Role; 7]; 9] = [
    // S  MIN H  D  W  MON Y
    [L, L, L, L, L, L, E], // BYMONTH
    [N, N, N, N, N, N, E], // BYWEEKNO
    [L, L, L, N, N, N, E], // BYYEARDAY
    [L, L, L, L, N, E, E], // BYMONTHDAY
    [L, L, L, L, E, P, P], // BYDAY
    [L, L, L, E, E, E, E], // BYHOUR
    [L, L, E, E, E, E, E], // BYMINUTE
    [L, E, E, E, E, E, E], // BYSECOND
    [L, L, L, L, L, L, L], // BYSETPOS
];

/// Role of `part` in a rule of frequency `freq`.
#[must_use]
pub const fn role(freq: Frequency, part: ByPart) -> Role {
    ROLES[part.index()][freq.index()]
}
