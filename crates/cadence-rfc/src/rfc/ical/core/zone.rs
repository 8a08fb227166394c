//! Timezone identity of a rule set and its occurrences.
//!
//! `Zone` is a `chrono::TimeZone` covering the three DATE-TIME forms of
//! RFC 5545 §3.3.5 so that every instant produced by the engine carries the
//! identity its DTSTART was written with.

use std::fmt;

use chrono::{FixedOffset, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

/// Timezone identity of a DATE-TIME.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    /// Wall-clock time with no zone. Ordered and compared as if it were UTC.
    Floating,
    /// Written with a trailing `Z`.
    Utc,
    /// Written with a `TZID` parameter naming an IANA zone.
    Iana(Tz),
}

impl Zone {
    /// Returns the TZID to write for this zone, if any.
    #[must_use]
    pub fn tzid(&self) -> Option<&'static str> {
        match self {
            Self::Iana(tz) => Some(tz.name()),
            Self::Floating | Self::Utc => None,
        }
    }

    #[must_use]
    pub const fn is_floating(&self) -> bool {
        matches!(self, Self::Floating)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Floating => write!(f, "floating"),
            Self::Utc => write!(f, "UTC"),
            Self::Iana(tz) => write!(f, "{}", tz.name()),
        }
    }
}

impl From<Tz> for Zone {
    fn from(tz: Tz) -> Self {
        Self::Iana(tz)
    }
}

/// Offset of a [`Zone`] at a given instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoneOffset {
    Floating,
    Utc,
    Iana(<Tz as TimeZone>::Offset),
}

impl Offset for ZoneOffset {
    fn fix(&self) -> FixedOffset {
        match self {
            Self::Floating | Self::Utc => Utc.fix(),
            Self::Iana(offset) => offset.fix(),
        }
    }
}

impl fmt::Display for ZoneOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Floating => write!(f, "floating"),
            Self::Utc => write!(f, "UTC"),
            Self::Iana(offset) => write!(f, "{offset}"),
        }
    }
}

impl TimeZone for Zone {
    type Offset = ZoneOffset;

    fn from_offset(offset: &Self::Offset) -> Self {
        match offset {
            ZoneOffset::Floating => Self::Floating,
            ZoneOffset::Utc => Self::Utc,
            ZoneOffset::Iana(offset) => Self::Iana(Tz::from_offset(offset)),
        }
    }

    fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<Self::Offset> {
        match self {
            Self::Floating => LocalResult::Single(ZoneOffset::Floating),
            Self::Utc => LocalResult::Single(ZoneOffset::Utc),
            Self::Iana(tz) => tz.offset_from_local_date(local).map(ZoneOffset::Iana),
        }
    }

    fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<Self::Offset> {
        match self {
            Self::Floating => LocalResult::Single(ZoneOffset::Floating),
            Self::Utc => LocalResult::Single(ZoneOffset::Utc),
            Self::Iana(tz) => tz.offset_from_local_datetime(local).map(ZoneOffset::Iana),
        }
    }

    fn offset_from_utc_date(&self, utc: &NaiveDate) -> Self::Offset {
        match self {
            Self::Floating => ZoneOffset::Floating,
            Self::Utc => ZoneOffset::Utc,
            Self::Iana(tz) => ZoneOffset::Iana(tz.offset_from_utc_date(utc)),
        }
    }

    fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> Self::Offset {
        match self {
            Self::Floating => ZoneOffset::Floating,
            Self::Utc => ZoneOffset::Utc,
            Self::Iana(tz) => ZoneOffset::Iana(tz.offset_from_utc_datetime(utc)),
        }
    }
}
