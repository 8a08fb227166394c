//! Splits an RRULE/EXRULE value into its `KEY=VALUE` parts.
//!
//! Parts are kept as raw text; typing and range checks happen in
//! `validate`. Only UNTIL is parsed here since a bad date literal is a
//! syntax error.

use std::fmt;

use super::error::{ParseError, ParseErrorKind, ParseResult};
use super::values::parse_date_value;
use crate::rfc::ical::core::DateValue;

/// Recognized rule part names (RFC 5545 §3.3.10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKey {
    Freq,
    Until,
    Count,
    Interval,
    BySecond,
    ByMinute,
    ByHour,
    ByDay,
    ByMonthDay,
    ByYearDay,
    ByWeekNo,
    ByMonth,
    BySetPos,
    Wkst,
}

impl RuleKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Freq => "FREQ",
            Self::Until => "UNTIL",
            Self::Count => "COUNT",
            Self::Interval => "INTERVAL",
            Self::BySecond => "BYSECOND",
            Self::ByMinute => "BYMINUTE",
            Self::ByHour => "BYHOUR",
            Self::ByDay => "BYDAY",
            Self::ByMonthDay => "BYMONTHDAY",
            Self::ByYearDay => "BYYEARDAY",
            Self::ByWeekNo => "BYWEEKNO",
            Self::ByMonth => "BYMONTH",
            Self::BySetPos => "BYSETPOS",
            Self::Wkst => "WKST",
        }
    }

    /// Parses a rule part name (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.to_ascii_uppercase().as_str() {
            "FREQ" => Self::Freq,
            "UNTIL" => Self::Until,
            "COUNT" => Self::Count,
            "INTERVAL" => Self::Interval,
            "BYSECOND" => Self::BySecond,
            "BYMINUTE" => Self::ByMinute,
            "BYHOUR" => Self::ByHour,
            "BYDAY" => Self::ByDay,
            "BYMONTHDAY" => Self::ByMonthDay,
            "BYYEARDAY" => Self::ByYearDay,
            "BYWEEKNO" => Self::ByWeekNo,
            "BYMONTH" => Self::ByMonth,
            "BYSETPOS" => Self::BySetPos,
            "WKST" => Self::Wkst,
            _ => return None,
        })
    }
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One `KEY=VALUE` part of a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulePart {
    pub key: RuleKey,
    pub value: String,
}

/// The parts of one RRULE or EXRULE line, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleParts {
    pub parts: Vec<RulePart>,
    /// The UNTIL literal, already parsed.
    pub until: Option<DateValue>,
}

impl RuleParts {
    /// Returns the raw value of a part.
    #[must_use]
    pub fn get(&self, key: RuleKey) -> Option<&str> {
        self.parts
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }

    #[must_use]
    pub fn contains(&self, key: RuleKey) -> bool {
        self.parts.iter().any(|p| p.key == key)
    }
}

/// Parses a rule value such as `FREQ=WEEKLY;BYDAY=MO,WE;COUNT=4`.
///
/// `col` is the 1-based column of the value on its line. A trailing `;` is
/// tolerated.
///
/// ## Errors
/// Returns an error if a part lacks `=` or a value, names an unknown key,
/// repeats a key, or carries a malformed UNTIL literal.
pub fn parse_rule_parts(s: &str, line: usize, col: usize) -> ParseResult<RuleParts> {
    let mut rule = RuleParts::default();
    let mut offset = 0;

    for part in s.split(';') {
        let part_col = col + offset;
        offset += part.len() + 1;

        if part.is_empty() {
            continue;
        }

        let Some((name, value)) = part.split_once('=') else {
            return Err(
                ParseError::new(ParseErrorKind::InvalidRulePart, line, part_col)
                    .with_detail(part.to_string()),
            );
        };

        let key = RuleKey::parse(name).ok_or_else(|| {
            ParseError::new(ParseErrorKind::UnknownRulePart, line, part_col)
                .with_detail(name.to_string())
        })?;

        if value.is_empty() {
            return Err(
                ParseError::new(ParseErrorKind::InvalidRulePart, line, part_col)
                    .with_detail(format!("{key} has no value")),
            );
        }

        if rule.contains(key) {
            return Err(
                ParseError::new(ParseErrorKind::DuplicateRulePart, line, part_col)
                    .with_detail(key.to_string()),
            );
        }

        if key == RuleKey::Until {
            let value_col = part_col + name.len() + 1;
            rule.until = Some(parse_date_value(value, None, None, line, value_col)?);
        }

        rule.parts.push(RulePart {
            key,
            value: value.to_string(),
        });
    }

    if rule.parts.is_empty() {
        return Err(ParseError::new(ParseErrorKind::InvalidRulePart, line, col)
            .with_detail("empty rule"));
    }

    Ok(rule)
}
