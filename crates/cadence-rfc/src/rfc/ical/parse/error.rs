//! Errors raised while reading rule-set text.

use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

/// A rejected input, located by 1-based line and column.
///
/// `detail` carries the offending token or a short explanation when one is
/// available.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at line {line}, column {column}{}", detail_suffix(.detail.as_deref()))]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub line: usize,
    pub column: usize,
    pub detail: Option<String>,
}

fn detail_suffix(detail: Option<&str>) -> String {
    detail.map(|d| format!(": {d}")).unwrap_or_default()
}

impl ParseError {
    #[must_use]
    pub const fn new(kind: ParseErrorKind, line: usize, column: usize) -> Self {
        Self {
            kind,
            line,
            column,
            detail: None,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// What was wrong with the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("empty input")]
    EmptyInput,
    #[error("missing property name")]
    MissingPropertyName,
    #[error("invalid property name")]
    InvalidPropertyName,
    /// Anything other than DTSTART, RRULE, EXRULE, RDATE or EXDATE.
    #[error("unknown property")]
    UnknownProperty,
    #[error("missing colon separator")]
    MissingColon,
    #[error("invalid parameter format")]
    InvalidParameter,
    /// Only TZID and VALUE are accepted.
    #[error("unknown parameter")]
    UnknownParameter,
    #[error("unclosed quoted string")]
    UnclosedQuote,
    #[error("invalid date format")]
    InvalidDate,
    #[error("invalid time format")]
    InvalidTime,
    #[error("invalid date-time format")]
    InvalidDateTime,
    #[error("unknown timezone")]
    InvalidTimezone,
    /// Not of the form KEY=VALUE, or a value that does not parse.
    #[error("invalid rule part")]
    InvalidRulePart,
    #[error("unknown rule part")]
    UnknownRulePart,
    #[error("duplicate rule part")]
    DuplicateRulePart,
    /// RRULE or EXRULE without a DTSTART line.
    #[error("missing DTSTART")]
    MissingDtStart,
    #[error("duplicate DTSTART")]
    DuplicateDtStart,
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
