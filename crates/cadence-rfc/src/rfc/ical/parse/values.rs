//! Value type parsers for DATE and DATE-TIME literals (RFC 5545 §3.3).
//!
//! Both the basic (`19970714T133000Z`) and the extended ISO 8601 form
//! (`1997-07-14T13:30:00Z`) are accepted.

use super::error::{ParseError, ParseErrorKind, ParseResult};
use crate::rfc::ical::core::{Date, DateTime, DateTimeForm, DateValue, Time};

/// Parses a DATE value (RFC 5545 §3.3.4).
///
/// Format: YYYYMMDD or YYYY-MM-DD (e.g., "19970714", "1997-07-14")
///
/// ## Errors
/// Returns an error if the string is not a valid date or names a day the
/// month does not have.
pub fn parse_date(s: &str, line: usize, col: usize) -> ParseResult<Date> {
    let invalid = || {
        ParseError::new(ParseErrorKind::InvalidDate, line, col).with_detail(s.to_string())
    };

    if !s.is_ascii() {
        return Err(invalid());
    }
    let (y, m, d) = match s.len() {
        8 => (&s[0..4], &s[4..6], &s[6..8]),
        10 if s.as_bytes()[4] == b'-' && s.as_bytes()[7] == b'-' => {
            (&s[0..4], &s[5..7], &s[8..10])
        }
        _ => return Err(invalid()),
    };

    let year = parse_digits::<u16>(y).ok_or_else(invalid)?;
    let month = parse_digits::<u8>(m).ok_or_else(invalid)?;
    let day = parse_digits::<u8>(d).ok_or_else(invalid)?;

    let date = Date::new(year, month, day);
    if year == 0 || date.to_naive().is_none() {
        return Err(invalid());
    }
    Ok(date)
}

/// Parses a TIME value (RFC 5545 §3.3.12).
///
/// Format: HHMMSS[Z] or HH:MM:SS[Z] (e.g., "133000", "13:30:00Z")
///
/// ## Errors
/// Returns an error if the string is not a valid time of day.
pub fn parse_time(s: &str, line: usize, col: usize) -> ParseResult<Time> {
    let invalid = || {
        ParseError::new(ParseErrorKind::InvalidTime, line, col).with_detail(s.to_string())
    };

    let (time_str, is_utc) = if let Some(stripped) = s.strip_suffix('Z') {
        (stripped, true)
    } else {
        (s, false)
    };

    if !time_str.is_ascii() {
        return Err(invalid());
    }
    let (h, m, sec) = match time_str.len() {
        6 => (&time_str[0..2], &time_str[2..4], &time_str[4..6]),
        8 if time_str.as_bytes()[2] == b':' && time_str.as_bytes()[5] == b':' => {
            (&time_str[0..2], &time_str[3..5], &time_str[6..8])
        }
        _ => return Err(invalid()),
    };

    let hour = parse_digits::<u8>(h).ok_or_else(invalid)?;
    let minute = parse_digits::<u8>(m).ok_or_else(invalid)?;
    let second = parse_digits::<u8>(sec).ok_or_else(invalid)?;

    // Leap seconds cannot be represented by the generator
    if hour > 23 || minute > 59 || second > 59 {
        return Err(invalid());
    }

    Ok(Time::new(hour, minute, second, is_utc))
}

/// Parses a DATE-TIME value (RFC 5545 §3.3.5).
///
/// TZID is handled at the property level, not in the value itself.
///
/// ## Errors
/// Returns an error if the string is not a valid date-time, or if a UTC value
/// is also given a TZID.
pub fn parse_datetime(
    s: &str,
    tzid: Option<&str>,
    line: usize,
    col: usize,
) -> ParseResult<DateTime> {
    let t_pos = s.find('T').ok_or_else(|| {
        ParseError::new(ParseErrorKind::InvalidDateTime, line, col).with_detail(s.to_string())
    })?;

    let date = parse_date(&s[..t_pos], line, col)?;
    let time = parse_time(&s[t_pos + 1..], line, col + t_pos + 1)?;

    let form = match (time.is_utc, tzid) {
        (true, Some(_)) => {
            return Err(ParseError::new(ParseErrorKind::InvalidDateTime, line, col)
                .with_detail("UTC time cannot carry a TZID"));
        }
        (true, None) => DateTimeForm::Utc,
        (false, Some(tz)) => DateTimeForm::Zoned {
            tzid: tz.to_string(),
        },
        (false, None) => DateTimeForm::Floating,
    };

    Ok(DateTime { date, time, form })
}

/// Parses a DATE or DATE-TIME value.
///
/// `value_type` is the VALUE parameter, if any. Without it the presence of a
/// `T` separator decides.
///
/// ## Errors
/// Returns an error if the VALUE parameter is unknown or the literal does not
/// match the requested type.
pub fn parse_date_value(
    s: &str,
    value_type: Option<&str>,
    tzid: Option<&str>,
    line: usize,
    col: usize,
) -> ParseResult<DateValue> {
    let is_date = match value_type.map(str::to_ascii_uppercase).as_deref() {
        Some("DATE") => true,
        Some("DATE-TIME") => false,
        Some(other) => {
            return Err(ParseError::new(ParseErrorKind::InvalidParameter, line, col)
                .with_detail(format!("VALUE={other}")));
        }
        None => !s.contains('T'),
    };

    if is_date {
        Ok(DateValue::Date(parse_date(s, line, col)?))
    } else {
        Ok(DateValue::DateTime(parse_datetime(s, tzid, line, col)?))
    }
}

/// Parses a comma-separated list of DATE or DATE-TIME values.
///
/// ## Errors
/// Returns the error of the first value that fails to parse.
pub fn parse_date_value_list(
    s: &str,
    value_type: Option<&str>,
    tzid: Option<&str>,
    line: usize,
    col: usize,
) -> ParseResult<Vec<DateValue>> {
    let mut offset = 0;
    let mut values = Vec::new();
    for item in s.split(',') {
        values.push(parse_date_value(
            item.trim(),
            value_type,
            tzid,
            line,
            col + offset,
        )?);
        offset += item.len() + 1;
    }
    Ok(values)
}

fn parse_digits<T: std::str::FromStr>(s: &str) -> Option<T> {
    if s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}
