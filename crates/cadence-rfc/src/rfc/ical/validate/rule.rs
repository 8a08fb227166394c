//! Raw rule parts to [`RecurrenceRule`].

use chrono::{DateTime, NaiveTime};

use super::error::InvalidFieldError;
use super::roles::{ByPart, Role, role};
use crate::rfc::ical::core::{
    DateTimeForm, DateValue, Frequency, RecurrenceRule, Weekday, WeekdayNum, Zone,
};
use crate::rfc::ical::expand::timezone::localize_lenient;
use crate::rfc::ical::parse::{RuleKey, RuleParts};

type FieldResult<T> = Result<T, InvalidFieldError>;

/// Largest INTERVAL accepted for each frequency.
const fn max_interval(freq: Frequency) -> u16 {
    match freq {
        Frequency::Secondly => 50_000,
        Frequency::Minutely | Frequency::Hourly | Frequency::Daily | Frequency::Yearly => 10_000,
        Frequency::Weekly | Frequency::Monthly => 1000,
    }
}

/// Validates one RRULE or EXRULE against DTSTART.
///
/// ## Errors
/// Returns an [`InvalidFieldError`] naming the first illegal field.
pub fn validate_rule(
    parts: &RuleParts,
    dt_start: &DateTime<Zone>,
) -> Result<RecurrenceRule, InvalidFieldError> {
    let rule = rule_from_parts(parts, dt_start.timezone())?;
    if let Some(until) = rule.until.filter(|until| until < dt_start) {
        return Err(InvalidFieldError::UntilBeforeStart {
            until: until.to_rfc3339(),
            start: dt_start.to_rfc3339(),
        });
    }
    Ok(rule)
}

/// Builds a rule from its parts with no DTSTART to check against.
///
/// UNTIL is resolved into `zone`. Every field check that does not involve
/// DTSTART still applies.
///
/// ## Errors
/// Returns an [`InvalidFieldError`] naming the first illegal field.
pub fn rule_from_parts(
    parts: &RuleParts,
    zone: Zone,
) -> Result<RecurrenceRule, InvalidFieldError> {
    let freq = match parts.get(RuleKey::Freq) {
        None => return Err(InvalidFieldError::MissingFreq),
        Some(value) => Frequency::parse(value)
            .ok_or_else(|| InvalidFieldError::unrecognized(RuleKey::Freq, value))?,
    };

    let mut rule = RecurrenceRule::new(freq);

    if let Some(value) = parts.get(RuleKey::Interval) {
        let interval: u16 = parse_number(RuleKey::Interval, value)?;
        if interval == 0 || interval > max_interval(freq) {
            return Err(InvalidFieldError::out_of_range(
                RuleKey::Interval,
                value,
                interval_range(freq),
            ));
        }
        rule.interval = interval;
    }

    if parts.contains(RuleKey::Count) && parts.contains(RuleKey::Until) {
        return Err(InvalidFieldError::CountWithUntil);
    }

    if let Some(value) = parts.get(RuleKey::Count) {
        let count: u32 = parse_number(RuleKey::Count, value)?;
        if count == 0 {
            return Err(InvalidFieldError::out_of_range(
                RuleKey::Count,
                value,
                "1 or more",
            ));
        }
        rule.count = Some(count);
    }

    if let Some(until) = &parts.until {
        rule.until = Some(resolve_until(until, zone)?);
    }

    if let Some(value) = parts.get(RuleKey::Wkst) {
        rule.week_start = Weekday::parse(value)
            .ok_or_else(|| InvalidFieldError::unrecognized(RuleKey::Wkst, value))?;
    }

    for part in ByPart::all() {
        if parts.contains(part.key()) && role(freq, part) == Role::NotApplicable {
            return Err(InvalidFieldError::NotApplicable {
                field: part.key(),
                freq,
            });
        }
    }

    rule.by_second = parse_list(parts, RuleKey::BySecond, 0, 59, "0..59")?;
    rule.by_minute = parse_list(parts, RuleKey::ByMinute, 0, 59, "0..59")?;
    rule.by_hour = parse_list(parts, RuleKey::ByHour, 0, 23, "0..23")?;
    rule.by_month = parse_list(parts, RuleKey::ByMonth, 1, 12, "1..12")?;
    rule.by_month_day = parse_signed_list(parts, RuleKey::ByMonthDay, 31, "±1..31")?;
    rule.by_year_day = parse_signed_list(parts, RuleKey::ByYearDay, 366, "±1..366")?;
    rule.by_week_no = parse_signed_list(parts, RuleKey::ByWeekNo, 53, "±1..53")?;
    rule.by_set_pos = parse_signed_list(parts, RuleKey::BySetPos, 366, "±1..366")?;

    if let Some(value) = parts.get(RuleKey::ByDay) {
        rule.by_day = value
            .split(',')
            .map(|token| parse_weekday_num(token.trim(), freq))
            .collect::<FieldResult<_>>()?;
    }

    if !rule.by_set_pos.is_empty() && !rule.has_by_filter() {
        return Err(InvalidFieldError::BySetPosAlone);
    }

    Ok(rule)
}

const fn interval_range(freq: Frequency) -> &'static str {
    match freq {
        Frequency::Secondly => "1..50000",
        Frequency::Minutely | Frequency::Hourly | Frequency::Daily | Frequency::Yearly => {
            "1..10000"
        }
        Frequency::Weekly | Frequency::Monthly => "1..1000",
    }
}

/// Resolves UNTIL into the DTSTART zone.
///
/// A DATE means the last second of that day. Floating values are read in the
/// DTSTART zone.
fn resolve_until(until: &DateValue, zone: Zone) -> FieldResult<DateTime<Zone>> {
    let invalid = || InvalidFieldError::unrecognized(RuleKey::Until, until_text(until));

    let (naive, utc) = match until {
        DateValue::Date(date) => (
            date.to_naive()
                .ok_or_else(invalid)?
                .and_time(NaiveTime::from_hms_opt(23, 59, 59).ok_or_else(invalid)?),
            false,
        ),
        DateValue::DateTime(dt) => (
            dt.to_naive().ok_or_else(invalid)?,
            dt.form == DateTimeForm::Utc,
        ),
    };

    let source = if utc { Zone::Utc } else { zone };
    let local = localize_lenient(source, naive).map_err(|_e| invalid())?;
    Ok(local.with_timezone(&zone))
}

fn until_text(until: &DateValue) -> String {
    match until {
        DateValue::Date(date) => date.to_string(),
        DateValue::DateTime(dt) => dt.to_string(),
    }
}

fn parse_number<T: std::str::FromStr>(field: RuleKey, value: &str) -> FieldResult<T> {
    let trimmed = value.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InvalidFieldError::unrecognized(field, value));
    }
    digits
        .parse()
        .map_err(|_e| InvalidFieldError::unrecognized(field, value))
}

fn parse_signed(field: RuleKey, value: &str) -> FieldResult<i32> {
    let trimmed = value.trim();
    match trimmed.strip_prefix('-') {
        Some(rest) => parse_number::<i32>(field, rest).map(|n| -n),
        None => parse_number(field, trimmed),
    }
}

/// Parses an unsigned list such as BYHOUR.
fn parse_list(
    parts: &RuleParts,
    field: RuleKey,
    min: u8,
    max: u8,
    range: &'static str,
) -> FieldResult<Vec<u8>> {
    let Some(value) = parts.get(field) else {
        return Ok(Vec::new());
    };
    value
        .split(',')
        .map(|item| {
            let n: i32 = parse_signed(field, item)?;
            u8::try_from(n)
                .ok()
                .filter(|n| (min..=max).contains(n))
                .ok_or_else(|| InvalidFieldError::out_of_range(field, item.trim(), range))
        })
        .collect()
}

/// Parses a signed, non-zero list such as BYMONTHDAY.
fn parse_signed_list<T: TryFrom<i32>>(
    parts: &RuleParts,
    field: RuleKey,
    max: i32,
    range: &'static str,
) -> FieldResult<Vec<T>> {
    let Some(value) = parts.get(field) else {
        return Ok(Vec::new());
    };
    value
        .split(',')
        .map(|item| {
            let n = parse_signed(field, item)?;
            if n == 0 || n.abs() > max {
                return Err(InvalidFieldError::out_of_range(field, item.trim(), range));
            }
            T::try_from(n)
                .map_err(|_e| InvalidFieldError::out_of_range(field, item.trim(), range))
        })
        .collect()
}

/// Parses a BYDAY token such as `MO`, `+2TU` or `-1FR`.
fn parse_weekday_num(token: &str, freq: Frequency) -> FieldResult<WeekdayNum> {
    let split = token.len().saturating_sub(2);
    let (ordinal, day) = token.split_at_checked(split).unwrap_or(("", token));

    let weekday =
        Weekday::parse(day).ok_or_else(|| InvalidFieldError::unrecognized(RuleKey::ByDay, token))?;

    if ordinal.is_empty() {
        return Ok(WeekdayNum::every(weekday));
    }

    let (max, range) = if freq == Frequency::Monthly {
        (5, "±1..5")
    } else {
        (53, "±1..53")
    };
    let n = parse_signed(RuleKey::ByDay, ordinal)?;
    if n == 0 || n.abs() > max {
        return Err(InvalidFieldError::out_of_range(RuleKey::ByDay, token, range));
    }
    let n = i8::try_from(n)
        .map_err(|_e| InvalidFieldError::out_of_range(RuleKey::ByDay, token, range))?;

    Ok(WeekdayNum::nth(n, weekday))
}

#[cfg(test)]
#[path = "rule_tests.rs"]
mod tests;
