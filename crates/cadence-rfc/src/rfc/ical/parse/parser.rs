//! Rule-set text parser.
//!
//! Turns `DTSTART`/`RRULE`/`EXRULE`/`RDATE`/`EXDATE` lines into a
//! [`ParsedRuleSet`]: dates resolved to instants in the DTSTART zone, rules
//! still as raw parts.

use chrono::DateTime;

use super::error::{ParseError, ParseErrorKind, ParseResult};
use super::lexer::{parse_content_line, split_lines};
use super::rule_parts::{RuleParts, parse_rule_parts};
use super::values::{parse_date_value, parse_date_value_list};
use crate::rfc::ical::core::{ContentLine, DateTimeForm, DateValue, PropertyName, Zone};
use crate::rfc::ical::expand::timezone::{TimeZoneResolver, localize};

/// Parameters accepted on date-valued lines.
const DATE_PARAMS: [&str; 2] = ["TZID", "VALUE"];

/// Output of the parser, before rule validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRuleSet {
    pub dt_start: DateTime<Zone>,
    pub rrules: Vec<RuleParts>,
    pub exrules: Vec<RuleParts>,
    pub rdates: Vec<DateTime<Zone>>,
    pub exdates: Vec<DateTime<Zone>>,
}

/// A date-valued line with its position, held until DTSTART's zone is known.
struct DateLine {
    line: usize,
    column: usize,
    content: ContentLine,
}

/// Parses rule-set text.
///
/// ## Errors
///
/// Returns an error if the input is empty, a line is malformed or names an
/// unknown property, a date literal or TZID is invalid, or DTSTART is missing
/// or repeated.
#[tracing::instrument(skip(input), fields(input_len = input.len()))]
pub fn parse_rule_set(input: &str) -> ParseResult<ParsedRuleSet> {
    tracing::debug!("Parsing rule set");

    let lines = split_lines(input);
    if lines.is_empty() {
        tracing::warn!("Empty rule-set input");
        return Err(ParseError::new(ParseErrorKind::EmptyInput, 1, 1));
    }

    let mut dt_start: Option<DateLine> = None;
    let mut rrules = Vec::new();
    let mut exrules = Vec::new();
    let mut rdate_lines = Vec::new();
    let mut exdate_lines = Vec::new();

    for (line_num, text) in lines {
        let content = parse_content_line(&text, line_num)?;
        let column = text.len() - content.raw_value.len() + 1;
        tracing::trace!(line = line_num, name = %content.name, "Content line");

        let name = PropertyName::parse(&content.name).ok_or_else(|| {
            ParseError::new(ParseErrorKind::UnknownProperty, line_num, 1)
                .with_detail(content.name.clone())
        })?;

        let allowed: &[&str] = if name.is_rule() { &[] } else { &DATE_PARAMS };
        if let Some(param) = content
            .params
            .iter()
            .find(|p| !allowed.contains(&p.name.as_str()))
        {
            return Err(
                ParseError::new(ParseErrorKind::UnknownParameter, line_num, content.name.len() + 2)
                    .with_detail(format!("{} on {name}", param.name)),
            );
        }

        let date_line = DateLine {
            line: line_num,
            column,
            content,
        };

        match name {
            PropertyName::DtStart => {
                if dt_start.is_some() {
                    return Err(ParseError::new(ParseErrorKind::DuplicateDtStart, line_num, 1));
                }
                dt_start = Some(date_line);
            }
            PropertyName::RRule => rrules.push(parse_rule_parts(
                &date_line.content.raw_value,
                line_num,
                column,
            )?),
            PropertyName::ExRule => exrules.push(parse_rule_parts(
                &date_line.content.raw_value,
                line_num,
                column,
            )?),
            PropertyName::RDate => rdate_lines.push(date_line),
            PropertyName::ExDate => exdate_lines.push(date_line),
        }
    }

    let mut resolver = TimeZoneResolver::new();

    let dt_start = match dt_start {
        Some(line) => resolve_dt_start(&line, &mut resolver)?,
        None if rrules.is_empty() && exrules.is_empty() => {
            earliest_rdate(&rdate_lines, &mut resolver)?.ok_or_else(|| {
                ParseError::new(ParseErrorKind::MissingDtStart, 1, 1)
                    .with_detail("no DTSTART or RDATE")
            })?
        }
        None => {
            return Err(ParseError::new(ParseErrorKind::MissingDtStart, 1, 1)
                .with_detail("a rule requires DTSTART"));
        }
    };
    let zone = dt_start.timezone();

    let rdates = resolve_date_lines(&rdate_lines, zone, &mut resolver)?;
    let exdates = resolve_date_lines(&exdate_lines, zone, &mut resolver)?;

    tracing::debug!(
        rrules = rrules.len(),
        exrules = exrules.len(),
        rdates = rdates.len(),
        exdates = exdates.len(),
        "Rule set parsed successfully"
    );

    Ok(ParsedRuleSet {
        dt_start,
        rrules,
        exrules,
        rdates,
        exdates,
    })
}

/// Zone a value written in this form belongs to, absent any other context.
fn zone_of(
    value: &DateValue,
    resolver: &mut TimeZoneResolver,
    line: usize,
    col: usize,
) -> ParseResult<Zone> {
    match value.form() {
        None | Some(DateTimeForm::Floating) => Ok(Zone::Floating),
        Some(DateTimeForm::Utc) => Ok(Zone::Utc),
        Some(DateTimeForm::Zoned { tzid }) => resolver.resolve(tzid).map_err(|e| {
            ParseError::new(ParseErrorKind::InvalidTimezone, line, col).with_detail(e.to_string())
        }),
    }
}

/// Resolves a parsed value to an instant in `target`.
///
/// DATE values are midnight and floating values are wall-clock time, both read
/// in `target`; UTC and zoned values keep their instant.
fn resolve_value(
    value: &DateValue,
    target: Zone,
    resolver: &mut TimeZoneResolver,
    line: usize,
    col: usize,
) -> ParseResult<DateTime<Zone>> {
    let invalid = |context: String| {
        ParseError::new(ParseErrorKind::InvalidDateTime, line, col).with_detail(context)
    };

    let (naive, source_zone) = match value {
        DateValue::Date(date) => (
            date.to_naive()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .ok_or_else(|| invalid(date.to_string()))?,
            target,
        ),
        DateValue::DateTime(dt) => {
            let naive = dt.to_naive().ok_or_else(|| invalid(dt.to_string()))?;
            let zone = match &dt.form {
                DateTimeForm::Floating => target,
                DateTimeForm::Utc | DateTimeForm::Zoned { .. } => {
                    zone_of(value, resolver, line, col)?
                }
            };
            (naive, zone)
        }
    };

    let local = localize(source_zone, naive).map_err(|e| invalid(e.to_string()))?;
    Ok(local.with_timezone(&target))
}

fn resolve_dt_start(
    line: &DateLine,
    resolver: &mut TimeZoneResolver,
) -> ParseResult<DateTime<Zone>> {
    let value = parse_date_value(
        &line.content.raw_value,
        line.content.value_type(),
        line.content.tzid(),
        line.line,
        line.column,
    )?;
    let zone = zone_of(&value, resolver, line.line, line.column)?;
    resolve_value(&value, zone, resolver, line.line, line.column)
}

fn resolve_date_lines(
    lines: &[DateLine],
    zone: Zone,
    resolver: &mut TimeZoneResolver,
) -> ParseResult<Vec<DateTime<Zone>>> {
    let mut instants = Vec::new();
    for line in lines {
        let values = parse_date_value_list(
            &line.content.raw_value,
            line.content.value_type(),
            line.content.tzid(),
            line.line,
            line.column,
        )?;
        for value in &values {
            instants.push(resolve_value(value, zone, resolver, line.line, line.column)?);
        }
    }
    Ok(instants)
}

/// DTSTART of a rule set given only RDATEs: the earliest of them, in its own zone.
fn earliest_rdate(
    lines: &[DateLine],
    resolver: &mut TimeZoneResolver,
) -> ParseResult<Option<DateTime<Zone>>> {
    let mut earliest: Option<DateTime<Zone>> = None;
    for line in lines {
        let values = parse_date_value_list(
            &line.content.raw_value,
            line.content.value_type(),
            line.content.tzid(),
            line.line,
            line.column,
        )?;
        for value in &values {
            let zone = zone_of(value, resolver, line.line, line.column)?;
            let instant = resolve_value(value, zone, resolver, line.line, line.column)?;
            if earliest.as_ref().is_none_or(|e| instant < *e) {
                earliest = Some(instant);
            }
        }
    }
    Ok(earliest)
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
