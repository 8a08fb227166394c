//! Rule-set serializer (RFC 5545 §3.3.10, §3.8.5).
//!
//! Output parses back into an equal [`RuleSet`].

use std::fmt::{self, Write as _};

use chrono::{DateTime, Utc};

use super::fold::fold_line;
use crate::rfc::ical::core::{PropertyName, RecurrenceRule, RuleSet, Weekday, Zone};

const LOCAL_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Formats an instant as an RFC 5545 DATE-TIME in its own zone.
///
/// UTC instants get a trailing `Z`; zoned and floating instants are written
/// as wall-clock time. The TZID parameter is the caller's business.
#[must_use]
pub fn format_instant(instant: &DateTime<Zone>) -> String {
    let local = instant.naive_local().format(LOCAL_FORMAT);
    match instant.timezone() {
        Zone::Utc => format!("{local}Z"),
        Zone::Floating | Zone::Iana(_) => local.to_string(),
    }
}

/// UNTIL is written in UTC unless the rule set is floating.
fn format_until(until: &DateTime<Zone>) -> String {
    if until.timezone().is_floating() {
        until.naive_local().format(LOCAL_FORMAT).to_string()
    } else {
        until.with_timezone(&Utc).format("%Y%m%dT%H%M%SZ").to_string()
    }
}

fn write_list<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    key: &str,
    values: &[T],
) -> fmt::Result {
    if values.is_empty() {
        return Ok(());
    }
    write!(f, ";{key}=")?;
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            f.write_char(',')?;
        }
        write!(f, "{value}")?;
    }
    Ok(())
}

/// Renders the rule value, e.g. `FREQ=MONTHLY;COUNT=3;BYDAY=1FR`.
///
/// INTERVAL and WKST are omitted at their defaults.
impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FREQ={}", self.freq)?;
        if let Some(count) = self.count {
            write!(f, ";COUNT={count}")?;
        }
        if let Some(until) = &self.until {
            write!(f, ";UNTIL={}", format_until(until))?;
        }
        if self.interval != 1 {
            write!(f, ";INTERVAL={}", self.interval)?;
        }
        write_list(f, "BYSECOND", &self.by_second)?;
        write_list(f, "BYMINUTE", &self.by_minute)?;
        write_list(f, "BYHOUR", &self.by_hour)?;
        write_list(f, "BYDAY", &self.by_day)?;
        write_list(f, "BYMONTHDAY", &self.by_month_day)?;
        write_list(f, "BYYEARDAY", &self.by_year_day)?;
        write_list(f, "BYWEEKNO", &self.by_week_no)?;
        write_list(f, "BYMONTH", &self.by_month)?;
        write_list(f, "BYSETPOS", &self.by_set_pos)?;
        if self.week_start != Weekday::Monday {
            write!(f, ";WKST={}", self.week_start)?;
        }
        Ok(())
    }
}

/// Builds a date property line, TZID included for zoned sets.
fn date_line(name: PropertyName, zone: Zone, values: &[DateTime<Zone>]) -> String {
    let mut line = name.to_string();
    if let Some(tzid) = zone.tzid() {
        line.push_str(";TZID=");
        line.push_str(tzid);
    }
    line.push(':');
    let values: Vec<String> = values.iter().map(format_instant).collect();
    line.push_str(&values.join(","));
    fold_line(&line)
}

/// ## Summary
/// Serializes a rule set to its multi-line text form.
///
/// Lines come in a fixed order: DTSTART, RRULE, EXRULE, RDATE, EXDATE,
/// separated by `\n`. Long lines are folded.
#[must_use]
pub fn serialize(set: &RuleSet) -> String {
    let zone = set.zone();
    let mut lines = vec![date_line(
        PropertyName::DtStart,
        zone,
        std::slice::from_ref(&set.dt_start),
    )];
    lines.extend(
        set.rrules
            .iter()
            .map(|rule| fold_line(&format!("{}:{rule}", PropertyName::RRule))),
    );
    lines.extend(
        set.exrules
            .iter()
            .map(|rule| fold_line(&format!("{}:{rule}", PropertyName::ExRule))),
    );
    if !set.rdates.is_empty() {
        lines.push(date_line(PropertyName::RDate, zone, &set.rdates));
    }
    if !set.exdates.is_empty() {
        lines.push(date_line(PropertyName::ExDate, zone, &set.exdates));
    }
    lines.join("\n")
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&serialize(self))
    }
}
