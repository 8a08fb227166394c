//! Rule-set data model (RFC 5545 §3.3.10, §3.8.5).
//!
//! Parsed values keep their source form; resolved instants are
//! `chrono::DateTime<Zone>` values in the DTSTART zone.

mod datetime;
mod property;
mod rrule;
mod rule_set;
mod zone;

pub use datetime::{Date, DateTime, DateTimeForm, DateValue, Time};
pub use property::{ContentLine, Parameter, PropertyName};
pub use rrule::{Frequency, RecurrenceRule, Weekday, WeekdayNum};
pub use rule_set::RuleSet;
pub use zone::{Zone, ZoneOffset};
