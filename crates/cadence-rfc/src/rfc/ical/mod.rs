//! RFC 5545 recurrence rules.
//!
//! - `core`: rule-set data model
//! - `parse`: text to raw rule parts and resolved dates
//! - `validate`: rule parts to checked rules, plus normalization for expansion
//! - `expand`: lazy occurrence generation, merging and windowing
//! - `build`: rule set back to text
//!
//! ## Example
//!
//! ```rust
//! use cadence_rfc::rfc::ical::{expand::Window, parse_rule_set, validate_rule_set};
//!
//! let parsed = parse_rule_set("DTSTART:20120201T093000Z\nRRULE:FREQ=DAILY;COUNT=3").unwrap();
//! let set = validate_rule_set(parsed).unwrap();
//! let found = cadence_rfc::rfc::ical::expand::collect(set.iter(), &Window::unbounded(), None);
//! assert_eq!(found.dates.len(), 3);
//! println!("{set}");
//! ```

pub mod build;
pub mod core;
pub mod expand;
pub mod parse;
pub mod validate;

#[cfg(test)]
mod tests;

pub use build::serialize;
pub use core::{RecurrenceRule, RuleSet};
pub use parse::{ParseError, ParseResult, parse_rule_set};
pub use validate::{InvalidFieldError, validate_rule_set};
