//! Occurrence generation for recurrence rule sets.
//!
//! A [`RuleIter`] walks one rule period by period. [`RuleSetIter`] merges
//! several of them with RDATEs and removes exclusions. [`collect`] applies a
//! [`Window`] and a result limit on top.

mod counter;
mod iter_info;
mod month_info;
mod rule_iter;
mod rule_set_iter;
pub mod timezone;
mod utils;
mod window;
mod year_info;

pub use rule_iter::RuleIter;
pub use rule_set_iter::RuleSetIter;
pub use timezone::{ConversionError, TimeZoneResolver};
pub use window::{Occurrences, Window, collect};
