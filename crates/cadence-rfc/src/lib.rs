pub mod error;
pub mod rfc;

pub use error::{RfcError, RfcResult};
pub use rfc::api::{
    all_occurrences, just_after, just_before, occurrences_between, occurrences_in, parse,
};
pub use rfc::ical::core::{RecurrenceRule, RuleSet, Zone};
pub use rfc::ical::expand::{Occurrences, Window};
