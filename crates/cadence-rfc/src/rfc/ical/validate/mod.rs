//! Field validation and normalization of parsed rules.

mod error;
mod normalize;
mod roles;
mod rule;

pub use error::InvalidFieldError;
pub use normalize::NormalizedRule;
pub use roles::{ByPart, Role, role};
pub use rule::{rule_from_parts, validate_rule};

use crate::rfc::ical::core::RuleSet;
use crate::rfc::ical::parse::ParsedRuleSet;

/// Validates every rule of a parsed rule set and assembles the [`RuleSet`].
///
/// ## Errors
/// Returns the first [`InvalidFieldError`] found, RRULEs before EXRULEs.
#[tracing::instrument(skip_all, fields(rrules = parsed.rrules.len(), exrules = parsed.exrules.len()))]
pub fn validate_rule_set(parsed: ParsedRuleSet) -> Result<RuleSet, InvalidFieldError> {
    let ParsedRuleSet {
        dt_start,
        rrules,
        exrules,
        rdates,
        exdates,
    } = parsed;

    let rrules = rrules
        .iter()
        .map(|parts| validate_rule(parts, &dt_start))
        .collect::<Result<Vec<_>, _>>()
        .inspect_err(|e| tracing::warn!(error = %e, "Rejected RRULE"))?;
    let exrules = exrules
        .iter()
        .map(|parts| validate_rule(parts, &dt_start))
        .collect::<Result<Vec<_>, _>>()
        .inspect_err(|e| tracing::warn!(error = %e, "Rejected EXRULE"))?;

    Ok(RuleSet {
        dt_start,
        rrules,
        exrules,
        rdates,
        exdates,
    })
}
