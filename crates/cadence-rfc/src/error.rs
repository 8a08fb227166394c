use thiserror::Error;

use crate::rfc::ical::parse::ParseError;
use crate::rfc::ical::validate::InvalidFieldError;

/// Errors surfaced by the public recurrence API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RfcError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Invalid field: {0}")]
    InvalidField(#[from] InvalidFieldError),

    #[error("Rule set has no COUNT or UNTIL; a limit or an upper bound is required")]
    UnboundedGeneration,
}

pub type RfcResult<T> = std::result::Result<T, RfcError>;
