//! Field-level validation errors.

use crate::rfc::ical::core::Frequency;
use crate::rfc::ical::parse::RuleKey;

/// A rule part whose value, or combination with other parts, is illegal.
///
/// Every variant names the offending field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidFieldError {
    #[error("FREQ is required")]
    MissingFreq,

    #[error("{field}: unrecognized value {value:?}")]
    Unrecognized { field: RuleKey, value: String },

    #[error("{field}: {value} is outside {range}")]
    OutOfRange {
        field: RuleKey,
        value: String,
        range: &'static str,
    },

    #[error("{field} cannot be used with FREQ={freq}")]
    NotApplicable { field: RuleKey, freq: Frequency },

    #[error("COUNT and UNTIL are mutually exclusive")]
    CountWithUntil,

    #[error("BYSETPOS requires another BYxxx rule part")]
    BySetPosAlone,

    #[error("UNTIL {until} is before DTSTART {start}")]
    UntilBeforeStart { until: String, start: String },
}

impl InvalidFieldError {
    pub(crate) fn unrecognized(field: RuleKey, value: impl Into<String>) -> Self {
        Self::Unrecognized {
            field,
            value: value.into(),
        }
    }

    pub(crate) fn out_of_range(
        field: RuleKey,
        value: impl ToString,
        range: &'static str,
    ) -> Self {
        Self::OutOfRange {
            field,
            value: value.to_string(),
            range,
        }
    }

    /// The rule part this error is about, if it concerns a single part.
    #[must_use]
    pub const fn field(&self) -> Option<RuleKey> {
        match self {
            Self::MissingFreq => Some(RuleKey::Freq),
            Self::Unrecognized { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::NotApplicable { field, .. } => Some(*field),
            Self::BySetPosAlone => Some(RuleKey::BySetPos),
            Self::UntilBeforeStart { .. } => Some(RuleKey::Until),
            Self::CountWithUntil => None,
        }
    }
}
