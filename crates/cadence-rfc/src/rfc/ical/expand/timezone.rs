//! Timezone resolution and wall-clock localization.
//!
//! Uses ICU4X for Windows timezone ID to IANA mapping and timezone canonicalization.

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use icu::time::zone::WindowsParser;
use icu::time::zone::iana::IanaParserExtended;
use std::collections::HashMap;
use std::str::FromStr;

use crate::rfc::ical::core::Zone;

/// Error while resolving a zone or placing a wall-clock time in it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// Unknown or invalid timezone identifier.
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    /// Non-existent time during DST gap.
    #[error("Non-existent time (DST gap): {0}")]
    NonExistentTime(String),
}

/// Resolver for TZID parameter values.
///
/// Caches resolved zones so repeated RDATE/EXDATE lines with the same TZID
/// only hit the ICU tables once.
#[derive(Debug, Default)]
pub struct TimeZoneResolver {
    cache: HashMap<String, Tz>,
}

impl TimeZoneResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ## Summary
    /// Resolves a timezone identifier to a [`Zone`].
    ///
    /// Accepts IANA names, their aliases, and Windows zone names.
    ///
    /// ## Errors
    ///
    /// Returns `ConversionError::UnknownTimezone` if the TZID cannot be resolved.
    pub fn resolve(&mut self, tzid: &str) -> Result<Zone, ConversionError> {
        if let Some(tz) = self.cache.get(tzid) {
            return Ok(Zone::Iana(*tz));
        }

        let normalized = normalize_tzid(tzid);
        let tz = Tz::from_str(&normalized)
            .map_err(|_e| ConversionError::UnknownTimezone(tzid.to_string()))?;

        tracing::trace!(tzid, resolved = %tz, "Resolved timezone");
        self.cache.insert(tzid.to_string(), tz);

        Ok(Zone::Iana(tz))
    }
}

/// Normalizes common calendar-client timezone identifiers to IANA names.
fn normalize_tzid(tzid: &str) -> String {
    let stripped = tzid
        .strip_prefix("/mozilla.org/")
        .or_else(|| tzid.strip_prefix("/softwarestudio.org/"))
        .unwrap_or(tzid);

    // Windows names first ("Eastern Standard Time")
    let windows_parser = WindowsParser::new();
    if let Some(tz) = windows_parser.parse(stripped, None) {
        let iana_parser = IanaParserExtended::new();
        for entry in iana_parser.iter() {
            if entry.time_zone == tz {
                return entry.canonical.to_string();
            }
        }
    }

    // Aliases such as Europe/Kiev -> Europe/Kyiv
    let iana_parser = IanaParserExtended::new();
    let parsed = iana_parser.parse(stripped);
    if parsed.time_zone != icu::time::TimeZone::UNKNOWN {
        return parsed.canonical.to_string();
    }

    stripped.to_string()
}

/// ## Summary
/// Places a wall-clock time in `zone`.
///
/// Ambiguous times (DST fold) resolve to the earlier instant.
///
/// ## Errors
///
/// Returns `ConversionError::NonExistentTime` if the time falls in a DST gap.
pub fn localize(zone: Zone, local: NaiveDateTime) -> Result<DateTime<Zone>, ConversionError> {
    match zone.from_local_datetime(&local) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Ok(dt),
        LocalResult::None => Err(ConversionError::NonExistentTime(format!(
            "{local} in timezone {zone}"
        ))),
    }
}

/// ## Summary
/// Like [`localize`], but shifts a time in a DST gap forward one hour.
///
/// ## Errors
///
/// Returns an error only if the shifted time is still nonexistent.
pub fn localize_lenient(
    zone: Zone,
    local: NaiveDateTime,
) -> Result<DateTime<Zone>, ConversionError> {
    match localize(zone, local) {
        Err(ConversionError::NonExistentTime(_)) => {
            localize(zone, local + chrono::Duration::hours(1))
        }
        other => other,
    }
}
