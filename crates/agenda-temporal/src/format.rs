//! Civil/absolute conversion and formatting.

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::TemporalError;

/// Human label pattern used throughout the panel ("dd/mm/yyyy hh:mm").
pub const BRAZILIAN_PATTERN: &str = "%d/%m/%Y %H:%M";

/// Civil date key ("yyyy-mm-dd").
pub const DATE_KEY_PATTERN: &str = "%Y-%m-%d";

/// Civil timestamp with numeric UTC offset, the format the upstream expects
/// for `inicial`/`final` fields.
pub const OFFSET_PATTERN: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Civil timestamp without offset, as produced by `datetime-local` inputs.
pub const DATE_TIME_LOCAL_PATTERN: &str = "%Y-%m-%dT%H:%M";

/// Interpret a civil wall-clock string as local time in `tz` and return the
/// absolute instant.
///
/// Accepts `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DDTHH:MM` and bare `YYYY-MM-DD`
/// (midnight). Ambiguous wall-clock times (DST fall-back) resolve to the
/// earliest instant.
pub fn to_absolute(civil: &str, tz: Tz) -> Result<DateTime<Utc>, TemporalError> {
    let naive = parse_civil(civil)?;
    resolve_local(naive, tz, civil)
}

/// Format an absolute instant as a civil string in `tz`.
pub fn to_civil(instant: DateTime<Utc>, tz: Tz, pattern: &str) -> String {
    instant.with_timezone(&tz).format(pattern).to_string()
}

/// Format an instant with the panel's human label pattern.
pub fn format_label(instant: DateTime<Utc>, tz: Tz) -> String {
    to_civil(instant, tz, BRAZILIAN_PATTERN)
}

/// Civil date key (`yyyy-mm-dd`) of an instant in `tz`.
pub fn date_key(instant: DateTime<Utc>, tz: Tz) -> String {
    to_civil(instant, tz, DATE_KEY_PATTERN)
}

/// Civil timestamp with explicit offset, e.g. `2025-10-01T09:00:00-03:00`.
pub fn format_with_offset(instant: DateTime<Utc>, tz: Tz) -> String {
    to_civil(instant, tz, OFFSET_PATTERN)
}

/// Hour-of-day label (`hh:mm`) of an instant in `tz`.
pub fn hour_label(instant: DateTime<Utc>, tz: Tz) -> String {
    to_civil(instant, tz, "%H:%M")
}

fn parse_civil(value: &str) -> Result<NaiveDateTime, TemporalError> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, DATE_TIME_LOCAL_PATTERN) {
        return Ok(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_KEY_PATTERN) {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt);
        }
    }
    Err(TemporalError::InvalidFormat(value.to_string()))
}

pub(crate) fn resolve_local(
    naive: NaiveDateTime,
    tz: Tz,
    original: &str,
) -> Result<DateTime<Utc>, TemporalError> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => Err(TemporalError::NonexistentLocalTime {
            value: original.to_string(),
            tz: tz.name().to_string(),
        }),
    }
}
