//! Day, month and rolling ranges with human labels.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::TemporalError;
use crate::format::{format_label, resolve_local, to_civil};

/// An immutable absolute range plus its civil-formatted labels.
#[derive(Debug, Clone, Serialize)]
pub struct TemporalRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub start_label: String,
    pub end_label: String,
    /// Period label in the upstream's own vocabulary ("dd/mm/yyyy até dd/mm/yyyy").
    pub label: String,
}

impl TemporalRange {
    fn new(start: DateTime<Utc>, end: DateTime<Utc>, tz: Tz) -> Self {
        Self {
            start,
            end,
            start_label: format_label(start, tz),
            end_label: format_label(end, tz),
            label: format!(
                "{} até {}",
                to_civil(start, tz, "%d/%m/%Y"),
                to_civil(end, tz, "%d/%m/%Y")
            ),
        }
    }
}

/// Civil `00:00:00`..`23:59:59` of `date` in `tz`, as absolute instants.
///
/// The end boundary is the inclusive last second of the day, not the next
/// midnight; upstream filters expect exactly this shape.
pub fn day_range_from_date(
    date: NaiveDate,
    tz: Tz,
) -> Result<(DateTime<Utc>, DateTime<Utc>), TemporalError> {
    let key = date.format("%Y-%m-%d").to_string();
    let start = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| TemporalError::InvalidFormat(key.clone()))?;
    let end = date
        .and_hms_opt(23, 59, 59)
        .ok_or_else(|| TemporalError::InvalidFormat(key.clone()))?;
    Ok((
        resolve_local(start, tz, &key)?,
        resolve_local(end, tz, &key)?,
    ))
}

/// Day range of the civil date that `instant` falls on in `tz`.
pub fn day_range(
    instant: DateTime<Utc>,
    tz: Tz,
) -> Result<(DateTime<Utc>, DateTime<Utc>), TemporalError> {
    day_range_from_date(instant.with_timezone(&tz).date_naive(), tz)
}

/// Range covering a whole calendar month in `tz`, leap-year aware.
pub fn month_range(month: u32, year: i32, tz: Tz) -> Result<TemporalRange, TemporalError> {
    let first =
        NaiveDate::from_ymd_opt(year, month, 1).ok_or(TemporalError::InvalidDate { month, year })?;
    let last = last_day_of_month(first).ok_or(TemporalError::InvalidDate { month, year })?;

    let (start, _) = day_range_from_date(first, tz)?;
    let (_, end) = day_range_from_date(last, tz)?;
    Ok(TemporalRange::new(start, end, tz))
}

/// Rolling window: civil midnight of `base`'s civil date through civil
/// `23:59:59` of the date `days` later.
///
/// The end date is derived by shifting the start instant by exact 24-hour
/// days and re-reading its civil date, so a DST transition inside the window
/// can move the visible end date by one. Kept as-is for compatibility with
/// the ranges the upstream already stores.
pub fn rolling_range(
    base: DateTime<Utc>,
    days: i64,
    tz: Tz,
) -> Result<TemporalRange, TemporalError> {
    let base_date = base.with_timezone(&tz).date_naive();
    let (start, _) = day_range_from_date(base_date, tz)?;

    let shifted = start + Duration::days(days);
    let end_date = shifted.with_timezone(&tz).date_naive();
    let (_, end) = day_range_from_date(end_date, tz)?;

    Ok(TemporalRange::new(start, end, tz))
}

/// Civil `(month, year)` of an instant in `tz`.
pub fn month_year_of(instant: DateTime<Utc>, tz: Tz) -> (u32, i32) {
    let civil = instant.with_timezone(&tz);
    (civil.month(), civil.year())
}

fn last_day_of_month(first: NaiveDate) -> Option<NaiveDate> {
    let next_month = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    next_month.and_then(|d| d.pred_opt())
}
