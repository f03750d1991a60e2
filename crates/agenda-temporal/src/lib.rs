//! Timezone-aware date and range computation.
//!
//! Everything here is parameterized by an explicit [`chrono_tz::Tz`]; the
//! process-wide default lives in the caller's config and is threaded in per
//! call. Two conversions anchor the library: a civil wall-clock string
//! interpreted in a named zone, and an absolute instant formatted back into
//! that zone. Ranges (day, month, rolling window) are built on top of those.

pub mod error;
pub mod format;
pub mod range;

pub use error::TemporalError;
pub use format::{
    date_key, format_label, format_with_offset, hour_label, to_absolute, to_civil,
    BRAZILIAN_PATTERN, DATE_KEY_PATTERN, DATE_TIME_LOCAL_PATTERN, OFFSET_PATTERN,
};
pub use range::{
    day_range, day_range_from_date, month_range, month_year_of, rolling_range, TemporalRange,
};
