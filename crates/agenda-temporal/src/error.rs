//! Temporal error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemporalError {
    #[error("Could not parse civil date/time: {0}")]
    InvalidFormat(String),

    #[error("Local time {value} does not exist in {tz} (DST gap)")]
    NonexistentLocalTime { value: String, tz: String },

    #[error("No such calendar date: month {month}, year {year}")]
    InvalidDate { month: u32, year: i32 },
}
