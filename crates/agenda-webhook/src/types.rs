//! Canonical entities and typed operation inputs.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Absolute timestamp plus the civil timezone it was interpreted in.
///
/// `date_time` stays a string: unparseable upstream values are carried
/// through verbatim rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDateTime {
    #[serde(rename = "dateTime")]
    pub date_time: String,
    #[serde(rename = "timeZone", skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

/// Canonical calendar event, built fresh per fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_id: Option<String>,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start: EventDateTime,
    pub end: EventDateTime,
    /// Echo-back fields in the upstream's own vocabulary, carried unchanged
    /// for round-tripping.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipo_evento: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_evento: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hora_evento: Option<String>,
    /// Original upstream record, never mutated.
    pub raw: Value,
}

/// Canonical calendar registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Calendar {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// Tri-state: `None` means unknown, which callers must not conflate with
    /// "not primary".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,
    pub raw: Value,
}

/// Upstream search mode for event listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Individual,
    Mensal,
    Periodo,
}

impl SearchMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchMode::Individual => "individual",
            SearchMode::Mensal => "mensal",
            SearchMode::Periodo => "periodo",
        }
    }
}

/// Filters for the event listing operation.
#[derive(Debug, Clone)]
pub struct ListEventsFilters {
    pub calendar_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub month: u32,
    pub year: i32,
    pub search_mode: SearchMode,
}

/// Event fields sent to the create-or-update webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventUpdate {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start: EventDateTime,
    pub end: EventDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipo_evento: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_evento: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hora_evento: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_id: Option<String>,
}

/// Create-or-update input: an identifier makes it an update.
#[derive(Debug, Clone)]
pub struct EditEventInput {
    pub event_id: Option<String>,
    pub update: EventUpdate,
}

/// Fields for calendar creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

/// Input for the quick-schedule operation.
#[derive(Debug, Clone)]
pub struct QuickScheduleInput {
    pub calendar_id: String,
    pub calendar_name: String,
    pub title: String,
    pub description: String,
    pub contact_name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub timezone: Option<Tz>,
}

/// Input for the holiday-marking operation. `date` accepts a civil
/// `yyyy-mm-dd` or an ISO instant.
#[derive(Debug, Clone)]
pub struct HolidayInput {
    pub calendar_id: String,
    pub calendar_name: String,
    pub date: String,
    pub timezone: Option<Tz>,
}

/// Input for the month-blocking operation.
#[derive(Debug, Clone)]
pub struct BlockMonthInput {
    pub calendar_id: String,
    pub calendar_name: String,
    pub month: u32,
    pub year: i32,
    pub timezone: Option<Tz>,
}
