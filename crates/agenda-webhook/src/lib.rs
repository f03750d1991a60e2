//! Webhook normalization engine for the agenda panel.
//!
//! The upstream endpoints return envelope-wrapped, field-name-varying JSON.
//! This crate strips the envelopes, maps the records into two canonical
//! entities (event, calendar) and exposes the domain operations that talk to
//! the webhooks. Normalization is total: data-shape irregularities are
//! absorbed with defaults, and only transport failures surface as errors.

pub mod client;
pub mod envelope;
pub mod error;
pub mod normalize;
pub mod types;

pub use client::WebhookClient;
pub use envelope::unwrap_payload;
pub use error::WebhookError;
pub use normalize::{
    extract_calendars, extract_events, normalize_calendar, normalize_date_field, normalize_event,
};
pub use types::{
    BlockMonthInput, Calendar, CalendarDraft, EditEventInput, Event, EventDateTime, EventUpdate,
    HolidayInput, ListEventsFilters, QuickScheduleInput, SearchMode,
};
