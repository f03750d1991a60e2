//! Tolerant entity normalizers.
//!
//! Every upstream record is mapped to a canonical entity through ordered
//! candidate-key tables covering two dialects: the machine one (`id`,
//! `summary`, `start`...) and the legacy Portuguese one (`evento_id`,
//! `titulo`, `inicial`...). Every branch has a default; these functions never
//! fail and never panic, whatever JSON comes in.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use chrono_tz::Tz;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::envelope::is_truthy;
use crate::types::{Calendar, Event, EventDateTime};

/// Sentinel summary for events the upstream sent without one.
pub const UNTITLED_EVENT: &str = "Evento sem título";

const EVENT_ID_KEYS: &[&str] = &["id", "evento_id", "eventId"];
const EVENT_SUMMARY_KEYS: &[&str] = &["summary", "titulo"];
const EVENT_DESCRIPTION_KEYS: &[&str] = &["description", "descricao"];
const EVENT_LOCATION_KEYS: &[&str] = &["location", "localizacao"];
const EVENT_START_FALLBACK_KEYS: &[&str] = &["inicial", "data_evento", "startDate", "start_time"];
const EVENT_END_FALLBACK_KEYS: &[&str] = &["final", "data_final", "endDate", "end_time"];

const CALENDAR_ID_KEYS: &[&str] = &["id", "calendar_id", "calendarId", "Calendar ID"];
const CALENDAR_NAME_KEYS: &[&str] = &["name", "summary", "Calendar Name"];
const CALENDAR_TIMEZONE_KEYS: &[&str] = &["timezone", "timeZone", "Time Zone"];
const CALENDAR_DESCRIPTION_KEYS: &[&str] = &["description", "Default Reminders"];

const AFFIRMATIVE_MARKERS: &[&str] = &["yes", "true", "sim"];

/// Which edge of an all-day event a date-only marker describes.
#[derive(Clone, Copy)]
enum DayBoundary {
    Start,
    /// All-day end dates are exclusive: `2025-11-21` means the event ends at
    /// the last second of `2025-11-20`.
    End,
}

/// Map an arbitrary upstream record to a canonical [`Event`]. Total: every
/// missing or malformed field falls back to a default.
pub fn normalize_event(raw: &Value, tz: Tz) -> Event {
    let empty = Map::new();
    let record = raw.as_object().unwrap_or(&empty);

    let id = first_string(record, EVENT_ID_KEYS)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let summary =
        first_string(record, EVENT_SUMMARY_KEYS).unwrap_or_else(|| UNTITLED_EVENT.to_string());

    let start = resolve_event_time(record, "start", EVENT_START_FALLBACK_KEYS, DayBoundary::Start, tz)
        .unwrap_or_else(|| now_value(tz));
    let end = resolve_event_time(record, "end", EVENT_END_FALLBACK_KEYS, DayBoundary::End, tz)
        .unwrap_or_else(|| start.clone());

    Event {
        id,
        calendar_id: first_string(record, &["calendar_id"]),
        summary,
        description: first_string(record, EVENT_DESCRIPTION_KEYS),
        location: first_string(record, EVENT_LOCATION_KEYS),
        start,
        end,
        tipo_evento: first_string(record, &["tipo_evento"]),
        data_evento: first_string(record, &["data_evento"]),
        hora_evento: first_string(record, &["hora_evento"]),
        raw: Value::Object(record.clone()),
    }
}

/// Map an arbitrary upstream record to a canonical [`Calendar`], covering
/// both the machine dialect and the capitalized report dialect.
pub fn normalize_calendar(raw: &Value) -> Calendar {
    let empty = Map::new();
    let record = raw.as_object().unwrap_or(&empty);

    let id = first_string(record, CALENDAR_ID_KEYS)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let name = first_string(record, CALENDAR_NAME_KEYS).unwrap_or_else(|| id.clone());

    Calendar {
        id,
        name,
        description: first_string(record, CALENDAR_DESCRIPTION_KEYS),
        timezone: first_string(record, CALENDAR_TIMEZONE_KEYS),
        primary: coerce_bool(record.get("primary"))
            .or_else(|| coerce_bool(record.get("Primary Calendar"))),
        raw: Value::Object(record.clone()),
    }
}

/// Interpret any resolved date candidate as an [`EventDateTime`].
///
/// Strings already carrying a `Z` or numeric offset pass through unchanged;
/// offset-less civil strings are converted in `tz`; anything unrecognized
/// passes through best-effort instead of failing the caller.
pub fn normalize_date_field(value: &Value, tz: Tz) -> EventDateTime {
    match value {
        Value::String(s) => normalize_date_string(s.trim(), tz),
        Value::Object(record) => {
            if let Some(Value::String(date_time)) = record.get("dateTime") {
                let time_zone = match record.get("timeZone") {
                    Some(Value::String(z)) => z.clone(),
                    _ => tz.name().to_string(),
                };
                EventDateTime {
                    date_time: date_time.clone(),
                    time_zone: Some(time_zone),
                }
            } else {
                now_value(tz)
            }
        }
        _ => now_value(tz),
    }
}

/// Flatten an unwrapped calendars payload into candidate records: arrays are
/// recursed, `calendars`/`items` members are taken, a bare record stands for
/// itself.
pub fn extract_calendars(value: &Value) -> Vec<&Value> {
    if !is_truthy(value) {
        return Vec::new();
    }
    match value {
        Value::Array(items) => items.iter().flat_map(extract_calendars).collect(),
        Value::Object(record) => {
            if let Some(Value::Array(calendars)) = record.get("calendars") {
                return calendars.iter().collect();
            }
            if let Some(Value::Array(items)) = record.get("items") {
                return items.iter().collect();
            }
            vec![value]
        }
        _ => vec![value],
    }
}

/// Candidate event records from an unwrapped listing payload: an array as-is,
/// a record's first array-valued member (or the record itself), a scalar as a
/// singleton.
pub fn extract_events(content: &Value) -> Vec<&Value> {
    match content {
        Value::Array(items) => items.iter().collect(),
        Value::Object(record) => record
            .values()
            .find_map(Value::as_array)
            .map(|items| items.iter().collect())
            .unwrap_or_else(|| vec![content]),
        _ => vec![content],
    }
}

fn resolve_event_time(
    record: &Map<String, Value>,
    primary_key: &str,
    fallback_keys: &[&str],
    boundary: DayBoundary,
    tz: Tz,
) -> Option<EventDateTime> {
    if let Some(value) = record.get(primary_key) {
        match value {
            Value::Object(nested) => {
                if matches!(nested.get("dateTime"), Some(Value::String(_))) {
                    return Some(normalize_date_field(value, tz));
                }
                if let Some(date_value) = nested.get("date") {
                    if let Value::String(date) = date_value {
                        return Some(
                            expand_all_day(date, boundary, tz)
                                .unwrap_or_else(|| normalize_date_field(date_value, tz)),
                        );
                    }
                }
                return Some(normalize_date_field(value, tz));
            }
            Value::String(_) => return Some(normalize_date_field(value, tz)),
            _ => {}
        }
    }

    for key in fallback_keys {
        if let Some(value @ Value::String(_)) = record.get(*key) {
            return Some(normalize_date_field(value, tz));
        }
    }
    None
}

/// Expand a date-only all-day marker to an absolute instant: civil midnight
/// for starts, civil `23:59:59` of the preceding day for (exclusive) ends.
fn expand_all_day(date: &str, boundary: DayBoundary, tz: Tz) -> Option<EventDateTime> {
    let parsed = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
    let instant = match boundary {
        DayBoundary::Start => agenda_temporal::day_range_from_date(parsed, tz).ok()?.0,
        DayBoundary::End => {
            let last_active_day = parsed.pred_opt()?;
            agenda_temporal::day_range_from_date(last_active_day, tz).ok()?.1
        }
    };
    Some(EventDateTime {
        date_time: iso_utc(instant),
        time_zone: Some(tz.name().to_string()),
    })
}

fn normalize_date_string(value: &str, tz: Tz) -> EventDateTime {
    if value.contains('Z') || ends_with_numeric_offset(value) {
        return pass_through(value, tz);
    }
    if is_civil_datetime(value) || is_civil_date(value) {
        if let Ok(instant) = agenda_temporal::to_absolute(value, tz) {
            return EventDateTime {
                date_time: iso_utc(instant),
                time_zone: Some(tz.name().to_string()),
            };
        }
    }
    pass_through(value, tz)
}

fn pass_through(value: &str, tz: Tz) -> EventDateTime {
    EventDateTime {
        date_time: value.to_string(),
        time_zone: Some(tz.name().to_string()),
    }
}

fn now_value(tz: Tz) -> EventDateTime {
    EventDateTime {
        date_time: iso_utc(Utc::now()),
        time_zone: Some(tz.name().to_string()),
    }
}

/// ISO-8601 with milliseconds and `Z`, the shape the panel has always stored.
pub(crate) fn iso_utc(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// First candidate key holding a non-blank string, returned unchanged.
fn first_string(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match record.get(*key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    })
}

/// Tri-state boolean coercion: literal booleans pass, affirmative string
/// markers match case-insensitively, everything else stays unknown.
fn coerce_bool(value: Option<&Value>) -> Option<bool> {
    match value? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => Some(AFFIRMATIVE_MARKERS.contains(&s.to_lowercase().as_str())),
        _ => None,
    }
}

/// Trailing `+hh:mm` or `+hhmm` style numeric UTC offset.
fn ends_with_numeric_offset(value: &str) -> bool {
    let bytes = value.as_bytes();
    let all_digits = |range: &[u8]| range.iter().all(u8::is_ascii_digit);
    if bytes.len() >= 6 {
        let tail = &bytes[bytes.len() - 6..];
        if (tail[0] == b'+' || tail[0] == b'-')
            && tail[3] == b':'
            && all_digits(&tail[1..3])
            && all_digits(&tail[4..6])
        {
            return true;
        }
    }
    if bytes.len() >= 5 {
        let tail = &bytes[bytes.len() - 5..];
        if (tail[0] == b'+' || tail[0] == b'-') && all_digits(&tail[1..5]) {
            return true;
        }
    }
    false
}

/// Exactly `yyyy-mm-ddThh:mm:ss`, no offset.
fn is_civil_datetime(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 19
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes[10] == b'T'
        && bytes[13] == b':'
        && bytes[16] == b':'
        && [0usize, 1, 2, 3, 5, 6, 8, 9, 11, 12, 14, 15, 17, 18]
            .iter()
            .all(|&i| bytes[i].is_ascii_digit())
}

/// Exactly `yyyy-mm-dd`.
fn is_civil_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && [0usize, 1, 2, 3, 5, 6, 8, 9]
            .iter()
            .all(|&i| bytes[i].is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::Sao_Paulo;
    use serde_json::json;

    #[test]
    fn test_normalize_event_machine_dialect() {
        let raw = json!({
            "id": "evt-1",
            "summary": "Visita técnica",
            "description": "Checar instalação",
            "location": "Sala 2",
            "calendar_id": "cal-1",
            "start": {"dateTime": "2025-10-10T10:00:00.000Z"},
            "end": {"dateTime": "2025-10-10T11:00:00.000Z", "timeZone": "America/Bahia"},
            "tipo_evento": "Visita",
        });

        let event = normalize_event(&raw, Sao_Paulo);
        assert_eq!(event.id, "evt-1");
        assert_eq!(event.summary, "Visita técnica");
        assert_eq!(event.calendar_id.as_deref(), Some("cal-1"));
        assert_eq!(event.start.date_time, "2025-10-10T10:00:00.000Z");
        assert_eq!(event.start.time_zone.as_deref(), Some("America/Sao_Paulo"));
        assert_eq!(event.end.time_zone.as_deref(), Some("America/Bahia"));
        assert_eq!(event.tipo_evento.as_deref(), Some("Visita"));
        assert_eq!(event.raw, raw);
    }

    #[test]
    fn test_normalize_event_legacy_dialect() {
        let raw = json!({
            "evento_id": "evt-2",
            "titulo": "Consulta",
            "descricao": "Retorno",
            "localizacao": "Consultório",
            "inicial": "2025-10-10T09:00:00",
            "final": "2025-10-10T10:00:00",
        });

        let event = normalize_event(&raw, Sao_Paulo);
        assert_eq!(event.id, "evt-2");
        assert_eq!(event.summary, "Consulta");
        assert_eq!(event.description.as_deref(), Some("Retorno"));
        assert_eq!(event.location.as_deref(), Some("Consultório"));
        // Civil 09:00 in Sao Paulo is 12:00 UTC.
        assert_eq!(event.start.date_time, "2025-10-10T12:00:00.000Z");
        assert_eq!(event.end.date_time, "2025-10-10T13:00:00.000Z");
    }

    #[test]
    fn test_normalize_event_all_day_exclusive_end() {
        let raw = json!({
            "id": "evt-3",
            "summary": "Feriado",
            "start": {"date": "2025-11-20"},
            "end": {"date": "2025-11-21"},
        });

        let event = normalize_event(&raw, Sao_Paulo);
        // Civil midnight of the 20th.
        assert_eq!(event.start.date_time, "2025-11-20T03:00:00.000Z");
        // End date is exclusive: last second of the 20th, not midnight of the 21st.
        assert_eq!(event.end.date_time, "2025-11-21T02:59:59.000Z");
    }

    #[test]
    fn test_normalize_event_defaults() {
        let event = normalize_event(&json!({}), Sao_Paulo);
        assert!(!event.id.is_empty());
        assert_eq!(event.summary, UNTITLED_EVENT);
        assert!(event.description.is_none());
        // With no end candidate, the event is zero-length.
        assert_eq!(event.end, event.start);
    }

    #[test]
    fn test_normalize_event_is_total_over_garbage() {
        let inputs = [
            Value::Null,
            json!([]),
            json!([1, 2, 3]),
            json!("just a string"),
            json!(42),
            json!(true),
            json!({"start": {"weird": {"deep": [null]}}, "end": 7}),
            json!({"id": ["not", "a", "string"], "summary": {"x": 1}}),
            json!({"start": {"date": "not-a-date"}, "end": {"date": "9999-99-99"}}),
        ];
        for raw in &inputs {
            let event = normalize_event(raw, Sao_Paulo);
            assert!(!event.id.is_empty());
            assert!(!event.start.date_time.is_empty());
        }
    }

    #[test]
    fn test_malformed_all_day_date_passes_through() {
        let raw = json!({"start": {"date": "not-a-date"}});
        let event = normalize_event(&raw, Sao_Paulo);
        assert_eq!(event.start.date_time, "not-a-date");
    }

    #[test]
    fn test_normalize_date_field_variants() {
        // Already absolute: untouched, zone attached as metadata.
        let v = normalize_date_field(&json!("2025-10-01T12:00:00Z"), Sao_Paulo);
        assert_eq!(v.date_time, "2025-10-01T12:00:00Z");
        assert_eq!(v.time_zone.as_deref(), Some("America/Sao_Paulo"));

        let v = normalize_date_field(&json!("2025-10-01T12:00:00-03:00"), Sao_Paulo);
        assert_eq!(v.date_time, "2025-10-01T12:00:00-03:00");

        let v = normalize_date_field(&json!("2025-10-01T12:00:00+0300"), Sao_Paulo);
        assert_eq!(v.date_time, "2025-10-01T12:00:00+0300");

        // Civil wall-clock: converted in the configured zone.
        let v = normalize_date_field(&json!("2025-10-01T12:00:00"), Sao_Paulo);
        assert_eq!(v.date_time, "2025-10-01T15:00:00.000Z");

        // Bare date: civil midnight.
        let v = normalize_date_field(&json!("2025-10-01"), Sao_Paulo);
        assert_eq!(v.date_time, "2025-10-01T03:00:00.000Z");

        // Unrecognized string: best-effort pass-through.
        let v = normalize_date_field(&json!("next tuesday"), Sao_Paulo);
        assert_eq!(v.date_time, "next tuesday");
    }

    #[test]
    fn test_normalize_date_field_nested_object() {
        let v = normalize_date_field(
            &json!({"dateTime": "2025-10-01T12:00:00Z", "timeZone": "America/Bahia"}),
            Sao_Paulo,
        );
        assert_eq!(v.date_time, "2025-10-01T12:00:00Z");
        assert_eq!(v.time_zone.as_deref(), Some("America/Bahia"));

        // Object without a usable dateTime defaults to "now".
        let v = normalize_date_field(&json!({"foo": 1}), Sao_Paulo);
        assert!(!v.date_time.is_empty());
    }

    #[test]
    fn test_normalize_calendar_machine_dialect() {
        let raw = json!({
            "id": "cal-1",
            "summary": "Agenda principal",
            "timeZone": "America/Sao_Paulo",
            "primary": true,
        });
        let calendar = normalize_calendar(&raw);
        assert_eq!(calendar.id, "cal-1");
        assert_eq!(calendar.name, "Agenda principal");
        assert_eq!(calendar.timezone.as_deref(), Some("America/Sao_Paulo"));
        assert_eq!(calendar.primary, Some(true));
    }

    #[test]
    fn test_normalize_calendar_report_dialect() {
        let raw = json!({
            "Calendar ID": "agenda@group.calendar.google.com",
            "Calendar Name": "Agenda iClinic",
            "Time Zone": "America/Sao_Paulo",
            "Primary Calendar": "Yes",
        });
        let calendar = normalize_calendar(&raw);
        assert_eq!(calendar.id, "agenda@group.calendar.google.com");
        assert_eq!(calendar.name, "Agenda iClinic");
        assert_eq!(calendar.timezone.as_deref(), Some("America/Sao_Paulo"));
        assert_eq!(calendar.primary, Some(true));
    }

    #[test]
    fn test_primary_is_tristate() {
        assert_eq!(normalize_calendar(&json!({"primary": "sim"})).primary, Some(true));
        assert_eq!(normalize_calendar(&json!({"primary": "no"})).primary, Some(false));
        // Unknown must stay unknown, not become false.
        assert_eq!(normalize_calendar(&json!({"primary": 3})).primary, None);
        assert_eq!(normalize_calendar(&json!({})).primary, None);
    }

    #[test]
    fn test_calendar_name_falls_back_to_id() {
        let calendar = normalize_calendar(&json!({"id": "cal-9"}));
        assert_eq!(calendar.name, "cal-9");
    }

    #[test]
    fn test_extract_calendars_shapes() {
        let record = json!({"id": "cal-1"});
        assert_eq!(extract_calendars(&record), vec![&record]);

        let nested = json!([[{"id": "a"}], [{"id": "b"}]]);
        assert_eq!(extract_calendars(&nested).len(), 2);

        let keyed = json!({"count": 1, "calendars": [{"id": "a"}, {"id": "b"}]});
        assert_eq!(extract_calendars(&keyed).len(), 2);

        let items = json!({"items": [{"id": "a"}]});
        assert_eq!(extract_calendars(&items).len(), 1);

        assert!(extract_calendars(&Value::Null).is_empty());
    }

    #[test]
    fn test_extract_events_shapes() {
        let list = json!([{"id": "a"}, {"id": "b"}]);
        assert_eq!(extract_events(&list).len(), 2);

        let keyed = json!({"agenda": [{"id": "a"}]});
        assert_eq!(extract_events(&keyed).len(), 1);

        let single = json!({"id": "a"});
        assert_eq!(extract_events(&single), vec![&single]);

        let scalar = json!("x");
        assert_eq!(extract_events(&scalar), vec![&scalar]);
    }

    #[test]
    fn test_offset_detection() {
        assert!(ends_with_numeric_offset("2025-10-01T12:00:00-03:00"));
        assert!(ends_with_numeric_offset("2025-10-01T12:00:00+0530"));
        assert!(!ends_with_numeric_offset("2025-10-01"));
        assert!(!ends_with_numeric_offset("2025-10-01T12:00:00"));
    }
}
