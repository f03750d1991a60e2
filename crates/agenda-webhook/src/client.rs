//! Domain operations over the upstream webhooks.
//!
//! Each operation builds an outgoing payload (machine fields plus the
//! human-formatted fields the upstream expects), posts it, strips the
//! response envelope and normalizes the result. No retries, no caching; a
//! non-success status surfaces immediately as [`WebhookError::Upstream`].

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde_json::{json, Map, Value};
use tracing::instrument;
use url::Url;

use agenda_core::Config;
use agenda_temporal as temporal;

use crate::envelope::{is_truthy, unwrap_payload};
use crate::error::WebhookError;
use crate::normalize::{extract_calendars, extract_events, iso_utc, normalize_calendar, normalize_event};
use crate::types::{
    BlockMonthInput, Calendar, CalendarDraft, EditEventInput, Event, HolidayInput,
    ListEventsFilters, QuickScheduleInput,
};

pub struct WebhookClient {
    http: reqwest::Client,
    config: Arc<Config>,
}

impl WebhookClient {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn tz(&self) -> Tz {
        self.config.timezone
    }

    /// List events for a calendar and range.
    #[instrument(skip(self), level = "info")]
    pub async fn list_events(
        &self,
        filters: &ListEventsFilters,
    ) -> Result<Vec<Event>, WebhookError> {
        let tz = self.tz();
        let payload = json!({
            "tipo_busca": filters.search_mode.as_str(),
            "calendar_id": filters.calendar_id,
            "data_inicial": iso_utc(filters.start),
            "data_final": iso_utc(filters.end),
            "mes": filters.month,
            "ano": filters.year,
            "data_inicial_formatada": temporal::format_label(filters.start, tz),
            "data_final_formatada": temporal::format_label(filters.end, tz),
            "periodo": period_label(filters.start, filters.end, tz),
        });

        let response = self.post(&self.config.endpoints.list_events, &payload).await?;
        let content = unwrap_payload(response);
        Ok(extract_events(&content)
            .into_iter()
            .filter(|item| is_truthy(item))
            .map(|item| normalize_event(item, tz))
            .collect())
    }

    /// Create or update an event; an identifier makes it an update.
    #[instrument(skip(self, input), level = "info")]
    pub async fn edit_event(&self, input: &EditEventInput) -> Result<Value, WebhookError> {
        let mut payload = Map::new();
        if let Some(event_id) = &input.event_id {
            payload.insert("evento_id".to_string(), json!(event_id));
        }
        payload.insert("update".to_string(), json!(input.update));

        let response = self
            .post(&self.config.endpoints.edit_event, &Value::Object(payload))
            .await?;
        Ok(unwrap_payload(response))
    }

    /// Delete an event from a calendar.
    #[instrument(skip(self), level = "info")]
    pub async fn delete_event(
        &self,
        calendar_id: &str,
        event_id: &str,
    ) -> Result<Value, WebhookError> {
        let payload = json!({
            "calendar_id": calendar_id,
            "evento_id": event_id,
        });
        let response = self.post(&self.config.endpoints.delete_event, &payload).await?;
        Ok(unwrap_payload(response))
    }

    /// List the registered calendars.
    #[instrument(skip(self), level = "info")]
    pub async fn list_calendars(&self) -> Result<Vec<Calendar>, WebhookError> {
        let payload = json!({"action": "listar"});
        let response = self.post(&self.config.endpoints.calendars, &payload).await?;
        let content = unwrap_payload(response);
        Ok(extract_calendars(&content)
            .into_iter()
            .filter(|item| is_truthy(item))
            .map(normalize_calendar)
            .collect())
    }

    /// Register a new calendar.
    #[instrument(skip(self, draft), level = "info")]
    pub async fn create_calendar(&self, draft: &CalendarDraft) -> Result<Value, WebhookError> {
        let mut payload = Map::new();
        payload.insert("action".to_string(), json!("criar"));
        if let Value::Object(fields) = json!(draft) {
            payload.extend(fields);
        }

        let response = self
            .post(&self.config.endpoints.calendars, &Value::Object(payload))
            .await?;
        Ok(unwrap_payload(response))
    }

    /// Remove a calendar registration.
    #[instrument(skip(self), level = "info")]
    pub async fn remove_calendar(&self, calendar_id: &str) -> Result<Value, WebhookError> {
        let payload = json!({
            "action": "remover",
            "calendar_id": calendar_id,
        });
        let response = self.post(&self.config.endpoints.calendars, &payload).await?;
        Ok(unwrap_payload(response))
    }

    /// Quick-schedule a slot. The upstream expects a single-element array,
    /// always.
    #[instrument(skip(self, input), level = "info")]
    pub async fn schedule_slot(&self, input: &QuickScheduleInput) -> Result<Value, WebhookError> {
        let tz = input.timezone.unwrap_or_else(|| self.tz());
        let slot = json!({
            "calendar_id": input.calendar_id,
            "calendar_name": input.calendar_name,
            "titulo": input.title,
            "descricao": input.description,
            "nome": input.contact_name,
            "inicial": temporal::format_with_offset(input.start, tz),
            "final": temporal::format_with_offset(input.end, tz),
        });

        let response = self
            .post(&self.config.endpoints.schedule_slot, &json!([slot]))
            .await?;
        Ok(unwrap_payload(response))
    }

    /// Mark a full-day holiday, deriving the day range from the input date.
    #[instrument(skip(self, input), level = "info")]
    pub async fn mark_holiday(&self, input: &HolidayInput) -> Result<Value, WebhookError> {
        let tz = input.timezone.unwrap_or_else(|| self.tz());
        let date = resolve_civil_date(&input.date, tz)?;
        let (start, end) = temporal::day_range_from_date(date, tz)?;

        let feriado = json!({
            "calendar_id": input.calendar_id,
            "calendar_name": input.calendar_name,
            "titulo": "Feriado",
            "inicial": temporal::format_with_offset(start, tz),
            "final": temporal::format_with_offset(end, tz),
        });

        let response = self
            .post(&self.config.endpoints.mark_holiday, &json!([feriado]))
            .await?;
        Ok(unwrap_payload(response))
    }

    /// Block a whole calendar month.
    #[instrument(skip(self, input), level = "info")]
    pub async fn block_month(&self, input: &BlockMonthInput) -> Result<Value, WebhookError> {
        let tz = input.timezone.unwrap_or_else(|| self.tz());
        let range = temporal::month_range(input.month, input.year, tz)?;

        let bloqueio = json!({
            "calendar_id": input.calendar_id,
            "calendar_name": input.calendar_name,
            "titulo": "Bloqueado",
            "inicial": temporal::format_with_offset(range.start, tz),
            "final": temporal::format_with_offset(range.end, tz),
            "mes": input.month,
            "ano": input.year,
        });

        let response = self
            .post(&self.config.endpoints.block_month, &json!([bloqueio]))
            .await?;
        Ok(unwrap_payload(response))
    }

    /// POST the payload and tolerant-parse the response. Non-success carries
    /// the parsed body when there is one, the request payload otherwise.
    async fn post(&self, url: &Url, payload: &Value) -> Result<Value, WebhookError> {
        let response = self.http.post(url.clone()).json(payload).send().await?;
        let status = response.status();
        let body = response.json::<Value>().await.ok();

        if !status.is_success() {
            return Err(WebhookError::Upstream {
                url: url.to_string(),
                status: status.as_u16(),
                details: body.unwrap_or_else(|| payload.clone()),
            });
        }

        Ok(body.unwrap_or_else(|| json!({})))
    }
}

fn period_label(start: DateTime<Utc>, end: DateTime<Utc>, tz: Tz) -> String {
    format!(
        "{} até {}",
        temporal::to_civil(start, tz, "%d/%m/%Y"),
        temporal::to_civil(end, tz, "%d/%m/%Y")
    )
}

/// Accept a civil `yyyy-mm-dd` directly; otherwise read the civil date of an
/// ISO instant in `tz`.
fn resolve_civil_date(date: &str, tz: Tz) -> Result<NaiveDate, temporal::TemporalError> {
    if let Ok(parsed) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return Ok(parsed);
    }
    let instant = DateTime::parse_from_rfc3339(date)
        .map_err(|_| temporal::TemporalError::InvalidFormat(date.to_string()))?;
    Ok(instant.with_timezone(&tz).date_naive())
}
