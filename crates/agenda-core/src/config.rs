//! Engine configuration.
//!
//! Built once at process start and passed by reference into the webhook
//! client; none of the temporal or normalization code reads globals.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

/// Civil timezone used when the environment provides none.
pub const DEFAULT_TIMEZONE: &str = "America/Sao_Paulo";

/// Upstream webhook endpoints, one per domain operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoints {
    /// Event listing ("ver agenda").
    pub list_events: Url,

    /// Event create-or-update ("editar evento").
    pub edit_event: Url,

    /// Event removal ("deletar evento").
    pub delete_event: Url,

    /// Calendar listing/creation/removal ("id agendas").
    pub calendars: Url,

    /// Quick slot scheduling ("marcar agendamento").
    pub schedule_slot: Url,

    /// Full-day holiday marking ("marcar feriado").
    pub mark_holiday: Url,

    /// Whole-month blocking ("bloquear mês").
    pub block_month: Url,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Civil timezone all date/range computation is anchored to.
    pub timezone: Tz,

    /// Upstream webhook endpoints.
    pub endpoints: Endpoints,
}

impl Config {
    /// Build a config from explicit values, validating the timezone name.
    pub fn new(timezone: &str, endpoints: Endpoints) -> Result<Self, ConfigError> {
        let timezone = timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::UnknownTimezone(timezone.to_string()))?;
        Ok(Self {
            timezone,
            endpoints,
        })
    }

    /// Load the config from the environment.
    ///
    /// Reads one variable per webhook endpoint plus `DEFAULT_TIMEZONE`
    /// (falling back to America/Sao_Paulo).
    pub fn from_env() -> Result<Self, ConfigError> {
        let endpoints = Endpoints {
            list_events: required_url("VER_AGENDA_WEBHOOK")?,
            edit_event: required_url("EDITAR_EVENTO_WEBHOOK")?,
            delete_event: required_url("DELETAR_EVENTO_WEBHOOK")?,
            calendars: required_url("ID_AGENDAS_WEBHOOK")?,
            schedule_slot: required_url("MARCAR_EVENTO_WEBHOOK")?,
            mark_holiday: required_url("MARCAR_FERIADO_WEBHOOK")?,
            block_month: required_url("BLOQUEAR_MES_WEBHOOK")?,
        };

        let timezone =
            std::env::var("DEFAULT_TIMEZONE").unwrap_or_else(|_| DEFAULT_TIMEZONE.to_string());

        Self::new(&timezone, endpoints)
    }
}

fn required_url(name: &str) -> Result<Url, ConfigError> {
    let value =
        std::env::var(name).map_err(|_| ConfigError::MissingSetting(name.to_string()))?;
    Url::parse(&value).map_err(|e| ConfigError::InvalidUrl {
        name: name.to_string(),
        message: e.to_string(),
    })
}
