//! serialization support for sessions
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::LoanSession;
use crate::decimal::format_amount;
use crate::theme::Theme;
use crate::types::{CurrencyCode, SessionId};

/// serializable view of a session's state
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionView {
    pub id: SessionId,
    pub base_currency: CurrencyCode,
    pub selected_currency: CurrencyCode,
    pub default_theme: Theme,
    pub monthly_payment: Option<String>,
    pub term_months: Option<u32>,
    pub total_interest: Option<String>,
    pub rates_loaded: bool,
    pub rates_loading: bool,
    pub rates_error: Option<String>,
    pub rates_updated_at: Option<DateTime<Utc>>,
    pub event_count: usize,
}

impl SessionView {
    /// amounts are shown in the base currency, unconverted
    pub fn from_session(session: &LoanSession) -> Self {
        let result = session.result();
        SessionView {
            id: session.id,
            base_currency: session.config.base_currency.clone(),
            selected_currency: session.selected_currency().clone(),
            default_theme: session.config.default_theme,
            monthly_payment: result.map(|r| format_amount(r.monthly_payment)),
            term_months: result.map(|r| r.term_months()),
            total_interest: result.map(|r| format_amount(r.total_interest())),
            rates_loaded: session.rates().table().is_some(),
            rates_loading: session.rates().is_loading(),
            rates_error: session.rates().last_error().map(str::to_string),
            rates_updated_at: session.rates().updated_at(),
            event_count: session.events.len(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
