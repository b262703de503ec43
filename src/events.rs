use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::currency::FeedOutcome;
use crate::types::{CurrencyCode, SessionId};

/// all events that can be emitted by a calculator session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // calculation events
    CalculationCompleted {
        session_id: SessionId,
        principal: f64,
        annual_rate_percent: f64,
        term_months: u32,
        monthly_payment: f64,
        timestamp: DateTime<Utc>,
    },
    CalculationRejected {
        session_id: SessionId,
        reason: String,
        timestamp: DateTime<Utc>,
    },
    ScheduleReset {
        session_id: SessionId,
        timestamp: DateTime<Utc>,
    },

    // currency events
    CurrencySelected {
        session_id: SessionId,
        old_currency: CurrencyCode,
        new_currency: CurrencyCode,
        timestamp: DateTime<Utc>,
    },
    RatesRequested {
        session_id: SessionId,
        base: CurrencyCode,
        sequence: u64,
        timestamp: DateTime<Utc>,
    },
    RatesSettled {
        session_id: SessionId,
        base: CurrencyCode,
        sequence: u64,
        outcome: FeedOutcome,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
