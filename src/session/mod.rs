pub mod browser;
pub mod serialization;

use hourglass_rs::SafeTimeProvider;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::CalculatorConfig;
use crate::currency::{CurrencyConverter, FeedOutcome, RateFeed, RateSource, RateTable, RequestTicket};
use crate::errors::{CalculatorError, Result};
use crate::events::{Event, EventStore};
use crate::payments::{compute_for, AmortizationResult};
use crate::types::{CurrencyCode, LoanInput, SessionId};

pub use browser::RatesBrowser;
pub use serialization::SessionView;

/// one schedule line, converted and formatted for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub month: u32,
    pub principal: String,
    pub interest: String,
    pub balance: String,
}

/// calculator screen state: last result, display currency and rates
pub struct LoanSession {
    pub id: SessionId,
    pub config: CalculatorConfig,
    pub events: EventStore,
    converter: CurrencyConverter,
    feed: RateFeed,
    last_input: Option<LoanInput>,
    result: Option<AmortizationResult>,
}

impl LoanSession {
    pub fn new(config: CalculatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            id: Uuid::new_v4(),
            converter: CurrencyConverter::new(config.base_currency.clone()),
            config,
            events: EventStore::new(),
            feed: RateFeed::new(),
            last_input: None,
            result: None,
        })
    }

    /// run the engine; on failure the previous result stays in place
    pub fn calculate(
        &mut self,
        input: &LoanInput,
        time_provider: &SafeTimeProvider,
    ) -> Result<&AmortizationResult> {
        let result = match compute_for(input) {
            Ok(result) => result,
            Err(e) => {
                warn!("session {}: calculation rejected: {}", self.id, e);
                self.events.emit(Event::CalculationRejected {
                    session_id: self.id,
                    reason: e.to_string(),
                    timestamp: time_provider.now(),
                });
                return Err(e);
            }
        };

        info!(
            "session {}: monthly payment {} over {} months",
            self.id,
            result.monthly_payment,
            result.term_months()
        );
        self.events.emit(Event::CalculationCompleted {
            session_id: self.id,
            principal: result.principal,
            annual_rate_percent: result.annual_rate_percent,
            term_months: result.term_months(),
            monthly_payment: result.monthly_payment,
            timestamp: time_provider.now(),
        });

        self.last_input = Some(*input);
        Ok(&*self.result.insert(result))
    }

    /// parse raw form fields, then calculate
    pub fn calculate_from_text(
        &mut self,
        principal: &str,
        annual_rate_percent: &str,
        term_years: &str,
        time_provider: &SafeTimeProvider,
    ) -> Result<&AmortizationResult> {
        let input = match LoanInput::parse(principal, annual_rate_percent, term_years) {
            Ok(input) => input,
            Err(e) => {
                self.events.emit(Event::CalculationRejected {
                    session_id: self.id,
                    reason: e.to_string(),
                    timestamp: time_provider.now(),
                });
                return Err(e);
            }
        };
        self.calculate(&input, time_provider)
    }

    /// drop the current schedule
    pub fn reset(&mut self, time_provider: &SafeTimeProvider) {
        if self.result.take().is_some() {
            self.events.emit(Event::ScheduleReset {
                session_id: self.id,
                timestamp: time_provider.now(),
            });
        }
    }

    pub fn result(&self) -> Option<&AmortizationResult> {
        self.result.as_ref()
    }

    pub fn last_input(&self) -> Option<&LoanInput> {
        self.last_input.as_ref()
    }

    pub fn selected_currency(&self) -> &CurrencyCode {
        self.converter.selected()
    }

    /// form values to prefill before the user edits anything
    pub fn default_input(&self) -> &LoanInput {
        &self.config.default_input
    }

    /// calculate with the configured form defaults
    pub fn calculate_default(
        &mut self,
        time_provider: &SafeTimeProvider,
    ) -> Result<&AmortizationResult> {
        let input = self.config.default_input;
        self.calculate(&input, time_provider)
    }

    /// switch the display currency; only configured currencies are offered
    pub fn select_currency(
        &mut self,
        code: CurrencyCode,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        let offered = &self.config.selectable_currencies;
        if !offered.is_empty() && !offered.contains(&code) {
            return Err(CalculatorError::UnknownCurrency {
                code: code.to_string(),
            });
        }
        if &code == self.converter.selected() {
            return Ok(());
        }
        self.events.emit(Event::CurrencySelected {
            session_id: self.id,
            old_currency: self.converter.selected().clone(),
            new_currency: code.clone(),
            timestamp: time_provider.now(),
        });
        self.converter.select(code);
        Ok(())
    }

    pub fn rates(&self) -> &RateFeed {
        &self.feed
    }

    fn rate_table(&self) -> Option<&RateTable> {
        self.feed.table()
    }

    /// start a rate request for the configured base
    pub fn begin_rates_request(&mut self, time_provider: &SafeTimeProvider) -> RequestTicket {
        let ticket = self.feed.begin(self.config.base_currency.clone());
        self.events.emit(Event::RatesRequested {
            session_id: self.id,
            base: ticket.base.clone(),
            sequence: ticket.sequence,
            timestamp: time_provider.now(),
        });
        ticket
    }

    pub fn complete_rates_request(
        &mut self,
        ticket: &RequestTicket,
        response: Result<RateTable>,
        time_provider: &SafeTimeProvider,
    ) -> FeedOutcome {
        let outcome = self.feed.complete(ticket, response, time_provider);
        self.events.emit(Event::RatesSettled {
            session_id: self.id,
            base: ticket.base.clone(),
            sequence: ticket.sequence,
            outcome,
            timestamp: time_provider.now(),
        });
        outcome
    }

    pub fn refresh_rates(
        &mut self,
        source: &dyn RateSource,
        time_provider: &SafeTimeProvider,
    ) -> FeedOutcome {
        let ticket = self.begin_rates_request(time_provider);
        let response = source.fetch(&ticket.base);
        self.complete_rates_request(&ticket, response, time_provider)
    }

    /// symbol plus converted payment, `None` before the first calculation
    pub fn monthly_payment_display(&self) -> Result<Option<String>> {
        self.result
            .as_ref()
            .map(|r| self.converter.display(r.monthly_payment, self.rate_table()))
            .transpose()
    }

    /// every schedule line converted into the selected currency
    pub fn rows(&self) -> Result<Vec<ScheduleRow>> {
        let Some(result) = &self.result else {
            return Ok(Vec::new());
        };
        let table = self.rate_table();

        result
            .entries
            .iter()
            .map(|entry| -> Result<ScheduleRow> {
                Ok(ScheduleRow {
                    month: entry.month,
                    principal: self.converter.format(entry.principal_paid, table)?,
                    interest: self.converter.format(entry.interest_paid, table)?,
                    balance: self.converter.format(entry.remaining_balance, table)?,
                })
            })
            .collect()
    }

    /// get json representation of current state
    pub fn to_json_pretty(&self) -> String {
        let view = SessionView::from_session(self);
        serde_json::to_string_pretty(&view).unwrap_or_else(|e| format!("JSON error: {}", e))
    }

    /// short alias for json output
    pub fn json(&self) -> String {
        self.to_json_pretty()
    }
}
