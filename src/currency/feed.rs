use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::rates::RateTable;
use crate::errors::Result;
use crate::types::CurrencyCode;

/// external collaborator that fetches a rate table for a base currency
pub trait RateSource {
    fn fetch(&self, base: &CurrencyCode) -> Result<RateTable>;
}

/// handle for one outstanding rate request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestTicket {
    pub sequence: u64,
    pub base: CurrencyCode,
}

/// what happened to a completed request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedOutcome {
    /// latest request succeeded, table replaced
    Applied,
    /// a newer request was issued since, response dropped
    Stale,
    /// latest request failed, previous table kept
    Failed,
}

/// latest accepted rate table plus request sequencing
#[derive(Debug, Clone, Default)]
pub struct RateFeed {
    issued: u64,
    pending: Option<u64>,
    table: Option<RateTable>,
    last_error: Option<String>,
    updated_at: Option<DateTime<Utc>>,
}

impl RateFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// start a request; any earlier outstanding ticket becomes stale
    pub fn begin(&mut self, base: CurrencyCode) -> RequestTicket {
        self.issued += 1;
        self.pending = Some(self.issued);
        debug!("rate request #{} for base {}", self.issued, base);
        RequestTicket {
            sequence: self.issued,
            base,
        }
    }

    /// settle a request with whatever the collaborator returned
    pub fn complete(
        &mut self,
        ticket: &RequestTicket,
        response: Result<RateTable>,
        time_provider: &SafeTimeProvider,
    ) -> FeedOutcome {
        if self.pending != Some(ticket.sequence) {
            debug!(
                "dropping stale rate response #{} (latest #{})",
                ticket.sequence, self.issued
            );
            return FeedOutcome::Stale;
        }
        self.pending = None;

        match response {
            Ok(table) => {
                info!(
                    "applied {} rates for base {} (request #{})",
                    table.len(),
                    table.base(),
                    ticket.sequence
                );
                self.table = Some(table);
                self.last_error = None;
                self.updated_at = Some(time_provider.now());
                FeedOutcome::Applied
            }
            Err(e) => {
                warn!("rate request #{} for {} failed: {}", ticket.sequence, ticket.base, e);
                self.last_error = Some(e.to_string());
                FeedOutcome::Failed
            }
        }
    }

    /// begin, fetch and complete in one step
    pub fn refresh(
        &mut self,
        source: &dyn RateSource,
        base: CurrencyCode,
        time_provider: &SafeTimeProvider,
    ) -> FeedOutcome {
        let ticket = self.begin(base);
        let response = source.fetch(&ticket.base);
        self.complete(&ticket, response, time_provider)
    }

    pub fn table(&self) -> Option<&RateTable> {
        self.table.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// when the current table was accepted
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CalculatorError;
    use chrono::{Duration, TimeZone};
    use hourglass_rs::TimeSource;
    use test_log::test;

    fn code(s: &str) -> CurrencyCode {
        CurrencyCode::new(s).unwrap()
    }

    fn table(base: &str, eur: f64) -> RateTable {
        RateTable::new(code(base), vec![(code("EUR"), eur)]).unwrap()
    }

    fn fetch_failed() -> CalculatorError {
        CalculatorError::RateFetch {
            message: "connection reset".to_string(),
        }
    }

    struct FixedSource(f64);

    impl RateSource for FixedSource {
        fn fetch(&self, base: &CurrencyCode) -> Result<RateTable> {
            RateTable::new(base.clone(), vec![(code("EUR"), self.0)])
        }
    }

    struct FailingSource;

    impl RateSource for FailingSource {
        fn fetch(&self, _base: &CurrencyCode) -> Result<RateTable> {
            Err(fetch_failed())
        }
    }

    #[test]
    fn test_latest_response_applied() {
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        ));
        let mut feed = RateFeed::new();
        assert!(feed.table().is_none());

        let ticket = feed.begin(code("USD"));
        assert!(feed.is_loading());

        let outcome = feed.complete(&ticket, Ok(table("USD", 0.9)), &time);
        assert_eq!(outcome, FeedOutcome::Applied);
        assert!(!feed.is_loading());
        assert_eq!(feed.table().and_then(|t| t.rate(&code("EUR"))), Some(0.9));
        assert_eq!(feed.updated_at(), Some(time.now()));
    }

    #[test]
    fn test_superseded_response_discarded() {
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        ));
        let mut feed = RateFeed::new();

        let first = feed.begin(code("USD"));
        let second = feed.begin(code("GBP"));

        // newer request lands first
        assert_eq!(
            feed.complete(&second, Ok(table("GBP", 1.15)), &time),
            FeedOutcome::Applied
        );
        assert_eq!(
            feed.complete(&first, Ok(table("USD", 0.9)), &time),
            FeedOutcome::Stale
        );
        assert_eq!(feed.table().map(|t| t.base().clone()), Some(code("GBP")));

        // stale even when it lands before the newer one
        let third = feed.begin(code("USD"));
        let fourth = feed.begin(code("EUR"));
        assert_eq!(feed.complete(&third, Ok(table("USD", 0.9)), &time), FeedOutcome::Stale);
        assert!(feed.is_loading());
        assert_eq!(feed.table().map(|t| t.base().clone()), Some(code("GBP")));
        assert_eq!(
            feed.complete(&fourth, Ok(RateTable::new(code("EUR"), vec![]).unwrap()), &time),
            FeedOutcome::Applied
        );
    }

    #[test]
    fn test_duplicate_completion_is_stale() {
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        ));
        let mut feed = RateFeed::new();

        let ticket = feed.begin(code("USD"));
        feed.complete(&ticket, Ok(table("USD", 0.9)), &time);
        assert_eq!(
            feed.complete(&ticket, Ok(table("USD", 0.1)), &time),
            FeedOutcome::Stale
        );
        assert_eq!(feed.table().and_then(|t| t.rate(&code("EUR"))), Some(0.9));
    }

    #[test]
    fn test_failure_keeps_previous_table() {
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        ));
        let control = time.test_control().unwrap();
        let mut feed = RateFeed::new();

        assert_eq!(feed.refresh(&FixedSource(0.9), code("USD"), &time), FeedOutcome::Applied);
        let applied_at = feed.updated_at();

        control.advance(Duration::minutes(5));
        assert_eq!(feed.refresh(&FailingSource, code("USD"), &time), FeedOutcome::Failed);

        assert_eq!(feed.table().and_then(|t| t.rate(&code("EUR"))), Some(0.9));
        assert_eq!(feed.updated_at(), applied_at);
        assert_eq!(feed.last_error(), Some("rate fetch failed: connection reset"));

        // next success clears the error
        control.advance(Duration::minutes(5));
        assert_eq!(feed.refresh(&FixedSource(0.8), code("USD"), &time), FeedOutcome::Applied);
        assert!(feed.last_error().is_none());
        assert_eq!(feed.updated_at(), Some(time.now()));
    }

    #[test]
    fn test_failure_before_any_table() {
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        ));
        let mut feed = RateFeed::new();

        assert_eq!(feed.refresh(&FailingSource, code("USD"), &time), FeedOutcome::Failed);
        assert!(feed.table().is_none());
        assert!(feed.last_error().is_some());
    }
}
