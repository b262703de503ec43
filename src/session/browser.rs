use hourglass_rs::SafeTimeProvider;
use log::debug;

use crate::config::CalculatorConfig;
use crate::currency::{FeedOutcome, RateFeed, RateSource, RateTable, RequestTicket};
use crate::errors::Result;
use crate::pagination::{Page, Paginator};
use crate::types::CurrencyCode;

/// exchange-rate listing: chosen base, current page, latest table
#[derive(Debug, Clone)]
pub struct RatesBrowser {
    base: CurrencyCode,
    page: usize,
    paginator: Paginator,
    feed: RateFeed,
}

impl RatesBrowser {
    pub fn new(config: &CalculatorConfig) -> Result<Self> {
        Ok(Self {
            base: config.base_currency.clone(),
            page: 1,
            paginator: config.paginator()?,
            feed: RateFeed::new(),
        })
    }

    /// base the user last chose; may run ahead of the listed table
    pub fn base(&self) -> &CurrencyCode {
        &self.base
    }

    /// base of the table actually being listed
    ///
    /// differs from [`RatesBrowser::base`] while a request is in flight or
    /// after the latest one failed, since the previous table stays on screen
    pub fn listed_base(&self) -> Option<&CurrencyCode> {
        self.feed.table().map(RateTable::base)
    }

    pub fn feed(&self) -> &RateFeed {
        &self.feed
    }

    /// switch base currency, back to page 1, and request fresh rates
    pub fn select_base(&mut self, base: CurrencyCode) -> RequestTicket {
        debug!("rates browser base {} -> {}", self.base, base);
        self.base = base;
        self.page = 1;
        self.feed.begin(self.base.clone())
    }

    pub fn complete(
        &mut self,
        ticket: &RequestTicket,
        response: Result<RateTable>,
        time_provider: &SafeTimeProvider,
    ) -> FeedOutcome {
        let outcome = self.feed.complete(ticket, response, time_provider);
        if outcome == FeedOutcome::Applied {
            self.page = self.clamped(self.page);
        }
        outcome
    }

    /// request rates for the current base
    pub fn refresh(&mut self, source: &dyn RateSource, time_provider: &SafeTimeProvider) -> FeedOutcome {
        let ticket = self.feed.begin(self.base.clone());
        let response = source.fetch(&ticket.base);
        self.complete(&ticket, response, time_provider)
    }

    fn len(&self) -> usize {
        self.feed.table().map(RateTable::len).unwrap_or(0)
    }

    fn clamped(&self, requested: usize) -> usize {
        self.paginator.clamp(requested, self.len())
    }

    pub fn page_number(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self) -> usize {
        self.paginator.total_pages(self.len())
    }

    pub fn go_to(&mut self, page: usize) -> usize {
        self.page = self.clamped(page);
        self.page
    }

    pub fn next_page(&mut self) -> usize {
        self.go_to(self.page.saturating_add(1))
    }

    pub fn previous_page(&mut self) -> usize {
        self.go_to(self.page.saturating_sub(1))
    }

    /// current page of `(code, rate)` pairs, `None` until a table has loaded
    pub fn current_page(&self) -> Option<Page<'_, (CurrencyCode, f64)>> {
        self.feed
            .table()
            .map(|table| table.page(&self.paginator, self.page))
    }
}
