use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::{CalculatorError, Result};
use crate::pagination::{Page, Paginator};
use crate::types::CurrencyCode;

/// conversion multipliers relative to a base currency, sorted by code
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateTable {
    base: CurrencyCode,
    rates: Vec<(CurrencyCode, f64)>,
    last_updated: Option<DateTime<Utc>>,
}

impl RateTable {
    /// build a table; the base is inserted at exactly 1 when missing
    pub fn new(
        base: CurrencyCode,
        rates: impl IntoIterator<Item = (CurrencyCode, f64)>,
    ) -> Result<Self> {
        let mut sorted = BTreeMap::new();
        for (code, rate) in rates {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(CalculatorError::InvalidRate {
                    code: code.to_string(),
                    rate,
                });
            }
            sorted.insert(code, rate);
        }

        match sorted.get(&base) {
            Some(&rate) if rate != 1.0 => {
                return Err(CalculatorError::InvalidRate {
                    code: base.to_string(),
                    rate,
                });
            }
            Some(_) => {}
            None => {
                sorted.insert(base.clone(), 1.0);
            }
        }

        Ok(Self {
            base,
            rates: sorted.into_iter().collect(),
            last_updated: None,
        })
    }

    pub fn with_last_updated(mut self, timestamp: DateTime<Utc>) -> Self {
        self.last_updated = Some(timestamp);
        self
    }

    pub fn base(&self) -> &CurrencyCode {
        &self.base
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn rate(&self, code: &CurrencyCode) -> Option<f64> {
        self.rates
            .binary_search_by(|(c, _)| c.cmp(code))
            .ok()
            .map(|idx| self.rates[idx].1)
    }

    pub fn contains(&self, code: &CurrencyCode) -> bool {
        self.rate(code).is_some()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// all entries in code order
    pub fn entries(&self) -> &[(CurrencyCode, f64)] {
        &self.rates
    }

    pub fn codes(&self) -> impl Iterator<Item = &CurrencyCode> {
        self.rates.iter().map(|(code, _)| code)
    }

    pub fn page(&self, paginator: &Paginator, requested: usize) -> Page<'_, (CurrencyCode, f64)> {
        paginator.page(&self.rates, requested)
    }
}

/// payload returned by the exchange-rate provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatesResponse {
    pub result: String,
    #[serde(default)]
    pub base_code: Option<String>,
    #[serde(default)]
    pub time_last_update_unix: Option<i64>,
    #[serde(default)]
    pub conversion_rates: BTreeMap<String, f64>,
    #[serde(default, rename = "error-type")]
    pub error_type: Option<String>,
}

impl RatesResponse {
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| CalculatorError::RateFetch {
            message: format!("malformed rates payload: {}", e),
        })
    }

    /// validate the payload and turn it into a table
    pub fn into_table(self) -> Result<RateTable> {
        if self.result != "success" {
            return Err(CalculatorError::RateFetch {
                message: self
                    .error_type
                    .unwrap_or_else(|| format!("provider returned result {:?}", self.result)),
            });
        }

        let base_code = self.base_code.ok_or_else(|| CalculatorError::RateFetch {
            message: "payload has no base_code".to_string(),
        })?;
        let base = CurrencyCode::new(&base_code).map_err(rejected_payload)?;

        let mut rates = Vec::with_capacity(self.conversion_rates.len());
        for (code, rate) in self.conversion_rates {
            rates.push((CurrencyCode::new(&code).map_err(rejected_payload)?, rate));
        }

        let table = RateTable::new(base, rates).map_err(rejected_payload)?;
        Ok(match self.time_last_update_unix.and_then(|secs| DateTime::from_timestamp(secs, 0)) {
            Some(ts) => table.with_last_updated(ts),
            None => table,
        })
    }
}

/// provider data that fails validation is a failed fetch
fn rejected_payload(err: CalculatorError) -> CalculatorError {
    CalculatorError::RateFetch {
        message: format!("rejected rates payload: {}", err),
    }
}
