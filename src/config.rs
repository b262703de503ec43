use serde::{Deserialize, Serialize};

use crate::errors::{CalculatorError, Result};
use crate::pagination::{Paginator, DEFAULT_PAGE_SIZE};
use crate::theme::Theme;
use crate::types::{CurrencyCode, LoanInput};

/// calculator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorConfig {
    pub base_currency: CurrencyCode,
    pub selectable_currencies: Vec<CurrencyCode>,
    pub default_input: LoanInput,
    pub rates_page_size: usize,
    pub default_theme: Theme,
    /// provider url with a `{base}` placeholder, consumed by the fetch collaborator
    pub rates_endpoint: Option<String>,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self::usd()
    }
}

impl CalculatorConfig {
    /// usd-based calculator with the stock form values
    pub fn usd() -> Self {
        Self::with_base(CurrencyCode::usd())
    }

    /// same defaults around another base currency
    pub fn with_base(base_currency: CurrencyCode) -> Self {
        Self {
            base_currency,
            selectable_currencies: crate::currency::CurrencyConverter::selectable(),
            default_input: LoanInput::new(100_000.0, 8.5, 5.0),
            rates_page_size: DEFAULT_PAGE_SIZE,
            default_theme: Theme::Light,
            rates_endpoint: None,
        }
    }

    pub fn from_json(body: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(body)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rates_page_size == 0 {
            return Err(CalculatorError::InvalidConfiguration {
                message: "rates_page_size must be at least 1".to_string(),
            });
        }

        if !self.selectable_currencies.is_empty()
            && !self.selectable_currencies.contains(&self.base_currency)
        {
            return Err(CalculatorError::InvalidConfiguration {
                message: format!(
                    "base currency {} missing from selectable currencies",
                    self.base_currency
                ),
            });
        }

        if let Some(endpoint) = &self.rates_endpoint {
            if !endpoint.contains("{base}") {
                return Err(CalculatorError::InvalidConfiguration {
                    message: "rates_endpoint needs a {base} placeholder".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn paginator(&self) -> Result<Paginator> {
        Paginator::new(self.rates_page_size)
    }

    /// provider url for a base currency, if an endpoint is configured
    pub fn rates_url(&self, base: &CurrencyCode) -> Option<String> {
        self.rates_endpoint
            .as_ref()
            .map(|endpoint| endpoint.replace("{base}", base.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CalculatorConfig::default();

        assert_eq!(config.base_currency, "USD");
        assert_eq!(config.rates_page_size, 20);
        assert_eq!(config.default_input, LoanInput::new(100_000.0, 8.5, 5.0));
        assert_eq!(config.selectable_currencies.len(), 7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json() {
        let body = r#"{
            "base_currency": "eur",
            "selectable_currencies": ["EUR", "USD"],
            "default_input": { "principal": 5000, "annual_rate_percent": 4, "term_years": 2 },
            "rates_page_size": 10,
            "default_theme": "dark",
            "rates_endpoint": "https://rates.example/latest/{base}"
        }"#;

        let config = CalculatorConfig::from_json(body).unwrap();
        assert_eq!(config.base_currency, "EUR");
        assert_eq!(config.default_theme, Theme::Dark);
        assert_eq!(config.paginator().unwrap().page_size(), 10);
        assert_eq!(
            config.rates_url(&config.base_currency).as_deref(),
            Some("https://rates.example/latest/EUR")
        );
    }

    #[test]
    fn test_validation_failures() {
        let mut config = CalculatorConfig::default();
        config.rates_page_size = 0;
        assert!(config.validate().is_err());

        let mut config = CalculatorConfig::with_base(CurrencyCode::new("CHF").unwrap());
        assert!(config.validate().is_err());
        config.selectable_currencies.clear();
        assert!(config.validate().is_ok());

        let mut config = CalculatorConfig::default();
        config.rates_endpoint = Some("https://rates.example/latest".to_string());
        assert!(config.validate().is_err());

        assert!(CalculatorConfig::from_json("{}").is_err());
    }
}
