use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::{CalculatorError, Result};

/// unique identifier for a calculator session
pub type SessionId = Uuid;

/// three-letter currency code, always upper case
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// parse and normalize a code like "usd" or "EUR"
    pub fn new(code: &str) -> Result<Self> {
        let trimmed = code.trim();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CalculatorError::InvalidCurrencyCode {
                code: code.to_string(),
            });
        }
        Ok(CurrencyCode(trimmed.to_ascii_uppercase()))
    }

    /// default base currency of the rate provider
    pub fn usd() -> Self {
        CurrencyCode("USD".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CurrencyCode {
    type Err = CalculatorError;

    fn from_str(s: &str) -> Result<Self> {
        CurrencyCode::new(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = CalculatorError;

    fn try_from(value: String) -> Result<Self> {
        CurrencyCode::new(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl PartialEq<&str> for CurrencyCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// loan parameters as entered on the calculator form
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanInput {
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub term_years: f64,
}

impl LoanInput {
    pub fn new(principal: f64, annual_rate_percent: f64, term_years: f64) -> Self {
        Self {
            principal,
            annual_rate_percent,
            term_years,
        }
    }

    /// parse the three raw form fields
    pub fn parse(principal: &str, annual_rate_percent: &str, term_years: &str) -> Result<Self> {
        Ok(Self {
            principal: parse_field("principal", principal)?,
            annual_rate_percent: parse_field("annual_rate_percent", annual_rate_percent)?,
            term_years: parse_field("term_years", term_years)?,
        })
    }

    /// whole months from the years field, rounded
    pub fn term_months(&self) -> Result<u32> {
        if !self.term_years.is_finite() || self.term_years <= 0.0 {
            return Err(CalculatorError::invalid_input("term_years", self.term_years));
        }

        let months = (self.term_years * 12.0).round();
        if months < 1.0 || months > u32::MAX as f64 {
            return Err(CalculatorError::invalid_input("term_years", self.term_years));
        }

        Ok(months as u32)
    }
}

fn parse_field(field: &'static str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| CalculatorError::invalid_input(field, raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_code_normalization() {
        let code = CurrencyCode::new(" inr ").unwrap();
        assert_eq!(code, "INR");
        assert_eq!(code.to_string(), "INR");

        assert!(CurrencyCode::new("US").is_err());
        assert!(CurrencyCode::new("US1").is_err());
        assert!(CurrencyCode::new("EURO").is_err());
    }

    #[test]
    fn test_currency_code_serde() {
        let code: CurrencyCode = serde_json::from_str("\"gbp\"").unwrap();
        assert_eq!(code, "GBP");
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"GBP\"");

        assert!(serde_json::from_str::<CurrencyCode>("\"pounds\"").is_err());
    }

    #[test]
    fn test_term_months_conversion() {
        assert_eq!(LoanInput::new(1000.0, 5.0, 5.0).term_months().unwrap(), 60);
        assert_eq!(LoanInput::new(1000.0, 5.0, 2.5).term_months().unwrap(), 30);

        assert!(LoanInput::new(1000.0, 5.0, 0.0).term_months().is_err());
        assert!(LoanInput::new(1000.0, 5.0, f64::NAN).term_months().is_err());
        // rounds to zero months
        assert!(LoanInput::new(1000.0, 5.0, 0.01).term_months().is_err());
    }

    #[test]
    fn test_parse_form_fields() {
        let input = LoanInput::parse("100000", " 8.5 ", "5").unwrap();
        assert_eq!(input, LoanInput::new(100_000.0, 8.5, 5.0));

        let err = LoanInput::parse("abc", "8.5", "5").unwrap_err();
        assert!(matches!(err, CalculatorError::InvalidInput { field: "principal", .. }));

        assert!(LoanInput::parse("100000", "", "5").is_err());
    }
}
