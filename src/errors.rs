use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalculatorError {
    #[error("invalid input for {field}: {value}")]
    InvalidInput {
        field: &'static str,
        value: String,
    },

    #[error("unknown currency: {code}")]
    UnknownCurrency {
        code: String,
    },

    #[error("invalid currency code: {code:?}")]
    InvalidCurrencyCode {
        code: String,
    },

    #[error("invalid rate for {code}: {rate}")]
    InvalidRate {
        code: String,
        rate: f64,
    },

    #[error("rate fetch failed: {message}")]
    RateFetch {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("unknown theme: {value:?}")]
    UnknownTheme {
        value: String,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CalculatorError {
    pub(crate) fn invalid_input(field: &'static str, value: impl ToString) -> Self {
        CalculatorError::InvalidInput {
            field,
            value: value.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CalculatorError>;
