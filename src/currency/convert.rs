use log::trace;
use serde::{Deserialize, Serialize};

use super::rates::RateTable;
use super::symbols::{symbol_for, SELECTABLE};
use crate::decimal::format_amount;
use crate::errors::{CalculatorError, Result};
use crate::types::CurrencyCode;

/// convert an amount expressed in `base` into `target`
///
/// Without a table, or when `target` is the base, the amount is returned
/// unchanged so callers stay usable before the first rate fetch lands.
pub fn convert(
    amount: f64,
    target: &CurrencyCode,
    table: Option<&RateTable>,
    base: &CurrencyCode,
) -> Result<f64> {
    let table = match table {
        Some(table) if target != base => table,
        _ => return Ok(amount),
    };

    let target_rate = table.rate(target).ok_or_else(|| CalculatorError::UnknownCurrency {
        code: target.to_string(),
    })?;

    if table.base() == base {
        return Ok(amount * target_rate);
    }

    // table quoted against another base, go through cross rates
    let base_rate = table.rate(base).ok_or_else(|| CalculatorError::UnknownCurrency {
        code: base.to_string(),
    })?;
    trace!(
        "cross conversion {} -> {} via {}",
        base,
        target,
        table.base()
    );
    Ok(amount * target_rate / base_rate)
}

/// two-decimal display string, no symbol
pub fn format(amount: f64) -> String {
    format_amount(amount)
}

/// selected display currency relative to a fixed base
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyConverter {
    base: CurrencyCode,
    selected: CurrencyCode,
}

impl CurrencyConverter {
    pub fn new(base: CurrencyCode) -> Self {
        Self {
            selected: base.clone(),
            base,
        }
    }

    /// codes offered by the currency picker
    pub fn selectable() -> Vec<CurrencyCode> {
        SELECTABLE
            .iter()
            .filter_map(|raw| CurrencyCode::new(raw).ok())
            .collect()
    }

    pub fn base(&self) -> &CurrencyCode {
        &self.base
    }

    pub fn selected(&self) -> &CurrencyCode {
        &self.selected
    }

    pub fn select(&mut self, code: CurrencyCode) {
        self.selected = code;
    }

    pub fn symbol(&self) -> &'static str {
        symbol_for(&self.selected).unwrap_or("")
    }

    pub fn convert(&self, amount: f64, table: Option<&RateTable>) -> Result<f64> {
        convert(amount, &self.selected, table, &self.base)
    }

    /// converted and formatted, without symbol
    pub fn format(&self, amount: f64, table: Option<&RateTable>) -> Result<String> {
        Ok(format(self.convert(amount, table)?))
    }

    /// converted and formatted, prefixed with the currency symbol
    pub fn display(&self, amount: f64, table: Option<&RateTable>) -> Result<String> {
        Ok(format!("{}{}", self.symbol(), self.format(amount, table)?))
    }
}
