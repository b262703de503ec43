use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::{CalculatorError, Result};
use crate::types::LoanInput;

/// one month of an amortization schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationEntry {
    pub month: u32,
    pub principal_paid: f64,
    pub interest_paid: f64,
    pub remaining_balance: f64,
}

/// fixed monthly payment plus its month-by-month breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationResult {
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub monthly_payment: f64,
    pub entries: Vec<AmortizationEntry>,
}

impl AmortizationResult {
    pub fn term_months(&self) -> u32 {
        self.entries.len() as u32
    }

    /// entry for a 1-indexed month
    pub fn entry(&self, month: u32) -> Option<&AmortizationEntry> {
        month
            .checked_sub(1)
            .and_then(|idx| self.entries.get(idx as usize))
    }

    /// remaining balance after the given month, principal before month 1
    pub fn balance_after(&self, month: u32) -> f64 {
        self.entry(month)
            .map(|e| e.remaining_balance)
            .unwrap_or(self.principal)
    }

    pub fn total_interest(&self) -> f64 {
        self.entries.iter().map(|e| e.interest_paid).sum()
    }

    pub fn total_principal(&self) -> f64 {
        self.entries.iter().map(|e| e.principal_paid).sum()
    }

    pub fn total_payment(&self) -> f64 {
        self.monthly_payment * self.entries.len() as f64
    }
}

/// longest schedule the engine will build (100 years)
pub const MAX_TERM_MONTHS: u32 = 1200;

/// monthly fractional rate from an annual percentage
pub fn monthly_rate(annual_rate_percent: f64) -> f64 {
    annual_rate_percent / 100.0 / 12.0
}

/// equated monthly installment for a validated loan
fn emi(principal: f64, r: f64, term_months: u32) -> f64 {
    // (1+r)^n - 1 vanishes at r == 0
    if r == 0.0 {
        return principal / term_months as f64;
    }

    // EMI = P * r * (1 + r)^n / ((1 + r)^n - 1), with (1 + r)^n - 1 taken
    // through ln_1p/exp_m1 so tiny rates keep their precision
    let growth = (term_months as f64 * r.ln_1p()).exp_m1();
    if growth.is_infinite() {
        return principal * r;
    }
    principal * r * (1.0 + growth) / growth
}

fn validate(principal: f64, annual_rate_percent: f64, term_months: u32) -> Result<()> {
    if !principal.is_finite() || principal <= 0.0 {
        return Err(CalculatorError::invalid_input("principal", principal));
    }
    if !annual_rate_percent.is_finite() || annual_rate_percent < 0.0 {
        return Err(CalculatorError::invalid_input(
            "annual_rate_percent",
            annual_rate_percent,
        ));
    }
    if term_months == 0 || term_months > MAX_TERM_MONTHS {
        return Err(CalculatorError::invalid_input("term_months", term_months));
    }
    Ok(())
}

/// compute the monthly payment and full schedule
pub fn compute(principal: f64, annual_rate_percent: f64, term_months: u32) -> Result<AmortizationResult> {
    validate(principal, annual_rate_percent, term_months)?;

    let r = monthly_rate(annual_rate_percent);
    let monthly_payment = emi(principal, r, term_months);

    let mut entries = Vec::with_capacity(term_months as usize);
    let mut balance = principal;

    for month in 1..=term_months {
        let interest_paid = balance * r;
        let principal_paid = monthly_payment - interest_paid;
        balance -= principal_paid;
        // final-month overshoot
        if balance < 0.0 {
            balance = 0.0;
        }

        entries.push(AmortizationEntry {
            month,
            principal_paid,
            interest_paid,
            remaining_balance: balance,
        });
    }

    debug!(
        "computed schedule: principal={} rate={}% months={} payment={}",
        principal, annual_rate_percent, term_months, monthly_payment
    );

    Ok(AmortizationResult {
        principal,
        annual_rate_percent,
        monthly_payment,
        entries,
    })
}

/// compute from years-based form input
pub fn compute_for(input: &LoanInput) -> Result<AmortizationResult> {
    let term_months = input.term_months()?;
    compute(input.principal, input.annual_rate_percent, term_months)
}

/// amortization calculator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmortizationCalculator {
    principal: f64,
    annual_rate_percent: f64,
    term_months: u32,
}

impl AmortizationCalculator {
    pub fn new(principal: f64) -> Self {
        Self {
            principal,
            annual_rate_percent: 0.0,
            term_months: 1,
        }
    }

    pub fn annual_rate(mut self, percent: f64) -> Self {
        self.annual_rate_percent = percent;
        self
    }

    pub fn term_months(mut self, months: u32) -> Self {
        self.term_months = months;
        self
    }

    pub fn term_years(mut self, years: u32) -> Self {
        self.term_months = years.saturating_mul(12);
        self
    }

    /// monthly payment only, without building the schedule
    pub fn monthly_payment(&self) -> Result<f64> {
        validate(self.principal, self.annual_rate_percent, self.term_months)?;
        Ok(emi(
            self.principal,
            monthly_rate(self.annual_rate_percent),
            self.term_months,
        ))
    }

    pub fn calculate(&self) -> Result<AmortizationResult> {
        compute(self.principal, self.annual_rate_percent, self.term_months)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {} within {} of {}",
            actual,
            tolerance,
            expected
        );
    }

    #[test]
    fn test_known_emi_scenario() {
        let result = compute(100_000.0, 8.5, 60).unwrap();

        assert_close(result.monthly_payment, 2051.65, 0.01);
        assert_eq!(result.entries.len(), 60);

        let first = &result.entries[0];
        assert_eq!(first.month, 1);
        assert_close(first.interest_paid, 708.33, 0.01);
        assert_close(first.principal_paid, result.monthly_payment - first.interest_paid, 1e-9);
    }

    #[test]
    fn test_zero_interest_schedule() {
        let result = compute(12_000.0, 0.0, 24).unwrap();

        assert_eq!(result.monthly_payment, 500.0);
        for entry in &result.entries {
            assert_eq!(entry.interest_paid, 0.0);
            assert_eq!(entry.principal_paid, 500.0);
        }
        assert_eq!(result.entries[23].remaining_balance, 0.0);
    }

    #[test]
    fn test_balance_monotonic_and_paid_off() {
        for (principal, rate, months) in [
            (100_000.0, 8.5, 60),
            (250_000.0, 6.0, 360),
            (5_000.0, 24.0, 12),
            (1_000_000_000.0, 12.0, 600),
            (999.99, 0.0, 7),
        ] {
            let result = compute(principal, rate, months).unwrap();

            let mut previous = principal;
            for entry in &result.entries {
                assert!(entry.remaining_balance >= 0.0);
                assert!(entry.remaining_balance <= previous);
                previous = entry.remaining_balance;
            }
            assert_close(previous, 0.0, principal * 1e-9);
        }
    }

    #[test]
    fn test_principal_conserved() {
        for (principal, rate, months) in [(100_000.0, 8.5, 60), (250_000.0, 6.0, 360), (42.0, 3.3, 5)] {
            let result = compute(principal, rate, months).unwrap();
            let relative = (result.total_principal() - principal).abs() / principal;
            assert!(relative < 1e-6, "relative error {}", relative);
        }
    }

    #[test]
    fn test_repeatable() {
        let a = compute(250_000.0, 6.0, 360).unwrap();
        let b = compute(250_000.0, 6.0, 360).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_month_term() {
        let result = compute(10_000.0, 12.0, 1).unwrap();

        assert_eq!(result.entries.len(), 1);
        let only = &result.entries[0];
        assert_close(only.remaining_balance, 0.0, 1e-6);
        assert_close(only.principal_paid, 10_000.0, 1e-6);
        assert_close(only.interest_paid, 100.0, 1e-9);
        assert_close(result.monthly_payment, 10_100.0, 1e-6);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        assert!(matches!(
            compute(0.0, 5.0, 12),
            Err(CalculatorError::InvalidInput { field: "principal", .. })
        ));
        assert!(compute(-1.0, 5.0, 12).is_err());
        assert!(compute(f64::NAN, 5.0, 12).is_err());
        assert!(compute(f64::INFINITY, 5.0, 12).is_err());
        assert!(matches!(
            compute(1000.0, -0.5, 12),
            Err(CalculatorError::InvalidInput { field: "annual_rate_percent", .. })
        ));
        assert!(compute(1000.0, f64::NAN, 12).is_err());
        assert!(matches!(
            compute(1000.0, 5.0, 0),
            Err(CalculatorError::InvalidInput { field: "term_months", .. })
        ));
    }

    #[test]
    fn test_tiny_rates_still_amortize() {
        for rate in [1e-15, 1e-12, 1e-9] {
            let result = compute(100_000.0, rate, 60).unwrap();

            assert!(result.monthly_payment.is_finite());
            assert_close(result.monthly_payment, 100_000.0 / 60.0, 0.01);
            assert_close(result.total_principal(), 100_000.0, 1e-4);
            assert_close(result.balance_after(60), 0.0, 1e-4);
        }
    }

    #[test]
    fn test_huge_rate_pays_interest_only_limit() {
        let result = compute(1_000.0, 1e300, 1200).unwrap();
        assert!(result.monthly_payment.is_finite());
    }

    #[test]
    fn test_term_upper_bound() {
        assert!(compute(1_000.0, 5.0, MAX_TERM_MONTHS).is_ok());
        assert!(matches!(
            compute(1_000.0, 5.0, MAX_TERM_MONTHS + 1),
            Err(CalculatorError::InvalidInput { field: "term_months", .. })
        ));
        assert!(compute(1_000.0, 5.0, u32::MAX).is_err());
        assert!(compute_for(&LoanInput::new(1_000.0, 5.0, 100_000_000.0)).is_err());
        assert!(AmortizationCalculator::new(1_000.0).term_years(u32::MAX).monthly_payment().is_err());
    }

    #[test]
    fn test_compute_for_years() {
        let input = LoanInput::new(100_000.0, 8.5, 5.0);
        let result = compute_for(&input).unwrap();
        assert_eq!(result, compute(100_000.0, 8.5, 60).unwrap());

        assert!(compute_for(&LoanInput::new(100_000.0, 8.5, -1.0)).is_err());
    }

    #[test]
    fn test_totals_and_lookups() {
        let result = compute(12_000.0, 0.0, 12).unwrap();

        assert_close(result.total_interest(), 0.0, 1e-12);
        assert_close(result.total_payment(), 12_000.0, 1e-9);
        assert_eq!(result.term_months(), 12);

        assert_eq!(result.balance_after(0), 12_000.0);
        assert_close(result.balance_after(6), 6_000.0, 1e-9);
        assert_eq!(result.balance_after(13), 12_000.0);
        assert!(result.entry(0).is_none());
        assert_eq!(result.entry(12).map(|e| e.month), Some(12));

        let with_interest = compute(100_000.0, 8.5, 60).unwrap();
        assert_close(
            with_interest.total_interest(),
            with_interest.total_payment() - 100_000.0,
            1e-4,
        );
    }

    #[test]
    fn test_calculator_builder() {
        let calculator = AmortizationCalculator::new(100_000.0)
            .annual_rate(8.5)
            .term_years(5);

        let payment = calculator.monthly_payment().unwrap();
        let result = calculator.calculate().unwrap();
        assert_eq!(payment, result.monthly_payment);
        assert_eq!(result.entries.len(), 60);

        assert!(AmortizationCalculator::new(100.0).term_months(0).calculate().is_err());
    }
}
