pub mod amortization;

pub use amortization::{
    compute, compute_for, monthly_rate, AmortizationCalculator, AmortizationEntry,
    AmortizationResult, MAX_TERM_MONTHS,
};
