use rust_decimal::{Decimal, RoundingStrategy};

/// number of fractional digits shown for any monetary amount
pub const DISPLAY_DP: u32 = 2;

/// exact decimal value of a float, rounded half away from zero to cents
///
/// `None` when the value is not finite or does not fit a `Decimal`.
pub fn to_cents(value: f64) -> Option<Decimal> {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(DISPLAY_DP, RoundingStrategy::MidpointAwayFromZero))
}

/// fixed two-decimal rendering, no currency symbol
pub fn format_amount(value: f64) -> String {
    match to_cents(value) {
        Some(d) => format!("{:.2}", d),
        None if value.is_nan() => "NaN".to_string(),
        None if value.is_infinite() => {
            if value.is_sign_positive() { "inf".to_string() } else { "-inf".to_string() }
        }
        // outside Decimal range
        None => format!("{:.2}", value),
    }
}
