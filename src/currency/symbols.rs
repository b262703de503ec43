use crate::types::CurrencyCode;

/// currencies offered by the calculator's currency picker
pub const SELECTABLE: [&str; 7] = ["USD", "EUR", "INR", "GBP", "JPY", "AUD", "CAD"];

/// display symbol for a currency, if one is known
pub fn symbol_for(code: &CurrencyCode) -> Option<&'static str> {
    match code.as_str() {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "INR" => Some("₹"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        "AUD" => Some("A$"),
        "CAD" => Some("C$"),
        _ => None,
    }
}
