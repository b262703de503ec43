pub mod convert;
pub mod feed;
pub mod rates;
pub mod symbols;

pub use convert::{convert, format, CurrencyConverter};
pub use feed::{FeedOutcome, RateFeed, RateSource, RequestTicket};
pub use rates::{RateTable, RatesResponse};
pub use symbols::{symbol_for, SELECTABLE};
