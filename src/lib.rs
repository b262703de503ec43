pub mod config;
pub mod currency;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod pagination;
pub mod payments;
pub mod session;
pub mod theme;
pub mod types;

// re-export key types
pub use config::CalculatorConfig;
pub use currency::{
    convert, format, CurrencyConverter, FeedOutcome, RateFeed, RateSource, RateTable,
    RatesResponse, RequestTicket,
};
pub use errors::{CalculatorError, Result};
pub use events::{Event, EventStore};
pub use pagination::{Page, Paginator};
pub use payments::{
    compute, compute_for, AmortizationCalculator, AmortizationEntry, AmortizationResult,
    MAX_TERM_MONTHS,
};
pub use session::{LoanSession, RatesBrowser, ScheduleRow, SessionView};
pub use theme::{MemoryPreferenceStore, PreferenceStore, Theme, ThemeContext};
pub use types::{CurrencyCode, LoanInput, SessionId};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use uuid::Uuid;
