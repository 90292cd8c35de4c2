//! Conversion core and shared plumbing

pub mod cache;
pub mod config;
pub mod convert;
pub mod currency;
pub mod error;
pub mod log;
pub mod period;
pub mod rates;

// Re-export main types for cleaner imports
pub use convert::{ConversionRequest, convert};
pub use currency::CurrencyCode;
pub use error::RateError;
pub use period::HistoryPeriod;
pub use rates::{HistoryProvider, RateHistory, RateProvider, RateTable};
