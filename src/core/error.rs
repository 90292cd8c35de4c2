//! Errors raised by the conversion core.

use crate::core::currency::CurrencyCode;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RateError {
    #[error("Unknown currency: {0}")]
    UnknownCurrency(CurrencyCode),
    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),
    #[error("Invalid rate data: {0}")]
    InvalidRateData(String),
    #[error("Invalid currency code: {0:?}")]
    InvalidCurrencyCode(String),
}
