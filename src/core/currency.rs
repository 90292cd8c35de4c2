//! Currency codes and display symbols

use crate::core::error::RateError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// A three letter currency identifier, always stored uppercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode([u8; 3]);

impl CurrencyCode {
    pub const USD: CurrencyCode = CurrencyCode(*b"USD");
    pub const INR: CurrencyCode = CurrencyCode(*b"INR");
    pub const EUR: CurrencyCode = CurrencyCode(*b"EUR");
    pub const GBP: CurrencyCode = CurrencyCode(*b"GBP");
    pub const JPY: CurrencyCode = CurrencyCode(*b"JPY");
    pub const AUD: CurrencyCode = CurrencyCode(*b"AUD");
    pub const CAD: CurrencyCode = CurrencyCode(*b"CAD");
    pub const CNY: CurrencyCode = CurrencyCode(*b"CNY");
    pub const CHF: CurrencyCode = CurrencyCode(*b"CHF");
    pub const SEK: CurrencyCode = CurrencyCode(*b"SEK");
    pub const NZD: CurrencyCode = CurrencyCode(*b"NZD");

    /// Parses a code, normalizing it to uppercase.
    pub fn new(code: &str) -> Result<Self, RateError> {
        let trimmed = code.trim();
        let bytes = trimmed.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_alphabetic) {
            return Err(RateError::InvalidCurrencyCode(code.to_string()));
        }
        Ok(CurrencyCode([
            bytes[0].to_ascii_uppercase(),
            bytes[1].to_ascii_uppercase(),
            bytes[2].to_ascii_uppercase(),
        ]))
    }

    pub fn as_str(&self) -> &str {
        // Only ASCII letters are ever stored.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// Display symbol for well known currencies, e.g. `$` for USD.
    pub fn symbol(&self) -> Option<&'static str> {
        let symbol = match self.as_str() {
            "USD" => "$",
            "INR" => "₹",
            "EUR" => "€",
            "GBP" => "£",
            "JPY" => "¥",
            "AUD" => "A$",
            "CAD" => "C$",
            "CNY" => "¥",
            "CHF" => "CHF",
            "SEK" => "kr",
            "NZD" => "NZ$",
            _ => return None,
        };
        Some(symbol)
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurrencyCode {
    type Err = RateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CurrencyCode::new(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = RateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CurrencyCode::new(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.as_str().to_string()
    }
}
