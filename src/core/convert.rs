//! Currency conversion against a rate snapshot

use crate::core::currency::CurrencyCode;
use crate::core::error::RateError;
use crate::core::rates::RateTable;

/// Converts `amount` of `from` into `to` using the rates in `table`.
///
/// When `from` is the table's base the target rate is applied directly,
/// otherwise the amount is first expressed in the base currency (cross rate).
/// Converting a currency into itself returns `amount` untouched without
/// consulting the table.
pub fn convert(
    amount: f64,
    from: CurrencyCode,
    to: CurrencyCode,
    table: &RateTable,
) -> Result<f64, RateError> {
    if !amount.is_finite() {
        return Err(RateError::InvalidAmount(amount));
    }
    if from == to {
        return Ok(amount);
    }

    let result = if from == table.base() {
        amount * table.lookup(to)?
    } else {
        let base_amount = amount / table.lookup(from)?;
        base_amount * table.lookup(to)?
    };

    // Finite inputs can still overflow.
    if !result.is_finite() {
        return Err(RateError::InvalidAmount(amount));
    }
    Ok(result)
}

/// A single conversion asked for by the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionRequest {
    pub amount: f64,
    pub from: CurrencyCode,
    pub to: CurrencyCode,
}

impl ConversionRequest {
    pub fn new(amount: f64, from: CurrencyCode, to: CurrencyCode) -> Self {
        ConversionRequest { amount, from, to }
    }

    pub fn evaluate(&self, table: &RateTable) -> Result<f64, RateError> {
        convert(self.amount, self.from, self.to, table)
    }

    /// Units of `to` per unit of `from`.
    pub fn effective_rate(&self, table: &RateTable) -> Result<f64, RateError> {
        convert(1.0, self.from, self.to, table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn usd_table() -> RateTable {
        RateTable::new(
            CurrencyCode::USD,
            [
                (CurrencyCode::USD, 1.0),
                (CurrencyCode::INR, 83.0),
                (CurrencyCode::EUR, 0.92),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_direct_conversion_from_base() {
        let table = usd_table();
        let result = convert(100.0, CurrencyCode::USD, CurrencyCode::INR, &table).unwrap();
        assert_eq!(result, 8300.0);
        assert_eq!(result, 100.0 * table.lookup(CurrencyCode::INR).unwrap());
    }

    #[test]
    fn test_direct_conversion_without_base_entry() {
        let table = RateTable::new(CurrencyCode::USD, [(CurrencyCode::EUR, 0.92)]).unwrap();
        let result = convert(10.0, CurrencyCode::USD, CurrencyCode::EUR, &table).unwrap();
        assert_eq!(result, 10.0 * 0.92);
    }

    #[test]
    fn test_cross_rate_conversion() {
        let table = usd_table();
        let result = convert(100.0, CurrencyCode::INR, CurrencyCode::EUR, &table).unwrap();
        assert_relative_eq!(result, (100.0 / 83.0) * 0.92, max_relative = 1e-12);
        assert_relative_eq!(result, 1.108, epsilon = 1e-3);
    }

    #[test]
    fn test_cross_rate_into_base() {
        let table = usd_table();
        let result = convert(8300.0, CurrencyCode::INR, CurrencyCode::USD, &table).unwrap();
        assert_relative_eq!(result, 100.0, max_relative = 1e-12);
    }

    #[test]
    fn test_identity_conversion_skips_lookup() {
        let table = usd_table();
        assert_eq!(
            convert(42.5, CurrencyCode::USD, CurrencyCode::USD, &table),
            Ok(42.5)
        );
        // GBP is not in the table at all
        assert_eq!(
            convert(42.5, CurrencyCode::GBP, CurrencyCode::GBP, &table),
            Ok(42.5)
        );
    }

    #[test]
    fn test_round_trip() {
        let table = usd_table();
        for amount in [0.01, 1.0, 123.45, 1_000_000.0] {
            let there = convert(amount, CurrencyCode::INR, CurrencyCode::EUR, &table).unwrap();
            let back = convert(there, CurrencyCode::EUR, CurrencyCode::INR, &table).unwrap();
            assert_relative_eq!(back, amount, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_unknown_currency() {
        let table = usd_table();
        assert_eq!(
            convert(50.0, CurrencyCode::GBP, CurrencyCode::INR, &table),
            Err(RateError::UnknownCurrency(CurrencyCode::GBP))
        );
        assert_eq!(
            convert(50.0, CurrencyCode::USD, CurrencyCode::GBP, &table),
            Err(RateError::UnknownCurrency(CurrencyCode::GBP))
        );
        assert_eq!(
            convert(50.0, CurrencyCode::INR, CurrencyCode::GBP, &table),
            Err(RateError::UnknownCurrency(CurrencyCode::GBP))
        );
    }

    #[test]
    fn test_non_finite_amount() {
        let table = usd_table();
        let result = convert(f64::NAN, CurrencyCode::USD, CurrencyCode::INR, &table);
        assert!(matches!(result, Err(RateError::InvalidAmount(a)) if a.is_nan()));

        for amount in [f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(
                convert(amount, CurrencyCode::USD, CurrencyCode::INR, &table),
                Err(RateError::InvalidAmount(amount))
            );
        }
        // Rejected even when no lookup would be needed
        assert!(convert(f64::NAN, CurrencyCode::USD, CurrencyCode::USD, &table).is_err());
    }

    #[test]
    fn test_overflowing_result_is_rejected() {
        let table = usd_table();
        assert_eq!(
            convert(f64::MAX, CurrencyCode::USD, CurrencyCode::INR, &table),
            Err(RateError::InvalidAmount(f64::MAX))
        );
    }

    #[test]
    fn test_negative_amount_is_passed_through() {
        let table = usd_table();
        assert_eq!(
            convert(-1.0, CurrencyCode::USD, CurrencyCode::INR, &table),
            Ok(-83.0)
        );
    }

    #[test]
    fn test_conversion_request() {
        let table = usd_table();
        let request = ConversionRequest::new(100.0, CurrencyCode::USD, CurrencyCode::INR);
        assert_eq!(request.evaluate(&table), Ok(8300.0));
        assert_eq!(request.effective_rate(&table), Ok(83.0));
    }
}
