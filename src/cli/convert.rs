use super::ui;
use crate::core::{ConversionRequest, CurrencyCode, RateProvider};
use crate::providers::CachingRateProvider;
use anyhow::{Result, bail};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

/// Checks an amount typed by the user before any rates are fetched.
pub fn validate_amount(amount: f64) -> Result<f64> {
    if !amount.is_finite() {
        bail!("Amount must be a finite number, got {amount}");
    }
    if amount < 0.0 {
        bail!("Amount must not be negative, got {amount}");
    }
    Ok(amount)
}

/// Parses a command line amount; accepts `1,000.50` style grouping.
pub fn parse_amount(text: &str) -> Result<f64> {
    let cleaned: String = text.chars().filter(|c| *c != ',' && *c != '_').collect();
    let amount: f64 = cleaned
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid amount: {text:?}"))?;
    validate_amount(amount)
}

#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    pub request: ConversionRequest,
    pub result: f64,
    pub rate: f64,
    pub base: CurrencyCode,
    pub as_of: Option<NaiveDate>,
    pub fetched_at: DateTime<Utc>,
}

impl ConversionOutcome {
    pub fn display(&self) -> String {
        let ConversionRequest { amount, from, to } = self.request;
        let mut output = format!(
            "{} = {}",
            ui::format_money(amount, from),
            ui::style_text(&ui::format_money(self.result, to), ui::StyleType::TotalValue)
        );
        output.push_str(&format!(
            "\n{}",
            ui::style_text(
                &format!("1 {from} = {} {to}", ui::format_rate(self.rate)),
                ui::StyleType::Subtle
            )
        ));

        let as_of = self
            .as_of
            .map_or_else(|| "unknown date".to_string(), |d| d.to_string());
        output.push_str(&format!(
            "\n{}",
            ui::style_text(
                &format!(
                    "Rates based on {} as of {}, fetched {}",
                    self.base,
                    as_of,
                    self.fetched_at.format("%Y-%m-%d %H:%M UTC")
                ),
                ui::StyleType::Subtle
            )
        ));
        output
    }
}

/// Converts using the snapshot for `base`, fetching it if needed.
pub async fn convert<T: RateProvider>(
    provider: &CachingRateProvider<T>,
    base: CurrencyCode,
    request: ConversionRequest,
) -> Result<ConversionOutcome> {
    validate_amount(request.amount)?;

    let snapshot = provider.snapshot(base).await?;
    let table = &snapshot.table;
    debug!(
        from = %request.from,
        to = %request.to,
        base = %table.base(),
        "Converting"
    );

    let result = request.evaluate(table)?;
    let rate = request.effective_rate(table)?;

    Ok(ConversionOutcome {
        request,
        result,
        rate,
        base: table.base(),
        as_of: table.as_of(),
        fetched_at: snapshot.fetched_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{RateError, RateTable};
    use async_trait::async_trait;
    use std::time::Duration;

    struct StaticProvider;

    #[async_trait]
    impl RateProvider for StaticProvider {
        async fn fetch_rates(&self, base: CurrencyCode) -> Result<RateTable> {
            let table = RateTable::new(
                base,
                [
                    (CurrencyCode::USD, 1.0),
                    (CurrencyCode::INR, 83.0),
                    (CurrencyCode::EUR, 0.92),
                ],
            )?;
            Ok(table.with_as_of(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()))
        }
    }

    fn provider() -> CachingRateProvider<StaticProvider> {
        CachingRateProvider::new(StaticProvider, Duration::from_secs(60))
    }

    #[test]
    fn test_validate_amount() {
        assert_eq!(validate_amount(0.0).unwrap(), 0.0);
        assert_eq!(validate_amount(12.5).unwrap(), 12.5);
        assert!(validate_amount(-1.0).is_err());
        assert!(validate_amount(f64::NAN).is_err());
        assert!(validate_amount(f64::INFINITY).is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("100").unwrap(), 100.0);
        assert_eq!(parse_amount("1,000.50").unwrap(), 1000.5);
        assert_eq!(parse_amount("1_000").unwrap(), 1000.0);
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("-5").is_err());
        assert!(parse_amount("inf").is_err());
    }

    #[tokio::test]
    async fn test_convert_from_base() {
        let request = ConversionRequest::new(100.0, CurrencyCode::USD, CurrencyCode::INR);
        let outcome = convert(&provider(), CurrencyCode::USD, request)
            .await
            .unwrap();
        assert_eq!(outcome.result, 8300.0);
        assert_eq!(outcome.rate, 83.0);
        assert_eq!(outcome.base, CurrencyCode::USD);

        let text = console::strip_ansi_codes(&outcome.display()).to_string();
        assert!(text.starts_with("$100.00 USD = ₹8,300.00 INR"));
        assert!(text.contains("1 USD = 83.0000 INR"));
        assert!(text.contains("as of 2024-01-02"));
    }

    #[tokio::test]
    async fn test_convert_cross_rate() {
        let request = ConversionRequest::new(100.0, CurrencyCode::INR, CurrencyCode::EUR);
        let outcome = convert(&provider(), CurrencyCode::USD, request)
            .await
            .unwrap();
        approx::assert_relative_eq!(outcome.result, 100.0 / 83.0 * 0.92, max_relative = 1e-12);
    }

    #[tokio::test]
    async fn test_convert_unknown_currency() {
        let request = ConversionRequest::new(50.0, CurrencyCode::GBP, CurrencyCode::INR);
        let err = convert(&provider(), CurrencyCode::USD, request)
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<RateError>(),
            Some(&RateError::UnknownCurrency(CurrencyCode::GBP))
        );
        assert_eq!(err.to_string(), "Unknown currency: GBP");
    }

    #[tokio::test]
    async fn test_convert_rejects_negative_amount() {
        let request = ConversionRequest::new(-5.0, CurrencyCode::USD, CurrencyCode::INR);
        assert!(
            convert(&provider(), CurrencyCode::USD, request)
                .await
                .is_err()
        );
    }
}
