use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

use super::util::{self, DEFAULT_RETRIES, DEFAULT_RETRY_DELAY_MS};
use crate::core::{CurrencyCode, HistoryProvider, RateHistory, RateProvider, RateTable};

/// Rates published by the European Central Bank through the Frankfurter API.
///
/// Frankfurter leaves the base currency out of its rate listing, so the
/// provider adds it back with rate 1. Only working days are quoted.
pub struct FrankfurterProvider {
    base_url: String,
    client: reqwest::Client,
    retries: usize,
    retry_delay_ms: u64,
}

impl FrankfurterProvider {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(FrankfurterProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: util::http_client()?,
            retries: DEFAULT_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
        })
    }

    pub fn with_retries(mut self, retries: usize, delay_ms: u64) -> Self {
        self.retries = retries;
        self.retry_delay_ms = delay_ms;
        self
    }

    async fn get(&self, url: &str, subject: &str) -> Result<String> {
        debug!("Requesting {}", url);
        util::fetch_text(&self.client, url, self.retries, self.retry_delay_ms)
            .await
            .map_err(|e| util::request_error(e, subject))
    }
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    base: String,
    date: Option<NaiveDate>,
    rates: HashMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct TimeSeriesResponse {
    base: String,
    rates: HashMap<String, HashMap<String, f64>>,
}

#[async_trait]
impl RateProvider for FrankfurterProvider {
    #[instrument(name = "FrankfurterLatestFetch", skip(self), fields(base = %base))]
    async fn fetch_rates(&self, base: CurrencyCode) -> Result<RateTable> {
        let url = format!("{}/latest?from={}", self.base_url, base);
        let subject = format!("base currency: {base}");
        let text = self.get(&url, &subject).await?;

        let data: LatestResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", base, e))?;
        if !data.base.eq_ignore_ascii_case(base.as_str()) {
            return Err(anyhow!(
                "Requested rates for {} but received rates for {}",
                base,
                data.base
            ));
        }

        // Quotes are relative to the base, which the listing itself omits
        let mut rates = data.rates;
        if !rates.keys().any(|code| code.eq_ignore_ascii_case(base.as_str())) {
            rates.insert(base.to_string(), 1.0);
        }

        let table = RateTable::from_raw(&data.base, &rates)
            .with_context(|| format!("Rejected rates for {subject}"))?;
        Ok(match data.date {
            Some(date) => table.with_as_of(date),
            None => table,
        })
    }
}

#[async_trait]
impl HistoryProvider for FrankfurterProvider {
    #[instrument(name = "FrankfurterHistoryFetch", skip(self))]
    async fn fetch_history(
        &self,
        from: CurrencyCode,
        to: CurrencyCode,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RateHistory> {
        let url = format!(
            "{}/{}..{}?from={}&to={}",
            self.base_url,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d"),
            from,
            to
        );
        let subject = format!("currency pair: {from}{to}");
        let text = self.get(&url, &subject).await?;

        let data: TimeSeriesResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}{}: {}", from, to, e))?;
        if !data.base.eq_ignore_ascii_case(from.as_str()) {
            return Err(anyhow!(
                "Requested history for {} but received rates for {}",
                from,
                data.base
            ));
        }

        let mut points = Vec::with_capacity(data.rates.len());
        for (date, day_rates) in &data.rates {
            let date: NaiveDate = date
                .parse()
                .with_context(|| format!("Invalid date {date:?} in history for {subject}"))?;
            let Some(rate) = day_rates
                .iter()
                .find(|(code, _)| code.eq_ignore_ascii_case(to.as_str()))
                .map(|(_, rate)| *rate)
            else {
                continue;
            };
            if !rate.is_finite() || rate <= 0.0 {
                return Err(anyhow!("Invalid rate {} on {} for {}", rate, date, subject));
            }
            points.push((date, rate));
        }

        if points.is_empty() {
            return Err(anyhow!("No rate history found for {}", subject));
        }
        debug!(points = points.len(), "Received rate history");
        Ok(RateHistory::new(from, to, points))
    }
}
