use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

use super::util::{self, DEFAULT_RETRIES, DEFAULT_RETRY_DELAY_MS};
use crate::core::{CurrencyCode, RateProvider, RateTable};

/// Latest rates from the ExchangeRate-API v4 endpoint.
pub struct ExchangeRateApiProvider {
    base_url: String,
    client: reqwest::Client,
    retries: usize,
    retry_delay_ms: u64,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(ExchangeRateApiProvider {
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
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    base: String,
    date: Option<NaiveDate>,
    rates: HashMap<String, f64>,
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    #[instrument(name = "ExchangeRateApiFetch", skip(self), fields(base = %base))]
    async fn fetch_rates(&self, base: CurrencyCode) -> Result<RateTable> {
        let url = format!("{}/v4/latest/{}", self.base_url, base);
        debug!("Requesting rates from {}", url);

        let subject = format!("base currency: {base}");
        let text = util::fetch_text(&self.client, &url, self.retries, self.retry_delay_ms)
            .await
            .map_err(|e| util::request_error(e, &subject))?;

        let data: LatestRatesResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", base, e))?;

        if !data.base.eq_ignore_ascii_case(base.as_str()) {
            return Err(anyhow!(
                "Requested rates for {} but received rates for {}",
                base,
                data.base
            ));
        }

        let table = RateTable::from_raw(&data.base, &data.rates)
            .with_context(|| format!("Rejected rates for {subject}"))?;
        debug!(currencies = table.len(), date = ?data.date, "Received rate table");

        Ok(match data.date {
            Some(date) => table.with_as_of(date),
            None => table,
        })
    }
}
