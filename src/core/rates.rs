//! Exchange rate snapshots and the providers that fetch them

use crate::core::currency::CurrencyCode;
use crate::core::error::RateError;
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

const BASE_RATE_TOLERANCE: f64 = 1e-9;

/// An immutable snapshot of rates relative to a base currency.
///
/// One unit of `base` buys `rate` units of each listed currency. A table is
/// validated once on construction and never mutated afterwards; a refresh
/// produces a new table.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    base: CurrencyCode,
    rates: BTreeMap<CurrencyCode, f64>,
    as_of: Option<NaiveDate>,
}

impl RateTable {
    /// Builds a table, failing with `InvalidRateData` if the mapping is empty
    /// or holds a rate that is not strictly positive and finite.
    ///
    /// The base currency may be absent from `rates`. When present it must be 1.
    pub fn new<I>(base: CurrencyCode, rates: I) -> Result<Self, RateError>
    where
        I: IntoIterator<Item = (CurrencyCode, f64)>,
    {
        let mut table = BTreeMap::new();
        for (code, rate) in rates {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(RateError::InvalidRateData(format!(
                    "rate for {code} must be positive and finite, got {rate}"
                )));
            }
            if table.insert(code, rate).is_some() {
                return Err(RateError::InvalidRateData(format!(
                    "duplicate rate for {code}"
                )));
            }
        }

        if table.is_empty() {
            return Err(RateError::InvalidRateData("no rates".to_string()));
        }

        if let Some(base_rate) = table.get(&base) {
            if (base_rate - 1.0).abs() > BASE_RATE_TOLERANCE {
                return Err(RateError::InvalidRateData(format!(
                    "base currency {base} must have rate 1, got {base_rate}"
                )));
            }
        }

        Ok(RateTable {
            base,
            rates: table,
            as_of: None,
        })
    }

    /// Builds a table from the raw string keyed mapping of a fetch response.
    pub fn from_raw(base: &str, rates: &HashMap<String, f64>) -> Result<Self, RateError> {
        let base = CurrencyCode::new(base)
            .map_err(|_| RateError::InvalidRateData(format!("invalid base currency {base:?}")))?;
        let parsed = rates
            .iter()
            .map(|(code, rate)| {
                CurrencyCode::new(code)
                    .map(|code| (code, *rate))
                    .map_err(|_| RateError::InvalidRateData(format!("invalid currency {code:?}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(base, parsed)
    }

    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = Some(as_of);
        self
    }

    pub fn base(&self) -> CurrencyCode {
        self.base
    }

    /// Quote date reported by the provider, if any.
    pub fn as_of(&self) -> Option<NaiveDate> {
        self.as_of
    }

    pub fn lookup(&self, code: CurrencyCode) -> Result<f64, RateError> {
        self.rates
            .get(&code)
            .copied()
            .ok_or(RateError::UnknownCurrency(code))
    }

    pub fn contains(&self, code: CurrencyCode) -> bool {
        self.rates.contains_key(&code)
    }

    /// Listed currencies in sorted order.
    pub fn currencies(&self) -> impl Iterator<Item = CurrencyCode> + '_ {
        self.rates.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CurrencyCode, f64)> + '_ {
        self.rates.iter().map(|(code, rate)| (*code, *rate))
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// Daily rates of one currency pair, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct RateHistory {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub points: Vec<(NaiveDate, f64)>,
}

impl RateHistory {
    pub fn new(from: CurrencyCode, to: CurrencyCode, mut points: Vec<(NaiveDate, f64)>) -> Self {
        points.sort_by_key(|(date, _)| *date);
        RateHistory { from, to, points }
    }

    pub fn first(&self) -> Option<(NaiveDate, f64)> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<(NaiveDate, f64)> {
        self.points.last().copied()
    }

    /// Percentage change between the first and last point.
    pub fn change_pct(&self) -> Option<f64> {
        match (self.first(), self.last()) {
            (Some((_, start)), Some((_, end))) if start > 0.0 && self.points.len() > 1 => {
                Some(((end - start) / start) * 100.0)
            }
            _ => None,
        }
    }
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetches a full snapshot with every rate relative to `base`.
    async fn fetch_rates(&self, base: CurrencyCode) -> Result<RateTable>;
}

#[async_trait]
impl RateProvider for Box<dyn RateProvider> {
    async fn fetch_rates(&self, base: CurrencyCode) -> Result<RateTable> {
        (**self).fetch_rates(base).await
    }
}

#[async_trait]
pub trait HistoryProvider: Send + Sync {
    async fn fetch_history(
        &self,
        from: CurrencyCode,
        to: CurrencyCode,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RateHistory>;
}
