use crate::core::cache::Cache;
use crate::core::{CurrencyCode, RateProvider, RateTable};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// A fetched rate table and when it was fetched.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub table: Arc<RateTable>,
    pub fetched_at: DateTime<Utc>,
}

/// Memoizes rate tables per base currency for `ttl`.
///
/// A refresh publishes a new snapshot in one step, so readers either see the
/// previous table or the new one. Failed fetches are not cached.
pub struct CachingRateProvider<T: RateProvider> {
    inner: T,
    cache: Cache<CurrencyCode, Snapshot>,
    ttl: Duration,
}

impl<T: RateProvider> CachingRateProvider<T> {
    pub fn new(inner: T, ttl: Duration) -> Self {
        Self {
            inner,
            cache: Cache::new(),
            ttl,
        }
    }

    pub async fn snapshot(&self, base: CurrencyCode) -> Result<Snapshot> {
        if let Some(snapshot) = self.cache.get(&base).await {
            debug!("Cache hit for rates: {}", base);
            return Ok(snapshot);
        }

        debug!("Cache miss for rates: {}", base);
        let table = self.inner.fetch_rates(base).await?;
        let snapshot = Snapshot {
            table: Arc::new(table),
            fetched_at: Utc::now(),
        };
        self.cache.put(base, snapshot.clone(), Some(self.ttl)).await;
        Ok(snapshot)
    }

    pub async fn rates(&self, base: CurrencyCode) -> Result<Arc<RateTable>> {
        Ok(self.snapshot(base).await?.table)
    }

    /// Drops the cached table for `base`, forcing the next call to fetch.
    pub async fn invalidate(&self, base: CurrencyCode) {
        self.cache.remove(&base).await;
    }

    pub async fn clear(&self) {
        self.cache.clear().await;
    }
}

#[async_trait]
impl<T: RateProvider> RateProvider for CachingRateProvider<T> {
    async fn fetch_rates(&self, base: CurrencyCode) -> Result<RateTable> {
        Ok(self.rates(base).await?.as_ref().clone())
    }
}
