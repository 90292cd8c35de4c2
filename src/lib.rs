pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::{AppConfig, ProviderKind};
use crate::core::{ConversionRequest, CurrencyCode, HistoryPeriod, RateProvider};
use crate::providers::{CachingRateProvider, ExchangeRateApiProvider, FrankfurterProvider};
use anyhow::Result;
use chrono::Utc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Convert {
        amount: f64,
        from: CurrencyCode,
        to: CurrencyCode,
    },
    Rates {
        base: Option<CurrencyCode>,
    },
    History {
        from: CurrencyCode,
        to: CurrencyCode,
        period: HistoryPeriod,
    },
}

/// Builds the configured rate source behind a snapshot cache.
pub fn rate_provider(config: &AppConfig) -> Result<CachingRateProvider<Box<dyn RateProvider>>> {
    let inner: Box<dyn RateProvider> = match config.provider {
        ProviderKind::ExchangerateApi => Box::new(ExchangeRateApiProvider::new(
            config.providers.exchangerate_api_url(),
        )?),
        ProviderKind::Frankfurter => Box::new(FrankfurterProvider::new(
            config.providers.frankfurter_url(),
        )?),
    };
    Ok(CachingRateProvider::new(inner, config.cache_ttl()))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxconv starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Convert { amount, from, to } => {
            let provider = rate_provider(&config)?;
            let request = ConversionRequest::new(amount, from, to);

            let spinner = cli::ui::new_spinner("Fetching exchange rates...");
            let outcome = cli::convert::convert(&provider, config.currency, request).await;
            spinner.finish_and_clear();

            println!("{}", outcome?.display());
        }
        AppCommand::Rates { base } => {
            let provider = rate_provider(&config)?;
            let base = base.unwrap_or(config.currency);

            let spinner = cli::ui::new_spinner("Fetching exchange rates...");
            let table = provider.rates(base).await;
            spinner.finish_and_clear();

            let table = table?;
            println!("{}", cli::rates::display_rates(&table));
        }
        AppCommand::History { from, to, period } => {
            let provider = FrankfurterProvider::new(config.providers.frankfurter_url())?;
            let today = Utc::now().date_naive();

            let spinner = cli::ui::new_spinner("Fetching rate history...");
            let history = cli::history::fetch(&provider, from, to, period, today).await;
            spinner.finish_and_clear();

            println!("{}", cli::history::display_history(&history?, period));
        }
    }
    Ok(())
}
