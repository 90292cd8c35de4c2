use crate::core::config::AppConfig;
use anyhow::{Context, Result};
use std::path::Path;

pub const DEFAULT_CONFIG: &str = r#"# Example configuration file for fxconv
#
# Base currency of the fetched rate tables. Conversions between two other
# currencies are computed through it.
currency: "USD"

# Rate source for `convert` and `rates`: exchangerate_api or frankfurter.
# `history` always uses frankfurter.
provider: exchangerate_api

# How long a fetched rate table is reused, in seconds.
cache_ttl_secs: 3600

providers:
  exchangerate_api:
    base_url: "https://api.exchangerate-api.com"
  frankfurter:
    base_url: "https://api.frankfurter.app"
"#;

/// Creates a default configuration file at the default location
pub fn setup() -> Result<()> {
    let path = AppConfig::default_config_path()?;
    setup_at_path(path)
}

/// Creates a default configuration file at the specified path
pub fn setup_at_path<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
