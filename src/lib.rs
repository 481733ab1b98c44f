pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::{API_KEY_ENV, AppConfig};
use crate::core::{PIVOT_CURRENCY, RateStore};
use crate::providers::ExchangeRateApiProvider;
use anyhow::{Result, bail};
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Convert {
        amount: String,
        from: String,
        to: Vec<String>,
        reverse: bool,
    },
    Rates {
        filter: Option<String>,
    },
    Currencies {
        filter: Option<String>,
    },
}

/// Builds a rate store backed by the HTTP rate source described in `config`.
pub fn build_store(config: &AppConfig) -> Result<Arc<RateStore>> {
    if config.provider.api_key.is_empty() {
        bail!(
            "No API key configured. Set provider.api_key in the config file (see `xrate setup`) or export {API_KEY_ENV}"
        );
    }
    let provider = ExchangeRateApiProvider::new(
        &config.provider.base_url,
        &config.provider.api_key,
        PIVOT_CURRENCY,
    );
    Ok(Arc::new(RateStore::new(Arc::new(provider))))
}

fn load_store(config_path: Option<&str>) -> Result<Arc<RateStore>> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!(base_url = %config.provider.base_url, "Loaded config");
    build_store(&config)
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("xrate starting...");

    match command {
        AppCommand::Convert {
            amount,
            from,
            to,
            reverse,
        } => {
            let store = load_store(config_path)?;
            cli::convert::run(&store, &amount, &from, &to, reverse).await
        }
        AppCommand::Rates { filter } => {
            let store = load_store(config_path)?;
            cli::rates::run(&store, filter.as_deref()).await
        }
        AppCommand::Currencies { filter } => {
            cli::rates::list_known(filter.as_deref());
            Ok(())
        }
    }
}
