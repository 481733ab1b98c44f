use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::core::currency::{RateSnapshot, RateSource};

const USER_AGENT: &str = concat!("xrate/", env!("CARGO_PKG_VERSION"));

/// Rate source backed by the exchangerate-api.com v6 `latest` endpoint.
pub struct ExchangeRateApiProvider {
    base_url: String,
    api_key: String,
    base_currency: String,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str, api_key: &str, base_currency: &str) -> Self {
        ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            base_currency: base_currency.to_string(),
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/{}/latest/{}",
            self.base_url, self.api_key, self.base_currency
        )
    }

    // The key is part of the path; keep it out of logs and error messages.
    fn redacted_url(&self) -> String {
        format!("{}/***/latest/{}", self.base_url, self.base_currency)
    }
}

// Every field defaults so that partial bodies still deserialize; unknown fields are ignored.
// `conversion_rates` is required and checked in `into_snapshot`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LatestRatesResponse {
    result: Option<String>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    base_code: String,
    conversion_rates: Option<HashMap<String, f64>>,
    time_last_update_unix: i64,
    time_last_update_utc: String,
    time_next_update_unix: i64,
    time_next_update_utc: String,
    documentation: String,
    terms_of_use: String,
}

fn to_datetime(unix: i64) -> Option<DateTime<Utc>> {
    if unix <= 0 {
        return None;
    }
    Utc.timestamp_opt(unix, 0).single()
}

impl LatestRatesResponse {
    fn into_snapshot(self, requested_base: &str) -> Result<RateSnapshot> {
        if let Some(result) = self.result.as_deref() {
            if result != "success" {
                let reason = self.error_type.as_deref().unwrap_or(result);
                return Err(anyhow!("Exchange rate service returned an error: {reason}"));
            }
        }

        let rates = self
            .conversion_rates
            .filter(|rates| !rates.is_empty())
            .ok_or_else(|| anyhow!("Failed to parse exchange rate response: missing conversion_rates"))?;

        debug!(
            last_update = %self.time_last_update_utc,
            next_update = %self.time_next_update_utc,
            terms = %self.terms_of_use,
            docs = %self.documentation,
            "Received exchange rate metadata"
        );

        let base = if self.base_code.is_empty() {
            requested_base.to_string()
        } else {
            self.base_code
        };

        Ok(RateSnapshot {
            base,
            rates,
            updated_at: to_datetime(self.time_last_update_unix),
            next_update_at: to_datetime(self.time_next_update_unix),
        })
    }
}

#[async_trait]
impl RateSource for ExchangeRateApiProvider {
    #[instrument(
        name = "ExchangeRateFetch",
        skip(self),
        fields(base = %self.base_currency)
    )]
    async fn fetch_rates(&self) -> Result<RateSnapshot> {
        let redacted = self.redacted_url();
        debug!("Requesting exchange rates from {}", redacted);

        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        let response = client
            .get(self.url())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for URL: {}", e.without_url(), redacted))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .ok()
                .and_then(|body| serde_json::from_str::<LatestRatesResponse>(&body).ok())
                .and_then(|body| body.error_type)
                .map(|error_type| format!(" ({error_type})"))
                .unwrap_or_default();
            return Err(anyhow!(
                "HTTP error: {} fetching exchange rates{}",
                status,
                detail
            ));
        }

        let text = response.text().await?;
        let data: LatestRatesResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse exchange rate response: {}", e))?;

        let snapshot = data.into_snapshot(&self.base_currency)?;
        debug!(rates = snapshot.rates.len(), "Fetched exchange rates");
        Ok(snapshot)
    }
}
