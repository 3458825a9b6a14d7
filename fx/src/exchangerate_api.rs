//! Provider backed by the public exchangerate-api.com latest-rates endpoint.

use std::collections::BTreeMap;
use std::str::FromStr;

use async_trait::async_trait;
use p2pcalc_common::Currency;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::config::RateServiceConfig;
use crate::error::{FxError, FxResult};
use crate::provider::RateProvider;
use crate::rates::RateTable;

const PROVIDER_NAME: &str = "EXCHANGERATE_API";

/// Body of `GET {base_url}/{BASE}`.
#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    #[serde(default)]
    base: Option<String>,
    #[serde(default)]
    date: Option<String>,
    rates: BTreeMap<String, f64>,
}

/// HTTP rate provider. No authentication and no retry.
#[derive(Clone)]
pub struct ExchangeRateApiProvider {
    client: Client,
    config: RateServiceConfig,
}

impl ExchangeRateApiProvider {
    /// Create a provider from a validated configuration.
    pub fn new(config: RateServiceConfig) -> FxResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("p2pcalc/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    #[instrument(skip_all, fields(base = %base))]
    async fn fetch_rates(&self, base: &Currency) -> FxResult<RateTable> {
        let url = self.config.latest_url(base);
        debug!(url = %url, "Requesting latest rates");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FxError::ApiStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let table = parse_latest_rates(&body, base, PROVIDER_NAME)?;

        info!(currencies = table.len(), "Fetched rate table");
        Ok(table)
    }
}

/// Decode a latest-rates document into a table for `base`.
///
/// Rates that are not finite numbers are dropped with a warning.
pub fn parse_latest_rates(body: &str, base: &Currency, source: &str) -> FxResult<RateTable> {
    let response: LatestRatesResponse = serde_json::from_str(body)?;

    if let Some(reported) = response.base.as_deref().map(Currency::new) {
        if reported != *base {
            return Err(FxError::Parse(format!(
                "requested base {} but service answered for {}",
                base, reported
            )));
        }
    }

    if let Some(date) = &response.date {
        debug!(date = %date, "Rate table date");
    }

    let mut rates = BTreeMap::new();
    for (code, raw) in response.rates {
        match float_to_decimal(raw) {
            Some(rate) => {
                rates.insert(Currency::new(code), rate);
            }
            None => warn!(currency = %code, rate = raw, "Skipping unusable rate"),
        }
    }

    if rates.is_empty() {
        return Err(FxError::Parse("response contains no rates".to_string()));
    }

    Ok(RateTable::new(base.clone(), rates, source))
}

/// Shortest decimal that round-trips to `value`.
fn float_to_decimal(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_str(&value.to_string())
        .or_else(|_| Decimal::from_scientific(&format!("{:e}", value)))
        .ok()
}
