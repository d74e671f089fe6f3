//! Currency service client: convert amounts between currencies.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use money::Money;
use serde::Serialize;

use crate::error::ClientError;

/// Operations the checkout needs from the currency service.
#[async_trait]
pub trait CurrencyService: Send + Sync {
    /// Converts an amount into the target currency.
    async fn convert(&self, from: &Money, to_code: &str) -> Result<Money, ClientError>;
}

#[derive(Debug, Serialize)]
struct ConversionRequest<'a> {
    from: &'a Money,
    to_code: &'a str,
}

/// Currency service client over HTTP: `POST {base}` with
/// `{"from": .., "to_code": ..}`, answering with a converted amount.
#[derive(Debug, Clone)]
pub struct HttpCurrencyService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCurrencyService {
    /// Creates a client that talks to the currency service at `base_url`.
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl CurrencyService for HttpCurrencyService {
    async fn convert(&self, from: &Money, to_code: &str) -> Result<Money, ClientError> {
        let converted = self
            .client
            .post(&self.base_url)
            .json(&ConversionRequest { from, to_code })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(converted)
    }
}

#[derive(Debug, Default)]
struct InMemoryCurrencyState {
    conversions: u32,
    fail_on_convert: bool,
}

/// In-memory currency service for testing. Converts at a 1:1 rate by
/// relabeling the amount with the target code.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCurrencyService {
    state: Arc<RwLock<InMemoryCurrencyState>>,
}

impl InMemoryCurrencyService {
    /// Creates a new in-memory currency service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the service to fail on convert calls.
    pub fn set_fail_on_convert(&self, fail: bool) {
        self.state.write().unwrap().fail_on_convert = fail;
    }

    /// Returns how many conversions were made.
    pub fn conversion_count(&self) -> u32 {
        self.state.read().unwrap().conversions
    }
}

#[async_trait]
impl CurrencyService for InMemoryCurrencyService {
    async fn convert(&self, from: &Money, to_code: &str) -> Result<Money, ClientError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_convert {
            return Err(ClientError::Unavailable(
                "Currency service unavailable".to_string(),
            ));
        }

        state.conversions += 1;
        Ok(Money::new(to_code, from.units, from.nanos))
    }
}
