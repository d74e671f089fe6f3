//! Shipping service client: quote shipping and ship orders.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use domain::{Address, CartItem};
use money::Money;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Operations the checkout needs from the shipping service.
#[async_trait]
pub trait ShippingService: Send + Sync {
    /// Quotes shipping the given items to the address. The quote is
    /// always in USD.
    async fn get_quote(
        &self,
        address: &Address,
        items: &[CartItem],
    ) -> Result<Money, ClientError>;

    /// Hands the order to the carrier and returns the tracking id.
    async fn ship_order(
        &self,
        address: &Address,
        items: &[CartItem],
    ) -> Result<String, ClientError>;
}

#[derive(Debug, Serialize)]
struct QuoteRequest<'a> {
    address: &'a Address,
    items: &'a [CartItem],
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(default)]
    cost_usd: Money,
}

#[derive(Debug, Serialize)]
struct ShipOrderRequest<'a> {
    address: &'a Address,
    items: &'a [CartItem],
}

#[derive(Debug, Deserialize)]
struct ShipOrderResponse {
    #[serde(default)]
    tracking_id: String,
}

/// Shipping service client over HTTP. Quotes are a `POST {base}` and
/// shipments a `PUT {base}`, both carrying the address plus items.
#[derive(Debug, Clone)]
pub struct HttpShippingService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpShippingService {
    /// Creates a client that talks to the shipping service at `base_url`.
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ShippingService for HttpShippingService {
    async fn get_quote(
        &self,
        address: &Address,
        items: &[CartItem],
    ) -> Result<Money, ClientError> {
        let quote: QuoteResponse = self
            .client
            .post(&self.base_url)
            .json(&QuoteRequest { address, items })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(quote.cost_usd)
    }

    async fn ship_order(
        &self,
        address: &Address,
        items: &[CartItem],
    ) -> Result<String, ClientError> {
        let shipped: ShipOrderResponse = self
            .client
            .put(&self.base_url)
            .json(&ShipOrderRequest { address, items })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(shipped.tracking_id)
    }
}

#[derive(Debug)]
struct InMemoryShippingState {
    quote_usd: Money,
    quotes: u32,
    shipments: u32,
    next_id: u32,
    fail_on_quote: bool,
    fail_on_ship: bool,
}

impl Default for InMemoryShippingState {
    fn default() -> Self {
        Self {
            quote_usd: Money::new("USD", 8, 990_000_000),
            quotes: 0,
            shipments: 0,
            next_id: 0,
            fail_on_quote: false,
            fail_on_ship: false,
        }
    }
}

/// In-memory shipping service for testing. Quotes a flat USD 8.99 unless
/// reconfigured.
#[derive(Debug, Clone, Default)]
pub struct InMemoryShippingService {
    state: Arc<RwLock<InMemoryShippingState>>,
}

impl InMemoryShippingService {
    /// Creates a new in-memory shipping service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the flat USD quote.
    pub fn set_quote(&self, quote_usd: Money) {
        self.state.write().unwrap().quote_usd = quote_usd;
    }

    /// Configures the service to fail on get_quote calls.
    pub fn set_fail_on_quote(&self, fail: bool) {
        self.state.write().unwrap().fail_on_quote = fail;
    }

    /// Configures the service to fail on ship_order calls.
    pub fn set_fail_on_ship(&self, fail: bool) {
        self.state.write().unwrap().fail_on_ship = fail;
    }

    /// Returns how many quotes were served.
    pub fn quote_count(&self) -> u32 {
        self.state.read().unwrap().quotes
    }

    /// Returns the number of orders shipped.
    pub fn shipment_count(&self) -> u32 {
        self.state.read().unwrap().shipments
    }
}

#[async_trait]
impl ShippingService for InMemoryShippingService {
    async fn get_quote(
        &self,
        _address: &Address,
        _items: &[CartItem],
    ) -> Result<Money, ClientError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_quote {
            return Err(ClientError::Unavailable(
                "Shipping unavailable".to_string(),
            ));
        }

        state.quotes += 1;
        Ok(state.quote_usd.clone())
    }

    async fn ship_order(
        &self,
        _address: &Address,
        _items: &[CartItem],
    ) -> Result<String, ClientError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_ship {
            return Err(ClientError::Unavailable(
                "Shipping unavailable".to_string(),
            ));
        }

        state.shipments += 1;
        state.next_id += 1;
        Ok(format!("TRACK-{:04}", state.next_id))
    }
}
