//! Payment service client: charge the card for the order total.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use domain::CreditCardInfo;
use money::Money;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Operations the checkout needs from the payment service.
#[async_trait]
pub trait PaymentService: Send + Sync {
    /// Charges the card for the given amount and returns the transaction
    /// id.
    async fn charge(
        &self,
        amount: &Money,
        credit_card: &CreditCardInfo,
    ) -> Result<String, ClientError>;
}

#[derive(Debug, Serialize)]
struct ChargeRequest<'a> {
    amount: &'a Money,
    credit_card: &'a CreditCardInfo,
}

#[derive(Debug, Deserialize)]
struct ChargeResponse {
    #[serde(default)]
    transaction_id: String,
}

/// Payment service client over HTTP: `POST {base}` with the amount and
/// card, answering with a transaction id.
#[derive(Debug, Clone)]
pub struct HttpPaymentService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPaymentService {
    /// Creates a client that talks to the payment service at `base_url`.
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl PaymentService for HttpPaymentService {
    async fn charge(
        &self,
        amount: &Money,
        credit_card: &CreditCardInfo,
    ) -> Result<String, ClientError> {
        let charged: ChargeResponse = self
            .client
            .post(&self.base_url)
            .json(&ChargeRequest {
                amount,
                credit_card,
            })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(charged.transaction_id)
    }
}

#[derive(Debug, Default)]
struct InMemoryPaymentState {
    charges: Vec<Money>,
    next_id: u32,
    fail_on_charge: bool,
}

/// In-memory payment service for testing. Records every charged amount.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentService {
    state: Arc<RwLock<InMemoryPaymentState>>,
}

impl InMemoryPaymentService {
    /// Creates a new in-memory payment service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the service to decline charges.
    pub fn set_fail_on_charge(&self, fail: bool) {
        self.state.write().unwrap().fail_on_charge = fail;
    }

    /// Returns the number of successful charges.
    pub fn charge_count(&self) -> usize {
        self.state.read().unwrap().charges.len()
    }

    /// Returns the amounts charged, in order.
    pub fn charged_amounts(&self) -> Vec<Money> {
        self.state.read().unwrap().charges.clone()
    }
}

#[async_trait]
impl PaymentService for InMemoryPaymentService {
    async fn charge(
        &self,
        amount: &Money,
        _credit_card: &CreditCardInfo,
    ) -> Result<String, ClientError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_charge {
            return Err(ClientError::Unavailable("Payment declined".to_string()));
        }

        state.charges.push(amount.clone());
        state.next_id += 1;
        Ok(format!("TXN-{:04}", state.next_id))
    }
}
