//! Email service client: send the order confirmation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use domain::OrderResult;
use serde::Serialize;

use crate::error::ClientError;

/// Operations the checkout needs from the email service.
#[async_trait]
pub trait EmailService: Send + Sync {
    /// Sends the order confirmation for a completed checkout.
    async fn send_confirmation(
        &self,
        email: &str,
        order: &OrderResult,
    ) -> Result<(), ClientError>;
}

#[derive(Debug, Serialize)]
struct ConfirmationRequest<'a> {
    email: &'a str,
    order: &'a OrderResult,
}

/// Email service client over HTTP: `POST {base}` with the recipient and
/// the full order.
#[derive(Debug, Clone)]
pub struct HttpEmailService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpEmailService {
    /// Creates a client that talks to the email service at `base_url`.
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl EmailService for HttpEmailService {
    async fn send_confirmation(
        &self,
        email: &str,
        order: &OrderResult,
    ) -> Result<(), ClientError> {
        self.client
            .post(&self.base_url)
            .json(&ConfirmationRequest { email, order })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct InMemoryEmailState {
    sent_to: Vec<String>,
    attempts: u32,
    fail_on_send: bool,
}

/// In-memory email service for testing. Records recipients and attempts.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEmailService {
    state: Arc<RwLock<InMemoryEmailState>>,
}

impl InMemoryEmailService {
    /// Creates a new in-memory email service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the service to fail on send calls.
    pub fn set_fail_on_send(&self, fail: bool) {
        self.state.write().unwrap().fail_on_send = fail;
    }

    /// Returns the recipients of successfully sent confirmations.
    pub fn sent_to(&self) -> Vec<String> {
        self.state.read().unwrap().sent_to.clone()
    }

    /// Returns how many sends were attempted, successful or not.
    pub fn attempt_count(&self) -> u32 {
        self.state.read().unwrap().attempts
    }
}

#[async_trait]
impl EmailService for InMemoryEmailService {
    async fn send_confirmation(
        &self,
        email: &str,
        _order: &OrderResult,
    ) -> Result<(), ClientError> {
        let mut state = self.state.write().unwrap();
        state.attempts += 1;

        if state.fail_on_send {
            return Err(ClientError::Unavailable(
                "Email service unavailable".to_string(),
            ));
        }

        state.sent_to.push(email.to_string());
        Ok(())
    }
}
