//! Cart service client: fetch and clear a user's cart.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use domain::CartItem;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Operations the checkout needs from the cart service.
#[async_trait]
pub trait CartService: Send + Sync {
    /// Returns the user's current cart lines.
    async fn get_cart(&self, user_id: &str) -> Result<Vec<CartItem>, ClientError>;

    /// Removes everything from the user's cart.
    async fn empty_cart(&self, user_id: &str) -> Result<(), ClientError>;
}

#[derive(Debug, Deserialize)]
struct CartDto {
    #[serde(default)]
    items: Vec<CartItem>,
}

#[derive(Debug, Serialize)]
struct EmptyCartRequest<'a> {
    user_id: &'a str,
}

/// Cart service client over HTTP.
///
/// The cart is fetched with `GET {base}?user_id=` and cleared with a
/// `DELETE {base}` carrying a JSON body, matching the storefront wire
/// format.
#[derive(Debug, Clone)]
pub struct HttpCartService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCartService {
    /// Creates a client that talks to the cart service at `base_url`.
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl CartService for HttpCartService {
    async fn get_cart(&self, user_id: &str) -> Result<Vec<CartItem>, ClientError> {
        let cart: CartDto = self
            .client
            .get(&self.base_url)
            .query(&[("user_id", user_id)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(cart.items)
    }

    async fn empty_cart(&self, user_id: &str) -> Result<(), ClientError> {
        self.client
            .delete(&self.base_url)
            .json(&EmptyCartRequest { user_id })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct InMemoryCartState {
    carts: HashMap<String, Vec<CartItem>>,
    empty_calls: u32,
    fail_on_get: bool,
    fail_on_empty: bool,
}

/// In-memory cart service for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCartService {
    state: Arc<RwLock<InMemoryCartState>>,
}

impl InMemoryCartService {
    /// Creates a new in-memory cart service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the cart for a user.
    pub fn put_cart(&self, user_id: impl Into<String>, items: Vec<CartItem>) {
        self.state
            .write()
            .unwrap()
            .carts
            .insert(user_id.into(), items);
    }

    /// Configures the service to fail on get_cart calls.
    pub fn set_fail_on_get(&self, fail: bool) {
        self.state.write().unwrap().fail_on_get = fail;
    }

    /// Configures the service to fail on empty_cart calls.
    pub fn set_fail_on_empty(&self, fail: bool) {
        self.state.write().unwrap().fail_on_empty = fail;
    }

    /// Returns how many times the cart was cleared.
    pub fn empty_call_count(&self) -> u32 {
        self.state.read().unwrap().empty_calls
    }

    /// Returns the user's current cart contents.
    pub fn cart(&self, user_id: &str) -> Vec<CartItem> {
        self.state
            .read()
            .unwrap()
            .carts
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl CartService for InMemoryCartService {
    async fn get_cart(&self, user_id: &str) -> Result<Vec<CartItem>, ClientError> {
        let state = self.state.read().unwrap();

        if state.fail_on_get {
            return Err(ClientError::Unavailable("Cart unavailable".to_string()));
        }

        Ok(state.carts.get(user_id).cloned().unwrap_or_default())
    }

    async fn empty_cart(&self, user_id: &str) -> Result<(), ClientError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_empty {
            return Err(ClientError::Unavailable("Cart unavailable".to_string()));
        }

        state.empty_calls += 1;
        state.carts.remove(user_id);
        Ok(())
    }
}
