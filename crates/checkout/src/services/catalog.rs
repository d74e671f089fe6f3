//! Product catalog client: look up products and their USD prices.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use money::Money;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// A catalog product. Prices are always quoted in USD.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub picture: String,
    pub price_usd: Money,
    /// Categories such as "clothing" or "kitchen".
    pub categories: Vec<String>,
}

/// Operations the checkout needs from the product catalog.
#[async_trait]
pub trait ProductCatalogService: Send + Sync {
    /// Looks up a product by its catalog id.
    async fn get_product(&self, product_id: &str) -> Result<Product, ClientError>;
}

/// Product catalog client over HTTP: `GET {base}?id=`.
#[derive(Debug, Clone)]
pub struct HttpProductCatalogService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProductCatalogService {
    /// Creates a client that talks to the catalog at `base_url`.
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ProductCatalogService for HttpProductCatalogService {
    async fn get_product(&self, product_id: &str) -> Result<Product, ClientError> {
        let product = self
            .client
            .get(&self.base_url)
            .query(&[("id", product_id)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(product)
    }
}

#[derive(Debug, Default)]
struct InMemoryCatalogState {
    products: HashMap<String, Product>,
    fail_ids: HashSet<String>,
    lookups: u32,
}

/// In-memory product catalog for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductCatalogService {
    state: Arc<RwLock<InMemoryCatalogState>>,
}

impl InMemoryProductCatalogService {
    /// Creates a new in-memory catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a product to the catalog.
    pub fn put_product(&self, product: Product) {
        let mut state = self.state.write().unwrap();
        state.products.insert(product.id.clone(), product);
    }

    /// Adds a product with just an id and a USD price.
    pub fn put_priced(&self, id: impl Into<String>, price_usd: Money) {
        let id = id.into();
        self.put_product(Product {
            id: id.clone(),
            name: format!("Product {id}"),
            price_usd,
            ..Product::default()
        });
    }

    /// Configures lookups of the given product id to fail.
    pub fn set_fail_for(&self, product_id: impl Into<String>) {
        self.state.write().unwrap().fail_ids.insert(product_id.into());
    }

    /// Returns how many lookups were made.
    pub fn lookup_count(&self) -> u32 {
        self.state.read().unwrap().lookups
    }
}

#[async_trait]
impl ProductCatalogService for InMemoryProductCatalogService {
    async fn get_product(&self, product_id: &str) -> Result<Product, ClientError> {
        let mut state = self.state.write().unwrap();
        state.lookups += 1;

        if state.fail_ids.contains(product_id) {
            return Err(ClientError::Unavailable(format!(
                "Catalog lookup failed for product {product_id}"
            )));
        }

        state.products.get(product_id).cloned().ok_or_else(|| {
            ClientError::Unavailable(format!("No product with id {product_id}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_returns_seeded_product() {
        let catalog = InMemoryProductCatalogService::new();
        catalog.put_priced("OLJCESPC7Z", Money::new("USD", 19, 990_000_000));

        let product = catalog.get_product("OLJCESPC7Z").await.unwrap();
        assert_eq!(product.id, "OLJCESPC7Z");
        assert_eq!(product.price_usd, Money::new("USD", 19, 990_000_000));
        assert_eq!(catalog.lookup_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_product_fails() {
        let catalog = InMemoryProductCatalogService::new();
        assert!(catalog.get_product("missing").await.is_err());
    }

    #[tokio::test]
    async fn test_fail_for_single_product() {
        let catalog = InMemoryProductCatalogService::new();
        catalog.put_priced("23", Money::zero("USD"));
        catalog.put_priced("46", Money::zero("USD"));
        catalog.set_fail_for("46");

        assert!(catalog.get_product("23").await.is_ok());
        assert!(catalog.get_product("46").await.is_err());
    }

    #[tokio::test]
    async fn test_product_tolerates_sparse_payload() {
        let product: Product = serde_json::from_str(
            r#"{"id": "23", "price_usd": {"currency_code": "USD"}}"#,
        )
        .unwrap();
        assert_eq!(product.id, "23");
        assert_eq!(product.price_usd, Money::zero("USD"));
        assert!(product.categories.is_empty());
    }
}
