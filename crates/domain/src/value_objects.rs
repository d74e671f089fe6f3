//! Value objects passed through the checkout flow.
//!
//! These structs mirror the storefront wire format field for field. The
//! orchestrator never inspects their contents; it only forwards them to
//! the collaborator that needs them. Absent fields deserialize as empty
//! or zero, since the emitters omit empty values.

use serde::{Deserialize, Serialize};

/// A single cart line: a product and how many of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartItem {
    /// Catalog identifier of the product.
    pub product_id: String,

    /// Number of units ordered.
    pub quantity: u32,
}

impl CartItem {
    /// Creates a new cart line.
    pub fn new(product_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// A shipping destination, forwarded verbatim to the shipping service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: i32,
}

/// Card details forwarded verbatim to the payment service. Never logged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreditCardInfo {
    pub credit_card_number: String,
    pub credit_card_cvv: i32,
    pub credit_card_expiration_year: i32,
    pub credit_card_expiration_month: i32,
}
