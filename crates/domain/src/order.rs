//! Order command and result types.

use money::Money;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value_objects::{Address, CartItem, CreditCardInfo};

/// Command to place an order for everything in a user's cart.
///
/// This is the request body of the checkout endpoint, deserialized as-is
/// from the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrder {
    /// User whose cart is being checked out.
    pub user_id: String,

    /// Currency the user wants to pay in; every amount in the resulting
    /// order is expressed in it.
    pub user_currency: String,

    /// Where to ship the order.
    pub address: Address,

    /// Where to send the confirmation.
    pub email: String,

    /// Card to charge.
    pub credit_card: CreditCardInfo,
}

/// One line of a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// The cart line this order line was priced from.
    pub item: CartItem,

    /// Line total in the checkout currency: unit price times quantity.
    pub cost: Money,
}

/// The outcome of a successful checkout. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResult {
    /// Server-assigned order identifier.
    pub order_id: Uuid,

    /// Tracking id returned by the shipping service.
    pub shipping_tracking_id: String,

    /// Shipping cost in the checkout currency.
    pub shipping_cost: Money,

    /// Destination the order ships to.
    pub shipping_address: Address,

    /// Priced order lines, in cart order.
    pub items: Vec<OrderItem>,
}
