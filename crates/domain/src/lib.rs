//! Order domain for the checkout flow.
//!
//! Holds the value objects forwarded from the storefront, the order
//! command and result types, and the pure assembler that turns priced
//! cart lines into a totaled order. Nothing here performs I/O.

pub mod assembler;
pub mod order;
pub mod value_objects;

pub use assembler::{AssembledOrder, PricedItem, assemble};
pub use order::{OrderItem, OrderResult, PlaceOrder};
pub use value_objects::{Address, CartItem, CreditCardInfo};
