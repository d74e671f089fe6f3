//! Checkout orchestration for the storefront.
//!
//! This crate runs the place-order sequence against the storefront's
//! backing services:
//! 1. Fetch the user's cart
//! 2. Price each cart line in the checkout currency
//! 3. Quote shipping and convert the quote
//! 4. Charge the card for items plus shipping
//! 5. Ship the order and clear the cart
//! 6. Send the confirmation email
//!
//! Steps 1 through 5 are required: the first failure stops the checkout
//! and nothing already done is undone. The confirmation email is
//! best-effort.

pub mod coordinator;
pub mod error;
pub mod services;
pub mod step;

pub use coordinator::CheckoutCoordinator;
pub use error::{CheckoutError, ClientError};
pub use services::{
    CartService, CurrencyService, EmailService, HttpCartService, HttpCurrencyService,
    HttpEmailService, HttpPaymentService, HttpProductCatalogService, HttpShippingService,
    InMemoryCartService, InMemoryCurrencyService, InMemoryEmailService, InMemoryPaymentService,
    InMemoryProductCatalogService, InMemoryShippingService, PaymentService, Product,
    ProductCatalogService, ShippingService,
};
pub use step::{CheckoutStep, StepPolicy};
