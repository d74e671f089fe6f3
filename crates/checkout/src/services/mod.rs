//! Collaborator service traits with HTTP and in-memory implementations.
//!
//! Each collaborator gets one module holding its trait, the reqwest
//! client used in production, and an in-memory fake for tests. The HTTP
//! clients share one `reqwest::Client` and speak the storefront wire
//! format.

pub mod cart;
pub mod catalog;
pub mod currency;
pub mod email;
pub mod payment;
pub mod shipping;

pub use cart::{CartService, HttpCartService, InMemoryCartService};
pub use catalog::{
    HttpProductCatalogService, InMemoryProductCatalogService, Product, ProductCatalogService,
};
pub use currency::{CurrencyService, HttpCurrencyService, InMemoryCurrencyService};
pub use email::{EmailService, HttpEmailService, InMemoryEmailService};
pub use payment::{HttpPaymentService, InMemoryPaymentService, PaymentService};
pub use shipping::{HttpShippingService, InMemoryShippingService, ShippingService};
