//! HTTP API server with observability for the checkout service.
//!
//! Exposes the place-order endpoint over REST, with structured logging
//! (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::{get, post};
use checkout::{
    CartService, CheckoutCoordinator, CurrencyService, EmailService, HttpCartService,
    HttpCurrencyService, HttpEmailService, HttpPaymentService, HttpProductCatalogService,
    HttpShippingService, PaymentService, ProductCatalogService, ShippingService,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use routes::checkout::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<Ca, Pc, Cu, Sh, Pa, Em>(
    state: Arc<AppState<Ca, Pc, Cu, Sh, Pa, Em>>,
    metrics_handle: PrometheusHandle,
) -> Router
where
    Ca: CartService + 'static,
    Pc: ProductCatalogService + 'static,
    Cu: CurrencyService + 'static,
    Sh: ShippingService + 'static,
    Pa: PaymentService + 'static,
    Em: EmailService + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/checkout",
            post(routes::checkout::place::<Ca, Pc, Cu, Sh, Pa, Em>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// The application state wired to the real collaborator services.
pub type HttpAppState = AppState<
    HttpCartService,
    HttpProductCatalogService,
    HttpCurrencyService,
    HttpShippingService,
    HttpPaymentService,
    HttpEmailService,
>;

/// Builds the application state from the configuration: one shared HTTP
/// client with the configured timeout, cloned into a client per
/// collaborator.
pub fn create_http_state(config: &Config) -> Result<Arc<HttpAppState>, reqwest::Error> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.upstream_timeout_secs))
        .build()?;

    let coordinator = CheckoutCoordinator::new(
        HttpCartService::new(client.clone(), config.cart_url.clone()),
        HttpProductCatalogService::new(client.clone(), config.catalog_url.clone()),
        HttpCurrencyService::new(client.clone(), config.currency_url.clone()),
        HttpShippingService::new(client.clone(), config.shipping_url.clone()),
        HttpPaymentService::new(client.clone(), config.payment_url.clone()),
        HttpEmailService::new(client, config.email_url.clone()),
    );

    Ok(Arc::new(AppState { coordinator }))
}
