//! Checkout endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use checkout::{
    CartService, CheckoutCoordinator, CurrencyService, EmailService, PaymentService,
    ProductCatalogService, ShippingService,
};
use domain::{OrderResult, PlaceOrder};
use serde::Serialize;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<Ca, Pc, Cu, Sh, Pa, Em>
where
    Ca: CartService,
    Pc: ProductCatalogService,
    Cu: CurrencyService,
    Sh: ShippingService,
    Pa: PaymentService,
    Em: EmailService,
{
    pub coordinator: CheckoutCoordinator<Ca, Pc, Cu, Sh, Pa, Em>,
}

#[derive(Serialize)]
pub struct PlaceOrderResponse {
    pub order: OrderResult,
}

/// POST /checkout — place an order for everything in the user's cart.
#[tracing::instrument(skip(state, req), fields(user_id = %req.user_id))]
pub async fn place<Ca, Pc, Cu, Sh, Pa, Em>(
    State(state): State<Arc<AppState<Ca, Pc, Cu, Sh, Pa, Em>>>,
    Json(req): Json<PlaceOrder>,
) -> Result<Json<PlaceOrderResponse>, ApiError>
where
    Ca: CartService + 'static,
    Pc: ProductCatalogService + 'static,
    Cu: CurrencyService + 'static,
    Sh: ShippingService + 'static,
    Pa: PaymentService + 'static,
    Em: EmailService + 'static,
{
    if req.user_id.is_empty() {
        return Err(ApiError::BadRequest("user_id is required".to_string()));
    }
    if req.user_currency.is_empty() {
        return Err(ApiError::BadRequest("user_currency is required".to_string()));
    }

    let order = state.coordinator.place_order(req).await?;
    Ok(Json(PlaceOrderResponse { order }))
}
