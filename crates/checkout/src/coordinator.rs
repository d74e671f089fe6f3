//! Checkout coordinator for the place-order sequence.

use domain::{CartItem, OrderResult, PlaceOrder, PricedItem, assemble};
use futures_util::stream::{self, StreamExt, TryStreamExt};
use uuid::Uuid;

use crate::error::{CheckoutError, ClientError};
use crate::services::cart::CartService;
use crate::services::catalog::ProductCatalogService;
use crate::services::currency::CurrencyService;
use crate::services::email::EmailService;
use crate::services::payment::PaymentService;
use crate::services::shipping::ShippingService;
use crate::step::{CheckoutStep, StepPolicy};

/// How many cart lines are priced concurrently. Pricing results come back
/// in cart order regardless.
const PRICING_CONCURRENCY: usize = 4;

/// Orchestrates the place-order sequence over the six collaborator
/// services.
///
/// The sequence is linear: fetch the cart, price each line in the
/// checkout currency, quote shipping in USD and convert it, charge the
/// card for the total, ship, clear the cart, then send the confirmation
/// email. Every step but the confirmation is required: a required failure
/// stops the checkout with an error naming the step, and nothing already
/// done is undone. The confirmation is best-effort and only logged when
/// it fails.
pub struct CheckoutCoordinator<Ca, Pc, Cu, Sh, Pa, Em>
where
    Ca: CartService,
    Pc: ProductCatalogService,
    Cu: CurrencyService,
    Sh: ShippingService,
    Pa: PaymentService,
    Em: EmailService,
{
    cart: Ca,
    catalog: Pc,
    currency: Cu,
    shipping: Sh,
    payment: Pa,
    email: Em,
}

impl<Ca, Pc, Cu, Sh, Pa, Em> CheckoutCoordinator<Ca, Pc, Cu, Sh, Pa, Em>
where
    Ca: CartService,
    Pc: ProductCatalogService,
    Cu: CurrencyService,
    Sh: ShippingService,
    Pa: PaymentService,
    Em: EmailService,
{
    /// Creates a new checkout coordinator over the given collaborators.
    pub fn new(cart: Ca, catalog: Pc, currency: Cu, shipping: Sh, payment: Pa, email: Em) -> Self {
        Self {
            cart,
            catalog,
            currency,
            shipping,
            payment,
            email,
        }
    }

    /// Places an order for everything in the user's cart.
    ///
    /// Returns the completed order, or the error of the first required
    /// step that failed.
    #[tracing::instrument(
        skip(self, order),
        fields(user_id = %order.user_id, user_currency = %order.user_currency)
    )]
    pub async fn place_order(&self, order: PlaceOrder) -> Result<OrderResult, CheckoutError> {
        metrics::counter!("checkout_requests_total").increment(1);
        let started = std::time::Instant::now();

        let result = self.run(order).await;

        metrics::histogram!("checkout_duration_seconds").record(started.elapsed().as_secs_f64());
        match &result {
            Ok(completed) => {
                metrics::counter!("checkout_completed").increment(1);
                tracing::info!(order_id = %completed.order_id, "checkout completed");
            }
            Err(err) => {
                metrics::counter!("checkout_failed").increment(1);
                tracing::warn!(error = %err, "checkout failed");
            }
        }
        result
    }

    async fn run(&self, order: PlaceOrder) -> Result<OrderResult, CheckoutError> {
        let order_id = Uuid::new_v4();
        tracing::info!(%order_id, "checkout started");

        self.step_started(CheckoutStep::FetchCart);
        let cart_items = self
            .cart
            .get_cart(&order.user_id)
            .await
            .map_err(|e| CheckoutError::step(CheckoutStep::FetchCart, e))?;

        self.step_started(CheckoutStep::PriceItems);
        let priced_items = self.price_items(&cart_items, &order.user_currency).await?;

        self.step_started(CheckoutStep::QuoteShipping);
        let quote_usd = self
            .shipping
            .get_quote(&order.address, &cart_items)
            .await
            .map_err(|e| CheckoutError::step(CheckoutStep::QuoteShipping, e))?;

        self.step_started(CheckoutStep::ConvertShipping);
        let shipping_cost = self
            .currency
            .convert(&quote_usd, &order.user_currency)
            .await
            .map_err(|e| CheckoutError::step(CheckoutStep::ConvertShipping, e))?;

        let assembled = assemble(&order.user_currency, priced_items, &shipping_cost).map_err(
            |source| CheckoutError::Total {
                currency: order.user_currency.clone(),
                source,
            },
        )?;

        self.step_started(CheckoutStep::ChargePayment);
        let transaction_id = self
            .payment
            .charge(&assembled.total, &order.credit_card)
            .await
            .map_err(|e| CheckoutError::step(CheckoutStep::ChargePayment, e))?;
        tracing::info!(%transaction_id, total = %assembled.total, "payment went through");

        self.step_started(CheckoutStep::ShipOrder);
        let shipping_tracking_id = self
            .shipping
            .ship_order(&order.address, &cart_items)
            .await
            .map_err(|e| self.fail_after_charge(CheckoutStep::ShipOrder, e, &transaction_id))?;

        self.step_started(CheckoutStep::EmptyCart);
        self.cart
            .empty_cart(&order.user_id)
            .await
            .map_err(|e| self.fail_after_charge(CheckoutStep::EmptyCart, e, &transaction_id))?;

        let completed = OrderResult {
            order_id,
            shipping_tracking_id,
            shipping_cost,
            shipping_address: order.address,
            items: assembled.items,
        };

        self.step_started(CheckoutStep::SendConfirmation);
        match self.email.send_confirmation(&order.email, &completed).await {
            Ok(()) => {
                tracing::info!(email = %order.email, "order confirmation email sent");
            }
            Err(err) => match CheckoutStep::SendConfirmation.policy() {
                StepPolicy::BestEffort => {
                    metrics::counter!("checkout_confirmation_failed").increment(1);
                    tracing::warn!(
                        email = %order.email,
                        error = %err,
                        "failed to send order confirmation"
                    );
                }
                StepPolicy::Required => {
                    return Err(CheckoutError::step(CheckoutStep::SendConfirmation, err));
                }
            },
        }

        Ok(completed)
    }

    /// Prices each cart line in the checkout currency: a catalog lookup
    /// followed by a currency conversion per line, with up to
    /// [`PRICING_CONCURRENCY`] lines in flight. `buffered` yields results
    /// in input order, so the priced lines stay index-aligned with the
    /// cart.
    async fn price_items(
        &self,
        cart_items: &[CartItem],
        user_currency: &str,
    ) -> Result<Vec<PricedItem>, CheckoutError> {
        stream::iter(cart_items.iter().cloned())
            .map(|item| async move {
                let product = self.catalog.get_product(&item.product_id).await?;
                let unit_price = self
                    .currency
                    .convert(&product.price_usd, user_currency)
                    .await?;
                Ok::<PricedItem, ClientError>(PricedItem::new(item, unit_price))
            })
            .buffered(PRICING_CONCURRENCY)
            .try_collect()
            .await
            .map_err(|e| CheckoutError::step(CheckoutStep::PriceItems, e))
    }

    fn step_started(&self, step: CheckoutStep) {
        tracing::info!(step = step.as_str(), "checkout step started");
    }

    /// Records a required-step failure that happened after the charge
    /// committed. The charge is not reversed; the transaction id is
    /// logged so the orphaned charge can be reconciled manually.
    fn fail_after_charge(
        &self,
        step: CheckoutStep,
        source: ClientError,
        transaction_id: &str,
    ) -> CheckoutError {
        metrics::counter!("checkout_orphaned_charge_total").increment(1);
        tracing::error!(
            step = step.as_str(),
            %transaction_id,
            "checkout failed after charge, transaction needs manual reconciliation"
        );
        CheckoutError::step(step, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::cart::InMemoryCartService;
    use crate::services::catalog::InMemoryProductCatalogService;
    use crate::services::currency::InMemoryCurrencyService;
    use crate::services::email::InMemoryEmailService;
    use crate::services::payment::InMemoryPaymentService;
    use crate::services::shipping::InMemoryShippingService;
    use domain::{Address, CreditCardInfo};
    use money::Money;

    type TestCoordinator = CheckoutCoordinator<
        InMemoryCartService,
        InMemoryProductCatalogService,
        InMemoryCurrencyService,
        InMemoryShippingService,
        InMemoryPaymentService,
        InMemoryEmailService,
    >;

    struct Fixture {
        coordinator: TestCoordinator,
        cart: InMemoryCartService,
        catalog: InMemoryProductCatalogService,
        currency: InMemoryCurrencyService,
        shipping: InMemoryShippingService,
        payment: InMemoryPaymentService,
        email: InMemoryEmailService,
    }

    fn setup() -> Fixture {
        let cart = InMemoryCartService::new();
        let catalog = InMemoryProductCatalogService::new();
        let currency = InMemoryCurrencyService::new();
        let shipping = InMemoryShippingService::new();
        let payment = InMemoryPaymentService::new();
        let email = InMemoryEmailService::new();

        let coordinator = CheckoutCoordinator::new(
            cart.clone(),
            catalog.clone(),
            currency.clone(),
            shipping.clone(),
            payment.clone(),
            email.clone(),
        );

        Fixture {
            coordinator,
            cart,
            catalog,
            currency,
            shipping,
            payment,
            email,
        }
    }

    fn place_order_for(user_id: &str, user_currency: &str) -> PlaceOrder {
        PlaceOrder {
            user_id: user_id.to_string(),
            user_currency: user_currency.to_string(),
            address: Address {
                street_address: "1600 Amphitheatre Parkway".to_string(),
                city: "Mountain View".to_string(),
                state: "CA".to_string(),
                country: "USA".to_string(),
                zip_code: 94043,
            },
            email: "buyer@example.com".to_string(),
            credit_card: CreditCardInfo::default(),
        }
    }

    fn usd(units: i64, nanos: i32) -> Money {
        Money::new("USD", units, nanos)
    }

    #[tokio::test]
    async fn test_happy_path() {
        let f = setup();
        f.cart.put_cart(
            "user-1",
            vec![CartItem::new("OLJCESPC7Z", 2), CartItem::new("66VCHSJNUP", 1)],
        );
        f.catalog.put_priced("OLJCESPC7Z", usd(19, 990_000_000));
        f.catalog.put_priced("66VCHSJNUP", usd(3, 500_000_000));

        let completed = f
            .coordinator
            .place_order(place_order_for("user-1", "USD"))
            .await
            .unwrap();

        assert_eq!(completed.shipping_tracking_id, "TRACK-0001");
        assert_eq!(completed.shipping_cost, usd(8, 990_000_000));
        assert_eq!(completed.items.len(), 2);
        assert_eq!(completed.items[0].cost, usd(39, 980_000_000));
        assert_eq!(completed.items[1].cost, usd(3, 500_000_000));

        assert_eq!(f.payment.charge_count(), 1);
        assert_eq!(f.shipping.shipment_count(), 1);
        assert_eq!(f.cart.empty_call_count(), 1);
        assert!(f.cart.cart("user-1").is_empty());
        assert_eq!(f.email.sent_to(), vec!["buyer@example.com"]);
    }

    #[tokio::test]
    async fn test_charge_amount_is_items_plus_shipping() {
        let f = setup();
        f.cart.put_cart(
            "user-1",
            vec![CartItem::new("OLJCESPC7Z", 2), CartItem::new("66VCHSJNUP", 1)],
        );
        f.catalog.put_priced("OLJCESPC7Z", usd(19, 990_000_000));
        f.catalog.put_priced("66VCHSJNUP", usd(3, 500_000_000));

        f.coordinator
            .place_order(place_order_for("user-1", "USD"))
            .await
            .unwrap();

        // 2 x 19.99 + 3.50 + 8.99 shipping.
        assert_eq!(f.payment.charged_amounts(), vec![usd(52, 470_000_000)]);
    }

    #[tokio::test]
    async fn test_amounts_come_back_in_user_currency() {
        let f = setup();
        f.cart.put_cart("user-1", vec![CartItem::new("OLJCESPC7Z", 1)]);
        f.catalog.put_priced("OLJCESPC7Z", usd(10, 0));

        let completed = f
            .coordinator
            .place_order(place_order_for("user-1", "EUR"))
            .await
            .unwrap();

        assert_eq!(completed.shipping_cost.currency_code, "EUR");
        assert_eq!(completed.items[0].cost, Money::new("EUR", 10, 0));
        assert_eq!(
            f.payment.charged_amounts(),
            vec![Money::new("EUR", 18, 990_000_000)]
        );
    }

    #[tokio::test]
    async fn test_cart_failure_stops_before_any_other_call() {
        let f = setup();
        f.cart.set_fail_on_get(true);

        let err = f
            .coordinator
            .place_order(place_order_for("user-1", "USD"))
            .await
            .unwrap_err();

        assert_eq!(err.failed_step(), Some(CheckoutStep::FetchCart));
        assert_eq!(f.catalog.lookup_count(), 0);
        assert_eq!(f.shipping.quote_count(), 0);
        assert_eq!(f.payment.charge_count(), 0);
        assert_eq!(f.shipping.shipment_count(), 0);
        assert_eq!(f.email.attempt_count(), 0);
    }

    #[tokio::test]
    async fn test_pricing_failure_skips_payment_shipping_and_cart_clear() {
        let f = setup();
        f.cart
            .put_cart("user-1", vec![CartItem::new("23", 1), CartItem::new("46", 3)]);
        f.catalog.put_priced("23", usd(0, 0));
        f.catalog.put_priced("46", usd(0, 0));
        f.catalog.set_fail_for("46");

        let err = f
            .coordinator
            .place_order(place_order_for("user-1", "USD"))
            .await
            .unwrap_err();

        assert_eq!(err.failed_step(), Some(CheckoutStep::PriceItems));
        assert_eq!(f.shipping.quote_count(), 0);
        assert_eq!(f.payment.charge_count(), 0);
        assert_eq!(f.shipping.shipment_count(), 0);
        assert_eq!(f.cart.empty_call_count(), 0);
        assert_eq!(f.cart.cart("user-1").len(), 2);
    }

    #[tokio::test]
    async fn test_quote_failure_stops_checkout() {
        let f = setup();
        f.cart.put_cart("user-1", vec![CartItem::new("23", 1)]);
        f.catalog.put_priced("23", usd(1, 0));
        f.shipping.set_fail_on_quote(true);

        let err = f
            .coordinator
            .place_order(place_order_for("user-1", "USD"))
            .await
            .unwrap_err();

        assert_eq!(err.failed_step(), Some(CheckoutStep::QuoteShipping));
        assert_eq!(f.payment.charge_count(), 0);
    }

    #[tokio::test]
    async fn test_shipping_conversion_failure_stops_checkout() {
        let f = setup();
        // Empty cart: no pricing conversions, so the first convert call
        // is the shipping one.
        f.currency.set_fail_on_convert(true);

        let err = f
            .coordinator
            .place_order(place_order_for("user-1", "USD"))
            .await
            .unwrap_err();

        assert_eq!(err.failed_step(), Some(CheckoutStep::ConvertShipping));
        assert_eq!(f.payment.charge_count(), 0);
    }

    #[tokio::test]
    async fn test_payment_failure_leaves_cart_and_skips_shipment() {
        let f = setup();
        f.cart.put_cart("user-1", vec![CartItem::new("23", 1)]);
        f.catalog.put_priced("23", usd(5, 0));
        f.payment.set_fail_on_charge(true);

        let err = f
            .coordinator
            .place_order(place_order_for("user-1", "USD"))
            .await
            .unwrap_err();

        assert_eq!(err.failed_step(), Some(CheckoutStep::ChargePayment));
        assert_eq!(f.shipping.shipment_count(), 0);
        assert_eq!(f.cart.empty_call_count(), 0);
        assert_eq!(f.email.attempt_count(), 0);
    }

    #[tokio::test]
    async fn test_shipping_failure_keeps_the_charge() {
        let f = setup();
        f.cart.put_cart("user-1", vec![CartItem::new("23", 1)]);
        f.catalog.put_priced("23", usd(5, 0));
        f.shipping.set_fail_on_ship(true);

        let err = f
            .coordinator
            .place_order(place_order_for("user-1", "USD"))
            .await
            .unwrap_err();

        assert_eq!(err.failed_step(), Some(CheckoutStep::ShipOrder));
        // The charge went through and is not reversed.
        assert_eq!(f.payment.charge_count(), 1);
        assert_eq!(f.cart.empty_call_count(), 0);
        assert_eq!(f.email.attempt_count(), 0);
    }

    #[tokio::test]
    async fn test_cart_clear_failure_keeps_charge_and_shipment() {
        let f = setup();
        f.cart.put_cart("user-1", vec![CartItem::new("23", 1)]);
        f.catalog.put_priced("23", usd(5, 0));
        f.cart.set_fail_on_empty(true);

        let err = f
            .coordinator
            .place_order(place_order_for("user-1", "USD"))
            .await
            .unwrap_err();

        assert_eq!(err.failed_step(), Some(CheckoutStep::EmptyCart));
        assert_eq!(f.payment.charge_count(), 1);
        assert_eq!(f.shipping.shipment_count(), 1);
        assert_eq!(f.email.attempt_count(), 0);
    }

    #[tokio::test]
    async fn test_email_failure_does_not_fail_the_order() {
        let f = setup();
        f.cart.put_cart("user-1", vec![CartItem::new("23", 1)]);
        f.catalog.put_priced("23", usd(5, 0));
        f.email.set_fail_on_send(true);

        let completed = f
            .coordinator
            .place_order(place_order_for("user-1", "USD"))
            .await
            .unwrap();

        assert!(!completed.shipping_tracking_id.is_empty());
        assert_eq!(f.email.attempt_count(), 1);
        assert!(f.email.sent_to().is_empty());
    }

    #[tokio::test]
    async fn test_zero_cost_items_charge_shipping_only() {
        let f = setup();
        f.cart
            .put_cart("user-1", vec![CartItem::new("23", 1), CartItem::new("46", 3)]);
        f.catalog.put_priced("23", usd(0, 0));
        f.catalog.put_priced("46", usd(0, 0));

        let completed = f
            .coordinator
            .place_order(place_order_for("user-1", "USD"))
            .await
            .unwrap();

        assert_eq!(completed.items.len(), 2);
        assert!(completed.items.iter().all(|line| line.cost.is_zero()));
        assert_eq!(f.payment.charged_amounts(), vec![usd(8, 990_000_000)]);
    }

    #[tokio::test]
    async fn test_priced_items_keep_cart_order_under_fanout() {
        let f = setup();
        let ids = ["p1", "p2", "p3", "p4", "p5", "p6", "p7", "p8"];
        let items: Vec<CartItem> = ids.iter().map(|id| CartItem::new(*id, 1)).collect();
        f.cart.put_cart("user-1", items);
        for (i, id) in ids.iter().enumerate() {
            f.catalog.put_priced(*id, usd(i as i64 + 1, 0));
        }

        let completed = f
            .coordinator
            .place_order(place_order_for("user-1", "USD"))
            .await
            .unwrap();

        let got: Vec<&str> = completed
            .items
            .iter()
            .map(|line| line.item.product_id.as_str())
            .collect();
        assert_eq!(got, ids);
        // Line totals follow the seeded prices, so alignment is real,
        // not just id ordering.
        assert_eq!(completed.items[4].cost, usd(5, 0));
    }

    #[tokio::test]
    async fn test_empty_cart_checks_out_with_shipping_only() {
        let f = setup();

        let completed = f
            .coordinator
            .place_order(place_order_for("user-1", "USD"))
            .await
            .unwrap();

        assert!(completed.items.is_empty());
        assert_eq!(f.payment.charged_amounts(), vec![usd(8, 990_000_000)]);
    }
}
