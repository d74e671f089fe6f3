//! The place-order step table.

/// How a step's failure affects the rest of the checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPolicy {
    /// Failure aborts the checkout immediately. Nothing already done is
    /// undone.
    Required,

    /// Failure is logged and the checkout carries on.
    BestEffort,
}

/// One step of the place-order sequence.
///
/// The checkout runs the steps of [`CheckoutStep::SEQUENCE`] in order and
/// stops at the first failing [`StepPolicy::Required`] step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckoutStep {
    /// Fetch the user's cart lines.
    FetchCart,

    /// Price each cart line in the checkout currency.
    PriceItems,

    /// Quote shipping for the cart, in USD.
    QuoteShipping,

    /// Convert the shipping quote to the checkout currency.
    ConvertShipping,

    /// Charge the card for the order total.
    ChargePayment,

    /// Hand the order to the shipping service.
    ShipOrder,

    /// Clear the user's cart.
    EmptyCart,

    /// Send the order confirmation email.
    SendConfirmation,
}

impl CheckoutStep {
    /// All steps in execution order.
    pub const SEQUENCE: [CheckoutStep; 8] = [
        CheckoutStep::FetchCart,
        CheckoutStep::PriceItems,
        CheckoutStep::QuoteShipping,
        CheckoutStep::ConvertShipping,
        CheckoutStep::ChargePayment,
        CheckoutStep::ShipOrder,
        CheckoutStep::EmptyCart,
        CheckoutStep::SendConfirmation,
    ];

    /// Returns how a failure of this step is treated.
    pub fn policy(&self) -> StepPolicy {
        match self {
            CheckoutStep::SendConfirmation => StepPolicy::BestEffort,
            _ => StepPolicy::Required,
        }
    }

    /// Returns the step name as used in logs, metrics, and errors.
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStep::FetchCart => "fetch_cart",
            CheckoutStep::PriceItems => "price_items",
            CheckoutStep::QuoteShipping => "quote_shipping",
            CheckoutStep::ConvertShipping => "convert_shipping",
            CheckoutStep::ChargePayment => "charge_payment",
            CheckoutStep::ShipOrder => "ship_order",
            CheckoutStep::EmptyCart => "empty_cart",
            CheckoutStep::SendConfirmation => "send_confirmation",
        }
    }
}

impl std::fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
