//! Pure totaling of priced cart lines into an order.

use money::{Money, MoneyError};

use crate::order::OrderItem;
use crate::value_objects::CartItem;

/// A cart line together with its per-unit price in the checkout currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedItem {
    /// The cart line being priced.
    pub item: CartItem,

    /// Price of one unit, already converted to the checkout currency.
    pub unit_price: Money,
}

impl PricedItem {
    /// Pairs a cart line with its converted unit price.
    pub fn new(item: CartItem, unit_price: Money) -> Self {
        Self { item, unit_price }
    }
}

/// The totaled order: one order line per cart line plus the grand total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledOrder {
    /// Priced order lines, in the same order as the input.
    pub items: Vec<OrderItem>,

    /// Shipping plus all line totals, in the checkout currency.
    pub total: Money,
}

/// Totals an order in `currency`: starts from zero, adds the shipping
/// cost, then each line's unit price multiplied by its quantity. Each
/// output line carries its line total and keeps the input position.
///
/// Every addition runs through [`Money::sum`], so any component priced in
/// a different currency fails with [`MoneyError::CurrencyMismatch`] here
/// rather than silently mixing currencies after an upstream conversion
/// slip.
pub fn assemble(
    currency: &str,
    priced_items: Vec<PricedItem>,
    shipping_cost: &Money,
) -> Result<AssembledOrder, MoneyError> {
    let mut total = Money::zero(currency).sum(shipping_cost)?;
    let mut items = Vec::with_capacity(priced_items.len());

    for priced in priced_items {
        let line_total = priced.unit_price.multiply(priced.item.quantity)?;
        total = total.sum(&line_total)?;
        items.push(OrderItem {
            item: priced.item,
            cost: line_total,
        });
    }

    Ok(AssembledOrder { items, total })
}
