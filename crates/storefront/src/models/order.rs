//! Order domain types.
//!
//! Orders snapshot the cart at placement time: each line carries the product
//! name and unit price as they were when the order was placed, so later
//! catalog edits do not rewrite order history.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use pitchside_core::{CustomerId, OrderId, Price, ProductId};

/// One snapshotted cart line within an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    /// The product ordered.
    pub product_id: ProductId,
    /// Product name at placement time.
    pub product_name: String,
    /// Unit price at placement time.
    pub unit_price: Price,
    /// Number of units.
    pub quantity: u32,
}

impl OrderLine {
    /// Line subtotal: unit price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.unit_price.times(self.quantity)
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// The customer who placed the order.
    pub customer_id: CustomerId,
    /// When the order was placed.
    pub ordered_at: DateTime<Utc>,
    /// Requested delivery date.
    pub delivery_date: NaiveDate,
    /// Whether the order should be gift wrapped.
    pub giftwrap: bool,
    /// Shipping street address.
    pub shipping_street: String,
    /// Shipping city name (snapshotted).
    pub shipping_city: String,
    /// Order total at placement time.
    pub total: Decimal,
    /// The snapshotted cart lines.
    pub lines: Vec<OrderLine>,
}
