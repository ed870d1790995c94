//! The shopping cart.
//!
//! A cart is an ordered collection of lines keyed by product identity. It is
//! pure data (serde-serializable) so the storefront can keep it in the
//! session; the unit price of each line is captured when the product is
//! added, so later catalog price changes do not affect carts in flight.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// One (product, quantity) pairing within a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// The product this line refers to.
    pub product_id: ProductId,
    /// Product name at the time the line was created.
    pub name: String,
    /// Unit price at the time the line was created.
    pub unit_price: Price,
    /// Number of units. Never below 1.
    pub quantity: u32,
}

impl CartLine {
    /// Line subtotal: unit price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.unit_price.times(self.quantity)
    }
}

/// An ordered collection of cart lines keyed by product identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// The cart lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct lines in the cart.
    #[must_use]
    pub const fn number_of_items(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Sum of line subtotals.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Add `quantity` units of a product.
    ///
    /// If the product is already in the cart its quantity is incremented;
    /// otherwise a new line is appended. A zero quantity is treated as 1.
    /// Quantities saturate at `u32::MAX`; the form input is untrusted.
    pub fn add(&mut self, product_id: ProductId, name: impl Into<String>, unit_price: Price, quantity: u32) {
        let quantity = quantity.max(1);
        match self.line_mut(product_id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.lines.push(CartLine {
                product_id,
                name: name.into(),
                unit_price,
                quantity,
            }),
        }
    }

    /// Remove the line for a product, if present.
    pub fn remove(&mut self, product_id: ProductId) {
        self.lines.retain(|line| line.product_id != product_id);
    }

    /// Increase the quantity of a product's line by one, saturating.
    pub fn increase(&mut self, product_id: ProductId) {
        if let Some(line) = self.line_mut(product_id) {
            line.quantity = line.quantity.saturating_add(1);
        }
    }

    /// Decrease the quantity of a product's line by one.
    ///
    /// Quantity never goes below 1; use [`Cart::remove`] to drop a line.
    pub fn decrease(&mut self, product_id: ProductId) {
        if let Some(line) = self.line_mut(product_id) {
            line.quantity = line.quantity.saturating_sub(1).max(1);
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    fn line_mut(&mut self, product_id: ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.product_id == product_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn price(amount: i64) -> Price {
        Price::new(Decimal::from(amount)).unwrap()
    }

    fn cart_with_football() -> Cart {
        let mut cart = Cart::new();
        cart.add(ProductId::new(1), "Football", price(25), 2);
        cart
    }

    #[test]
    fn test_add_new_product_appends_line() {
        let mut cart = cart_with_football();
        cart.add(ProductId::new(4), "Running shoes", price(95), 2);

        assert_eq!(cart.number_of_items(), 2);
        assert_eq!(cart.lines()[1].name, "Running shoes");
    }

    #[test]
    fn test_add_existing_product_increments_quantity() {
        let mut cart = cart_with_football();
        cart.add(ProductId::new(1), "Football", price(25), 3);

        assert_eq!(cart.number_of_items(), 1);
        assert_eq!(cart.lines()[0].quantity, 5);
    }

    #[test]
    fn test_add_zero_quantity_is_treated_as_one() {
        let mut cart = Cart::new();
        cart.add(ProductId::new(1), "Football", price(25), 0);
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn test_add_captures_price_at_add_time() {
        let mut cart = cart_with_football();
        // A later add at a new price does not reprice the existing line.
        cart.add(ProductId::new(1), "Football", price(30), 1);

        assert_eq!(cart.lines()[0].unit_price, price(25));
        assert_eq!(cart.total(), Decimal::from(75));
    }

    #[test]
    fn test_add_saturates_instead_of_overflowing() {
        let mut cart = Cart::new();
        cart.add(ProductId::new(1), "Football", price(25), u32::MAX);
        cart.add(ProductId::new(1), "Football", price(25), 2);
        assert_eq!(cart.lines()[0].quantity, u32::MAX);
    }

    #[test]
    fn test_increase_saturates_at_max() {
        let mut cart = Cart::new();
        cart.add(ProductId::new(1), "Football", price(25), u32::MAX);
        cart.increase(ProductId::new(1));
        assert_eq!(cart.lines()[0].quantity, u32::MAX);
    }

    #[test]
    fn test_remove_deletes_line() {
        let mut cart = cart_with_football();
        cart.remove(ProductId::new(1));

        assert_eq!(cart.number_of_items(), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_unknown_product_is_noop() {
        let mut cart = cart_with_football();
        cart.remove(ProductId::new(99));
        assert_eq!(cart.number_of_items(), 1);
    }

    #[test]
    fn test_increase_adds_one_unit() {
        let mut cart = cart_with_football();
        cart.increase(ProductId::new(1));
        assert_eq!(cart.lines()[0].quantity, 3);
    }

    #[test]
    fn test_decrease_removes_one_unit() {
        let mut cart = cart_with_football();
        cart.decrease(ProductId::new(1));
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn test_decrease_never_goes_below_one() {
        let mut cart = cart_with_football();
        cart.decrease(ProductId::new(1));
        cart.decrease(ProductId::new(1));
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn test_total_is_sum_of_line_subtotals() {
        let mut cart = cart_with_football();
        cart.add(ProductId::new(2), "Corner flags", price(34), 2);

        // 2 * 25 + 2 * 34
        assert_eq!(cart.total(), Decimal::from(118));
        assert_eq!(cart.total_quantity(), 4);
    }

    #[test]
    fn test_empty_cart_total_is_zero() {
        assert_eq!(Cart::new().total(), Decimal::ZERO);
    }

    #[test]
    fn test_clear_empties_cart() {
        let mut cart = cart_with_football();
        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_cart_round_trips_through_serde() {
        let cart = cart_with_football();
        let json = serde_json::to_string(&cart).unwrap();
        let back: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cart);
    }
}
