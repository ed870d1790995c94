//! Type-safe price representation using decimal arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error constructing a [`Price`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    /// Prices must be strictly positive.
    #[error("price must be greater than 0 (got {0})")]
    NotPositive(Decimal),
}

/// A unit price in the store currency.
///
/// Invariant: the amount is always strictly positive. Construct via
/// [`Price::new`], which rejects zero and negative amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotPositive`] if `amount` is zero or negative.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive(amount));
        }
        Ok(Self(amount))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Line subtotal for `quantity` units.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Decimal {
        self.0 * Decimal::from(quantity)
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("${:.2}", self.0)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_price_is_accepted() {
        let price = Price::new(Decimal::from(25)).unwrap();
        assert_eq!(price.amount(), Decimal::from(25));
    }

    #[test]
    fn test_zero_price_is_rejected() {
        assert_eq!(
            Price::new(Decimal::ZERO),
            Err(PriceError::NotPositive(Decimal::ZERO))
        );
    }

    #[test]
    fn test_negative_price_is_rejected() {
        assert!(Price::new(Decimal::from(-1)).is_err());
    }

    #[test]
    fn test_line_subtotal() {
        // 12.50 * 3 = 37.50
        let price = Price::new(Decimal::new(1250, 2)).unwrap();
        assert_eq!(price.times(3), Decimal::new(3750, 2));
    }

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Price::new(Decimal::from(79500)).unwrap().display(), "$79500.00");
        assert_eq!(Price::new(Decimal::new(199, 1)).unwrap().display(), "$19.90");
    }
}
