//! Sales-channel availability for products.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where a product may be sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    /// Only sold in the physical shop.
    ShopOnly,
    /// Only sold through the online storefront.
    OnlineOnly,
    /// Sold both in the shop and online.
    #[default]
    ShopAndOnline,
}

/// Error parsing an [`Availability`] token.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown availability: {0}")]
pub struct ParseAvailabilityError(String);

impl Availability {
    /// All variants, in form-select order.
    pub const ALL: [Self; 3] = [Self::ShopOnly, Self::OnlineOnly, Self::ShopAndOnline];

    /// Whether the product is sold through the online storefront.
    #[must_use]
    pub const fn is_online(&self) -> bool {
        matches!(self, Self::OnlineOnly | Self::ShopAndOnline)
    }

    /// Stable token used for the database column and form values.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ShopOnly => "shop_only",
            Self::OnlineOnly => "online_only",
            Self::ShopAndOnline => "shop_and_online",
        }
    }

    /// Human-readable label for templates.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::ShopOnly => "Shop only",
            Self::OnlineOnly => "Online only",
            Self::ShopAndOnline => "Shop and online",
        }
    }
}

impl std::str::FromStr for Availability {
    type Err = ParseAvailabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shop_only" => Ok(Self::ShopOnly),
            "online_only" => Ok(Self::OnlineOnly),
            "shop_and_online" => Ok(Self::ShopAndOnline),
            other => Err(ParseAvailabilityError(other.to_owned())),
        }
    }
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_token_roundtrip() {
        for availability in Availability::ALL {
            assert_eq!(availability.as_str().parse::<Availability>().unwrap(), availability);
        }
    }

    #[test]
    fn test_unknown_token_is_rejected() {
        assert!("everywhere".parse::<Availability>().is_err());
    }

    #[test]
    fn test_online_channels() {
        assert!(Availability::OnlineOnly.is_online());
        assert!(Availability::ShopAndOnline.is_online());
        assert!(!Availability::ShopOnly.is_online());
    }

    #[test]
    fn test_default_is_shop_and_online() {
        assert_eq!(Availability::default(), Availability::ShopAndOnline);
    }
}
