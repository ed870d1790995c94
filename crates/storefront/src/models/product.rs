//! Product and category domain types.

use chrono::NaiveDate;

use pitchside_core::{Availability, CategoryId, Price, ProductId};

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Unique category ID.
    pub id: CategoryId,
    /// Category name, unique.
    pub name: String,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Optional marketing description.
    pub description: Option<String>,
    /// Unit price. Always strictly positive.
    pub price: Price,
    /// Whether the product is currently in stock.
    pub in_stock: bool,
    /// Sales channels the product is offered through.
    pub availability: Availability,
    /// Optional last day the product is offered.
    pub available_till: Option<NaiveDate>,
    /// The category this product belongs to.
    pub category: Category,
}
