//! Domain models for the storefront.
//!
//! These types represent validated domain objects separate from the database
//! row types used inside the repositories.

pub mod customer;
pub mod order;
pub mod product;

pub use customer::{City, Customer};
pub use order::{Order, OrderLine};
pub use product::{Category, Product};

/// Session keys used by the storefront.
pub mod session_keys {
    /// The serialized [`pitchside_core::Cart`].
    pub const CART: &str = "cart";
    /// One-shot flash message shown on the next page render.
    pub const FLASH: &str = "flash";
}
