//! HTTP middleware for the storefront.

pub mod session;

pub use session::{create_session_layer, flash, load_cart, store_cart, take_flash};
