//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Catalog (online products)
//! GET  /catalog                - Same listing, named path
//! GET  /health                 - Health check
//!
//! # Cart
//! GET  /cart                   - Cart page (or empty-cart view)
//! POST /cart/add               - Add product (redirects to catalog)
//! POST /cart/remove            - Remove a line
//! POST /cart/plus              - Increase a line's quantity
//! POST /cart/min               - Decrease a line's quantity (never below 1)
//!
//! # Checkout
//! GET  /checkout               - Checkout form
//! POST /checkout               - Place order (snapshots cart)
//!
//! # Admin
//! GET  /admin/products         - Product list (?category= filter)
//! GET  /admin/products/new     - Create form
//! POST /admin/products/new     - Create product
//! GET  /admin/products/{id}/edit   - Edit form
//! POST /admin/products/{id}/edit   - Update product
//! GET  /admin/products/{id}/delete - Delete confirmation
//! POST /admin/products/{id}/delete - Delete product
//! GET  /admin/categories       - Category list + create form
//! POST /admin/categories       - Create category
//! POST /admin/categories/{id}/delete - Delete category
//! ```

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/plus", post(cart::plus))
        .route("/min", post(cart::min))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(admin::products::index))
        .route(
            "/products/new",
            get(admin::products::new_form).post(admin::products::create),
        )
        .route(
            "/products/{id}/edit",
            get(admin::products::edit_form).post(admin::products::update),
        )
        .route(
            "/products/{id}/delete",
            get(admin::products::delete_form).post(admin::products::delete),
        )
        .route(
            "/categories",
            get(admin::categories::index).post(admin::categories::create),
        )
        .route(
            "/categories/{id}/delete",
            post(admin::categories::delete),
        )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/", get(catalog::index))
        .route("/catalog", get(catalog::index))
        // Cart
        .nest("/cart", cart_routes())
        // Checkout
        .route("/checkout", get(checkout::show).post(checkout::place_order))
        // Admin area
        .nest("/admin", admin_routes())
}
