//! Cart route handlers.
//!
//! The cart lives in the session. Mutations redirect back to the page the
//! user came from: `add` returns to the catalog, the line operations return
//! to the cart page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use pitchside_core::{Cart, CartLine, ProductId};

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{flash, load_cart, store_cart, take_flash};
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub product_id: i32,
    pub name: String,
    pub unit_price: String,
    pub quantity: u32,
    pub subtotal: String,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id.as_i32(),
            name: line.name.clone(),
            unit_price: line.unit_price.display(),
            quantity: line.quantity,
            subtotal: format!("${:.2}", line.subtotal()),
        }
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/index.html")]
pub struct CartTemplate {
    pub lines: Vec<CartLineView>,
    pub total: String,
    pub flash: Option<String>,
}

/// Empty cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/empty.html")]
pub struct EmptyCartTemplate {
    pub flash: Option<String>,
}

impl CartTemplate {
    fn from_cart(cart: &Cart, flash: Option<String>) -> Self {
        Self {
            lines: cart.lines().iter().map(CartLineView::from).collect(),
            total: format!("${:.2}", cart.total()),
            flash,
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i32,
    pub quantity: Option<u32>,
}

/// Form data naming a single cart line.
#[derive(Debug, Deserialize)]
pub struct CartLineForm {
    pub product_id: i32,
}

/// Display the cart page, or the dedicated empty-cart view.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Response> {
    let cart = load_cart(&session).await?;
    let flash = take_flash(&session).await?;

    if cart.is_empty() {
        return Ok(EmptyCartTemplate { flash }.into_response());
    }
    Ok(CartTemplate::from_cart(&cart, flash).into_response())
}

/// Add a product to the cart, then return to the catalog.
///
/// The product's current price is captured into the cart line.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect> {
    let product_id = ProductId::new(form.product_id);
    let product = ProductRepository::new(state.pool())
        .by_id(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

    let mut cart = load_cart(&session).await?;
    cart.add(
        product.id,
        product.name.clone(),
        product.price,
        form.quantity.unwrap_or(1),
    );
    store_cart(&session, &cart).await?;
    flash(&session, format!("{} has been added to your cart", product.name)).await?;

    Ok(Redirect::to("/"))
}

/// Remove a line from the cart.
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<CartLineForm>) -> Result<Redirect> {
    let mut cart = load_cart(&session).await?;
    cart.remove(ProductId::new(form.product_id));
    store_cart(&session, &cart).await?;

    Ok(Redirect::to("/cart"))
}

/// Increase a line's quantity by one.
#[instrument(skip(session))]
pub async fn plus(session: Session, Form(form): Form<CartLineForm>) -> Result<Redirect> {
    let mut cart = load_cart(&session).await?;
    cart.increase(ProductId::new(form.product_id));
    store_cart(&session, &cart).await?;

    Ok(Redirect::to("/cart"))
}

/// Decrease a line's quantity by one (never below 1).
#[instrument(skip(session))]
pub async fn min(session: Session, Form(form): Form<CartLineForm>) -> Result<Redirect> {
    let mut cart = load_cart(&session).await?;
    cart.decrease(ProductId::new(form.product_id));
    store_cart(&session, &cart).await?;

    Ok(Redirect::to("/cart"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rust_decimal::Decimal;

    use pitchside_core::Price;

    use super::*;

    fn football_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add(
            ProductId::new(1),
            "Football",
            Price::new(Decimal::from(25)).unwrap(),
            2,
        );
        cart
    }

    #[test]
    fn test_cart_line_view_formats_subtotal() {
        let cart = football_cart();
        let view = CartLineView::from(&cart.lines()[0]);
        assert_eq!(view.unit_price, "$25.00");
        assert_eq!(view.subtotal, "$50.00");
        assert_eq!(view.quantity, 2);
    }

    #[test]
    fn test_cart_template_shows_total() {
        let template = CartTemplate::from_cart(&football_cart(), None);
        assert_eq!(template.total, "$50.00");

        let html = template.render().unwrap();
        assert!(html.contains("Football"));
        assert!(html.contains("$50.00"));
    }

    #[test]
    fn test_empty_cart_template_renders() {
        let html = EmptyCartTemplate { flash: None }.render().unwrap();
        assert!(html.contains("empty"));
    }
}
