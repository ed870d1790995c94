//! Checkout route handlers.
//!
//! Placing an order snapshots the session cart into a persisted order. There
//! is no login: the customer is identified by their customer name and created
//! on first checkout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use pitchside_core::{Cart, CityId};

use crate::db::customers::CustomerInput;
use crate::db::orders::OrderDetails;
use crate::db::{CityRepository, CustomerRepository, OrderRepository};
use crate::error::Result;
use crate::filters;
use crate::middleware::{flash, load_cart, store_cart};
use crate::models::{City, Order};
use crate::routes::cart::CartLineView;
use crate::state::AppState;

/// City option for the shipping select.
#[derive(Clone)]
pub struct CityView {
    pub id: i32,
    pub name: String,
    pub postal_code: String,
}

impl From<&City> for CityView {
    fn from(city: &City) -> Self {
        Self {
            id: city.id.as_i32(),
            name: city.name.clone(),
            postal_code: city.postal_code.clone(),
        }
    }
}

/// Checkout form data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutForm {
    pub customer_name: String,
    pub last_name: String,
    pub first_name: Option<String>,
    pub street: String,
    pub city_id: Option<i32>,
    pub delivery_date: String,
    /// Checkbox: present ("on") when checked, absent otherwise.
    pub giftwrap: Option<String>,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/form.html")]
pub struct CheckoutTemplate {
    pub lines: Vec<CartLineView>,
    pub total: String,
    pub cities: Vec<CityView>,
    pub form: CheckoutForm,
    pub errors: Vec<String>,
}

/// One row in the customer's order history.
#[derive(Clone)]
pub struct OrderSummaryView {
    pub id: i32,
    pub ordered_at: String,
    pub delivery_date: String,
    pub total: String,
}

impl From<&Order> for OrderSummaryView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.as_i32(),
            ordered_at: order.ordered_at.format("%Y-%m-%d").to_string(),
            delivery_date: order.delivery_date.format("%Y-%m-%d").to_string(),
            total: format!("${:.2}", order.total),
        }
    }
}

/// Order confirmation template, with the customer's order history.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/confirmation.html")]
pub struct ConfirmationTemplate {
    pub order_id: i32,
    pub total: String,
    pub history: Vec<OrderSummaryView>,
}

/// Validated checkout input.
#[derive(Debug)]
struct ValidatedCheckout {
    customer: CustomerInput,
    details: OrderDetails,
}

/// Validate the checkout form against the available cities.
///
/// Collects every problem rather than stopping at the first, so the form can
/// be re-displayed with all messages at once.
fn validate(form: &CheckoutForm, cities: &[City]) -> std::result::Result<ValidatedCheckout, Vec<String>> {
    let mut errors = Vec::new();

    let customer_name = form.customer_name.trim();
    if customer_name.is_empty() {
        errors.push("Customer name is required".to_owned());
    }
    let last_name = form.last_name.trim();
    if last_name.is_empty() {
        errors.push("Last name is required".to_owned());
    }
    let street = form.street.trim();
    if street.is_empty() {
        errors.push("Street is required".to_owned());
    }

    let city = form
        .city_id
        .and_then(|id| cities.iter().find(|c| c.id == CityId::new(id)));
    if city.is_none() {
        errors.push("Please choose a city".to_owned());
    }

    let delivery_date = NaiveDate::parse_from_str(form.delivery_date.trim(), "%Y-%m-%d").ok();
    match delivery_date {
        None => errors.push("Delivery date must be a valid date (YYYY-MM-DD)".to_owned()),
        Some(date) if date <= Utc::now().date_naive() => {
            errors.push("Delivery date must be in the future".to_owned());
        }
        Some(_) => {}
    }

    let (Some(city), Some(delivery_date)) = (city, delivery_date) else {
        return Err(errors);
    };
    if !errors.is_empty() {
        return Err(errors);
    }

    let first_name = form
        .first_name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned);

    Ok(ValidatedCheckout {
        customer: CustomerInput {
            customer_name: customer_name.to_owned(),
            last_name: last_name.to_owned(),
            first_name,
            street: street.to_owned(),
            city_id: city.id,
        },
        details: OrderDetails {
            delivery_date,
            giftwrap: form.giftwrap.is_some(),
            shipping_street: street.to_owned(),
            shipping_city: city.name.clone(),
        },
    })
}

fn checkout_page(cart: &Cart, cities: &[City], form: CheckoutForm, errors: Vec<String>) -> CheckoutTemplate {
    CheckoutTemplate {
        lines: cart.lines().iter().map(CartLineView::from).collect(),
        total: format!("${:.2}", cart.total()),
        cities: cities.iter().map(CityView::from).collect(),
        form,
        errors,
    }
}

/// Display the checkout form.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Response> {
    let cart = load_cart(&session).await?;
    if cart.is_empty() {
        flash(&session, "Your cart is empty").await?;
        return Ok(Redirect::to("/cart").into_response());
    }

    let cities = CityRepository::new(state.pool()).all().await?;
    Ok(checkout_page(&cart, &cities, CheckoutForm::default(), Vec::new()).into_response())
}

/// Place the order.
///
/// Validation failures re-render the form with messages. On success the cart
/// is snapshotted into an order, emptied, and a confirmation is rendered.
#[instrument(skip(state, session, form))]
pub async fn place_order(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let mut cart = load_cart(&session).await?;
    if cart.is_empty() {
        flash(&session, "Your cart is empty").await?;
        return Ok(Redirect::to("/cart").into_response());
    }

    let cities = CityRepository::new(state.pool()).all().await?;
    let validated = match validate(&form, &cities) {
        Ok(validated) => validated,
        Err(errors) => {
            return Ok(checkout_page(&cart, &cities, form, errors).into_response());
        }
    };

    // Returning customers are matched by customer name; new ones are created.
    let customers = CustomerRepository::new(state.pool());
    let customer = match customers
        .by_customer_name(&validated.customer.customer_name)
        .await?
    {
        Some(existing) => existing,
        None => customers.create(&validated.customer).await?,
    };

    let orders = OrderRepository::new(state.pool());
    let order_id = orders
        .place(customer.id, &cart, &validated.details)
        .await?;
    let total = format!("${:.2}", cart.total());

    tracing::info!(order_id = %order_id, customer = %customer.customer_name, "order placed");

    cart.clear();
    store_cart(&session, &cart).await?;

    let history = orders.for_customer(customer.id).await?;

    Ok(ConfirmationTemplate {
        order_id: order_id.as_i32(),
        total,
        history: history.iter().map(OrderSummaryView::from).collect(),
    }
    .into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn gent() -> City {
        City {
            id: CityId::new(1),
            name: "Gent".to_owned(),
            postal_code: "9000".to_owned(),
        }
    }

    fn valid_form() -> CheckoutForm {
        CheckoutForm {
            customer_name: "student1".to_owned(),
            last_name: "Student1".to_owned(),
            first_name: Some("Jan".to_owned()),
            street: "Nieuwstraat 10".to_owned(),
            city_id: Some(1),
            delivery_date: (Utc::now().date_naive() + chrono::Duration::days(10))
                .format("%Y-%m-%d")
                .to_string(),
            giftwrap: Some("on".to_owned()),
        }
    }

    #[test]
    fn test_valid_form_passes() {
        let validated = validate(&valid_form(), &[gent()]).unwrap();
        assert_eq!(validated.customer.customer_name, "student1");
        assert_eq!(validated.details.shipping_city, "Gent");
        assert!(validated.details.giftwrap);
    }

    #[test]
    fn test_missing_fields_are_all_reported() {
        let form = CheckoutForm {
            customer_name: String::new(),
            last_name: "  ".to_owned(),
            street: String::new(),
            ..valid_form()
        };
        let errors = validate(&form, &[gent()]).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_unknown_city_is_rejected() {
        let form = CheckoutForm {
            city_id: Some(99),
            ..valid_form()
        };
        let errors = validate(&form, &[gent()]).unwrap_err();
        assert!(errors.iter().any(|e| e.contains("city")));
    }

    #[test]
    fn test_past_delivery_date_is_rejected() {
        let form = CheckoutForm {
            delivery_date: "2020-01-01".to_owned(),
            ..valid_form()
        };
        let errors = validate(&form, &[gent()]).unwrap_err();
        assert!(errors.iter().any(|e| e.contains("future")));
    }

    #[test]
    fn test_garbled_delivery_date_is_rejected() {
        let form = CheckoutForm {
            delivery_date: "soon".to_owned(),
            ..valid_form()
        };
        let errors = validate(&form, &[gent()]).unwrap_err();
        assert!(errors.iter().any(|e| e.contains("valid date")));
    }

    #[test]
    fn test_checkout_template_marks_selected_city() {
        use pitchside_core::{Price, ProductId};
        use rust_decimal::Decimal;

        let mut cart = Cart::new();
        cart.add(
            ProductId::new(1),
            "Football",
            Price::new(Decimal::from(25)).unwrap(),
            1,
        );

        let template = checkout_page(&cart, &[gent()], valid_form(), Vec::new());
        let html = template.render().unwrap();
        assert!(html.contains("selected"));
    }

    #[test]
    fn test_confirmation_lists_order_history() {
        use chrono::TimeZone;
        use pitchside_core::{CustomerId, OrderId};
        use rust_decimal::Decimal;

        let order = Order {
            id: OrderId::new(3),
            customer_id: CustomerId::new(1),
            ordered_at: Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap(),
            delivery_date: NaiveDate::from_ymd_opt(2026, 8, 11).unwrap(),
            giftwrap: false,
            shipping_street: "Nieuwstraat 10".to_owned(),
            shipping_city: "Gent".to_owned(),
            total: Decimal::from(93),
            lines: Vec::new(),
        };

        let template = ConfirmationTemplate {
            order_id: 3,
            total: "$93.00".to_owned(),
            history: vec![OrderSummaryView::from(&order)],
        };
        let html = template.render().unwrap();
        assert!(html.contains("#3"));
        assert!(html.contains("2026-08-11"));
        assert!(html.contains("$93.00"));
    }

    #[test]
    fn test_unchecked_giftwrap_is_false() {
        let form = CheckoutForm {
            giftwrap: None,
            ..valid_form()
        };
        let validated = validate(&form, &[gent()]).unwrap();
        assert!(!validated.details.giftwrap);
    }
}
