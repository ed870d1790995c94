//! Admin product CRUD route handlers.
//!
//! Mirrors the public catalog's view shaping, plus create/edit/delete forms
//! with explicit validation: failures re-render the form with messages, and
//! successes redirect back to the product list with a flash message.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use pitchside_core::{Availability, CategoryId, Price, ProductId};

use crate::db::products::ProductInput;
use crate::db::{CategoryRepository, ProductRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{flash, take_flash};
use crate::models::{Category, Product};
use crate::routes::catalog::ProductView;
use crate::state::AppState;

/// Category option for filter and form selects.
#[derive(Clone)]
pub struct CategoryOption {
    pub id: i32,
    pub name: String,
}

impl From<&Category> for CategoryOption {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.as_i32(),
            name: category.name.clone(),
        }
    }
}

/// Availability option for the form select.
#[derive(Clone)]
pub struct AvailabilityOption {
    pub value: &'static str,
    pub label: &'static str,
}

fn availability_options() -> Vec<AvailabilityOption> {
    Availability::ALL
        .iter()
        .map(|a| AvailabilityOption {
            value: a.as_str(),
            label: a.label(),
        })
        .collect()
}

/// Category filter query parameters.
#[derive(Debug, Deserialize)]
pub struct CategoryFilter {
    pub category: Option<i32>,
}

/// Product form data (create and edit share it).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    /// Checkbox: present ("on") when checked, absent otherwise.
    pub in_stock: Option<String>,
    pub availability: String,
    pub available_till: String,
    pub category_id: Option<i32>,
}

impl ProductForm {
    fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            price: product.price.amount().to_string(),
            in_stock: product.in_stock.then(|| "on".to_owned()),
            availability: product.availability.as_str().to_owned(),
            available_till: product
                .available_till
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            category_id: Some(product.category.id.as_i32()),
        }
    }
}

/// Validate the product form against the available categories.
fn validate(
    form: &ProductForm,
    categories: &[Category],
) -> std::result::Result<ProductInput, Vec<String>> {
    let mut errors = Vec::new();

    let name = form.name.trim();
    if name.is_empty() {
        errors.push("Name is required".to_owned());
    }

    let price = match form.price.trim().parse::<Decimal>() {
        Ok(amount) => match Price::new(amount) {
            Ok(price) => Some(price),
            Err(e) => {
                errors.push(e.to_string());
                None
            }
        },
        Err(_) => {
            errors.push("Price must be a number".to_owned());
            None
        }
    };

    let availability = match form.availability.parse::<Availability>() {
        Ok(availability) => Some(availability),
        Err(_) => {
            errors.push("Please choose an availability".to_owned());
            None
        }
    };

    let available_till = match form.available_till.trim() {
        "" => None,
        raw => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                errors.push("Available till must be a valid date (YYYY-MM-DD)".to_owned());
                None
            }
        },
    };

    let category = form
        .category_id
        .and_then(|id| categories.iter().find(|c| c.id == CategoryId::new(id)));
    if category.is_none() {
        errors.push("Please choose a category".to_owned());
    }

    let (Some(price), Some(availability), Some(category)) = (price, availability, category) else {
        return Err(errors);
    };
    if !errors.is_empty() {
        return Err(errors);
    }

    let description = form.description.trim();
    Ok(ProductInput {
        name: name.to_owned(),
        description: (!description.is_empty()).then(|| description.to_owned()),
        price,
        in_stock: form.in_stock.is_some(),
        availability,
        available_till,
        category_id: category.id,
    })
}

/// Admin product list template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products/index.html")]
pub struct AdminProductsTemplate {
    pub products: Vec<ProductView>,
    pub categories: Vec<CategoryOption>,
    pub selected_category: i32,
    pub flash: Option<String>,
}

/// Product create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products/form.html")]
pub struct ProductFormTemplate {
    pub title: String,
    pub action: String,
    pub form: ProductForm,
    pub categories: Vec<CategoryOption>,
    pub availabilities: Vec<AvailabilityOption>,
    pub errors: Vec<String>,
}

/// Delete confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products/delete.html")]
pub struct DeleteProductTemplate {
    pub id: i32,
    pub name: String,
}

/// Product list, optionally filtered by category, ordered by name.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(filter): Query<CategoryFilter>,
) -> Result<AdminProductsTemplate> {
    let products_repo = ProductRepository::new(state.pool());
    let categories_repo = CategoryRepository::new(state.pool());
    let products = match filter.category {
        None | Some(0) => products_repo.all().await?,
        Some(id) => {
            let category_id = CategoryId::new(id);
            categories_repo
                .by_id(category_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("category {id}")))?;
            products_repo.by_category(category_id).await?
        }
    };
    let categories = categories_repo.all().await?;
    let flash = take_flash(&session).await?;

    Ok(AdminProductsTemplate {
        products: products.iter().map(ProductView::from).collect(),
        categories: categories.iter().map(CategoryOption::from).collect(),
        selected_category: filter.category.unwrap_or(0),
        flash,
    })
}

fn form_page(
    title: String,
    action: String,
    form: ProductForm,
    categories: &[Category],
    errors: Vec<String>,
) -> ProductFormTemplate {
    ProductFormTemplate {
        title,
        action,
        form,
        categories: categories.iter().map(CategoryOption::from).collect(),
        availabilities: availability_options(),
        errors,
    }
}

/// Display the create-product form.
#[instrument(skip(state))]
pub async fn new_form(State(state): State<AppState>) -> Result<ProductFormTemplate> {
    let categories = CategoryRepository::new(state.pool()).all().await?;
    let form = ProductForm {
        // New products default to in stock, sold everywhere.
        in_stock: Some("on".to_owned()),
        availability: Availability::default().as_str().to_owned(),
        ..ProductForm::default()
    };

    Ok(form_page(
        "Create product".to_owned(),
        "/admin/products/new".to_owned(),
        form,
        &categories,
        Vec::new(),
    ))
}

/// Create a product.
#[instrument(skip(state, session, form))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let categories = CategoryRepository::new(state.pool()).all().await?;
    let input = match validate(&form, &categories) {
        Ok(input) => input,
        Err(errors) => {
            return Ok(form_page(
                "Create product".to_owned(),
                "/admin/products/new".to_owned(),
                form,
                &categories,
                errors,
            )
            .into_response());
        }
    };

    let product = ProductRepository::new(state.pool()).create(&input).await?;
    flash(
        &session,
        format!("Product {} has been created successfully", product.name),
    )
    .await?;

    Ok(Redirect::to("/admin/products").into_response())
}

/// Display the edit-product form.
#[instrument(skip(state))]
pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ProductFormTemplate> {
    let product = ProductRepository::new(state.pool())
        .by_id(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    let categories = CategoryRepository::new(state.pool()).all().await?;

    Ok(form_page(
        format!("Edit {}", product.name),
        format!("/admin/products/{id}/edit"),
        ProductForm::from_product(&product),
        &categories,
        Vec::new(),
    ))
}

/// Update a product.
#[instrument(skip(state, session, form))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let product_id = ProductId::new(id);
    let products_repo = ProductRepository::new(state.pool());

    // 404 before validation, matching the original controller.
    if products_repo.by_id(product_id).await?.is_none() {
        return Err(AppError::NotFound(format!("product {id}")));
    }

    let categories = CategoryRepository::new(state.pool()).all().await?;
    let input = match validate(&form, &categories) {
        Ok(input) => input,
        Err(errors) => {
            return Ok(form_page(
                "Edit product".to_owned(),
                format!("/admin/products/{id}/edit"),
                form,
                &categories,
                errors,
            )
            .into_response());
        }
    };

    let product = products_repo.update(product_id, &input).await?;
    flash(
        &session,
        format!("Product {} has been updated successfully", product.name),
    )
    .await?;

    Ok(Redirect::to("/admin/products").into_response())
}

/// Display the delete confirmation page.
#[instrument(skip(state))]
pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<DeleteProductTemplate> {
    let product = ProductRepository::new(state.pool())
        .by_id(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(DeleteProductTemplate {
        id,
        name: product.name,
    })
}

/// Delete a product.
///
/// A product referenced by existing orders cannot be deleted; that failure is
/// surfaced as a flash message rather than an error page.
#[instrument(skip(state, session))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Redirect> {
    let product_id = ProductId::new(id);
    let products_repo = ProductRepository::new(state.pool());
    let product = products_repo
        .by_id(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    match products_repo.delete(product_id).await {
        Ok(()) => {
            flash(
                &session,
                format!("Product {} has been deleted successfully", product.name),
            )
            .await?;
        }
        Err(RepositoryError::Conflict(msg)) => {
            flash(
                &session,
                format!("Product {} has not been deleted: {msg}", product.name),
            )
            .await?;
        }
        Err(e) => return Err(e.into()),
    }

    Ok(Redirect::to("/admin/products"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn soccer() -> Category {
        Category {
            id: CategoryId::new(2),
            name: "Soccer".to_owned(),
        }
    }

    fn valid_form() -> ProductForm {
        ProductForm {
            name: "Corner flags".to_owned(),
            description: "Give your playing field that professional touch".to_owned(),
            price: "34".to_owned(),
            in_stock: Some("on".to_owned()),
            availability: "shop_and_online".to_owned(),
            available_till: String::new(),
            category_id: Some(2),
        }
    }

    #[test]
    fn test_valid_form_passes() {
        let input = validate(&valid_form(), &[soccer()]).unwrap();
        assert_eq!(input.name, "Corner flags");
        assert_eq!(input.price.amount(), Decimal::from(34));
        assert!(input.in_stock);
        assert_eq!(input.availability, Availability::ShopAndOnline);
        assert_eq!(input.available_till, None);
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let form = ProductForm {
            name: "  ".to_owned(),
            ..valid_form()
        };
        let errors = validate(&form, &[soccer()]).unwrap_err();
        assert!(errors.iter().any(|e| e.contains("Name")));
    }

    #[test]
    fn test_non_numeric_price_is_rejected() {
        let form = ProductForm {
            price: "cheap".to_owned(),
            ..valid_form()
        };
        let errors = validate(&form, &[soccer()]).unwrap_err();
        assert!(errors.iter().any(|e| e.contains("number")));
    }

    #[test]
    fn test_zero_price_is_rejected() {
        let form = ProductForm {
            price: "0".to_owned(),
            ..valid_form()
        };
        let errors = validate(&form, &[soccer()]).unwrap_err();
        assert!(errors.iter().any(|e| e.contains("greater than 0")));
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let form = ProductForm {
            category_id: Some(42),
            ..valid_form()
        };
        let errors = validate(&form, &[soccer()]).unwrap_err();
        assert!(errors.iter().any(|e| e.contains("category")));
    }

    #[test]
    fn test_all_problems_reported_at_once() {
        let form = ProductForm {
            name: String::new(),
            price: "-5".to_owned(),
            availability: "nowhere".to_owned(),
            category_id: None,
            ..valid_form()
        };
        let errors = validate(&form, &[soccer()]).unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_form_template_marks_selected_category() {
        let template = form_page(
            "Edit product".to_owned(),
            "/admin/products/9/edit".to_owned(),
            valid_form(),
            &[soccer()],
            Vec::new(),
        );
        let html = template.render().unwrap();
        // Both the category and the availability selects mark an option.
        assert!(html.matches("selected").count() >= 2);
    }

    #[test]
    fn test_form_round_trips_product() {
        use pitchside_core::Price;

        let product = Product {
            id: ProductId::new(9),
            name: "Stadium".to_owned(),
            description: Some("Flat-packed 35000-seat stadium".to_owned()),
            price: Price::new(Decimal::from(79500)).unwrap(),
            in_stock: false,
            availability: Availability::OnlineOnly,
            available_till: None,
            category: soccer(),
        };

        let form = ProductForm::from_product(&product);
        assert_eq!(form.price, "79500");
        assert_eq!(form.in_stock, None);
        assert_eq!(form.availability, "online_only");

        let input = validate(&form, &[soccer()]).unwrap();
        assert_eq!(input.price, product.price);
        assert_eq!(input.availability, product.availability);
    }
}
