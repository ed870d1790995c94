//! Public catalog route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use pitchside_core::Availability;

use crate::db::ProductRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::take_flash;
use crate::models::Product;
use crate::state::AppState;

/// Sales channels shown on the public storefront.
const ONLINE_CHANNELS: [Availability; 2] = [Availability::ShopAndOnline, Availability::OnlineOnly];

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub in_stock: bool,
    pub availability: String,
    pub available_till: Option<String>,
    pub category: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.display(),
            in_stock: product.in_stock,
            availability: product.availability.label().to_owned(),
            available_till: product
                .available_till
                .map(|date| date.format("%Y-%m-%d").to_string()),
            category: product.category.name.clone(),
        }
    }
}

/// Catalog listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog/index.html")]
pub struct CatalogTemplate {
    pub products: Vec<ProductView>,
    pub flash: Option<String>,
}

/// Display the public catalog: products sold online, ordered by name.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, session: Session) -> Result<CatalogTemplate> {
    let products = ProductRepository::new(state.pool())
        .by_availability(&ONLINE_CHANNELS)
        .await?;
    let flash = take_flash(&session).await?;

    Ok(CatalogTemplate {
        products: products.iter().map(ProductView::from).collect(),
        flash,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use pitchside_core::{CategoryId, Price, ProductId};

    use super::*;
    use crate::models::Category;

    fn lifejacket() -> Product {
        Product {
            id: ProductId::new(7),
            name: "Lifejacket".to_owned(),
            description: Some("Protective and fashionable".to_owned()),
            price: Price::new(Decimal::from(49)).unwrap(),
            in_stock: true,
            availability: Availability::ShopOnly,
            available_till: NaiveDate::from_ymd_opt(2026, 12, 31),
            category: Category {
                id: CategoryId::new(1),
                name: "WaterSports".to_owned(),
            },
        }
    }

    #[test]
    fn test_product_view_formats_price_and_date() {
        let view = ProductView::from(&lifejacket());
        assert_eq!(view.price, "$49.00");
        assert_eq!(view.available_till.as_deref(), Some("2026-12-31"));
        assert_eq!(view.availability, "Shop only");
    }

    #[test]
    fn test_catalog_template_renders_products() {
        let template = CatalogTemplate {
            products: vec![ProductView::from(&lifejacket())],
            flash: Some("Welcome".to_owned()),
        };
        let html = template.render().unwrap();
        assert!(html.contains("Lifejacket"));
        assert!(html.contains("$49.00"));
        assert!(html.contains("Welcome"));
    }

    #[test]
    fn test_online_channels_exclude_shop_only() {
        assert!(!ONLINE_CHANNELS.contains(&Availability::ShopOnly));
    }
}
