//! Database seeding command.
//!
//! Populates an empty database with the demo data set: three categories
//! with eleven products, two shipping cities, and nine customers of whom
//! the first five have already placed an order.

use chrono::{Days, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use pitchside_core::{Availability, Cart, CategoryId, Price, PriceError};
use pitchside_storefront::db::customers::CustomerInput;
use pitchside_storefront::db::orders::OrderDetails;
use pitchside_storefront::db::products::ProductInput;
use pitchside_storefront::db::{
    CategoryRepository, CityRepository, CustomerRepository, OrderRepository, ProductRepository,
    RepositoryError,
};
use pitchside_storefront::models::Product;

use super::migrate::MigrationError;

/// Errors from the seed command.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Setup(#[from] MigrationError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Invalid seed price: {0}")]
    Price(#[from] PriceError),

    #[error("Database already contains data; pass --drop to wipe it first")]
    NotEmpty,

    #[error("Seed product missing: {0}")]
    MissingProduct(&'static str),
}

/// Seed the database with the demo data set.
///
/// # Errors
///
/// Returns `SeedError::NotEmpty` if data is already present and `drop` is
/// false. Other variants cover environment and database failures.
pub async fn run(drop: bool) -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url = super::migrate::database_url()?;
    let pool = pitchside_storefront::db::create_pool(&database_url)
        .await
        .map_err(MigrationError::Database)?;

    if drop {
        tracing::info!("Wiping existing data...");
        wipe(&pool).await?;
    } else if !is_empty(&pool).await? {
        return Err(SeedError::NotEmpty);
    }

    tracing::info!("Seeding categories and products...");
    let products = seed_catalog(&pool).await?;

    tracing::info!("Seeding cities and customers...");
    seed_customers(&pool, &products).await?;

    tracing::info!("Seeding complete!");
    Ok(())
}

async fn is_empty(pool: &PgPool) -> Result<bool, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories")
        .fetch_one(pool)
        .await?;
    Ok(count == 0)
}

async fn wipe(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "TRUNCATE order_lines, orders, customers, cities, products, categories RESTART IDENTITY CASCADE",
    )
    .execute(pool)
    .await?;
    Ok(())
}

struct SeedProduct {
    name: &'static str,
    price: i64,
    description: &'static str,
    in_stock: bool,
    availability: Availability,
}

impl SeedProduct {
    const fn new(name: &'static str, price: i64, description: &'static str) -> Self {
        Self {
            name,
            price,
            description,
            in_stock: true,
            availability: Availability::ShopAndOnline,
        }
    }

    fn into_input(self, category_id: CategoryId) -> Result<ProductInput, PriceError> {
        Ok(ProductInput {
            name: self.name.to_owned(),
            description: Some(self.description.to_owned()),
            price: Price::new(Decimal::from(self.price))?,
            in_stock: self.in_stock,
            availability: self.availability,
            available_till: None,
            category_id,
        })
    }
}

fn catalog() -> Vec<(&'static str, Vec<SeedProduct>)> {
    let mut lifejacket = SeedProduct::new("Lifejacket", 49, "Protective and fashionable");
    lifejacket.availability = Availability::ShopOnly;

    let mut bling_bling_king =
        SeedProduct::new("Bling-bling King", 1200, "Gold plated, diamond-studded king");
    bling_bling_king.in_stock = false;

    vec![
        (
            "WaterSports",
            vec![
                SeedProduct::new("Surf board", 275, "A boat for one person"),
                SeedProduct::new("Kayak", 170, "High quality"),
                lifejacket,
            ],
        ),
        (
            "Soccer",
            vec![
                SeedProduct::new("Football", 25, "WK colors"),
                SeedProduct::new(
                    "Corner flags",
                    34,
                    "Give your playing field that professional touch",
                ),
                SeedProduct::new("Stadium", 79500, "Flat-packed 35000-seat stadium"),
                SeedProduct::new("Running shoes", 95, "Protective and fashionable"),
            ],
        ),
        (
            "Chess",
            vec![
                SeedProduct::new("Thinking cap", 16, "Improve your brain efficiency by 75%"),
                SeedProduct::new(
                    "Unsteady chair",
                    30,
                    "Secretly give your opponent a disadvantage",
                ),
                SeedProduct::new(
                    "Human chess board",
                    75,
                    "A fun game for the whole extended family!",
                ),
                bling_bling_king,
            ],
        ),
    ]
}

async fn seed_catalog(pool: &PgPool) -> Result<Vec<Product>, SeedError> {
    let category_repo = CategoryRepository::new(pool);
    let product_repo = ProductRepository::new(pool);

    let mut products = Vec::new();
    for (category_name, seed_products) in catalog() {
        // Find-or-create keeps a partially seeded database recoverable.
        let category = match category_repo.by_name(category_name).await? {
            Some(existing) => existing,
            None => category_repo.create(category_name).await?,
        };
        for seed in seed_products {
            let input = seed.into_input(category.id)?;
            products.push(product_repo.create(&input).await?);
        }
    }
    Ok(products)
}

async fn seed_customers(pool: &PgPool, products: &[Product]) -> Result<(), SeedError> {
    let city_repo = CityRepository::new(pool);
    let customer_repo = CustomerRepository::new(pool);
    let order_repo = OrderRepository::new(pool);

    let gent = city_repo.create("Gent", "9000").await?;
    let antwerpen = city_repo.create("Antwerpen", "3000").await?;

    let football = find_product(products, "Football")?;
    let corner_flags = find_product(products, "Corner flags")?;

    let delivery_date = Utc::now().date_naive() + Days::new(10);

    for i in 1..10 {
        // Alternate customers over the two cities so the data is deterministic.
        let city = if i % 2 == 0 { &antwerpen } else { &gent };
        let customer = customer_repo
            .create(&CustomerInput {
                customer_name: format!("student{i}"),
                last_name: format!("Student{i}"),
                first_name: Some("Jan".to_owned()),
                street: "Nieuwstraat 10".to_owned(),
                city_id: city.id,
            })
            .await?;

        if i <= 5 {
            let mut cart = Cart::new();
            cart.add(football.id, football.name.clone(), football.price, 1);
            cart.add(corner_flags.id, corner_flags.name.clone(), corner_flags.price, 2);

            order_repo
                .place(
                    customer.id,
                    &cart,
                    &OrderDetails {
                        delivery_date,
                        giftwrap: false,
                        shipping_street: customer.street.clone(),
                        shipping_city: customer.city.name.clone(),
                    },
                )
                .await?;
        }
    }

    Ok(())
}

fn find_product<'a>(
    products: &'a [Product],
    name: &'static str,
) -> Result<&'a Product, SeedError> {
    products
        .iter()
        .find(|p| p.name == name)
        .ok_or(SeedError::MissingProduct(name))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_eleven_products_in_three_categories() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 3);

        let total: usize = catalog.iter().map(|(_, products)| products.len()).sum();
        assert_eq!(total, 11);
    }

    #[test]
    fn test_lifejacket_is_shop_only() {
        let catalog = catalog();
        let (_, watersports) = &catalog[0];
        let lifejacket = watersports.iter().find(|p| p.name == "Lifejacket").unwrap();
        assert_eq!(lifejacket.availability, Availability::ShopOnly);
        assert!(lifejacket.in_stock);
    }

    #[test]
    fn test_bling_bling_king_is_out_of_stock() {
        let catalog = catalog();
        let (_, chess) = &catalog[2];
        let king = chess.iter().find(|p| p.name == "Bling-bling King").unwrap();
        assert!(!king.in_stock);
        assert_eq!(king.availability, Availability::ShopAndOnline);
    }

    #[test]
    fn test_seed_prices_are_valid() {
        for (_, products) in catalog() {
            for seed in products {
                let input = seed.into_input(CategoryId::new(1)).unwrap();
                assert!(input.price.amount() > Decimal::ZERO);
            }
        }
    }
}
