//! Product repository for database operations.
//!
//! Rows store the price as `NUMERIC` and availability as a text token; both
//! are decoded into the domain types at the repository boundary so handlers
//! only ever see validated values.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;

use pitchside_core::{Availability, CategoryId, Price, ProductId};

use super::RepositoryError;
use crate::models::{Category, Product};

/// Fields accepted when creating or updating a product.
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
    pub in_stock: bool,
    pub availability: Availability,
    pub available_till: Option<NaiveDate>,
    pub category_id: CategoryId,
}

/// Raw product row joined with its category.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    description: Option<String>,
    price: Decimal,
    in_stock: bool,
    availability: String,
    available_till: Option<NaiveDate>,
    category_id: i32,
    category_name: String,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = Price::new(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price in database: {e}"))
        })?;
        let availability = row.availability.parse::<Availability>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid availability in database: {e}"))
        })?;

        Ok(Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            price,
            in_stock: row.in_stock,
            availability,
            available_till: row.available_till,
            category: Category {
                id: CategoryId::new(row.category_id),
                name: row.category_name,
            },
        })
    }
}

const SELECT_PRODUCT: &str = r"
    SELECT p.id, p.name, p.description, p.price, p.in_stock,
           p.availability, p.available_till,
           c.id AS category_id, c.name AS category_name
    FROM products p
    JOIN categories c ON c.id = p.category_id
";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All products, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!("{SELECT_PRODUCT} ORDER BY p.name"))
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Products in one category, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "{SELECT_PRODUCT} WHERE p.category_id = $1 ORDER BY p.name"
        ))
        .bind(category_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Products offered through any of the given sales channels, ordered by name.
    ///
    /// This is the public catalog query: the storefront passes the online
    /// channels (`OnlineOnly`, `ShopAndOnline`).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn by_availability(
        &self,
        availabilities: &[Availability],
    ) -> Result<Vec<Product>, RepositoryError> {
        let tokens: Vec<String> = availabilities
            .iter()
            .map(|a| a.as_str().to_owned())
            .collect();

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "{SELECT_PRODUCT} WHERE p.availability = ANY($1) ORDER BY p.name"
        ))
        .bind(&tokens)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!("{SELECT_PRODUCT} WHERE p.id = $1"))
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        row.map(Product::try_from).transpose()
    }

    /// Create a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the category does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, input: &ProductInput) -> Result<Product, RepositoryError> {
        let (id,): (i32,) = sqlx::query_as(
            r"
            INSERT INTO products (name, description, price, in_stock, availability, available_till, category_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            ",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price.amount())
        .bind(input.in_stock)
        .bind(input.availability.as_str())
        .bind(input.available_till)
        .bind(input.category_id.as_i32())
        .fetch_one(self.pool)
        .await
        .map_err(map_category_fk)?;

        self.by_id(ProductId::new(id)).await?.ok_or_else(|| {
            RepositoryError::NotFound(format!("product {id} vanished after insert"))
        })
    }

    /// Update an existing product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Conflict` if the category does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Product, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE products
            SET name = $2, description = $3, price = $4, in_stock = $5,
                availability = $6, available_till = $7, category_id = $8
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price.amount())
        .bind(input.in_stock)
        .bind(input.availability.as_str())
        .bind(input.available_till)
        .bind(input.category_id.as_i32())
        .execute(self.pool)
        .await
        .map_err(map_category_fk)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("product {id}")));
        }

        self.by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("product {id}")))
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Conflict` if the product is referenced by
    /// an order line.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    return RepositoryError::Conflict(
                        "product is referenced by existing orders".to_owned(),
                    );
                }
                RepositoryError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("product {id}")));
        }
        Ok(())
    }
}

/// Map a category foreign-key violation to a conflict.
fn map_category_fk(e: sqlx::Error) -> RepositoryError {
    if is_foreign_key_violation(&e) {
        return RepositoryError::Conflict("category does not exist".to_owned());
    }
    RepositoryError::Database(e)
}

pub(crate) fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}
