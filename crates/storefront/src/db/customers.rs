//! Customer repository for database operations.

use sqlx::PgPool;

use pitchside_core::{CityId, CustomerId};

use super::RepositoryError;
use crate::models::{City, Customer};

/// Fields accepted when creating a customer.
#[derive(Debug, Clone)]
pub struct CustomerInput {
    pub customer_name: String,
    pub last_name: String,
    pub first_name: Option<String>,
    pub street: String,
    pub city_id: CityId,
}

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: i32,
    customer_name: String,
    last_name: String,
    first_name: Option<String>,
    street: String,
    city_id: i32,
    city_name: String,
    city_postal_code: String,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: CustomerId::new(row.id),
            customer_name: row.customer_name,
            last_name: row.last_name,
            first_name: row.first_name,
            street: row.street,
            city: City {
                id: CityId::new(row.city_id),
                name: row.city_name,
                postal_code: row.city_postal_code,
            },
        }
    }
}

const SELECT_CUSTOMER: &str = r"
    SELECT cu.id, cu.customer_name, cu.last_name, cu.first_name, cu.street,
           ci.id AS city_id, ci.name AS city_name, ci.postal_code AS city_postal_code
    FROM customers cu
    JOIN cities ci ON ci.id = cu.city_id
";

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a customer by their unique customer name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn by_customer_name(
        &self,
        customer_name: &str,
    ) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "{SELECT_CUSTOMER} WHERE cu.customer_name = $1"
        ))
        .bind(customer_name)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Customer::from))
    }

    /// Create a new customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the customer name already exists
    /// or the city does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, input: &CustomerInput) -> Result<Customer, RepositoryError> {
        let (id,): (i32,) = sqlx::query_as(
            r"
            INSERT INTO customers (customer_name, last_name, first_name, street, city_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            ",
        )
        .bind(&input.customer_name)
        .bind(&input.last_name)
        .bind(&input.first_name)
        .bind(&input.street)
        .bind(input.city_id.as_i32())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_unique_violation() {
                    return RepositoryError::Conflict("customer name already exists".to_owned());
                }
                if db_err.is_foreign_key_violation() {
                    return RepositoryError::Conflict("city does not exist".to_owned());
                }
            }
            RepositoryError::Database(e)
        })?;

        let row = sqlx::query_as::<_, CustomerRow>(&format!("{SELECT_CUSTOMER} WHERE cu.id = $1"))
            .bind(id)
            .fetch_one(self.pool)
            .await?;

        Ok(row.into())
    }
}
