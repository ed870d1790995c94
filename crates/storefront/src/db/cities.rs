//! City repository for database operations.

use sqlx::PgPool;

use pitchside_core::CityId;

use super::RepositoryError;
use crate::models::City;

/// Repository for city database operations.
pub struct CityRepository<'a> {
    pool: &'a PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct CityRow {
    id: i32,
    name: String,
    postal_code: String,
}

impl From<CityRow> for City {
    fn from(row: CityRow) -> Self {
        Self {
            id: CityId::new(row.id),
            name: row.name,
            postal_code: row.postal_code,
        }
    }
}

impl<'a> CityRepository<'a> {
    /// Create a new city repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All cities, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn all(&self) -> Result<Vec<City>, RepositoryError> {
        let rows = sqlx::query_as::<_, CityRow>(
            "SELECT id, name, postal_code FROM cities ORDER BY name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(City::from).collect())
    }

    /// Create a new city.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, name: &str, postal_code: &str) -> Result<City, RepositoryError> {
        let row = sqlx::query_as::<_, CityRow>(
            "INSERT INTO cities (name, postal_code) VALUES ($1, $2) RETURNING id, name, postal_code",
        )
        .bind(name)
        .bind(postal_code)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }
}
