//! Session middleware configuration and session-backed helpers.
//!
//! Sets up `PostgreSQL`-backed sessions using tower-sessions. The session
//! carries two pieces of state: the shopping cart and a one-shot flash
//! message (the classic "Product X has been updated" banner).

use sqlx::PgPool;
use tower_sessions::{Expiry, Session, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use pitchside_core::Cart;

use crate::config::StoreConfig;
use crate::error::Result;
use crate::models::session_keys;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "pitchside_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer with `PostgreSQL` store.
///
/// # Arguments
///
/// * `pool` - `PostgreSQL` connection pool
/// * `config` - Storefront configuration (for the base URL scheme)
#[must_use]
pub fn create_session_layer(
    pool: &PgPool,
    config: &StoreConfig,
) -> SessionManagerLayer<PostgresStore> {
    // Create the PostgreSQL session store
    // Note: The session table must be created via migration
    let store = PostgresStore::new(pool.clone());

    // Determine if we're in production (HTTPS)
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Load the cart from the session, or an empty one.
///
/// # Errors
///
/// Returns `AppError::Session` if the session store fails.
pub async fn load_cart(session: &Session) -> Result<Cart> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

/// Store the cart back into the session.
///
/// # Errors
///
/// Returns `AppError::Session` if the session store fails.
pub async fn store_cart(session: &Session, cart: &Cart) -> Result<()> {
    session.insert(session_keys::CART, cart).await?;
    Ok(())
}

/// Set a one-shot flash message, shown on the next rendered page.
///
/// # Errors
///
/// Returns `AppError::Session` if the session store fails.
pub async fn flash(session: &Session, message: impl Into<String>) -> Result<()> {
    session.insert(session_keys::FLASH, message.into()).await?;
    Ok(())
}

/// Take (read and clear) the flash message, if any.
///
/// # Errors
///
/// Returns `AppError::Session` if the session store fails.
pub async fn take_flash(session: &Session) -> Result<Option<String>> {
    Ok(session.remove::<String>(session_keys::FLASH).await?)
}

#[cfg(test)]
mod tests {
    // PostgresStore defaults to the tower_sessions schema and the session
    // table; the migration must create exactly that relation or every
    // session load fails at runtime.
    #[test]
    fn test_session_migration_creates_store_default_relation() {
        let sql = include_str!("../../migrations/20260801000006_create_session.sql");
        assert!(sql.contains("CREATE SCHEMA IF NOT EXISTS tower_sessions"));
        assert!(sql.contains("tower_sessions.session"));
        for column in ["id", "data", "expiry_date"] {
            assert!(sql.contains(column));
        }
    }
}
