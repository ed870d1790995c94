//! Order repository for database operations.
//!
//! Placing an order snapshots the cart into `orders` + `order_lines` inside
//! a single transaction; either the whole order lands or nothing does.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use pitchside_core::{Cart, CartLine, CustomerId, OrderId, Price, ProductId};

use super::RepositoryError;
use crate::models::{Order, OrderLine};

/// Shipping details collected at checkout.
#[derive(Debug, Clone)]
pub struct OrderDetails {
    pub delivery_date: NaiveDate,
    pub giftwrap: bool,
    pub shipping_street: String,
    pub shipping_city: String,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    customer_id: i32,
    ordered_at: DateTime<Utc>,
    delivery_date: NaiveDate,
    giftwrap: bool,
    shipping_street: String,
    shipping_city: String,
    total: Decimal,
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct OrderLineRow {
    order_id: i32,
    product_id: i32,
    product_name: String,
    unit_price: Decimal,
    quantity: i32,
}

impl TryFrom<OrderLineRow> for OrderLine {
    type Error = RepositoryError;

    fn try_from(row: OrderLineRow) -> Result<Self, Self::Error> {
        let unit_price = Price::new(row.unit_price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order line price in database: {e}"))
        })?;
        let quantity = u32::try_from(row.quantity).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "invalid order line quantity in database: {}",
                row.quantity
            ))
        })?;

        Ok(Self {
            product_id: ProductId::new(row.product_id),
            product_name: row.product_name,
            unit_price,
            quantity,
        })
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Place an order: snapshot the cart into a persisted order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the cart is empty, a line
    /// quantity cannot be stored, or a cart line references a product that
    /// no longer exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn place(
        &self,
        customer_id: CustomerId,
        cart: &Cart,
        details: &OrderDetails,
    ) -> Result<OrderId, RepositoryError> {
        if cart.is_empty() {
            return Err(RepositoryError::Conflict(
                "cannot place an order for an empty cart".to_owned(),
            ));
        }

        // Reject quantities the column cannot hold before touching the
        // database, rather than silently altering the snapshot.
        let mut quantities = Vec::with_capacity(cart.number_of_items());
        for line in cart.lines() {
            quantities.push(snapshot_quantity(line)?);
        }

        let mut tx = self.pool.begin().await?;

        let (order_id,): (i32,) = sqlx::query_as(
            r"
            INSERT INTO orders (customer_id, delivery_date, giftwrap, shipping_street, shipping_city, total)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            ",
        )
        .bind(customer_id.as_i32())
        .bind(details.delivery_date)
        .bind(details.giftwrap)
        .bind(&details.shipping_street)
        .bind(&details.shipping_city)
        .bind(cart.total())
        .fetch_one(&mut *tx)
        .await?;

        for (line, quantity) in cart.lines().iter().zip(quantities) {
            sqlx::query(
                r"
                INSERT INTO order_lines (order_id, product_id, product_name, unit_price, quantity)
                VALUES ($1, $2, $3, $4, $5)
                ",
            )
            .bind(order_id)
            .bind(line.product_id.as_i32())
            .bind(&line.name)
            .bind(line.unit_price.amount())
            .bind(quantity)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if super::products::is_foreign_key_violation(&e) {
                    return RepositoryError::Conflict(format!(
                        "product {} no longer exists",
                        line.product_id
                    ));
                }
                RepositoryError::Database(e)
            })?;
        }

        tx.commit().await?;

        Ok(OrderId::new(order_id))
    }

    /// All orders placed by a customer, newest first, with their lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails, or
    /// `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Order>, RepositoryError> {
        let order_rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, customer_id, ordered_at, delivery_date, giftwrap,
                   shipping_street, shipping_city, total
            FROM orders
            WHERE customer_id = $1
            ORDER BY ordered_at DESC
            ",
        )
        .bind(customer_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        let line_rows = sqlx::query_as::<_, OrderLineRow>(
            r"
            SELECT l.order_id, l.product_id, l.product_name, l.unit_price, l.quantity
            FROM order_lines l
            JOIN orders o ON o.id = l.order_id
            WHERE o.customer_id = $1
            ORDER BY l.id
            ",
        )
        .bind(customer_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        let mut orders = Vec::with_capacity(order_rows.len());
        for row in order_rows {
            let lines = line_rows
                .iter()
                .filter(|l| l.order_id == row.id)
                .cloned()
                .map(OrderLine::try_from)
                .collect::<Result<Vec<_>, _>>()?;

            orders.push(Order {
                id: OrderId::new(row.id),
                customer_id: CustomerId::new(row.customer_id),
                ordered_at: row.ordered_at,
                delivery_date: row.delivery_date,
                giftwrap: row.giftwrap,
                shipping_street: row.shipping_street,
                shipping_city: row.shipping_city,
                total: row.total,
                lines,
            });
        }

        Ok(orders)
    }
}

/// The `order_lines.quantity` column is an `INTEGER`; a cart line beyond
/// `i32::MAX` cannot be snapshotted faithfully and is rejected.
fn snapshot_quantity(line: &CartLine) -> Result<i32, RepositoryError> {
    i32::try_from(line.quantity).map_err(|_| {
        RepositoryError::Conflict(format!(
            "quantity {} for product {} exceeds the supported maximum",
            line.quantity, line.product_id
        ))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(quantity: u32) -> CartLine {
        CartLine {
            product_id: ProductId::new(1),
            name: "Football".to_owned(),
            unit_price: Price::new(Decimal::from(25)).unwrap(),
            quantity,
        }
    }

    #[test]
    fn test_snapshot_quantity_passes_normal_values() {
        assert_eq!(snapshot_quantity(&line(3)).unwrap(), 3);
    }

    #[test]
    fn test_snapshot_quantity_rejects_oversized_values() {
        let err = snapshot_quantity(&line(u32::MAX)).unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }
}
