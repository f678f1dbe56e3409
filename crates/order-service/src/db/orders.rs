//! Order repository.
//!
//! The add-item upsert runs as a single transaction: find-or-create the open
//! order, then accumulate the line item with `ON CONFLICT .. DO UPDATE`. The
//! partial unique index on open orders turns the find-or-create race into a
//! conflict for the losing transaction.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};

use minimart_core::{OrderId, OrderItemId, ProductId, UserId};

use super::RepositoryError;
use crate::models::{Order, OrderItem};

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    user_id: i64,
    is_open: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: i64,
    order_id: i64,
    product_id: i64,
    quantity: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderItemRow {
    fn into_item(self) -> OrderItem {
        OrderItem {
            id: OrderItemId::new(self.id),
            order_id: OrderId::new(self.order_id),
            product_id: ProductId::new(self.product_id),
            quantity: self.quantity,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Order {
        Order {
            id: OrderId::new(self.id),
            user_id: UserId::new(self.user_id),
            is_open: self.is_open,
            items,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Load one order with its items.
async fn fetch_order(
    conn: &mut SqliteConnection,
    order_id: OrderId,
) -> Result<Option<Order>, RepositoryError> {
    let row = sqlx::query_as::<_, OrderRow>(
        "SELECT id, user_id, is_open, created_at, updated_at FROM orders WHERE id = $1",
    )
    .bind(order_id)
    .fetch_optional(&mut *conn)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let items = sqlx::query_as::<_, OrderItemRow>(
        "SELECT id, order_id, product_id, quantity, created_at, updated_at
         FROM order_items WHERE order_id = $1 ORDER BY id ASC",
    )
    .bind(order_id)
    .fetch_all(&mut *conn)
    .await?
    .into_iter()
    .map(OrderItemRow::into_item)
    .collect();

    Ok(Some(row.into_order(items)))
}

/// ID of the user's open order, if any.
async fn find_open_order_id(
    conn: &mut SqliteConnection,
    user_id: UserId,
) -> Result<Option<OrderId>, RepositoryError> {
    let id = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM orders WHERE user_id = $1 AND is_open = 1",
    )
    .bind(user_id)
    .fetch_optional(conn)
    .await?;

    Ok(id.map(OrderId::new))
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the user's open order with its items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_open(&self, user_id: UserId) -> Result<Option<Order>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;

        let Some(order_id) = find_open_order_id(&mut *conn, user_id).await? else {
            return Ok(None);
        };

        fetch_order(&mut *conn, order_id).await
    }

    /// Add `quantity` of a product to the user's open order, creating the
    /// order if necessary.
    ///
    /// Runs as one transaction. Repeat adds of the same product accumulate
    /// into a single line item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a concurrent request created the
    /// open order first (the caller may simply retry).
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let order_id = match find_open_order_id(&mut *tx, user_id).await? {
            Some(id) => id,
            None => {
                tracing::info!(%user_id, "no open order, creating a new one");
                let id = sqlx::query_scalar::<_, i64>(
                    "INSERT INTO orders (user_id, is_open, created_at, updated_at)
                     VALUES ($1, 1, $2, $3)
                     RETURNING id",
                )
                .bind(user_id)
                .bind(now)
                .bind(now)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| {
                    if let sqlx::Error::Database(ref db_err) = e
                        && db_err.is_unique_violation()
                    {
                        return RepositoryError::Conflict(
                            "an open order was created concurrently".to_owned(),
                        );
                    }
                    RepositoryError::Database(e)
                })?;
                OrderId::new(id)
            }
        };

        sqlx::query(
            "INSERT INTO order_items (order_id, product_id, quantity, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (order_id, product_id)
             DO UPDATE SET quantity = quantity + excluded.quantity,
                           updated_at = excluded.updated_at",
        )
        .bind(order_id)
        .bind(product_id)
        .bind(quantity)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE orders SET updated_at = $1 WHERE id = $2")
            .bind(now)
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        let order = fetch_order(&mut *tx, order_id)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        tx.commit().await?;

        Ok(order)
    }

    /// Close the user's open order (checkout).
    ///
    /// Returns `None` when the user has no open order; the closed order
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn close_open(&self, user_id: UserId) -> Result<Option<Order>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let Some(order_id) = find_open_order_id(&mut *tx, user_id).await? else {
            return Ok(None);
        };

        sqlx::query("UPDATE orders SET is_open = 0, updated_at = $1 WHERE id = $2")
            .bind(Utc::now())
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        let order = fetch_order(&mut *tx, order_id)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        tx.commit().await?;

        Ok(Some(order))
    }

    /// List all orders, oldest first, with their items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(&self) -> Result<Vec<Order>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;

        let rows = sqlx::query_as::<_, OrderRow>(
            "SELECT id, user_id, is_open, created_at, updated_at FROM orders ORDER BY id ASC",
        )
        .fetch_all(&mut *conn)
        .await?;

        let mut items_by_order: HashMap<i64, Vec<OrderItem>> = HashMap::new();
        let item_rows = sqlx::query_as::<_, OrderItemRow>(
            "SELECT id, order_id, product_id, quantity, created_at, updated_at
             FROM order_items ORDER BY id ASC",
        )
        .fetch_all(&mut *conn)
        .await?;
        for row in item_rows {
            items_by_order
                .entry(row.order_id)
                .or_default()
                .push(row.into_item());
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let items = items_by_order.remove(&row.id).unwrap_or_default();
                row.into_order(items)
            })
            .collect())
    }
}
