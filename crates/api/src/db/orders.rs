//! Order repository.
//!
//! Orders are append-only except for `status` and `updated_at`. Line items
//! keep the unit price captured at placement and are never rewritten.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgExecutor, PgPool};

use shopsmart_core::{AccountId, Email, Money, OrderId, OrderStatus};

use super::RepositoryError;
use crate::models::{AccountSummary, Order, OrderItem, OrderWithAccount};

const ORDER_COLUMNS: &str = "o.id, o.account_id, o.total, o.payment_method, o.shipping_address, \
                             o.status, o.created_at, o.updated_at";

/// Parameters for inserting an order.
pub struct NewOrder<'a> {
    pub account_id: AccountId,
    pub payment_method: &'a str,
    pub shipping_address: &'a str,
    pub total: Money,
    pub items: &'a [OrderItem],
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    account_id: AccountId,
    total: Money,
    payment_method: String,
    shipping_address: String,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Order {
        Order {
            id: self.id,
            account_id: self.account_id,
            items,
            total: self.total,
            payment_method: self.payment_method,
            shipping_address: self.shipping_address,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrderAccountRow {
    #[sqlx(flatten)]
    order: OrderRow,
    account_name: Option<String>,
    account_email: Option<Email>,
    account_address: Option<String>,
    account_phone: Option<String>,
}

impl OrderAccountRow {
    fn account(&self) -> Option<AccountSummary> {
        let (Some(name), Some(email)) = (&self.account_name, &self.account_email) else {
            return None;
        };
        Some(AccountSummary {
            id: self.order.account_id,
            name: name.clone(),
            email: email.clone(),
            address: self.account_address.clone().unwrap_or_default(),
            phone: self.account_phone.clone().unwrap_or_default(),
        })
    }
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    order_id: OrderId,
    #[sqlx(flatten)]
    item: OrderItem,
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

    /// Get an order with its owner's details.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_account(
        &self,
        id: OrderId,
    ) -> Result<Option<OrderWithAccount>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderAccountRow>(&format!(
            r"
            SELECT {ORDER_COLUMNS},
                   a.name AS account_name, a.email AS account_email,
                   a.address AS account_address, a.phone AS account_phone
            FROM orders o
            LEFT JOIN account a ON a.id = o.account_id
            WHERE o.id = $1
            "
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut items = load_items(self.pool, &[row.order.id]).await?;
        let account = row.account();
        let order = row.order.into_order(items.remove(&id).unwrap_or_default());

        Ok(Some(OrderWithAccount { order, account }))
    }

    /// Orders placed by one account, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_account(&self, account: AccountId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            SELECT {ORDER_COLUMNS}
            FROM orders o
            WHERE o.account_id = $1
            ORDER BY o.created_at DESC, o.id DESC
            "
        ))
        .bind(account)
        .fetch_all(self.pool)
        .await?;

        let ids: Vec<OrderId> = rows.iter().map(|r| r.id).collect();
        let mut items = load_items(self.pool, &ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let lines = items.remove(&row.id).unwrap_or_default();
                row.into_order(lines)
            })
            .collect())
    }

    /// Every order with owner details, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<OrderWithAccount>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderAccountRow>(&format!(
            r"
            SELECT {ORDER_COLUMNS},
                   a.name AS account_name, a.email AS account_email,
                   a.address AS account_address, a.phone AS account_phone
            FROM orders o
            LEFT JOIN account a ON a.id = o.account_id
            ORDER BY o.created_at DESC, o.id DESC
            "
        ))
        .fetch_all(self.pool)
        .await?;

        let ids: Vec<OrderId> = rows.iter().map(|r| r.order.id).collect();
        let mut items = load_items(self.pool, &ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let account = row.account();
                let lines = items.remove(&row.order.id).unwrap_or_default();
                OrderWithAccount {
                    order: row.order.into_order(lines),
                    account,
                }
            })
            .collect())
    }

    /// Delete an order record. Stock is not touched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn delete(&self, id: OrderId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    // =========================================================================
    // Transaction-scoped operations
    // =========================================================================

    /// Insert an order header and its line items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if an insert fails.
    pub async fn insert(conn: &mut PgConnection, new: &NewOrder<'_>) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            INSERT INTO orders AS o (account_id, total, payment_method, shipping_address, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING o.id, o.account_id, o.total, o.payment_method, o.shipping_address,
                      o.status, o.created_at, o.updated_at
            ",
        )
        .bind(new.account_id)
        .bind(new.total)
        .bind(new.payment_method)
        .bind(new.shipping_address)
        .bind(OrderStatus::Pending)
        .fetch_one(&mut *conn)
        .await?;

        for (position, item) in (1_i32..).zip(new.items) {
            sqlx::query(
                r"
                INSERT INTO order_item (order_id, position, product_id, quantity, price)
                VALUES ($1, $2, $3, $4, $5)
                ",
            )
            .bind(row.id)
            .bind(position)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.price)
            .execute(&mut *conn)
            .await?;
        }

        Ok(row.into_order(new.items.to_vec()))
    }

    /// Lock an order row and return its current status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lock_status(
        conn: &mut PgConnection,
        id: OrderId,
    ) -> Result<Option<OrderStatus>, RepositoryError> {
        let status = sqlx::query_scalar::<_, OrderStatus>(
            "SELECT status FROM orders WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(status)
    }

    /// Line items of one order, in placement order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items_in(
        conn: &mut PgConnection,
        id: OrderId,
    ) -> Result<Vec<OrderItem>, RepositoryError> {
        let mut items = load_items(conn, &[id]).await?;
        Ok(items.remove(&id).unwrap_or_default())
    }

    /// Set a new status and bump `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn set_status(
        conn: &mut PgConnection,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE orders SET status = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

/// Load line items for several orders, annotated with live catalog details.
async fn load_items<'e, E>(
    executor: E,
    ids: &[OrderId],
) -> Result<HashMap<OrderId, Vec<OrderItem>>, RepositoryError>
where
    E: PgExecutor<'e>,
{
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = sqlx::query_as::<_, ItemRow>(
        r"
        SELECT i.order_id, i.product_id, i.quantity, i.price, p.name, p.image
        FROM order_item i
        LEFT JOIN product p ON p.id = i.product_id
        WHERE i.order_id = ANY($1)
        ORDER BY i.order_id, i.position
        ",
    )
    .bind(ids)
    .fetch_all(executor)
    .await?;

    let mut grouped: HashMap<OrderId, Vec<OrderItem>> = HashMap::new();
    for row in rows {
        grouped.entry(row.order_id).or_default().push(row.item);
    }
    Ok(grouped)
}
