//! Cart repository.
//!
//! Each account owns at most one `cart_item` row per product. Lines are
//! returned in the order they were first added.

use sqlx::{PgConnection, PgPool};

use shopsmart_core::{AccountId, ProductId};

use super::RepositoryError;
use crate::models::CartEntry;

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Cart lines with product summaries, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn entries(&self, account: AccountId) -> Result<Vec<CartEntry>, RepositoryError> {
        let entries = sqlx::query_as::<_, CartEntry>(
            r"
            SELECT p.id, p.name, p.price, p.image, p.stock, c.quantity
            FROM cart_item c
            JOIN product p ON p.id = c.product_id
            WHERE c.account_id = $1
            ORDER BY c.added_at, c.product_id
            ",
        )
        .bind(account)
        .fetch_all(self.pool)
        .await?;

        Ok(entries)
    }

    /// Current quantity of `product` in the cart, if present.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn quantity(
        &self,
        account: AccountId,
        product: ProductId,
    ) -> Result<Option<i32>, RepositoryError> {
        let quantity = sqlx::query_scalar::<_, i32>(
            "SELECT quantity FROM cart_item WHERE account_id = $1 AND product_id = $2",
        )
        .bind(account)
        .bind(product)
        .fetch_optional(self.pool)
        .await?;

        Ok(quantity)
    }

    /// Insert a line or replace its quantity. An existing line keeps its position.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn upsert(
        &self,
        account: AccountId,
        product: ProductId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO cart_item (account_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (account_id, product_id) DO UPDATE SET quantity = EXCLUDED.quantity
            ",
        )
        .bind(account)
        .bind(product)
        .bind(quantity)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Remove one line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line does not exist.
    pub async fn remove(&self, account: AccountId, product: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_item WHERE account_id = $1 AND product_id = $2")
            .bind(account)
            .bind(product)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn clear(&self, account: AccountId) -> Result<u64, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        Self::clear_in(&mut *conn, account).await
    }

    /// Empty the cart inside an open transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn clear_in(conn: &mut PgConnection, account: AccountId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_item WHERE account_id = $1")
            .bind(account)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }
}
