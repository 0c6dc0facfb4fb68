//! Wishlist repository.

use sqlx::PgPool;

use shopsmart_core::{AccountId, ProductId};

use super::RepositoryError;
use crate::models::ProductSummary;

/// Repository for wishlist database operations.
pub struct WishlistRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> WishlistRepository<'a> {
    /// Create a new wishlist repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Products on the wishlist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn products(&self, account: AccountId) -> Result<Vec<ProductSummary>, RepositoryError> {
        let products = sqlx::query_as::<_, ProductSummary>(
            r"
            SELECT p.id, p.name, p.price, p.image, p.stock
            FROM wishlist_item w
            JOIN product p ON p.id = w.product_id
            WHERE w.account_id = $1
            ORDER BY w.added_at, p.id
            ",
        )
        .bind(account)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Add a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the product is already listed.
    pub async fn add(&self, account: AccountId, product: ProductId) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO wishlist_item (account_id, product_id) VALUES ($1, $2)")
            .bind(account)
            .bind(product)
            .execute(self.pool)
            .await
            .map_err(|e| RepositoryError::unique_violation(e, "product already in wishlist"))?;

        Ok(())
    }

    /// Remove a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product is not listed.
    pub async fn remove(&self, account: AccountId, product: ProductId) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("DELETE FROM wishlist_item WHERE account_id = $1 AND product_id = $2")
                .bind(account)
                .bind(product)
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
