//! Feedback repository.

use sqlx::PgPool;

use shopsmart_core::{AccountId, FeedbackId, ProductId, Rating};

use super::RepositoryError;
use crate::models::{AccountFeedback, Feedback, FeedbackWithAuthor, FeedbackWithRefs};

/// Repository for feedback database operations.
pub struct FeedbackRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> FeedbackRepository<'a> {
    /// Create a new feedback repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a rating.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the account already rated the product.
    pub async fn create(
        &self,
        product: ProductId,
        account: AccountId,
        rating: Rating,
        comment: &str,
    ) -> Result<Feedback, RepositoryError> {
        sqlx::query_as::<_, Feedback>(
            r"
            INSERT INTO feedback (product_id, account_id, rating, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING id, product_id, account_id, rating, comment, created_at
            ",
        )
        .bind(product)
        .bind(account)
        .bind(rating)
        .bind(comment)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            RepositoryError::unique_violation(e, "feedback already submitted for this product")
        })
    }

    /// Every feedback entry, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<FeedbackWithRefs>, RepositoryError> {
        let rows = sqlx::query_as::<_, FeedbackWithRefs>(
            r"
            SELECT f.id, f.rating, f.comment, f.created_at,
                   p.id AS product_id, p.name AS product_name,
                   a.id AS account_id, a.name AS author_name, a.email AS author_email
            FROM feedback f
            JOIN product p ON p.id = f.product_id
            JOIN account a ON a.id = f.account_id
            ORDER BY f.created_at DESC, f.id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Feedback for one product, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_product(
        &self,
        product: ProductId,
    ) -> Result<Vec<FeedbackWithAuthor>, RepositoryError> {
        let rows = sqlx::query_as::<_, FeedbackWithAuthor>(
            r"
            SELECT f.id, f.rating, f.comment, f.created_at, a.name AS author_name
            FROM feedback f
            JOIN account a ON a.id = f.account_id
            WHERE f.product_id = $1
            ORDER BY f.created_at DESC, f.id DESC
            ",
        )
        .bind(product)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Feedback left by one account, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_account(
        &self,
        account: AccountId,
    ) -> Result<Vec<AccountFeedback>, RepositoryError> {
        let rows = sqlx::query_as::<_, AccountFeedback>(
            r"
            SELECT f.id, f.product_id, p.name AS product_name, f.rating, f.comment, f.created_at
            FROM feedback f
            JOIN product p ON p.id = f.product_id
            WHERE f.account_id = $1
            ORDER BY f.created_at DESC, f.id DESC
            ",
        )
        .bind(account)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Delete a feedback entry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the entry does not exist.
    pub async fn delete(&self, id: FeedbackId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM feedback WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
