//! Feedback service.

use sqlx::PgPool;
use tracing::info;

use shopsmart_core::{AccountId, FeedbackId, ProductId, Rating};

use super::ServiceError;
use crate::db::{FeedbackRepository, ProductRepository};
use crate::models::{Feedback, FeedbackWithAuthor, FeedbackWithRefs};

/// Feedback service.
pub struct FeedbackService<'a> {
    feedback: FeedbackRepository<'a>,
    products: ProductRepository<'a>,
}

impl<'a> FeedbackService<'a> {
    /// Create a new feedback service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            feedback: FeedbackRepository::new(pool),
            products: ProductRepository::new(pool),
        }
    }

    /// Record a rating for a product. One per account and product.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` for an unknown product and
    /// `ServiceError::Conflict` for a second submission.
    pub async fn submit(
        &self,
        account: AccountId,
        product_id: ProductId,
        rating: Rating,
        comment: &str,
    ) -> Result<Feedback, ServiceError> {
        if self.products.summary(product_id).await?.is_none() {
            return Err(ServiceError::NotFound("product"));
        }

        let feedback = self
            .feedback
            .create(product_id, account, rating, comment.trim())
            .await
            .map_err(|e| ServiceError::from_repository(e, "product"))?;

        info!(feedback_id = %feedback.id, product_id = %product_id, rating = %rating, "Feedback submitted");
        Ok(feedback)
    }

    /// Every feedback entry, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<FeedbackWithRefs>, ServiceError> {
        Ok(self.feedback.list_all().await?)
    }

    /// Public feedback for one product, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the query fails.
    pub async fn list_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<FeedbackWithAuthor>, ServiceError> {
        Ok(self.feedback.list_for_product(product_id).await?)
    }

    /// Remove a feedback entry.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the entry does not exist.
    pub async fn delete(&self, id: FeedbackId) -> Result<(), ServiceError> {
        self.feedback
            .delete(id)
            .await
            .map_err(|e| ServiceError::from_repository(e, "feedback"))?;
        info!(feedback_id = %id, "Feedback deleted");
        Ok(())
    }
}
