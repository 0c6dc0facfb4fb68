//! Product feedback types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopsmart_core::{AccountId, Email, FeedbackId, ProductId, Rating};

/// A stored feedback record.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: FeedbackId,
    pub product_id: ProductId,
    pub account_id: AccountId,
    pub rating: Rating,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Feedback as shown publicly on a product page.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackWithAuthor {
    pub id: FeedbackId,
    pub rating: Rating,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub author_name: String,
}

/// Feedback with product and author references, for administrators.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackWithRefs {
    pub id: FeedbackId,
    pub rating: Rating,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub product_id: ProductId,
    pub product_name: String,
    pub account_id: AccountId,
    pub author_name: String,
    pub author_email: Email,
}

/// Feedback left by one account, with the product name.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AccountFeedback {
    pub id: FeedbackId,
    pub product_id: ProductId,
    pub product_name: String,
    pub rating: Rating,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/feedback` and `POST /api/products/{id}/feedback`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFeedback {
    pub product_id: Option<ProductId>,
    pub rating: Rating,
    #[serde(default)]
    pub comment: String,
}
