//! Business logic services.
//!
//! Services sit between route handlers and repositories. Each one borrows the
//! pool (and whatever else it needs from `AppState`) for a single request.

pub mod accounts;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod feedback;
pub mod orders;
pub mod wishlist;

use thiserror::Error;

use crate::db::RepositoryError;
use crate::middleware::auth::AccessError;

pub use accounts::AccountService;
pub use auth::AuthService;
pub use cart::CartService;
pub use catalog::CatalogService;
pub use feedback::FeedbackService;
pub use orders::OrderService;
pub use wishlist::WishlistService;

/// Errors shared by the single-entity services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request is malformed or violates a field rule.
    #[error("{0}")]
    Validation(String),

    /// The named entity does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A uniqueness rule would be violated.
    #[error("{0}")]
    Conflict(String),

    /// Not enough stock for the requested quantity.
    #[error("insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: i32,
        requested: i32,
    },

    /// An access policy rejected the action.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    /// Translate a repository error, naming the entity for `NotFound`.
    pub(crate) fn from_repository(err: RepositoryError, entity: &'static str) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound(entity),
            RepositoryError::Conflict(msg) => Self::Conflict(msg),
            other => Self::Repository(other),
        }
    }
}
