//! Order workflow error types.

use thiserror::Error;

use shopsmart_core::{OrderId, ProductId};

use crate::db::RepositoryError;

/// Errors that can occur while placing an order or changing its status.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The account has no usable shipping address.
    #[error("account is missing a shipping address; update the profile first")]
    MissingShippingAddress,

    /// No lines were submitted.
    #[error("cart is empty; cannot place an empty order")]
    EmptyOrder,

    /// A line asked for fewer than one unit.
    #[error("invalid quantity {quantity} for product {product_id}")]
    InvalidQuantity {
        product_id: ProductId,
        quantity: i32,
    },

    /// A line references a product that does not exist.
    #[error("product {0} not found; order not placed")]
    ProductNotFound(ProductId),

    /// Not enough stock to fill a line.
    #[error("insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: i32,
        requested: i32,
    },

    /// The requested status is not one of the known values.
    #[error("invalid order status: {0}")]
    InvalidStatus(String),

    /// Cancelled orders cannot change status.
    #[error("cannot change the status of a cancelled order")]
    IllegalTransitionFromCancelled,

    /// The order does not exist.
    #[error("order {0} not found")]
    OrderNotFound(OrderId),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for OrderError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}
