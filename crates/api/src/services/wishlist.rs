//! Wishlist service.

use sqlx::PgPool;

use shopsmart_core::{AccountId, ProductId};

use super::ServiceError;
use crate::db::{ProductRepository, WishlistRepository};
use crate::models::ProductSummary;

/// Wishlist service.
pub struct WishlistService<'a> {
    wishlists: WishlistRepository<'a>,
    products: ProductRepository<'a>,
}

impl<'a> WishlistService<'a> {
    /// Create a new wishlist service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            wishlists: WishlistRepository::new(pool),
            products: ProductRepository::new(pool),
        }
    }

    /// Products on the wishlist.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the query fails.
    pub async fn get(&self, account: AccountId) -> Result<Vec<ProductSummary>, ServiceError> {
        Ok(self.wishlists.products(account).await?)
    }

    /// Add a product.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` for an unknown product and
    /// `ServiceError::Conflict` if it is already listed.
    pub async fn add(
        &self,
        account: AccountId,
        product_id: ProductId,
    ) -> Result<Vec<ProductSummary>, ServiceError> {
        if self.products.summary(product_id).await?.is_none() {
            return Err(ServiceError::NotFound("product"));
        }
        self.wishlists
            .add(account, product_id)
            .await
            .map_err(|e| ServiceError::from_repository(e, "product"))?;
        self.get(account).await
    }

    /// Remove a product.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the product is not listed.
    pub async fn remove(
        &self,
        account: AccountId,
        product_id: ProductId,
    ) -> Result<Vec<ProductSummary>, ServiceError> {
        self.wishlists
            .remove(account, product_id)
            .await
            .map_err(|e| ServiceError::from_repository(e, "wishlist item"))?;
        self.get(account).await
    }
}
