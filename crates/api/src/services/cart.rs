//! Cart service.
//!
//! Cart quantities are checked against current stock when edited, but stock
//! is only reserved when an order is placed.

use sqlx::PgPool;

use shopsmart_core::{AccountId, ProductId};

use super::ServiceError;
use crate::db::{CartRepository, ProductRepository};
use crate::models::{CartEntry, ProductSummary};

/// Cart service.
pub struct CartService<'a> {
    carts: CartRepository<'a>,
    products: ProductRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            carts: CartRepository::new(pool),
            products: ProductRepository::new(pool),
        }
    }

    /// Cart lines in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the query fails.
    pub async fn get(&self, account: AccountId) -> Result<Vec<CartEntry>, ServiceError> {
        Ok(self.carts.entries(account).await?)
    }

    /// Add `quantity` units, merging with an existing line.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` for `quantity < 1`,
    /// `ServiceError::NotFound` for an unknown product, and
    /// `ServiceError::InsufficientStock` if the merged quantity exceeds stock.
    pub async fn add(
        &self,
        account: AccountId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<Vec<CartEntry>, ServiceError> {
        if quantity < 1 {
            return Err(ServiceError::Validation(
                "quantity must be at least 1".to_string(),
            ));
        }

        let product = self.product(product_id).await?;
        let existing = self.carts.quantity(account, product_id).await?.unwrap_or(0);
        let merged = existing.saturating_add(quantity);
        check_stock(&product, merged)?;

        self.carts.upsert(account, product_id, merged).await?;
        self.get(account).await
    }

    /// Replace the quantity of an existing line. Zero removes it.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the product is not in the cart and
    /// `ServiceError::InsufficientStock` if `quantity` exceeds stock.
    pub async fn set_quantity(
        &self,
        account: AccountId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<Vec<CartEntry>, ServiceError> {
        if quantity < 0 {
            return Err(ServiceError::Validation(
                "quantity cannot be negative".to_string(),
            ));
        }

        if self.carts.quantity(account, product_id).await?.is_none() {
            return Err(ServiceError::NotFound("cart item"));
        }

        if quantity == 0 {
            return self.remove(account, product_id).await;
        }

        let product = self.product(product_id).await?;
        check_stock(&product, quantity)?;

        self.carts.upsert(account, product_id, quantity).await?;
        self.get(account).await
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the product is not in the cart.
    pub async fn remove(
        &self,
        account: AccountId,
        product_id: ProductId,
    ) -> Result<Vec<CartEntry>, ServiceError> {
        self.carts
            .remove(account, product_id)
            .await
            .map_err(|e| ServiceError::from_repository(e, "cart item"))?;
        self.get(account).await
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the delete fails.
    pub async fn clear(&self, account: AccountId) -> Result<(), ServiceError> {
        self.carts.clear(account).await?;
        Ok(())
    }

    async fn product(&self, id: ProductId) -> Result<ProductSummary, ServiceError> {
        self.products
            .summary(id)
            .await?
            .ok_or(ServiceError::NotFound("product"))
    }
}

fn check_stock(product: &ProductSummary, wanted: i32) -> Result<(), ServiceError> {
    if wanted > product.stock {
        return Err(ServiceError::InsufficientStock {
            product: product.name.clone(),
            available: product.stock,
            requested: wanted,
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopsmart_core::Money;

    use super::*;

    fn summary(stock: i32) -> ProductSummary {
        ProductSummary {
            id: ProductId::new(1),
            name: "Lamp".to_string(),
            price: Money::from_cents(1000).unwrap(),
            image: String::new(),
            stock,
        }
    }

    #[test]
    fn test_check_stock_allows_exact_stock() {
        assert!(check_stock(&summary(3), 3).is_ok());
    }

    #[test]
    fn test_check_stock_reports_shortfall() {
        let err = check_stock(&summary(2), 5).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::InsufficientStock {
                available: 2,
                requested: 5,
                ..
            }
        ));
    }
}
