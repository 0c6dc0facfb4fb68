//! Order placement and status workflows.
//!
//! Both workflows run inside a single transaction. Placement share-locks the
//! account row, then locks the requested product rows in ascending ID order.
//! It validates against that locked snapshot, then decrements stock, writes
//! the order and empties the cart. A status change locks the order row
//! first, so two concurrent cancellations restore stock at most once.

mod error;
pub mod plan;

pub use error::OrderError;
pub use plan::{
    OrderPlan, TransitionEffect, parse_status, plan_order, plan_transition, quantities_by_product,
};

use sqlx::PgPool;
use tracing::{info, instrument, warn};

use shopsmart_core::{AccountId, OrderId, ProductId};

use crate::db::orders::NewOrder;
use crate::db::{AccountRepository, CartRepository, OrderRepository, ProductRepository, RepositoryError};
use crate::models::{Account, Order, OrderLineRequest, OrderWithAccount};

/// Order service.
pub struct OrderService<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Place an order for `account_id` from the submitted lines.
    ///
    /// The stored cart is not consulted, only emptied on success.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure as an `OrderError`. Nothing is
    /// written unless every line passes.
    #[instrument(skip(self, lines), fields(lines = lines.len()))]
    pub async fn place_order(
        &self,
        account_id: AccountId,
        payment_method: &str,
        lines: &[OrderLineRequest],
    ) -> Result<Order, OrderError> {
        let mut ids: Vec<ProductId> = lines.iter().map(|l| l.product_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let mut tx = self.pool.begin().await?;

        let account = AccountRepository::lock_for_share(&mut tx, account_id).await?;
        let address = account.as_ref().and_then(Account::shipping_address);

        let catalog = ProductRepository::lock_stock(&mut tx, &ids).await?;
        let plan = plan_order(address, lines, &catalog)?;

        for (product_id, quantity) in plan.stock_deductions() {
            if !ProductRepository::decrement_stock(&mut tx, product_id, quantity).await? {
                return Err(RepositoryError::Conflict(format!(
                    "stock for product {product_id} changed during placement"
                ))
                .into());
            }
        }

        let order = OrderRepository::insert(
            &mut tx,
            &NewOrder {
                account_id,
                payment_method: payment_method.trim(),
                shipping_address: &plan.shipping_address,
                total: plan.total,
                items: &plan.items,
            },
        )
        .await?;

        let cleared = CartRepository::clear_in(&mut tx, account_id).await?;

        tx.commit().await?;

        info!(
            order_id = %order.id,
            total = %order.total,
            cart_lines_cleared = cleared,
            "Order placed"
        );
        Ok(order)
    }

    /// Move an order to `requested`, restoring stock when it becomes `Cancelled`.
    ///
    /// Products deleted since the order was placed are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::InvalidStatus`, `OrderError::OrderNotFound` or
    /// `OrderError::IllegalTransitionFromCancelled`.
    #[instrument(skip(self))]
    pub async fn transition_status(
        &self,
        order_id: OrderId,
        requested: &str,
    ) -> Result<OrderWithAccount, OrderError> {
        let requested = parse_status(requested)?;

        let mut tx = self.pool.begin().await?;

        let current = OrderRepository::lock_status(&mut tx, order_id)
            .await?
            .ok_or(OrderError::OrderNotFound(order_id))?;

        let effect = plan_transition(current, requested)?;

        if effect == TransitionEffect::RestoreStock {
            let items = OrderRepository::items_in(&mut tx, order_id).await?;
            for (product_id, quantity) in quantities_by_product(&items) {
                let restored = ProductRepository::restore_stock(&mut tx, product_id, quantity).await?;
                if !restored {
                    warn!(
                        order_id = %order_id,
                        product_id = %product_id,
                        quantity,
                        "Product no longer exists; stock not restored"
                    );
                }
            }
        }

        OrderRepository::set_status(&mut tx, order_id, requested).await?;
        tx.commit().await?;

        info!(order_id = %order_id, from = %current, to = %requested, "Order status changed");

        OrderRepository::new(self.pool)
            .get_with_account(order_id)
            .await?
            .ok_or(OrderError::OrderNotFound(order_id))
    }

    /// Orders placed by `account_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the query fails.
    pub async fn list_mine(&self, account_id: AccountId) -> Result<Vec<Order>, OrderError> {
        Ok(OrderRepository::new(self.pool)
            .list_for_account(account_id)
            .await?)
    }

    /// Every order with owner details, newest first.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<OrderWithAccount>, OrderError> {
        Ok(OrderRepository::new(self.pool).list_all().await?)
    }

    /// Delete an order record without touching stock.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::OrderNotFound` if the order does not exist.
    pub async fn delete(&self, order_id: OrderId) -> Result<(), OrderError> {
        OrderRepository::new(self.pool)
            .delete(order_id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => OrderError::OrderNotFound(order_id),
                other => OrderError::Repository(other),
            })?;

        info!(order_id = %order_id, "Order deleted");
        Ok(())
    }
}
