//! Account administration service.

use sqlx::PgPool;
use tracing::info;

use shopsmart_core::{AccountId, Role};

use super::ServiceError;
use crate::db::{AccountRepository, CartRepository, FeedbackRepository, WishlistRepository};
use crate::middleware::auth::policy;
use crate::models::{Account, AccountDetails, AccountFeedback, CartEntry, ProductSummary};

/// Account administration service.
pub struct AccountService<'a> {
    accounts: AccountRepository<'a>,
    carts: CartRepository<'a>,
    wishlists: WishlistRepository<'a>,
    feedback: FeedbackRepository<'a>,
}

impl<'a> AccountService<'a> {
    /// Create a new account service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            accounts: AccountRepository::new(pool),
            carts: CartRepository::new(pool),
            wishlists: WishlistRepository::new(pool),
            feedback: FeedbackRepository::new(pool),
        }
    }

    /// Every account with its cart, wishlist and feedback.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if a query fails.
    pub async fn list_with_details(&self) -> Result<Vec<AccountDetails>, ServiceError> {
        let accounts = self.accounts.list().await?;
        let mut details = Vec::with_capacity(accounts.len());

        for account in accounts {
            let cart = self.carts.entries(account.id).await?;
            let wishlist = self.wishlists.products(account.id).await?;
            let feedback = self.feedback.list_for_account(account.id).await?;
            details.push(AccountDetails {
                account,
                cart,
                wishlist,
                feedback,
            });
        }

        Ok(details)
    }

    /// Cart of one account.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the account does not exist.
    pub async fn cart(&self, id: AccountId) -> Result<Vec<CartEntry>, ServiceError> {
        self.require(id).await?;
        Ok(self.carts.entries(id).await?)
    }

    /// Wishlist of one account.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the account does not exist.
    pub async fn wishlist(&self, id: AccountId) -> Result<Vec<ProductSummary>, ServiceError> {
        self.require(id).await?;
        Ok(self.wishlists.products(id).await?)
    }

    /// Feedback left by one account.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the account does not exist.
    pub async fn feedback(&self, id: AccountId) -> Result<Vec<AccountFeedback>, ServiceError> {
        self.require(id).await?;
        Ok(self.feedback.list_for_account(id).await?)
    }

    /// Change another account's role.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Access` when `actor` targets itself,
    /// `ServiceError::Validation` for an unknown role and
    /// `ServiceError::NotFound` for an unknown account.
    pub async fn change_role(
        &self,
        actor: &Account,
        target: AccountId,
        role: &str,
    ) -> Result<Account, ServiceError> {
        policy::not_self(actor.id, target)?;
        let role = role
            .parse::<Role>()
            .map_err(|_| ServiceError::Validation(format!("invalid role: {role}")))?;

        let account = self
            .accounts
            .set_role(target, role)
            .await
            .map_err(|e| ServiceError::from_repository(e, "account"))?;

        info!(actor = %actor.id, target = %target, role = %role, "Account role changed");
        Ok(account)
    }

    /// Delete another account and everything it owns.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Access` when `actor` targets itself and
    /// `ServiceError::NotFound` for an unknown account.
    pub async fn delete(&self, actor: &Account, target: AccountId) -> Result<(), ServiceError> {
        policy::not_self(actor.id, target)?;
        self.accounts
            .delete_cascade(target)
            .await
            .map_err(|e| ServiceError::from_repository(e, "account"))?;

        info!(actor = %actor.id, target = %target, "Account deleted by administrator");
        Ok(())
    }

    async fn require(&self, id: AccountId) -> Result<Account, ServiceError> {
        self.accounts
            .get_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound("account"))
    }
}
