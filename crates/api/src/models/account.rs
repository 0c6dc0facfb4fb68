//! Account types.
//!
//! The credential hash never leaves the repository layer; these types are
//! safe to serialize.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopsmart_core::{AccountId, Email, Role};

use super::{AccountFeedback, CartEntry, ProductSummary};

/// A ShopSmart account.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub email: Email,
    pub address: String,
    pub phone: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Placeholder value the storefront stores when no address was given.
    pub const ADDRESS_PLACEHOLDER: &'static str = "N/A";

    /// The address orders can ship to, if the account has a real one.
    #[must_use]
    pub fn shipping_address(&self) -> Option<&str> {
        let address = self.address.trim();
        if address.is_empty() || address.eq_ignore_ascii_case(Self::ADDRESS_PLACEHOLDER) {
            None
        } else {
            Some(address)
        }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Owner details shown alongside orders in admin views.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: AccountId,
    pub name: String,
    pub email: Email,
    pub address: String,
    pub phone: String,
}

/// An account with everything an administrator reviews at once.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDetails {
    #[serde(flatten)]
    pub account: Account,
    pub cart: Vec<CartEntry>,
    pub wishlist: Vec<ProductSummary>,
    pub feedback: Vec<AccountFeedback>,
}

/// Fields for a new account, already validated.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: Email,
    pub password_hash: String,
    pub address: String,
    pub phone: String,
    pub role: Role,
}

/// Body of `PUT /api/auth/profile`. Blank values are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn account_with_address(address: &str) -> Account {
        Account {
            id: AccountId::new(1),
            name: "Ada".to_string(),
            email: Email::parse("ada@example.com").unwrap(),
            address: address.to_string(),
            phone: "555-0100".to_string(),
            role: Role::User,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_shipping_address_rejects_placeholders() {
        assert_eq!(account_with_address("").shipping_address(), None);
        assert_eq!(account_with_address("   ").shipping_address(), None);
        assert_eq!(account_with_address("N/A").shipping_address(), None);
        assert_eq!(account_with_address("n/a").shipping_address(), None);
    }

    #[test]
    fn test_shipping_address_is_trimmed() {
        let account = account_with_address("  1 Main St ");
        assert_eq!(account.shipping_address(), Some("1 Main St"));
    }

    #[test]
    fn test_serialization_omits_nothing_secret() {
        let json = serde_json::to_value(account_with_address("1 Main St")).unwrap();
        assert_eq!(json["role"], "user");
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("createdAt").is_some());
    }
}
