//! Bearer token authentication and access policy.
//!
//! `RequireAuth` resolves the `Authorization: Bearer` token to a live account.
//! `RequireAdmin` additionally requires the admin role. Policy predicates that
//! depend on the request target (such as [`policy::not_self`]) are called by
//! the services that own the action.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use thiserror::Error;

use shopsmart_core::Role;

use crate::db::AccountRepository;
use crate::error::AppError;
use crate::models::Account;
use crate::state::AppState;

/// Access control failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessError {
    /// No valid bearer token, or its account no longer exists.
    #[error("authentication required")]
    Unauthenticated,
    /// The acting role may not perform this action.
    #[error("you do not have permission to perform this action")]
    Forbidden,
    /// Administrators cannot change or delete their own account.
    #[error("you cannot perform this action on your own account")]
    SelfModificationForbidden,
}

/// Extract the token from an `Authorization: Bearer <token>` header.
#[must_use]
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireAuth(account): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", account.name)
/// }
/// ```
pub struct RequireAuth(pub Account);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(account) = parts.extensions.get::<Account>() {
            return Ok(Self(account.clone()));
        }

        let token = extract_bearer_token(&parts.headers).ok_or(AccessError::Unauthenticated)?;
        let claims = state
            .tokens()
            .verify(token)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected bearer token");
                AccessError::Unauthenticated
            })?;

        let account = AccountRepository::new(state.pool())
            .get_by_id(claims.sub)
            .await?
            .ok_or(AccessError::Unauthenticated)?;

        sentry::configure_scope(|scope| {
            scope.set_user(Some(sentry::User {
                id: Some(account.id.to_string()),
                email: Some(account.email.to_string()),
                ..Default::default()
            }));
        });

        parts.extensions.insert(account.clone());
        Ok(Self(account))
    }
}

/// Extractor that requires an authenticated administrator.
///
/// Returns 401 without a valid token and 403 for non-admin accounts.
pub struct RequireAdmin(pub Account);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAuth(account) = RequireAuth::from_request_parts(parts, state).await?;
        policy::authorize(&account, &[Role::Admin])?;
        Ok(Self(account))
    }
}

/// Composable access predicates.
pub mod policy {
    use shopsmart_core::{AccountId, Role};

    use super::AccessError;
    use crate::models::Account;

    /// Reject unless the account holds one of `allowed`.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::Forbidden` when the role is not allowed.
    pub fn authorize(account: &Account, allowed: &[Role]) -> Result<(), AccessError> {
        if allowed.contains(&account.role) {
            Ok(())
        } else {
            Err(AccessError::Forbidden)
        }
    }

    /// Reject actions an account aims at itself.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::SelfModificationForbidden` when `actor == target`.
    pub const fn not_self(actor: AccountId, target: AccountId) -> Result<(), AccessError> {
        if actor.as_i32() == target.as_i32() {
            Err(AccessError::SelfModificationForbidden)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;
    use chrono::Utc;
    use shopsmart_core::{AccountId, Email};

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn account(role: Role) -> Account {
        Account {
            id: AccountId::new(5),
            name: "Lin".to_string(),
            email: Email::parse("lin@example.com").unwrap(),
            address: "9 Pier St".to_string(),
            phone: "555-0142".to_string(),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token(&headers("Bearer abc.def")), Some("abc.def"));
        assert_eq!(extract_bearer_token(&headers("Basic dXNlcg==")), None);
        assert_eq!(extract_bearer_token(&headers("Bearer ")), None);
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_authorize_by_role() {
        assert!(policy::authorize(&account(Role::Admin), &[Role::Admin]).is_ok());
        assert_eq!(
            policy::authorize(&account(Role::User), &[Role::Admin]),
            Err(AccessError::Forbidden)
        );
        assert!(policy::authorize(&account(Role::User), &[Role::User, Role::Admin]).is_ok());
    }

    #[test]
    fn test_not_self() {
        assert_eq!(
            policy::not_self(AccountId::new(3), AccountId::new(3)),
            Err(AccessError::SelfModificationForbidden)
        );
        assert!(policy::not_self(AccountId::new(3), AccountId::new(4)).is_ok());
    }
}
