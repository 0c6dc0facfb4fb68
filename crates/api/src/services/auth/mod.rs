//! Authentication service.
//!
//! Password registration and login, bearer token issue, and the acting
//! account's own profile.

mod error;
pub mod token;

pub use error::AuthError;
pub use token::{Claims, TokenError, TokenSigner};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;

use shopsmart_core::{Email, Role};

use crate::db::{AccountRepository, RepositoryError};
use crate::models::{Account, NewAccount, ProfileUpdate};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Body of `POST /api/auth/register`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub address: String,
    pub phone: String,
}

/// Authentication service.
pub struct AuthService<'a> {
    accounts: AccountRepository<'a>,
    tokens: &'a TokenSigner,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, tokens: &'a TokenSigner) -> Self {
        Self {
            accounts: AccountRepository::new(pool),
            tokens,
        }
    }

    /// Register a shopper account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` for a blank field,
    /// `AuthError::InvalidEmail` for a malformed email,
    /// `AuthError::WeakPassword` for a short password and
    /// `AuthError::AccountAlreadyExists` if the email is taken.
    pub async fn register(&self, registration: &Registration) -> Result<Account, AuthError> {
        create_account(&self.accounts, registration, Role::User).await
    }

    /// Login with email and password, returning the account and a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email or password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<(Account, String), AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (account, password_hash) = self
            .accounts
            .get_credentials(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        let token = self.tokens.issue(&account)?;
        info!(account_id = %account.id, "Login succeeded");
        Ok((account, token))
    }

    /// Check the acting account's password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the password does not match.
    pub async fn verify_password(&self, account: &Account, password: &str) -> Result<(), AuthError> {
        let hash = self
            .accounts
            .get_password_hash(account.id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &hash)
    }

    /// Update the acting account's profile. Blank values are ignored.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the update fails.
    pub async fn update_profile(
        &self,
        account: &Account,
        update: &ProfileUpdate,
    ) -> Result<Account, AuthError> {
        let updated = self
            .accounts
            .update_profile(
                account.id,
                non_blank(update.name.as_deref()),
                non_blank(update.address.as_deref()),
                non_blank(update.phone.as_deref()),
            )
            .await?;

        info!(account_id = %updated.id, "Profile updated");
        Ok(updated)
    }
}

/// Validate a registration and store it with an explicit role.
///
/// Shared by self-service registration and the operator CLI, which creates
/// administrators.
///
/// # Errors
///
/// Same as [`AuthService::register`].
pub async fn create_account(
    accounts: &AccountRepository<'_>,
    registration: &Registration,
    role: Role,
) -> Result<Account, AuthError> {
    let name = required(&registration.name, "name")?;
    let email = required(&registration.email, "email")?;
    let password = required(&registration.password, "password")?;
    let address = required(&registration.address, "address")?;
    let phone = required(&registration.phone, "phone")?;

    let email = Email::parse(email)?;
    validate_password(password)?;
    let password_hash = hash_password(password)?;

    let account = accounts
        .create(&NewAccount {
            name: name.to_string(),
            email,
            password_hash,
            address: address.to_string(),
            phone: phone.to_string(),
            role,
        })
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::AccountAlreadyExists,
            other => AuthError::Repository(other),
        })?;

    info!(account_id = %account.id, role = %account.role, "Account registered");
    Ok(account)
}

fn required<'s>(value: &'s str, field: &'static str) -> Result<&'s str, AuthError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AuthError::MissingField(field));
    }
    Ok(trimmed)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Validate password requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
