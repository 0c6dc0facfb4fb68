//! Administrator account commands.
//!
//! Self-service registration only creates shoppers; the first administrator
//! is created here.

use shopsmart_api::db::AccountRepository;
use shopsmart_api::services::auth::{self, Registration};
use shopsmart_core::{AccountId, Role};

/// Create an administrator account.
///
/// # Errors
///
/// Returns an error if a field is invalid, the email is taken, or the
/// database is unreachable.
pub async fn create(
    email: &str,
    name: &str,
    password: &str,
    address: &str,
    phone: &str,
) -> Result<AccountId, Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    let registration = Registration {
        name: name.to_owned(),
        email: email.to_owned(),
        password: password.to_owned(),
        address: address.to_owned(),
        phone: phone.to_owned(),
    };

    let account =
        auth::create_account(&AccountRepository::new(&pool), &registration, Role::Admin).await?;

    tracing::info!(
        "Administrator created successfully! ID: {}, Email: {}",
        account.id,
        account.email
    );

    pool.close().await;
    Ok(account.id)
}
