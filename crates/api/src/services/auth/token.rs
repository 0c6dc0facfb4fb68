//! Signed bearer tokens.
//!
//! A token is `base64url(claims).base64url(hmac)` where the MAC is
//! HMAC-SHA256 over the encoded claims segment. Tokens are stateless: the
//! account is re-read on every request, so role changes and deletions take
//! effect immediately.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use shopsmart_core::{AccountId, Role};

use crate::models::Account;

type HmacSha256 = Hmac<Sha256>;

/// Token errors. Every verification failure maps to `Unauthenticated`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("invalid token signature")]
    BadSignature,
    #[error("token expired")]
    Expired,
    #[error("failed to encode claims")]
    Encoding,
    #[error("invalid signing key")]
    InvalidKey,
}

/// Claims carried by a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: AccountId,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies bearer tokens.
#[derive(Clone)]
pub struct TokenSigner {
    key: SecretString,
    ttl_secs: i64,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("key", &"[REDACTED]")
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

impl TokenSigner {
    /// Create a signer with the given key and token lifetime.
    #[must_use]
    pub const fn new(key: SecretString, ttl_secs: i64) -> Self {
        Self { key, ttl_secs }
    }

    /// Issue a token for `account`, valid from now.
    ///
    /// # Errors
    ///
    /// Returns `TokenError` if the claims cannot be encoded or signed.
    pub fn issue(&self, account: &Account) -> Result<String, TokenError> {
        self.issue_at(account, Utc::now())
    }

    /// Issue a token as of `now`.
    ///
    /// # Errors
    ///
    /// Returns `TokenError` if the claims cannot be encoded or signed.
    pub fn issue_at(&self, account: &Account, now: DateTime<Utc>) -> Result<String, TokenError> {
        let iat = now.timestamp();
        let claims = Claims {
            sub: account.id,
            email: account.email.to_string(),
            role: account.role,
            iat,
            exp: iat.saturating_add(self.ttl_secs),
        };

        let json = serde_json::to_vec(&claims).map_err(|_| TokenError::Encoding)?;
        let payload = URL_SAFE_NO_PAD.encode(json);
        let signature = URL_SAFE_NO_PAD.encode(self.sign(payload.as_bytes())?);

        Ok(format!("{payload}.{signature}"))
    }

    /// Verify a token against the current time.
    ///
    /// # Errors
    ///
    /// Returns `TokenError` if the token is malformed, forged or expired.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as of `now`.
    ///
    /// # Errors
    ///
    /// Returns `TokenError` if the token is malformed, forged or expired.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let (payload, signature) = token.split_once('.').ok_or(TokenError::Malformed)?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| TokenError::Malformed)?;

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| TokenError::Malformed)?;
        let claims: Claims = serde_json::from_slice(&json).map_err(|_| TokenError::Malformed)?;

        if claims.exp <= now.timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, TokenError> {
        let mut mac = self.mac()?;
        mac.update(message);
        Ok(mac.finalize().into_bytes().to_vec())
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        HmacSha256::new_from_slice(self.key.expose_secret().as_bytes())
            .map_err(|_| TokenError::InvalidKey)
    }
}
