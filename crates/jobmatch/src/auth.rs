//! Credential and token primitives.
//!
//! Passwords are stored as argon2id digests; sessions are HS256 JWTs whose
//! claims carry the user id and role so role checks need no store lookup.

use crate::config::AuthConfig;
use crate::domain::{Role, UserId};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("failed to hash password")]
    Hash,
    #[error("token invalid or expired")]
    InvalidToken,
}

/// Produce an argon2id digest for storage.
pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|digest| digest.to_string())
        .map_err(|_| CredentialError::Hash)
}

/// Constant-time comparison of a candidate password against a stored digest.
/// An unparsable digest verifies as false rather than erroring, so a
/// corrupted record behaves like a wrong password.
pub fn verify_password(password: &str, digest: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(digest) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// JWT claims. `sub` holds the user id, `role` its label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn user_id(&self) -> Option<UserId> {
        UserId::parse(&self.sub)
    }

    pub fn parsed_role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }
}

/// Issues and verifies session tokens with a symmetric secret.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl: Duration::hours(config.token_ttl_hours),
        }
    }

    pub fn issue(&self, user: UserId, role: Role) -> Result<String, CredentialError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.to_string(),
            role: role.label().to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|_| CredentialError::InvalidToken)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, CredentialError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| CredentialError::InvalidToken)
    }
}
