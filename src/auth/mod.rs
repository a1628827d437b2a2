pub mod guard;
pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SecurityConfig;
use crate::error::ApiError;

pub use guard::{authorize_owner_action, check_owner, Access};
pub use password::{hash_password, verify_password, PasswordError};

/// User section of the token payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimUser {
    pub id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user: ClaimUser,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            user: ClaimUser { id: user_id },
            exp,
            iat: now.timestamp(),
        }
    }
}

/// Body returned by registration and login
#[derive(Debug, Clone, Serialize)]
pub struct Credential {
    pub token: String,
}

/// Trusted identity extracted from a verified credential.
/// Lives for a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityClaim {
    pub user_id: Uuid,
}

impl From<Claims> for IdentityClaim {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user.id,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("Invalid JWT secret")]
    InvalidSecret,
}

/// Signs and verifies credentials with a shared HS256 secret.
///
/// Verification is stateless: there is no revocation list and no session lookup.
#[derive(Clone)]
pub struct TokenVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_hours: u64,
    configured: bool,
}

impl TokenVerifier {
    pub fn new(secret: &str, expiry_hours: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry_hours,
            configured: !secret.is_empty(),
        }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(&security.jwt_secret, security.jwt_expiry_hours)
    }

    /// Sign a new credential for the given user
    pub fn issue(&self, user_id: Uuid) -> Result<String, JwtError> {
        if !self.configured {
            return Err(JwtError::InvalidSecret);
        }

        encode(&Header::default(), &Claims::new(user_id, self.expiry_hours), &self.encoding_key)
            .map_err(|e| JwtError::TokenGeneration(e.to_string()))
    }

    /// Validate a credential and extract the identity claim
    pub fn verify(&self, credential: Option<&str>) -> Result<IdentityClaim, ApiError> {
        let token = credential
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::unauthenticated("No token, authorization denied"))?;

        if !self.configured {
            tracing::error!("Rejecting credential: JWT secret not configured");
            return Err(ApiError::unauthenticated("Token is not valid"));
        }

        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| {
                tracing::debug!("Credential rejected: {}", e);
                ApiError::unauthenticated("Token is not valid")
            })?;

        Ok(token_data.claims.into())
    }
}
