use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config;

pub mod password;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Owning user id, as generated by the database.
    pub sub: String,
    /// Administrator flag, frozen at issuance. A demoted administrator keeps
    /// outstanding tokens privileged until they expire.
    pub admin: bool,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("JWT secret not configured")]
    MissingSecret,

    #[error("cannot sign token: {0}")]
    Signing(jsonwebtoken::errors::Error),

    #[error("malformed token")]
    Malformed,

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("unexpected signing algorithm")]
    UnexpectedAlgorithm,

    #[error("token expired")]
    Expired,

    #[error("cannot verify token: {0}")]
    Verification(String),
}

/// Issues and verifies the signed identity tokens the middleware chain runs
/// on. Holds the symmetric secret; nothing else in the crate touches it.
pub struct TokenManager {
    secret: String,
    expiry_hours: u64,
}

impl TokenManager {
    pub fn new(secret: impl Into<String>, expiry_hours: u64) -> Self {
        Self {
            secret: secret.into(),
            expiry_hours,
        }
    }

    pub fn from_config() -> &'static TokenManager {
        use std::sync::OnceLock;
        static INSTANCE: OnceLock<TokenManager> = OnceLock::new();
        INSTANCE.get_or_init(|| {
            let security = &config::config().security;
            TokenManager::new(security.jwt_secret.clone(), security.jwt_expiry_hours)
        })
    }

    /// Generate a signed token for the given user with a fixed lifetime.
    pub fn issue(&self, user_id: &str, is_admin: bool) -> Result<String, TokenError> {
        if self.secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }

        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            admin: is_admin,
            exp: (now + Duration::hours(self.expiry_hours as i64)).timestamp(),
            iat: now.timestamp(),
        };

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::default(), &claims, &encoding_key).map_err(TokenError::Signing)
    }

    /// Verify signature, algorithm and expiry, and return the claims.
    ///
    /// Only HS256 is accepted; tokens signed with any other algorithm (or
    /// none) are rejected regardless of signature validity. Expiry gets no
    /// leeway: a token one second past its lifetime is invalid.
    pub fn parse(&self, token: &str) -> Result<Claims, TokenError> {
        if self.secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }

        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let token_data =
            decode::<Claims>(token, &decoding_key, &validation).map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::Base64(_)
                | jsonwebtoken::errors::ErrorKind::Json(_)
                | jsonwebtoken::errors::ErrorKind::Utf8(_) => TokenError::Malformed,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                jsonwebtoken::errors::ErrorKind::InvalidAlgorithm
                | jsonwebtoken::errors::ErrorKind::InvalidAlgorithmName => {
                    TokenError::UnexpectedAlgorithm
                }
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Verification(e.to_string()),
            })?;

        Ok(token_data.claims)
    }
}
