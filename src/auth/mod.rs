use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated user id
    pub sub: Uuid,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, expiry_hours: u64) -> Result<Self, JwtError> {
        let now = Utc::now();
        let exp = i64::try_from(expiry_hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|validity| now.checked_add_signed(validity))
            .ok_or(JwtError::ExpiryOutOfRange(expiry_hours))?;

        Ok(Self {
            sub: user_id,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        })
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT secret not configured")]
    MissingSecret,

    #[error("Missing Authorization header")]
    MissingToken,

    #[error("Authorization header must use Bearer token format")]
    MalformedHeader,

    #[error("Token expired")]
    Expired,

    #[error("Invalid JWT token: {0}")]
    Invalid(String),

    #[error("Token validity of {0} hours is out of range")]
    ExpiryOutOfRange(u64),

    #[error("JWT generation error: {0}")]
    Encode(jsonwebtoken::errors::Error),
}

/// HS256 token issuer and verifier sharing one secret
#[derive(Clone)]
pub struct JwtAuth {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry_hours: u64,
}

impl std::fmt::Debug for JwtAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtAuth").field("expiry_hours", &self.expiry_hours).finish()
    }
}

impl JwtAuth {
    pub fn new(secret: &str, expiry_hours: u64) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::MissingSecret);
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiry_hours,
        })
    }

    pub fn from_config(config: &SecurityConfig) -> Result<Self, JwtError> {
        Self::new(&config.jwt_secret, config.jwt_expiry_hours)
    }

    /// Mint a token for `user_id` valid for the configured number of hours
    pub fn issue(&self, user_id: Uuid) -> Result<String, JwtError> {
        self.issue_for(user_id, self.expiry_hours)
    }

    pub fn issue_for(&self, user_id: Uuid, hours: u64) -> Result<String, JwtError> {
        let claims = Claims::new(user_id, hours)?;
        encode(&Header::default(), &claims, &self.encoding).map_err(JwtError::Encode)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid(e.to_string()),
            })
    }

    /// Pull the bearer token out of an `Authorization` header value
    pub fn bearer_token(header: Option<&str>) -> Result<&str, JwtError> {
        let header = header.ok_or(JwtError::MissingToken)?;
        match header.strip_prefix("Bearer ") {
            Some(token) if !token.trim().is_empty() => Ok(token.trim()),
            _ => Err(JwtError::MalformedHeader),
        }
    }
}
