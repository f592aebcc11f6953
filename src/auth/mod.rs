use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AuthConfig;

/// Claims carried by identity-provider session tokens. Only `sub` is used
/// as the caller identity; the rest is validated by `jsonwebtoken`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
}

impl Claims {
    pub fn new(sub: impl Into<String>, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: sub.into(),
            exp,
            iat: now.timestamp(),
            iss: None,
            sid: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("JWT verification key not configured")]
    MissingKey,

    #[error("Invalid JWT public key: {0}")]
    InvalidKey(String),

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),

    #[error("Token has no subject")]
    MissingSubject,

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
}

/// Resolves a bearer credential to the caller's external identity id
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<String, AuthError>;
}

/// Local JWT verification: RS256 against the provider's public key when
/// one is configured, HS256 against the shared secret otherwise.
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        let (key, algorithm) = match &config.jwt_public_key {
            Some(pem) => (
                DecodingKey::from_rsa_pem(pem.as_bytes())
                    .map_err(|e| AuthError::InvalidKey(e.to_string()))?,
                Algorithm::RS256,
            ),
            None if !config.jwt_secret.is_empty() => (
                DecodingKey::from_secret(config.jwt_secret.as_bytes()),
                Algorithm::HS256,
            ),
            None => return Err(AuthError::MissingKey),
        };

        let mut validation = Validation::new(algorithm);
        validation.leeway = config.jwt_leeway_secs;
        if let Some(issuer) = &config.jwt_issuer {
            validation.set_issuer(&[issuer.as_str()]);
        }

        Ok(Self { key, validation })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let token_data = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        Ok(token_data.claims)
    }
}

#[async_trait]
impl IdentityVerifier for JwtVerifier {
    async fn resolve(&self, token: &str) -> Result<String, AuthError> {
        let claims = self.verify(token)?;
        if claims.sub.trim().is_empty() {
            return Err(AuthError::MissingSubject);
        }
        Ok(claims.sub)
    }
}

/// Mint an HS256 token for local development and tests
pub fn generate_jwt(secret: &str, claims: &Claims) -> Result<String, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::MissingKey);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
}
