//! Access token issuing and verification.
//!
//! Tokens are HS256 JWTs over the caller-supplied identity payload plus
//! `iat`/`exp`. Verification holds no state: the outcome depends only on the
//! token, the shared secret and the clock.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::models::Extra;

/// The identity a token speaks for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Identity {
    pub fn new(email: impl Into<String>) -> Self {
        Identity {
            email: email.into(),
            extra: Extra::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(flatten)]
    pub identity: Identity,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        TokenKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn issue(&self, identity: Identity) -> Result<String, ApiError> {
        self.issue_at(identity, Utc::now())
    }

    pub fn issue_at(&self, mut identity: Identity, now: DateTime<Utc>) -> Result<String, ApiError> {
        identity.extra.remove("iat");
        identity.extra.remove("exp");
        let claims = Claims {
            identity,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(ApiError::TokenIssue)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| ApiError::InvalidToken(e.to_string()))
    }
}

/// Pulls the token out of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
