// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session tokens (HS256 JWTs) minted after Google sign-in.

use crate::config::Config;
use crate::models::User;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Allowed clock difference for `iat` in the future.
const CLOCK_SKEW_SECS: i64 = 60;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    /// Subject (user email)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "fullName", default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(rename = "pictureUrl", default, skip_serializing_if = "Option::is_none")]
    pub picture_url: Option<String>,
}

/// A freshly minted session token.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("malformed or badly signed token: {0}")]
    Malformed(String),
    #[error("token expired")]
    Expired,
    #[error("token older than the maximum session age")]
    Stale,
    #[error("token issued in the future")]
    IssuedInFuture,
}

/// Issues and verifies session tokens with the configured signing key.
#[derive(Clone)]
pub struct SessionTokens {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
    max_age: Duration,
}

impl SessionTokens {
    pub fn new(signing_key: &[u8], ttl: Duration, max_age: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(signing_key),
            decoding_key: DecodingKey::from_secret(signing_key),
            ttl,
            max_age,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.jwt_signing_key,
            config.session_ttl,
            config.max_session_age,
        )
    }

    /// Lifetime of newly issued tokens.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Create a JWT for a user session.
    pub fn issue(&self, user: &User) -> anyhow::Result<IssuedSession> {
        self.issue_at(user, Utc::now())
    }

    pub fn issue_at(&self, user: &User, now: DateTime<Utc>) -> anyhow::Result<IssuedSession> {
        let expires_at = now + self.ttl;
        let claims = SessionClaims {
            sub: user.email.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            user_id: user.id.clone(),
            full_name: user.full_name.clone(),
            picture_url: user.picture_url.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;

        Ok(IssuedSession {
            token,
            issued_at: now,
            expires_at,
        })
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims, SessionError> {
        self.verify_at(token, Utc::now())
    }

    /// Check signature and freshness as of `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, SessionError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        // Expiry is checked below against the supplied clock.
        validation.validate_exp = false;
        validation.leeway = 0;

        let claims = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| SessionError::Malformed(e.to_string()))?
            .claims;

        let now = now.timestamp();
        if claims.exp < now {
            return Err(SessionError::Expired);
        }
        if claims.iat > now + CLOCK_SKEW_SECS {
            return Err(SessionError::IssuedInFuture);
        }
        if now - claims.iat > self.max_age.num_seconds() {
            return Err(SessionError::Stale);
        }

        Ok(claims)
    }
}
