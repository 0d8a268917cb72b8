// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google sign-in: ID token in, session token out.

use crate::error::AppError;
use crate::models::User;
use crate::services::{
    GoogleIdentityVerifier, IdentityError, IssuedSession, SessionTokens, UserService,
};
use std::sync::Arc;

/// Result of a successful sign-in.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub session: IssuedSession,
}

#[derive(Clone)]
pub struct AuthService {
    verifier: Arc<GoogleIdentityVerifier>,
    users: UserService,
    sessions: SessionTokens,
}

impl AuthService {
    pub fn new(
        verifier: Arc<GoogleIdentityVerifier>,
        users: UserService,
        sessions: SessionTokens,
    ) -> Self {
        Self {
            verifier,
            users,
            sessions,
        }
    }

    /// Verify a Google ID token, provision the user and mint a session.
    ///
    /// Every identity failure is reported to the caller as 401; the cause
    /// only reaches the logs.
    pub async fn login(&self, id_token: &str) -> Result<LoginOutcome, AppError> {
        let identity = self
            .verifier
            .verify_id_token(id_token)
            .await
            .map_err(|e| {
                match &e {
                    IdentityError::Rejected(reason) => {
                        tracing::warn!(reason = %reason, "Google ID token rejected")
                    }
                    IdentityError::Unavailable(reason) => {
                        tracing::error!(reason = %reason, "Google identity provider unavailable")
                    }
                }
                AppError::Unauthorized
            })?;

        let user = self.users.find_or_create(&identity).await?;
        let session = self.sessions.issue(&user)?;

        tracing::info!(user_id = %user.id, "User signed in");

        Ok(LoginOutcome { user, session })
    }
}
