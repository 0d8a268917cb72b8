// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User provisioning from verified Google identities.

use crate::db::Database;
use crate::error::AppError;
use crate::models::User;
use crate::services::GoogleIdentity;
use crate::time_utils::now_utc;

#[derive(Clone)]
pub struct UserService {
    db: Database,
}

impl UserService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Return the user for this identity, creating it on first sign-in.
    ///
    /// Existing users get their name and picture refreshed when Google
    /// reports new non-empty values. Concurrent first logins for one email
    /// resolve to a single user.
    pub async fn find_or_create(&self, identity: &GoogleIdentity) -> Result<User, AppError> {
        if let Some(user) = self.db.get_user_by_email(&identity.email).await? {
            return self.refresh_profile(user, identity).await;
        }

        let user = User::new(
            identity.email.clone(),
            identity.name.clone(),
            identity.picture.clone(),
            now_utc(),
        );
        if self.db.create_user(&user).await? {
            tracing::info!(user_id = %user.id, email = %user.email, "Created user");
            return Ok(user);
        }

        // Lost a race with another first login.
        let existing = self
            .db
            .get_user_by_email(&identity.email)
            .await?
            .ok_or_else(|| {
                AppError::Database(format!(
                    "user {} vanished after create conflict",
                    identity.email
                ))
            })?;
        self.refresh_profile(existing, identity).await
    }

    async fn refresh_profile(
        &self,
        mut user: User,
        identity: &GoogleIdentity,
    ) -> Result<User, AppError> {
        if user.apply_profile(
            identity.name.as_deref(),
            identity.picture.as_deref(),
            now_utc(),
        ) {
            self.db.upsert_user(&user).await?;
            tracing::debug!(user_id = %user.id, "Updated user profile from Google");
        }
        Ok(user)
    }

    /// Profile of the authenticated user.
    pub async fn profile(&self, email: &str, user_id: &str) -> Result<User, AppError> {
        self.db
            .get_user_by_email(email)
            .await?
            .filter(|u| u.id == user_id)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}
