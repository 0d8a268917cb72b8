// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reflectly: a personal journaling backend.
//!
//! Users sign in with a Google ID token, receive a session token, and
//! manage journal entries that are only ever visible to their owner.

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Database;
use services::{AuthService, EntryService, GoogleIdentityVerifier, SessionTokens, UserService};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub sessions: SessionTokens,
    pub auth: AuthService,
    pub users: UserService,
    pub entries: EntryService,
}

impl AppState {
    /// Wire services together from their leaf dependencies.
    pub fn new(
        config: Config,
        db: Database,
        identity_verifier: Arc<GoogleIdentityVerifier>,
    ) -> Self {
        let sessions = SessionTokens::from_config(&config);
        let users = UserService::new(db.clone());
        let entries = EntryService::new(db.clone());
        let auth = AuthService::new(identity_verifier, users.clone(), sessions.clone());

        Self {
            config,
            db,
            sessions,
            auth,
            users,
            entries,
        }
    }
}
