// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod auth;
pub mod entries;
pub mod google_identity;
pub mod session;
pub mod users;

pub use auth::{AuthService, LoginOutcome};
pub use entries::EntryService;
pub use google_identity::{GoogleIdentity, GoogleIdentityVerifier, IdentityError};
pub use session::{IssuedSession, SessionClaims, SessionError, SessionTokens};
pub use users::UserService;
