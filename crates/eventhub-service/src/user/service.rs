//! Registration, login, logout and account management.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use eventhub_auth::{IssuedToken, PasswordHasher, SessionAuthenticator};
use eventhub_core::error::AppError;
use eventhub_core::result::AppResult;
use eventhub_database::{EventStore, IdentityStore};
use eventhub_entity::event::Event;
use eventhub_entity::user::{CreateUser, User};

/// Message returned for any failed login, so callers cannot probe usernames.
const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Handles account lifecycle and credential issuance.
#[derive(Debug, Clone)]
pub struct UserService {
    /// User records.
    identities: Arc<dyn IdentityStore>,
    /// Events, for profile relations.
    events: Arc<dyn EventStore>,
    /// Issues and revokes credential tokens.
    authenticator: Arc<SessionAuthenticator>,
    /// Password hasher.
    hasher: PasswordHasher,
}

/// Fields for a new account.
#[derive(Debug, Clone)]
pub struct RegisterUser {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Desired username; normalized before storage.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

/// A user together with a freshly issued credential token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// The account.
    pub user: User,
    /// Token to hand back in the credential cookie.
    pub token: IssuedToken,
}

/// A user with the events they liked and created.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    /// The account.
    #[serde(flatten)]
    pub user: User,
    /// Events the user liked.
    pub liked_events: Vec<Event>,
    /// Events the user created.
    pub created_events: Vec<Event>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        identities: Arc<dyn IdentityStore>,
        events: Arc<dyn EventStore>,
        authenticator: Arc<SessionAuthenticator>,
    ) -> Self {
        Self {
            identities,
            events,
            authenticator,
            hasher: PasswordHasher::new(),
        }
    }

    /// Create an account and sign it in.
    pub async fn register(&self, req: RegisterUser) -> AppResult<AuthenticatedUser> {
        let username = User::normalize_username(&req.username);
        if username.is_empty() {
            return Err(AppError::validation("Username is required"));
        }

        let password_hash = self.hasher.hash_password(&req.password)?;
        let user = self
            .identities
            .create(&CreateUser {
                first_name: req.first_name.trim().to_string(),
                last_name: req.last_name.trim().to_string(),
                username,
                password_hash,
            })
            .await?;

        let token = self.authenticator.issue(user.id)?;
        info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(AuthenticatedUser { user, token })
    }

    /// Check credentials and issue a token.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<AuthenticatedUser> {
        let username = User::normalize_username(username);

        let Some(user) = self.identities.find_by_username(&username).await? else {
            warn!(username = %username, "Login attempt for unknown username");
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        };

        if !self.hasher.verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "Login attempt with wrong password");
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        }

        let token = self.authenticator.issue(user.id)?;
        info!(user_id = %user.id, "User logged in");

        Ok(AuthenticatedUser { user, token })
    }

    /// Revoke `token`. Succeeds for any token, including ones already
    /// revoked, expired or malformed.
    pub async fn logout(&self, token: &str) -> AppResult<()> {
        self.authenticator.revoke(token).await?;
        info!("User logged out");
        Ok(())
    }

    /// Load the profile of `user`.
    pub async fn profile(&self, user: &User) -> AppResult<UserProfile> {
        let (liked_events, created_events) = futures::try_join!(
            self.events.find_liked_by(user.id),
            self.events.find_by_admin(user.id),
        )?;

        Ok(UserProfile {
            user: user.clone(),
            liked_events,
            created_events,
        })
    }

    /// Every registered user.
    pub async fn list(&self) -> AppResult<Vec<User>> {
        self.identities.find_all().await
    }

    /// Delete the account `id`. Returns whether it existed.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let removed = self.identities.delete(id).await?;
        if removed {
            info!(user_id = %id, "User deleted");
        }
        Ok(removed)
    }
}
