//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use eventhub_auth::SessionAuthenticator;
use eventhub_core::config::AppConfig;
use eventhub_core::result::AppResult;
use eventhub_database::Stores;
use eventhub_service::{EventService, UserService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Identity, event and revocation stores
    pub stores: Stores,
    /// Resolves credential cookies into sessions
    pub authenticator: Arc<SessionAuthenticator>,
    /// Account and session use cases
    pub user_service: Arc<UserService>,
    /// Event and like use cases
    pub event_service: Arc<EventService>,
}

impl AppState {
    /// Wire services over `stores`. Fails on unusable auth settings.
    pub fn new(config: AppConfig, stores: Stores) -> AppResult<Self> {
        let authenticator = Arc::new(SessionAuthenticator::new(
            &config.auth,
            Arc::clone(&stores.revocations),
            Arc::clone(&stores.identities),
        )?);
        let user_service = Arc::new(UserService::new(
            Arc::clone(&stores.identities),
            Arc::clone(&stores.events),
            Arc::clone(&authenticator),
        ));
        let event_service = Arc::new(EventService::new(
            Arc::clone(&stores.events),
            Arc::clone(&stores.identities),
        ));

        Ok(Self {
            config: Arc::new(config),
            stores,
            authenticator,
            user_service,
            event_service,
        })
    }
}
