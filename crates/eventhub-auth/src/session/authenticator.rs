//! Session authentication.
//!
//! A request's credential token is verified and checked against the
//! revocation list at the same time. Only when both agree is the token's
//! subject looked up and attached as the session identity.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use eventhub_core::config::AuthConfig;
use eventhub_core::result::AppResult;
use eventhub_database::{IdentityStore, RevocationStore};
use eventhub_entity::user::User;

use crate::error::AuthError;
use crate::jwt::encoder::token_lifetime;
use crate::jwt::{Claims, IssuedToken, JwtDecoder, JwtEncoder, verification_grace};

/// Whether a route insists on an authenticated caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthPolicy {
    /// Authentication failures reject the request.
    #[default]
    Required,
    /// Authentication failures fall through as an anonymous caller.
    Optional,
}

/// Outcome of a successful authentication attempt.
#[derive(Debug, Clone)]
pub enum Authentication {
    /// The token resolved to a session.
    Authenticated(Session),
    /// No usable token under [`AuthPolicy::Optional`].
    Anonymous,
}

impl Authentication {
    /// The session, if any.
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Authenticated(session) => Some(session),
            Self::Anonymous => None,
        }
    }

    /// Consume into the session, if any.
    pub fn into_session(self) -> Option<Session> {
        match self {
            Self::Authenticated(session) => Some(session),
            Self::Anonymous => None,
        }
    }
}

/// An authenticated caller.
#[derive(Debug, Clone)]
pub struct Session {
    /// The raw token that produced this session.
    pub token: String,
    /// Verified claims.
    pub claims: Claims,
    /// The identity behind `claims.sub`. `None` when the user has since
    /// been deleted and orphaned tokens are tolerated.
    pub user: Option<User>,
}

impl Session {
    /// Subject of the token.
    pub fn user_id(&self) -> Uuid {
        self.claims.sub
    }
}

/// Turns credential tokens into sessions.
#[derive(Debug, Clone)]
pub struct SessionAuthenticator {
    encoder: JwtEncoder,
    decoder: JwtDecoder,
    revocations: Arc<dyn RevocationStore>,
    identities: Arc<dyn IdentityStore>,
    /// How long a revocation record outlives the revoke call.
    retention: Duration,
    reject_orphaned_tokens: bool,
}

impl SessionAuthenticator {
    /// Build an authenticator over the given stores.
    ///
    /// Fails when the auth settings are unusable (no signing secret, or a
    /// token lifetime out of range).
    pub fn new(
        config: &AuthConfig,
        revocations: Arc<dyn RevocationStore>,
        identities: Arc<dyn IdentityStore>,
    ) -> AppResult<Self> {
        config.validate()?;
        Ok(Self {
            encoder: JwtEncoder::new(config)?,
            decoder: JwtDecoder::new(config),
            revocations,
            identities,
            retention: token_lifetime(config)? + verification_grace(),
            reject_orphaned_tokens: config.reject_orphaned_tokens,
        })
    }

    /// Issue a new token for `user_id`.
    pub fn issue(&self, user_id: Uuid) -> AppResult<IssuedToken> {
        self.encoder.issue(user_id)
    }

    /// Resolve `token` under `policy`.
    ///
    /// Store failures are returned as [`AuthError::Store`] regardless of
    /// policy. Under [`AuthPolicy::Optional`] every other failure becomes
    /// [`Authentication::Anonymous`].
    pub async fn authenticate(
        &self,
        token: &str,
        policy: AuthPolicy,
    ) -> Result<Authentication, AuthError> {
        match self.resolve(token).await {
            Ok(session) => Ok(Authentication::Authenticated(session)),
            Err(e) if policy == AuthPolicy::Optional && e.is_authentication_failure() => {
                debug!(reason = %e, "Proceeding without authentication");
                Ok(Authentication::Anonymous)
            }
            Err(e) => Err(e),
        }
    }

    async fn resolve(&self, token: &str) -> Result<Session, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let (verified, revoked) = tokio::join!(
            async { self.decoder.verify(token) },
            self.revocations.is_revoked(token),
        );

        if revoked.map_err(AuthError::Store)? {
            return Err(AuthError::TokenRevoked);
        }
        let claims = verified?;

        let user = self
            .identities
            .find_by_id(claims.sub)
            .await
            .map_err(AuthError::Store)?;

        if user.is_none() {
            if self.reject_orphaned_tokens {
                return Err(AuthError::IdentityNotFound);
            }
            warn!(user_id = %claims.sub, "Valid token for a user that no longer exists");
        }

        Ok(Session {
            token: token.to_string(),
            claims,
            user,
        })
    }

    /// Add `token` to the revocation list.
    ///
    /// Expired, malformed and already-revoked tokens are accepted. The
    /// record is kept until the token can no longer pass verification.
    pub async fn revoke(&self, token: &str) -> AppResult<()> {
        if token.is_empty() {
            return Ok(());
        }
        let expires_at = self.retain_until(token, Utc::now());
        self.revocations.revoke(token, expires_at).await?;
        debug!(%expires_at, "Token revoked");
        Ok(())
    }

    /// End of retention for a record revoked at `now`: a full token
    /// lifetime plus the verification grace, or the token's own
    /// `exp` plus grace when that is later.
    fn retain_until(&self, token: &str, now: DateTime<Utc>) -> DateTime<Utc> {
        let by_lifetime = now
            .checked_add_signed(self.retention)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.decoder
            .verify(token)
            .ok()
            .and_then(|claims| DateTime::from_timestamp(claims.exp, 0))
            .and_then(|exp| exp.checked_add_signed(verification_grace()))
            .map_or(by_lifetime, |by_exp| by_exp.max(by_lifetime))
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use eventhub_core::error::{AppError, ErrorKind};
    use eventhub_database::memory::{MemoryIdentityStore, MemoryRevocationStore};
    use eventhub_entity::user::CreateUser;

    use super::*;

    #[derive(Debug)]
    struct UnavailableRevocations;

    #[async_trait]
    impl RevocationStore for UnavailableRevocations {
        async fn is_revoked(&self, _token: &str) -> AppResult<bool> {
            Err(AppError::database("revocation store unreachable"))
        }

        async fn revoke(&self, _token: &str, _expires_at: DateTime<Utc>) -> AppResult<()> {
            Err(AppError::database("revocation store unreachable"))
        }

        async fn purge_expired(&self, _now: DateTime<Utc>) -> AppResult<u64> {
            Err(AppError::database("revocation store unreachable"))
        }
    }

    struct Fixture {
        auth: SessionAuthenticator,
        identities: Arc<MemoryIdentityStore>,
        revocations: Arc<MemoryRevocationStore>,
        config: AuthConfig,
    }

    fn fixture(config: AuthConfig) -> Fixture {
        let identities = Arc::new(MemoryIdentityStore::new());
        let revocations = Arc::new(MemoryRevocationStore::new());
        let auth =
            SessionAuthenticator::new(&config, revocations.clone(), identities.clone()).unwrap();
        Fixture {
            auth,
            identities,
            revocations,
            config,
        }
    }

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "authenticator-test-secret".into(),
            ..AuthConfig::default()
        }
    }

    async fn add_user(store: &MemoryIdentityStore, username: &str) -> User {
        store
            .create(&CreateUser {
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
                username: username.into(),
                password_hash: "hash".into(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_token_resolves_identity() {
        let f = fixture(test_config());
        let user = add_user(&f.identities, "ada").await;
        let token = f.auth.issue(user.id).unwrap().token;

        let result = f.auth.authenticate(&token, AuthPolicy::Required).await.unwrap();
        let session = result.into_session().unwrap();
        assert_eq!(session.user_id(), user.id);
        assert_eq!(session.user, Some(user));
        assert_eq!(session.token, token);
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let f = fixture(test_config());
        let user = add_user(&f.identities, "ada").await;
        let token = JwtEncoder::new(&f.config)
            .unwrap()
            .issue_at(user.id, Utc::now() - Duration::hours(3))
            .unwrap()
            .token;

        let err = f
            .auth
            .authenticate(&token, AuthPolicy::Required)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
    }

    #[tokio::test]
    async fn test_revoked_token_rejected_while_still_valid() {
        let f = fixture(test_config());
        let user = add_user(&f.identities, "ada").await;
        let token = f.auth.issue(user.id).unwrap().token;

        f.auth.revoke(&token).await.unwrap();

        let err = f
            .auth
            .authenticate(&token, AuthPolicy::Required)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::TokenRevoked));
    }

    #[tokio::test]
    async fn test_missing_token() {
        let f = fixture(test_config());

        let err = f
            .auth
            .authenticate("", AuthPolicy::Required)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingToken));

        let anon = f.auth.authenticate("", AuthPolicy::Optional).await.unwrap();
        assert!(anon.session().is_none());
    }

    #[tokio::test]
    async fn test_optional_policy_swallows_bad_token() {
        let f = fixture(test_config());
        let result = f
            .auth
            .authenticate("garbage", AuthPolicy::Optional)
            .await
            .unwrap();
        assert!(matches!(result, Authentication::Anonymous));
    }

    #[tokio::test]
    async fn test_revoke_twice_succeeds() {
        let f = fixture(test_config());
        let token = f.auth.issue(Uuid::new_v4()).unwrap().token;

        f.auth.revoke(&token).await.unwrap();
        f.auth.revoke(&token).await.unwrap();
        assert_eq!(f.revocations.len(), 1);
    }

    #[tokio::test]
    async fn test_revoke_accepts_malformed_token() {
        let f = fixture(test_config());
        f.auth.revoke("definitely-not-a-jwt").await.unwrap();
        assert!(f.revocations.is_revoked("definitely-not-a-jwt").await.unwrap());
    }

    #[tokio::test]
    async fn test_store_failure_is_not_an_auth_failure() {
        let config = test_config();
        let identities = Arc::new(MemoryIdentityStore::new());
        let auth = SessionAuthenticator::new(
            &config,
            Arc::new(UnavailableRevocations),
            identities.clone(),
        )
        .unwrap();
        let user = add_user(&identities, "ada").await;
        let token = auth.issue(user.id).unwrap().token;

        for policy in [AuthPolicy::Required, AuthPolicy::Optional] {
            let err = auth.authenticate(&token, policy).await.unwrap_err();
            assert!(!err.is_authentication_failure());
            let app: AppError = err.into();
            assert_eq!(app.kind, ErrorKind::Database);
        }

        // The store error wins even when the token itself is bad.
        let err = auth
            .authenticate("garbage", AuthPolicy::Optional)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Store(_)));
    }

    #[tokio::test]
    async fn test_orphaned_token_tolerated_by_default() {
        let f = fixture(test_config());
        let user = add_user(&f.identities, "ada").await;
        let token = f.auth.issue(user.id).unwrap().token;
        f.identities.delete(user.id).await.unwrap();

        let session = f
            .auth
            .authenticate(&token, AuthPolicy::Required)
            .await
            .unwrap()
            .into_session()
            .unwrap();
        assert_eq!(session.user_id(), user.id);
        assert!(session.user.is_none());
    }

    #[tokio::test]
    async fn test_orphaned_token_rejected_when_configured() {
        let f = fixture(AuthConfig {
            reject_orphaned_tokens: true,
            ..test_config()
        });
        let token = f.auth.issue(Uuid::new_v4()).unwrap().token;

        let err = f
            .auth
            .authenticate(&token, AuthPolicy::Required)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::IdentityNotFound));

        let anon = f
            .auth
            .authenticate(&token, AuthPolicy::Optional)
            .await
            .unwrap();
        assert!(anon.session().is_none());
    }

    /// Latest instant at which the decoder still accepts a token with `exp`.
    fn last_verifiable_instant(exp: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(exp + crate::jwt::LEEWAY_SECONDS as i64, 999_000_000).unwrap()
    }

    #[tokio::test]
    async fn test_revocation_survives_purge_while_token_verifies() {
        let f = fixture(AuthConfig {
            token_ttl_minutes: 1,
            ..test_config()
        });
        let token = f.auth.issue(Uuid::new_v4()).unwrap().token;
        let claims = JwtDecoder::new(&f.config).verify(&token).unwrap();

        f.auth.revoke(&token).await.unwrap();

        let purged = f
            .revocations
            .purge_expired(last_verifiable_instant(claims.exp))
            .await
            .unwrap();
        assert_eq!(purged, 0);

        let err = f
            .auth
            .authenticate(&token, AuthPolicy::Required)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::TokenRevoked));

        let purged = f
            .revocations
            .purge_expired(Utc::now() + Duration::minutes(2))
            .await
            .unwrap();
        assert_eq!(purged, 1);
    }

    #[tokio::test]
    async fn test_revocation_follows_token_expiry_when_later() {
        let f = fixture(test_config());
        let token = JwtEncoder::new(&f.config)
            .unwrap()
            .issue_at(Uuid::new_v4(), Utc::now() + Duration::minutes(30))
            .unwrap()
            .token;
        let claims = JwtDecoder::new(&f.config).verify(&token).unwrap();

        f.auth.revoke(&token).await.unwrap();

        f.revocations
            .purge_expired(last_verifiable_instant(claims.exp))
            .await
            .unwrap();
        assert!(f.revocations.is_revoked(&token).await.unwrap());
    }

    #[test]
    fn test_missing_secret_rejected_at_construction() {
        let err = SessionAuthenticator::new(
            &AuthConfig::default(),
            Arc::new(MemoryRevocationStore::new()),
            Arc::new(MemoryIdentityStore::new()),
        )
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
