//! Auth service.

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use mockall::automock;
use tracing::{info, warn};

use crate::{
    auth::{
        AuthServiceError, Credentials, Identity, IssuedSession, NewSession, Registration,
        SessionKey, SessionRecord, SessionTokenVersion, SessionUuid, build_verifier_input,
        format_session_token, generate_session_secret, hash_password, parse_session_token,
        repository::PgSessionsRepository, verify_password,
    },
    database::Db,
    domain::users::{
        data::{NewUser, UserRole, normalise_email},
        records::{UserRecord, UserUuid},
        repository::PgUsersRepository,
    },
};

/// Default lifetime of a login session.
pub const DEFAULT_SESSION_TTL: SignedDuration = SignedDuration::from_hours(24 * 7);

/// Session signing and lifetime settings.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub key: SessionKey,
    pub session_ttl: SignedDuration,
}

impl AuthSettings {
    #[must_use]
    pub fn new(key: SessionKey) -> Self {
        Self {
            key,
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }

    #[must_use]
    pub fn with_session_ttl(mut self, session_ttl: SignedDuration) -> Self {
        self.session_ttl = session_ttl;
        self
    }
}

#[derive(Debug, Clone)]
pub struct PgAuthService {
    db: Db,
    users: PgUsersRepository,
    sessions: PgSessionsRepository,
    settings: AuthSettings,
}

impl PgAuthService {
    #[must_use]
    pub fn new(db: Db, settings: AuthSettings) -> Self {
        Self {
            sessions: PgSessionsRepository::new(db.pool().clone()),
            users: PgUsersRepository::new(),
            db,
            settings,
        }
    }

    /// Create a user with the given role.
    ///
    /// # Errors
    ///
    /// Returns an error if the password is too short, the email is taken or
    /// the database insert fails.
    #[tracing::instrument(
        name = "auth.service.create_user",
        skip(self, registration),
        fields(role = %role, user_uuid = tracing::field::Empty),
        err
    )]
    pub async fn create_user(
        &self,
        registration: Registration,
        role: UserRole,
    ) -> Result<UserRecord, AuthServiceError> {
        let email = normalise_email(&registration.email);
        let name = registration.name.trim().to_string();

        if email.is_empty() || !email.contains('@') || name.is_empty() {
            return Err(AuthServiceError::InvalidData);
        }

        let password_hash = hash_password(&registration.password)?;

        let mut tx = self.db.begin().await?;

        let user = self
            .users
            .create_user(
                &mut tx,
                &NewUser {
                    uuid: UserUuid::new(),
                    email,
                    name,
                    password_hash,
                    role,
                },
            )
            .await?;

        tx.commit().await?;

        tracing::Span::current().record("user_uuid", tracing::field::display(user.uuid));

        info!("user created");

        Ok(user)
    }

    /// Issue a new session token for the given user.
    ///
    /// # Errors
    ///
    /// Returns an error if HMAC computation or database insertion fails.
    pub async fn issue_session(&self, user: UserUuid) -> Result<IssuedSession, AuthServiceError> {
        let session_uuid = SessionUuid::new();
        let version = SessionTokenVersion::V1;
        let secret = generate_session_secret();
        let token = format_session_token(session_uuid.into_uuid(), version, &secret);

        let verifier_input =
            build_verifier_input(&session_uuid.into_uuid(), version, &user, &secret);

        let token_hash = self.settings.key.hash(&verifier_input)?;

        let expires_at = Timestamp::now()
            .checked_add(self.settings.session_ttl)
            .map_err(|_overflow| AuthServiceError::InvalidData)?;

        let session = self
            .sessions
            .create_session(&NewSession {
                uuid: session_uuid,
                user_uuid: user,
                version,
                token_hash,
                expires_at,
            })
            .await?;

        Ok(IssuedSession { token, session })
    }

    /// List all sessions for the given user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_sessions(
        &self,
        user: UserUuid,
    ) -> Result<Vec<SessionRecord>, AuthServiceError> {
        self.sessions
            .list_sessions_by_user(user)
            .await
            .map_err(AuthServiceError::from)
    }

    /// Revoke a session by UUID. Returns `true` if the session was active.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn revoke_session(&self, session: SessionUuid) -> Result<bool, AuthServiceError> {
        self.sessions
            .revoke_session(session)
            .await
            .map(|record| record.is_some())
            .map_err(AuthServiceError::from)
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn register(&self, registration: Registration) -> Result<UserRecord, AuthServiceError> {
        self.create_user(registration, UserRole::Customer).await
    }

    #[tracing::instrument(
        name = "auth.service.login",
        skip(self, credentials),
        fields(user_uuid = tracing::field::Empty),
        err
    )]
    async fn login(&self, credentials: Credentials) -> Result<IssuedSession, AuthServiceError> {
        let email = normalise_email(&credentials.email);

        let mut tx = self.db.begin().await?;

        let stored = self
            .users
            .find_credentials_by_email(&mut tx, &email)
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        tx.commit().await?;

        if !verify_password(&credentials.password, &stored.password_hash)? {
            warn!("login rejected: wrong password");

            return Err(AuthServiceError::InvalidCredentials);
        }

        tracing::Span::current().record("user_uuid", tracing::field::display(stored.uuid));

        let issued = self.issue_session(stored.uuid).await?;

        info!(session_uuid = %issued.session.uuid, "session issued");

        Ok(issued)
    }

    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Identity, AuthServiceError> {
        let parsed_token =
            parse_session_token(bearer_token).map_err(|_malformed| AuthServiceError::NotFound)?;

        let session = self
            .sessions
            .find_active_session(parsed_token.session_uuid, parsed_token.version)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        if session.version != parsed_token.version {
            return Err(AuthServiceError::NotFound);
        }

        let verifier_input = build_verifier_input(
            &parsed_token.session_uuid,
            parsed_token.version,
            &session.user_uuid,
            &parsed_token.secret,
        );

        if !self.settings.key.verify(&verifier_input, &session.token_hash)? {
            return Err(AuthServiceError::NotFound);
        }

        // Best-effort metadata update; auth success should not depend on this write.
        let _touch_result = self
            .sessions
            .touch_last_used(parsed_token.session_uuid)
            .await;

        Ok(Identity {
            user: session.user_uuid,
            role: session.role,
            session: SessionUuid::from_uuid(parsed_token.session_uuid),
        })
    }

    async fn logout(&self, bearer_token: &str) -> Result<(), AuthServiceError> {
        let identity = self.authenticate_bearer(bearer_token).await?;

        if !self.revoke_session(identity.session).await? {
            return Err(AuthServiceError::NotFound);
        }

        info!(session_uuid = %identity.session, "session revoked");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new customer account.
    async fn register(&self, registration: Registration) -> Result<UserRecord, AuthServiceError>;

    /// Exchange an email and password for a session token.
    async fn login(&self, credentials: Credentials) -> Result<IssuedSession, AuthServiceError>;

    /// Resolve a bearer token into the identity of its owner.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Identity, AuthServiceError>;

    /// Revoke the session the bearer token belongs to.
    async fn logout(&self, bearer_token: &str) -> Result<(), AuthServiceError>;
}
