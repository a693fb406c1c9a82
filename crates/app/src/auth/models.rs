//! Auth data models.

use jiff::Timestamp;

use crate::{
    auth::SessionTokenVersion,
    domain::users::{data::UserRole, records::UserUuid},
    uuids::TypedUuid,
};

/// Session UUID
pub type SessionUuid = TypedUuid<SessionRecord>;

/// Session data used during bearer authentication.
#[derive(Debug, Clone)]
pub(crate) struct ActiveSession {
    /// User that owns this session.
    pub user_uuid: UserUuid,

    /// Role of the owning user at lookup time.
    pub role: UserRole,

    /// Token format/hash version.
    pub version: SessionTokenVersion,

    /// HMAC verifier for the token secret material.
    pub token_hash: String,
}

/// Session metadata persisted in storage.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub uuid: SessionUuid,
    pub user_uuid: UserUuid,
    pub version: SessionTokenVersion,
    pub created_at: Timestamp,
    pub last_used_at: Option<Timestamp>,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
}

/// New session persistence payload.
#[derive(Debug, Clone)]
pub(crate) struct NewSession {
    pub uuid: SessionUuid,
    pub user_uuid: UserUuid,
    pub version: SessionTokenVersion,
    pub token_hash: String,
    pub expires_at: Timestamp,
}

/// Session issuance result with the one-time raw token.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub session: SessionRecord,
}

/// The authenticated caller of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user: UserUuid,
    pub role: UserRole,
    pub session: SessionUuid,
}

impl Identity {
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Registration payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Login payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}
