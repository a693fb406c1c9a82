//! Shared test infrastructure.

pub(crate) mod helpers;

pub(crate) use context::TestContext;
pub(crate) use db::TestDb;

/// Server-side session key used by service tests.
pub(crate) const TEST_SESSION_KEY: &[u8] = b"rigenerato-test-session-key";
