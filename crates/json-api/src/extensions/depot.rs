//! Depot helper extensions.

use std::any::Any;

use rigenerato_app::auth::Identity;
use salvo::prelude::{Depot, StatusError};

const IDENTITY_DEPOT_KEY: &str = "identity";

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_identity(&mut self, identity: Identity);

    /// The authenticated caller, if the request carried a valid bearer token.
    fn identity(&self) -> Option<Identity>;

    fn identity_or_401(&self) -> Result<Identity, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_identity(&mut self, identity: Identity) {
        self.insert(IDENTITY_DEPOT_KEY, identity);
    }

    fn identity(&self) -> Option<Identity> {
        self.get::<Identity>(IDENTITY_DEPOT_KEY).ok().copied()
    }

    fn identity_or_401(&self) -> Result<Identity, StatusError> {
        self.identity()
            .ok_or_else(|| StatusError::unauthorized().brief("Authentication required"))
    }
}
