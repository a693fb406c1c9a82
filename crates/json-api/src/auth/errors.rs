//! Auth Errors

use salvo::http::StatusError;
use tracing::error;

use rigenerato_app::auth::{AuthServiceError, PasswordError};

pub(crate) fn into_status_error(error: AuthServiceError) -> StatusError {
    match error {
        AuthServiceError::NotFound => {
            StatusError::unauthorized().brief("Invalid or expired session")
        }
        AuthServiceError::InvalidCredentials => {
            StatusError::unauthorized().brief("Invalid email or password")
        }
        AuthServiceError::AlreadyExists => {
            StatusError::conflict().brief("Email already registered")
        }
        AuthServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid registration payload")
        }
        AuthServiceError::Password(PasswordError::TooShort) => {
            StatusError::bad_request().brief("Password is too short")
        }
        AuthServiceError::Password(PasswordError::Hash(source)) => {
            error!("failed to hash password: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::Token(source) => {
            error!("failed to process session token: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::Sql(source) => {
            error!("auth storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
