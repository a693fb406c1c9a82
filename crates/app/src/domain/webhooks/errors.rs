//! Webhook handling errors.

use thiserror::Error;

use crate::domain::orders::OrdersServiceError;

/// Failures that should make the vendor retry delivery.
#[derive(Debug, Error)]
pub enum WebhooksServiceError {
    #[error("order could not be recorded")]
    Orders(#[from] OrdersServiceError),
}
