//! Payment Webhooks

pub mod errors;
pub mod events;
pub mod service;

pub use errors::WebhooksServiceError;
pub use service::*;
