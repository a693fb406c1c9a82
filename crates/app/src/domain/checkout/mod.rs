//! Cart pricing and hosted checkout.

pub mod data;
pub mod digest;
pub mod errors;
pub mod service;

pub use errors::CheckoutServiceError;
pub use service::*;
