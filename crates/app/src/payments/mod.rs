//! Hosted payment vendor integration.

mod gateway;
mod signature;
mod stripe;

pub use gateway::*;
pub use signature::*;
pub use stripe::*;
