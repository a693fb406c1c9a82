//! Shop Domain Concerns

pub mod categories;
pub mod checkout;
pub mod discounts;
pub mod orders;
pub mod products;
pub mod users;
pub mod webhooks;
