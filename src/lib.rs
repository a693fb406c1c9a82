//! Rigenerato
//!
//! Pricing primitives for the DJ Shop Rigenerato storefront. Amounts are integer
//! minor currency units; they are only turned into decimal strings for display.

pub mod cart;
pub mod discounts;
pub mod money;
pub mod pricing;
