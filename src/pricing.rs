//! Pricing

use thiserror::Error;

use crate::{
    cart::{CartError, CartLine, cart_subtotal},
    discounts::{Discount, DiscountError, discount_amount},
};

/// Errors that can occur while pricing a cart.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// Wrapped cart arithmetic error.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Wrapped discount calculation error.
    #[error(transparent)]
    Discount(#[from] DiscountError),
}

/// Subtotal, discount and total of a cart, all in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    /// Sum of line subtotals
    pub subtotal: u64,

    /// Amount taken off by the discount code
    pub discount: u64,

    /// Amount payable
    pub total: u64,
}

/// Applies an optional discount to a subtotal. The total is floored at zero.
///
/// # Errors
///
/// Returns [`PricingError::Discount`] if the discount amount cannot be computed.
pub fn apply_discount(subtotal: u64, discount: Option<&Discount>) -> Result<Totals, PricingError> {
    let discount = match discount {
        Some(discount) => discount_amount(subtotal, discount)?,
        None => 0,
    };

    Ok(Totals {
        subtotal,
        discount,
        total: subtotal.saturating_sub(discount),
    })
}

/// Prices a set of cart lines with an optional discount.
///
/// # Errors
///
/// - [`PricingError::Cart`]: line or subtotal arithmetic overflowed.
/// - [`PricingError::Discount`]: the discount amount could not be computed.
pub fn price_cart(lines: &[CartLine], discount: Option<&Discount>) -> Result<Totals, PricingError> {
    apply_discount(cart_subtotal(lines)?, discount)
}
