//! Cart Lines

use thiserror::Error;

/// Errors raised while totalling cart lines.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// A line subtotal or the cart subtotal does not fit in a `u64`.
    #[error("cart amount overflowed")]
    Overflow,
}

/// A single cart line: a unit price in minor units and a quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine {
    /// Unit price in minor units
    pub unit_price: u64,

    /// Number of units
    pub quantity: u32,
}

impl CartLine {
    /// Creates a new cart line.
    pub fn new(unit_price: u64, quantity: u32) -> Self {
        Self {
            unit_price,
            quantity,
        }
    }

    /// Unit price multiplied by quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Overflow`] if the product does not fit in a `u64`.
    pub fn subtotal(&self) -> Result<u64, CartError> {
        line_subtotal(self)
    }
}

/// Unit price multiplied by quantity.
///
/// # Errors
///
/// Returns [`CartError::Overflow`] if the product does not fit in a `u64`.
pub fn line_subtotal(line: &CartLine) -> Result<u64, CartError> {
    line.unit_price
        .checked_mul(u64::from(line.quantity))
        .ok_or(CartError::Overflow)
}

/// Sum of every line subtotal. An empty cart totals zero.
///
/// # Errors
///
/// Returns [`CartError::Overflow`] if any line or the running sum overflows.
pub fn cart_subtotal(lines: &[CartLine]) -> Result<u64, CartError> {
    lines.iter().try_fold(0_u64, |acc, line| {
        acc.checked_add(line_subtotal(line)?)
            .ok_or(CartError::Overflow)
    })
}
