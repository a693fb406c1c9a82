//! Discounts

use std::fmt;

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use thiserror::Error;

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscountError {
    /// Percent points must be between 1 and 100.
    #[error("percent off must be between 1 and 100, got {0}")]
    InvalidPercent(u8),

    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed")]
    PercentConversion,
}

/// A discount code's effect on a cart subtotal.
#[derive(Clone, Copy, PartialEq)]
pub enum Discount {
    /// Multiply the subtotal by a percentage and take that off.
    PercentOff(Percentage),

    /// Take a fixed amount in minor units off the subtotal.
    AmountOff(u64),
}

impl Discount {
    /// Build a percentage discount from whole percent points (`25` is 25% off).
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::InvalidPercent`] for `0` or anything above `100`.
    pub fn percent_off(points: u8) -> Result<Self, DiscountError> {
        if points == 0 || points > 100 {
            return Err(DiscountError::InvalidPercent(points));
        }

        Ok(Self::PercentOff(Percentage::from(Decimal::new(
            i64::from(points),
            2,
        ))))
    }

    /// Build a fixed amount discount.
    pub fn amount_off(amount: u64) -> Self {
        Self::AmountOff(amount)
    }
}

impl fmt::Debug for Discount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discount::PercentOff(p) => f
                .debug_tuple("PercentOff")
                .field(&(*p * Decimal::ONE_HUNDRED))
                .finish(),
            Discount::AmountOff(amount) => f.debug_tuple("AmountOff").field(amount).finish(),
        }
    }
}

/// Calculates how much a discount takes off a subtotal.
///
/// Percentages are rounded half away from zero to the nearest minor unit. The
/// result never exceeds the subtotal, so a discount cannot push a total below zero.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the percentage cannot be
/// represented in minor units.
pub fn discount_amount(subtotal: u64, discount: &Discount) -> Result<u64, DiscountError> {
    let amount = match discount {
        Discount::PercentOff(percent) => percent_of_minor(percent, subtotal)?,
        Discount::AmountOff(amount) => *amount,
    };

    Ok(amount.min(subtotal))
}

/// Calculate a percentage of a minor unit amount, rounded to whole minor units.
pub(crate) fn percent_of_minor(percent: &Percentage, minor: u64) -> Result<u64, DiscountError> {
    let applied = *percent * Decimal::from(minor);

    let rounded = applied.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    rounded.to_u64().ok_or(DiscountError::PercentConversion)
}
