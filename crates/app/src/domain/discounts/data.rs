//! Discount Codes Data

use jiff::Timestamp;
use rigenerato::discounts::{Discount, DiscountError};

use crate::domain::discounts::records::DiscountCodeUuid;

/// What a code takes off an order. Exactly one form applies per code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountKind {
    /// Percentage points, `1..=100`.
    PercentOff(u8),

    /// Fixed amount in minor units.
    AmountOff(u64),
}

impl DiscountKind {
    /// Convert into the pricing representation.
    ///
    /// # Errors
    ///
    /// Returns an error when the percentage is outside `1..=100`.
    pub fn discount(self) -> Result<Discount, DiscountError> {
        match self {
            Self::PercentOff(points) => Discount::percent_off(points),
            Self::AmountOff(amount) => Ok(Discount::amount_off(amount)),
        }
    }
}

/// New Discount Code Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewDiscountCode {
    pub uuid: DiscountCodeUuid,
    pub code: String,
    pub kind: DiscountKind,
    pub active: bool,
    pub expires_at: Option<Timestamp>,
    pub max_redemptions: Option<u32>,
}

/// Discount Code Update Data
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountCodeUpdate {
    pub code: String,
    pub kind: DiscountKind,
    pub active: bool,
    pub expires_at: Option<Timestamp>,
    pub max_redemptions: Option<u32>,
}

/// Codes are matched case-insensitively and stored uppercase.
#[must_use]
pub fn normalise_code(code: &str) -> String {
    code.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn normalise_code_trims_and_uppercases() {
        assert_eq!(normalise_code("  summer10 "), "SUMMER10");
    }

    #[test]
    fn percent_kind_converts_to_percent_discount() -> TestResult {
        let discount = DiscountKind::PercentOff(10).discount()?;

        assert_eq!(rigenerato::discounts::discount_amount(10_000, &discount)?, 1_000);

        Ok(())
    }

    #[test]
    fn out_of_range_percent_is_rejected() {
        assert!(DiscountKind::PercentOff(0).discount().is_err());
        assert!(DiscountKind::PercentOff(101).discount().is_err());
    }
}
