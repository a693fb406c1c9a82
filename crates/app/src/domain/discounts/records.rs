//! Discount Code Records

use jiff::Timestamp;

use crate::{
    domain::discounts::{data::DiscountKind, errors::DiscountsServiceError},
    uuids::TypedUuid,
};

/// Discount Code UUID
pub type DiscountCodeUuid = TypedUuid<DiscountCodeRecord>;

/// Discount Code Record
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountCodeRecord {
    pub uuid: DiscountCodeUuid,
    pub code: String,
    pub kind: DiscountKind,
    pub active: bool,
    pub expires_at: Option<Timestamp>,
    pub max_redemptions: Option<u32>,
    pub times_redeemed: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl DiscountCodeRecord {
    /// Check whether the code may be applied to a new checkout at `now`.
    ///
    /// # Errors
    ///
    /// Returns `Inactive`, `Expired` or `Exhausted` in that order of precedence.
    pub fn ensure_redeemable(&self, now: Timestamp) -> Result<(), DiscountsServiceError> {
        if !self.active {
            return Err(DiscountsServiceError::Inactive);
        }

        if self.expires_at.is_some_and(|expires_at| expires_at <= now) {
            return Err(DiscountsServiceError::Expired);
        }

        if self
            .max_redemptions
            .is_some_and(|max| self.times_redeemed >= max)
        {
            return Err(DiscountsServiceError::Exhausted);
        }

        Ok(())
    }
}
