//! Discount Code Handlers

pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod index;
pub(crate) mod show;
pub(crate) mod update;

use jiff::Timestamp;
use salvo::{http::StatusError, oapi::ToSchema};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rigenerato_app::domain::discounts::{data::DiscountKind, records::DiscountCodeRecord};

use crate::{extensions::*, money::display_amount};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DiscountCodeResponse {
    pub uuid: Uuid,
    pub code: String,
    pub percent_off: Option<u8>,
    /// Fixed amount in minor units
    pub amount_off: Option<u64>,
    pub amount_off_display: Option<String>,
    pub active: bool,
    pub expires_at: Option<String>,
    pub max_redemptions: Option<u32>,
    pub times_redeemed: u32,
    pub created_at: String,
    pub updated_at: String,
}

impl DiscountCodeResponse {
    pub(crate) fn new(code: DiscountCodeRecord, currency: &str) -> Self {
        let (percent_off, amount_off) = match code.kind {
            DiscountKind::PercentOff(points) => (Some(points), None),
            DiscountKind::AmountOff(amount) => (None, Some(amount)),
        };

        DiscountCodeResponse {
            uuid: code.uuid.into_uuid(),
            code: code.code,
            percent_off,
            amount_off,
            amount_off_display: amount_off.map(|amount| display_amount(amount, currency)),
            active: code.active,
            expires_at: code.expires_at.map(|at| at.to_string()),
            max_redemptions: code.max_redemptions,
            times_redeemed: code.times_redeemed,
            created_at: code.created_at.to_string(),
            updated_at: code.updated_at.to_string(),
        }
    }
}

/// Discount code create and update payload. Exactly one of `percent_off` and
/// `amount_off` must be set.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DiscountCodeRequest {
    pub code: String,
    pub percent_off: Option<u8>,
    pub amount_off: Option<u64>,
    #[serde(default = "active_by_default")]
    pub active: bool,
    /// RFC 3339 timestamp
    pub expires_at: Option<String>,
    pub max_redemptions: Option<u32>,
}

fn active_by_default() -> bool {
    true
}

/// Validated fields shared by create and update.
#[derive(Debug)]
pub(crate) struct DiscountCodeFields {
    pub code: String,
    pub kind: DiscountKind,
    pub active: bool,
    pub expires_at: Option<Timestamp>,
    pub max_redemptions: Option<u32>,
}

impl TryFrom<DiscountCodeRequest> for DiscountCodeFields {
    type Error = StatusError;

    fn try_from(request: DiscountCodeRequest) -> Result<Self, Self::Error> {
        let kind = match (request.percent_off, request.amount_off) {
            (Some(points), None) => DiscountKind::PercentOff(points),
            (None, Some(amount)) if amount > 0 => DiscountKind::AmountOff(amount),
            (None, Some(_)) => {
                return Err(StatusError::bad_request().brief("amount_off must be positive"));
            }
            _ => {
                return Err(StatusError::bad_request()
                    .brief("Exactly one of percent_off and amount_off is required"));
            }
        };

        kind.discount().or_400("percent_off must be between 1 and 100")?;

        let expires_at = request
            .expires_at
            .map(|value| value.parse::<Timestamp>())
            .transpose()
            .or_400("could not parse \"expires_at\"")?;

        Ok(DiscountCodeFields {
            code: request.code,
            kind,
            active: request.active,
            expires_at,
            max_redemptions: request.max_redemptions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(percent_off: Option<u8>, amount_off: Option<u64>) -> DiscountCodeRequest {
        DiscountCodeRequest {
            code: "SPRING10".to_string(),
            percent_off,
            amount_off,
            active: true,
            expires_at: None,
            max_redemptions: None,
        }
    }

    #[test]
    fn percent_request_becomes_percent_kind() {
        let fields = DiscountCodeFields::try_from(request(Some(10), None)).ok();

        assert_eq!(fields.map(|f| f.kind), Some(DiscountKind::PercentOff(10)));
    }

    #[test]
    fn both_forms_are_rejected() {
        assert!(DiscountCodeFields::try_from(request(Some(10), Some(500))).is_err());
    }

    #[test]
    fn neither_form_is_rejected() {
        assert!(DiscountCodeFields::try_from(request(None, None)).is_err());
    }

    #[test]
    fn percent_above_hundred_is_rejected() {
        assert!(DiscountCodeFields::try_from(request(Some(120), None)).is_err());
    }

    #[test]
    fn zero_amount_is_rejected() {
        assert!(DiscountCodeFields::try_from(request(None, Some(0))).is_err());
    }

    #[test]
    fn expiry_is_parsed() {
        let mut request = request(None, Some(1_500));

        request.expires_at = Some("2026-12-31T23:00:00Z".to_string());

        let fields = DiscountCodeFields::try_from(request).ok();

        assert_eq!(
            fields.and_then(|f| f.expires_at).map(|at| at.as_second()),
            Some(1_798_758_000)
        );
    }
}
