//! Update Discount Code Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use rigenerato_app::domain::discounts::data::DiscountCodeUpdate;

use crate::{
    discount_codes::{
        errors::into_status_error,
        handlers::{DiscountCodeFields, DiscountCodeRequest, DiscountCodeResponse},
    },
    extensions::*,
    state::State,
};

/// Update Discount Code Handler
///
/// The redemption counter is left untouched.
#[endpoint(
    tags("discount-codes"),
    summary = "Update Discount Code",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Discount code updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Discount code not found"),
        (status_code = StatusCode::CONFLICT, description = "Code already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    json: JsonBody<DiscountCodeRequest>,
    depot: &mut Depot,
) -> Result<Json<DiscountCodeResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let fields = DiscountCodeFields::try_from(json.into_inner())?;

    let code = state
        .app
        .discounts
        .update_discount_code(
            uuid.into_inner().into(),
            DiscountCodeUpdate {
                code: fields.code,
                kind: fields.kind,
                active: fields.active,
                expires_at: fields.expires_at,
                max_redemptions: fields.max_redemptions,
            },
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(DiscountCodeResponse::new(code, &state.currency)))
}
