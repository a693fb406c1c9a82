//! Create Discount Code Handler

use std::sync::Arc;

use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};

use rigenerato_app::domain::discounts::{data::NewDiscountCode, records::DiscountCodeUuid};

use crate::{
    discount_codes::{
        errors::into_status_error,
        handlers::{DiscountCodeFields, DiscountCodeRequest, DiscountCodeResponse},
    },
    extensions::*,
    state::State,
};

/// Create Discount Code Handler
#[endpoint(
    tags("discount-codes"),
    summary = "Create Discount Code",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Discount code created"),
        (status_code = StatusCode::CONFLICT, description = "Code already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<DiscountCodeRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<DiscountCodeResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let fields = DiscountCodeFields::try_from(json.into_inner())?;

    let code = state
        .app
        .discounts
        .create_discount_code(NewDiscountCode {
            uuid: DiscountCodeUuid::new(),
            code: fields.code,
            kind: fields.kind,
            active: fields.active,
            expires_at: fields.expires_at,
            max_redemptions: fields.max_redemptions,
        })
        .await
        .map_err(into_status_error)?;

    res.add_header(
        LOCATION,
        format!("/admin/discount-codes/{}", code.uuid),
        true,
    )
    .or_500("failed to set location header")?
    .status_code(StatusCode::CREATED);

    tracing::info!(discount_code_uuid = %code.uuid, code = %code.code, "created discount code");

    Ok(Json(DiscountCodeResponse::new(code, &state.currency)))
}
