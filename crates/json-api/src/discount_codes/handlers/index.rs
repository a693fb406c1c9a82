//! Discount Code Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    discount_codes::{errors::into_status_error, handlers::DiscountCodeResponse},
    extensions::*,
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DiscountCodesResponse {
    pub discount_codes: Vec<DiscountCodeResponse>,
}

/// Discount Code Index Handler
#[endpoint(
    tags("discount-codes"),
    summary = "List Discount Codes",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Discount codes, newest first"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<DiscountCodesResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let codes = state
        .app
        .discounts
        .list_discount_codes()
        .await
        .map_err(into_status_error)?;

    Ok(Json(DiscountCodesResponse {
        discount_codes: codes
            .into_iter()
            .map(|code| DiscountCodeResponse::new(code, &state.currency))
            .collect(),
    }))
}
