//! Order By Session Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use crate::{
    extensions::*,
    orders::{errors::into_status_error, handlers::OrderResponse},
    state::State,
};

/// Order By Session Handler
///
/// Confirmation page lookup after the hosted payment page redirects back.
/// Returns 404 until the payment webhook has been processed.
#[endpoint(
    tags("orders"),
    summary = "Get Order By Checkout Session",
    responses(
        (status_code = StatusCode::OK, description = "Order found"),
        (status_code = StatusCode::NOT_FOUND, description = "No order for this session yet"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    session_id: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let order = state
        .app
        .orders
        .get_order_by_session(&session_id.into_inner())
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}
