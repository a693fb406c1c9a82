//! Update Shipping Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rigenerato_app::domain::orders::data::{ShippingStatus, ShippingUpdate};

use crate::{
    extensions::*,
    orders::{errors::into_status_error, handlers::OrderResponse},
    state::State,
};

/// Update Shipping Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ShippingRequest {
    /// One of `pending`, `processing`, `shipped`, `delivered`, `cancelled`
    pub status: String,
    pub tracking_number: Option<String>,
}

impl TryFrom<ShippingRequest> for ShippingUpdate {
    type Error = StatusError;

    fn try_from(request: ShippingRequest) -> Result<Self, Self::Error> {
        Ok(ShippingUpdate {
            status: request
                .status
                .parse::<ShippingStatus>()
                .or_400("Unknown shipping status")?,
            tracking_number: request
                .tracking_number
                .map(|number| number.trim().to_string())
                .filter(|number| !number.is_empty()),
        })
    }
}

/// Update Shipping Handler
#[endpoint(
    tags("orders"),
    summary = "Update Shipping Status",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Shipping updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.update_shipping",
    skip(uuid, json, depot),
    fields(order_uuid = tracing::field::Empty, status = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    json: JsonBody<ShippingRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let uuid = uuid.into_inner();
    let update = ShippingUpdate::try_from(json.into_inner())?;

    let span = tracing::Span::current();

    span.record("order_uuid", tracing::field::display(uuid));
    span.record("status", update.status.as_str());

    let order = state
        .app
        .orders
        .update_shipping(uuid.into(), update)
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}
