//! Create Checkout Session Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use rigenerato_app::domain::checkout::data::CheckoutRequest;

use crate::{
    checkout::{
        errors::into_status_error,
        handlers::{CartItemBody, into_cart},
    },
    extensions::*,
    state::State,
};

/// Checkout Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutBody {
    pub items: Vec<CartItemBody>,
    pub discount_code: Option<String>,
    /// Prefills the email field on the payment page
    pub customer_email: Option<String>,
}

/// Checkout Session Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutSessionResponse {
    pub id: String,
    /// Hosted payment page to redirect the customer to
    pub url: String,
}

/// Create Checkout Session Handler
///
/// Prices the cart and opens a hosted payment page. A signed-in customer is
/// attached to the resulting order.
#[endpoint(
    tags("checkout"),
    summary = "Create Checkout Session",
    responses(
        (status_code = StatusCode::CREATED, description = "Session created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Empty cart or invalid quantity"),
        (status_code = StatusCode::NOT_FOUND, description = "Unknown product or discount code"),
        (status_code = StatusCode::CONFLICT, description = "Not enough stock or code not redeemable"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Payment provider unavailable"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "checkout.create_session",
    skip(json, depot, res),
    fields(items = tracing::field::Empty, user_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CheckoutBody>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CheckoutSessionResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.identity().map(|identity| identity.user);
    let request = json.into_inner();

    let span = tracing::Span::current();

    span.record("items", request.items.len());

    if let Some(user) = user {
        span.record("user_uuid", tracing::field::display(user));
    }

    let session = state
        .app
        .checkout
        .create_checkout_session(CheckoutRequest {
            cart: into_cart(request.items, request.discount_code),
            customer_email: request.customer_email,
            user,
        })
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, session.url.as_str(), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(CheckoutSessionResponse {
        id: session.id,
        url: session.url,
    }))
}
