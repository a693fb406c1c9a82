//! Stripe Checkout over the REST API.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::payments::{CheckoutSession, NewCheckoutSession, PaymentGateway, PaymentGatewayError};

/// Production API host.
pub const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com";

#[derive(Clone)]
pub struct StripeGateway {
    client: reqwest::Client,
    api_base: String,
    secret_key: String,
}

impl fmt::Debug for StripeGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StripeGateway")
            .field("api_base", &self.api_base)
            .field("secret_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl StripeGateway {
    #[must_use]
    pub fn new(secret_key: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            secret_key: secret_key.into(),
        }
    }

    async fn post(
        &self,
        path: &str,
        form: &[(String, String)],
    ) -> Result<Value, PaymentGatewayError> {
        let response = self
            .client
            .post(format!("{}{path}", self.api_base))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let error = vendor_error(status.as_u16(), &body);

            warn!(status = status.as_u16(), %error, path, "stripe request rejected");

            return Err(error);
        }

        serde_json::from_str(&body).map_err(|source| {
            warn!(%source, path, "stripe response is not JSON");

            PaymentGatewayError::InvalidResponse("json body")
        })
    }

    /// Create a single-use coupon worth `amount_off` minor units.
    async fn create_coupon(
        &self,
        amount_off: u64,
        currency: &str,
    ) -> Result<String, PaymentGatewayError> {
        let body = self
            .post(
                "/v1/coupons",
                &[
                    ("amount_off".to_string(), amount_off.to_string()),
                    ("currency".to_string(), currency.to_string()),
                    ("duration".to_string(), "once".to_string()),
                    ("max_redemptions".to_string(), "1".to_string()),
                ],
            )
            .await?;

        body["id"]
            .as_str()
            .map(String::from)
            .ok_or(PaymentGatewayError::InvalidResponse("coupon id"))
    }
}

/// Vendor rejection with the message from a JSON error body, if there is one.
fn vendor_error(status: u16, body: &str) -> PaymentGatewayError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|body| body["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| "unknown error".to_string());

    PaymentGatewayError::Vendor { status, message }
}

/// Form fields for `POST /v1/checkout/sessions`.
pub(crate) fn checkout_session_form(
    session: &NewCheckoutSession,
    coupon: Option<&str>,
) -> Vec<(String, String)> {
    let mut form = vec![
        ("mode".to_string(), "payment".to_string()),
        ("success_url".to_string(), session.success_url.clone()),
        ("cancel_url".to_string(), session.cancel_url.clone()),
    ];

    for (index, country) in session.shipping_countries.iter().enumerate() {
        form.push((
            format!("shipping_address_collection[allowed_countries][{index}]"),
            country.clone(),
        ));
    }

    for (index, item) in session.line_items.iter().enumerate() {
        let prefix = format!("line_items[{index}]");

        form.extend([
            (
                format!("{prefix}[price_data][currency]"),
                session.currency.clone(),
            ),
            (
                format!("{prefix}[price_data][unit_amount]"),
                item.unit_amount.to_string(),
            ),
            (
                format!("{prefix}[price_data][product_data][name]"),
                item.name.clone(),
            ),
            (format!("{prefix}[quantity]"), item.quantity.to_string()),
        ]);
    }

    if let Some(coupon) = coupon {
        form.push(("discounts[0][coupon]".to_string(), coupon.to_string()));
    }

    if let Some(email) = &session.customer_email {
        form.push(("customer_email".to_string(), email.clone()));
    }

    for (key, value) in &session.metadata {
        form.push((format!("metadata[{key}]"), value.clone()));
    }

    form
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    #[tracing::instrument(
        name = "payments.stripe.create_checkout_session",
        skip(self, session),
        fields(items = session.line_items.len(), discount = session.discount_amount),
        err
    )]
    async fn create_checkout_session(
        &self,
        session: NewCheckoutSession,
    ) -> Result<CheckoutSession, PaymentGatewayError> {
        let coupon = if session.discount_amount > 0 {
            Some(
                self.create_coupon(session.discount_amount, &session.currency)
                    .await?,
            )
        } else {
            None
        };

        let body = self
            .post(
                "/v1/checkout/sessions",
                &checkout_session_form(&session, coupon.as_deref()),
            )
            .await?;

        let id = body["id"]
            .as_str()
            .ok_or(PaymentGatewayError::InvalidResponse("session id"))?;

        let url = body["url"]
            .as_str()
            .ok_or(PaymentGatewayError::InvalidResponse("session url"))?;

        debug!(session_id = id, "checkout session created");

        Ok(CheckoutSession {
            id: id.to_string(),
            url: url.to_string(),
        })
    }
}
