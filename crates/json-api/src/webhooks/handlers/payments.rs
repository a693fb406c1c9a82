//! Payment Webhook Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rigenerato_app::domain::webhooks::WebhookOutcome;

use crate::{extensions::*, observability::record_webhook_outcome, state::State};

/// Header the payment vendor signs deliveries with.
pub(crate) const SIGNATURE_HEADER: &str = "Stripe-Signature";

/// Webhook Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct WebhookResponse {
    /// `created`, `duplicate` or `ignored`
    pub outcome: String,
    pub order_uuid: Option<Uuid>,
}

/// Payment Webhook Handler
///
/// Receives signed vendor events. A paid `checkout.session.completed` event
/// becomes an order; replays of the same session are acknowledged without
/// creating another one.
#[endpoint(
    tags("webhooks"),
    summary = "Payment Webhook",
    responses(
        (status_code = StatusCode::OK, description = "Event processed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid signature or payload"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<WebhookResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let signature = req.header::<String>(SIGNATURE_HEADER);
    let payload = req.payload().await.or_400("could not read request body")?;

    let outcome = state
        .app
        .webhooks
        .handle_event(payload, signature.as_deref())
        .await
        .or_500("failed to process payment webhook")?;

    record_webhook_outcome(&outcome);

    let (label, order_uuid) = match outcome {
        WebhookOutcome::InvalidSignature => {
            return Err(StatusError::bad_request().brief("Invalid webhook signature"));
        }
        WebhookOutcome::InvalidPayload => {
            return Err(StatusError::bad_request().brief("Unreadable webhook payload"));
        }
        WebhookOutcome::Created(order) => ("created", Some(order.uuid.into_uuid())),
        WebhookOutcome::Duplicate(order) => ("duplicate", Some(order.uuid.into_uuid())),
        WebhookOutcome::Ignored => ("ignored", None),
    };

    Ok(Json(WebhookResponse {
        outcome: label.to_string(),
        order_uuid,
    }))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use rigenerato_app::{
        domain::{
            checkout::digest::{DigestEntry, digest_metadata},
            orders::{
                OrdersServiceError,
                data::{OrderOutcome, ShippingStatus},
                records::OrderUuid,
            },
            products::records::ProductUuid,
        },
        payments::signature_header,
    };

    use crate::test_helpers::{Mocks, TEST_WEBHOOK_SECRET, make_order, public_service};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        public_service(mocks, Router::with_path("webhooks/payments").post(handler))
    }

    fn metadata() -> Result<BTreeMap<String, String>, Box<dyn std::error::Error>> {
        Ok(digest_metadata(&[DigestEntry {
            product_uuid: ProductUuid::new(),
            quantity: 1,
            unit_price: 149_900,
        }])?)
    }

    fn event(kind: &str, metadata: &BTreeMap<String, String>) -> Vec<u8> {
        json!({
            "id": "evt_test_1",
            "type": kind,
            "data": {
                "object": {
                    "id": "cs_test_a1",
                    "payment_status": "paid",
                    "amount_total": 134_910,
                    "currency": "eur",
                    "customer_details": {
                        "email": "dj@example.com",
                        "name": "Selector",
                        "address": { "line1": "Via Roma 1", "city": "Milano", "country": "IT" }
                    },
                    "metadata": metadata,
                }
            }
        })
        .to_string()
        .into_bytes()
    }

    fn sign(payload: &[u8]) -> Result<String, Box<dyn std::error::Error>> {
        Ok(signature_header(
            payload,
            TEST_WEBHOOK_SECRET,
            Timestamp::now().as_second(),
        )?)
    }

    #[tokio::test]
    async fn test_paid_session_creates_order() -> TestResult {
        let uuid = OrderUuid::new();
        let payload = event("checkout.session.completed", &metadata()?);
        let mut mocks = Mocks::default();

        mocks
            .webhook_orders
            .expect_create_from_checkout()
            .once()
            .withf(|checkout| checkout.session_id == "cs_test_a1" && checkout.lines.len() == 1)
            .return_once(move |checkout| {
                Ok(OrderOutcome::Created(make_order(uuid, &checkout.session_id)))
            });

        let mut res = TestClient::post("http://example.com/webhooks/payments")
            .add_header(SIGNATURE_HEADER, sign(&payload)?, true)
            .raw_json(String::from_utf8(payload)?)
            .send(&make_service(mocks))
            .await;

        let body: WebhookResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.outcome, "created");
        assert_eq!(body.order_uuid, Some(uuid.into_uuid()));

        Ok(())
    }

    #[tokio::test]
    async fn test_free_session_creates_order() -> TestResult {
        let uuid = OrderUuid::new();
        let payload = String::from_utf8(event("checkout.session.completed", &metadata()?))?
            .replace(
                r#""payment_status":"paid""#,
                r#""payment_status":"no_payment_required""#,
            );
        let mut mocks = Mocks::default();

        assert!(payload.contains("no_payment_required"), "payload should be free");

        mocks
            .webhook_orders
            .expect_create_from_checkout()
            .once()
            .withf(|checkout| checkout.session_id == "cs_test_a1")
            .return_once(move |checkout| {
                Ok(OrderOutcome::Created(make_order(uuid, &checkout.session_id)))
            });

        let mut res = TestClient::post("http://example.com/webhooks/payments")
            .add_header(SIGNATURE_HEADER, sign(payload.as_bytes())?, true)
            .raw_json(payload)
            .send(&make_service(mocks))
            .await;

        let body: WebhookResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.outcome, "created");
        assert_eq!(body.order_uuid, Some(uuid.into_uuid()));

        Ok(())
    }

    #[tokio::test]
    async fn test_replayed_session_is_acknowledged() -> TestResult {
        let uuid = OrderUuid::new();
        let payload = event("checkout.session.completed", &metadata()?);
        let mut mocks = Mocks::default();

        mocks
            .webhook_orders
            .expect_create_from_checkout()
            .once()
            .return_once(move |checkout| {
                let mut order = make_order(uuid, &checkout.session_id);

                order.shipping_status = ShippingStatus::Shipped;

                Ok(OrderOutcome::Duplicate(order))
            });

        let mut res = TestClient::post("http://example.com/webhooks/payments")
            .add_header(SIGNATURE_HEADER, sign(&payload)?, true)
            .raw_json(String::from_utf8(payload)?)
            .send(&make_service(mocks))
            .await;

        let body: WebhookResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.outcome, "duplicate");
        assert_eq!(body.order_uuid, Some(uuid.into_uuid()));

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_signature_returns_400() -> TestResult {
        let payload = event("checkout.session.completed", &metadata()?);
        let mut mocks = Mocks::default();

        mocks.webhook_orders.expect_create_from_checkout().never();

        let res = TestClient::post("http://example.com/webhooks/payments")
            .raw_json(String::from_utf8(payload)?)
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_tampered_payload_returns_400() -> TestResult {
        let payload = event("checkout.session.completed", &metadata()?);
        let signature = sign(&payload)?;
        let tampered = String::from_utf8(payload)?.replace("134910", "1");
        let mut mocks = Mocks::default();

        mocks.webhook_orders.expect_create_from_checkout().never();

        let res = TestClient::post("http://example.com/webhooks/payments")
            .add_header(SIGNATURE_HEADER, signature, true)
            .raw_json(tampered)
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_other_events_are_ignored() -> TestResult {
        let payload = event("payment_intent.created", &BTreeMap::new());
        let mut mocks = Mocks::default();

        mocks.webhook_orders.expect_create_from_checkout().never();

        let mut res = TestClient::post("http://example.com/webhooks/payments")
            .add_header(SIGNATURE_HEADER, sign(&payload)?, true)
            .raw_json(String::from_utf8(payload)?)
            .send(&make_service(mocks))
            .await;

        let body: WebhookResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.outcome, "ignored");

        Ok(())
    }

    #[tokio::test]
    async fn test_order_failure_returns_500_for_retry() -> TestResult {
        let payload = event("checkout.session.completed", &metadata()?);
        let mut mocks = Mocks::default();

        mocks
            .webhook_orders
            .expect_create_from_checkout()
            .once()
            .return_once(|_| Err(OrdersServiceError::EmptyOrder));

        let res = TestClient::post("http://example.com/webhooks/payments")
            .add_header(SIGNATURE_HEADER, sign(&payload)?, true)
            .raw_json(String::from_utf8(payload)?)
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }
}
