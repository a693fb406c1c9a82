//! Payment webhook handling.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use tracing::{info, warn};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::{
    domain::{
        checkout::{
            DISCOUNT_AMOUNT_METADATA_KEY, DISCOUNT_CODE_METADATA_KEY, USER_UUID_METADATA_KEY,
            digest::decode_metadata,
        },
        orders::{
            OrdersService,
            data::{CheckoutLine, CompletedCheckout, OrderOutcome},
            records::{OrderRecord, OrderUuid},
        },
        users::records::UserUuid,
        webhooks::{
            errors::WebhooksServiceError,
            events::{CHECKOUT_SESSION_COMPLETED, SessionObject, WebhookEvent},
        },
    },
    payments::{DEFAULT_SIGNATURE_TOLERANCE, verify_signature},
};

/// What happened to a delivered event.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookOutcome {
    /// Signature header missing or not matching; nothing was stored.
    InvalidSignature,

    /// Signed, but not a payload we can read.
    InvalidPayload,

    Created(OrderRecord),

    /// The session already produced an order.
    Duplicate(OrderRecord),

    /// Not an event we act on.
    Ignored,
}

/// Shared secret used to sign webhook deliveries.
#[derive(Clone)]
pub struct WebhookSecret(Zeroizing<String>);

impl WebhookSecret {
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(Zeroizing::new(secret.into()))
    }

    fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WebhookSecret(..)")
    }
}

#[derive(Clone)]
pub struct PaymentWebhooks {
    orders: Arc<dyn OrdersService>,
    secret: WebhookSecret,
    tolerance: SignedDuration,
}

impl fmt::Debug for PaymentWebhooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentWebhooks")
            .field("secret", &self.secret)
            .field("tolerance", &self.tolerance)
            .finish_non_exhaustive()
    }
}

impl PaymentWebhooks {
    #[must_use]
    pub fn new(orders: Arc<dyn OrdersService>, secret: WebhookSecret) -> Self {
        Self {
            orders,
            secret,
            tolerance: DEFAULT_SIGNATURE_TOLERANCE,
        }
    }

    #[must_use]
    pub fn with_tolerance(mut self, tolerance: SignedDuration) -> Self {
        self.tolerance = tolerance;

        self
    }

    /// Turns a settled session into the data needed for an order, or `None` when
    /// its metadata does not carry a readable cart.
    fn completed_checkout(session: &SessionObject) -> Option<CompletedCheckout> {
        let entries = match decode_metadata(&session.metadata) {
            Ok(entries) => entries,
            Err(error) => {
                warn!(session_id = %session.id, %error, "session metadata has no usable cart");

                return None;
            }
        };

        let user_uuid = session
            .metadata
            .get(USER_UUID_METADATA_KEY)
            .and_then(|value| match Uuid::parse_str(value) {
                Ok(uuid) => Some(UserUuid::from_uuid(uuid)),
                Err(error) => {
                    warn!(session_id = %session.id, %error, "ignoring malformed user_uuid");

                    None
                }
            });

        let discount_amount = session
            .metadata
            .get(DISCOUNT_AMOUNT_METADATA_KEY)
            .and_then(|value| match value.parse::<u64>() {
                Ok(amount) => Some(amount),
                Err(error) => {
                    warn!(session_id = %session.id, %error, "ignoring malformed discount_amount");

                    None
                }
            });

        Some(CompletedCheckout {
            uuid: OrderUuid::new(),
            session_id: session.id.clone(),
            user_uuid,
            customer_email: session.email(),
            customer_name: session.name(),
            shipping: session.shipping_address(),
            currency: session.currency.clone().unwrap_or_default(),
            lines: entries
                .into_iter()
                .map(|entry| CheckoutLine {
                    product_uuid: entry.product_uuid,
                    quantity: entry.quantity,
                    unit_price: entry.unit_price,
                })
                .collect(),
            discount_code: session.metadata.get(DISCOUNT_CODE_METADATA_KEY).cloned(),
            discount_amount,
        })
    }
}

#[async_trait]
impl WebhooksService for PaymentWebhooks {
    #[tracing::instrument(
        name = "webhooks.service.handle_event",
        skip(self, payload, signature),
        fields(bytes = payload.len(), event_type = tracing::field::Empty),
        err
    )]
    async fn handle_event(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> Result<WebhookOutcome, WebhooksServiceError> {
        let Some(signature) = signature else {
            warn!("webhook delivered without a signature header");

            return Ok(WebhookOutcome::InvalidSignature);
        };

        if let Err(error) = verify_signature(
            payload,
            signature,
            self.secret.as_str(),
            Timestamp::now(),
            self.tolerance,
        ) {
            warn!(%error, "webhook signature rejected");

            return Ok(WebhookOutcome::InvalidSignature);
        }

        let event: WebhookEvent = match serde_json::from_slice(payload) {
            Ok(event) => event,
            Err(error) => {
                warn!(%error, "webhook payload is not a readable event");

                return Ok(WebhookOutcome::InvalidPayload);
            }
        };

        tracing::Span::current().record("event_type", event.kind.as_str());

        if event.kind != CHECKOUT_SESSION_COMPLETED {
            info!(event_id = ?event.id, "ignoring webhook event");

            return Ok(WebhookOutcome::Ignored);
        }

        let session: SessionObject = match serde_json::from_value(event.data.object) {
            Ok(session) => session,
            Err(error) => {
                warn!(%error, "checkout session object is not readable");

                return Ok(WebhookOutcome::InvalidPayload);
            }
        };

        if !session.is_settled() {
            info!(session_id = %session.id, status = ?session.payment_status, "session not paid yet");

            return Ok(WebhookOutcome::Ignored);
        }

        let Some(checkout) = Self::completed_checkout(&session) else {
            return Ok(WebhookOutcome::InvalidPayload);
        };

        let outcome = match self.orders.create_from_checkout(checkout).await? {
            OrderOutcome::Created(order) => {
                if let Some(amount_total) = session.amount_total
                    && amount_total != order.total
                {
                    warn!(
                        session_id = %session.id,
                        vendor_total = amount_total,
                        recorded_total = order.total,
                        "vendor total differs from recomputed total"
                    );
                }

                info!(session_id = %session.id, order_uuid = %order.uuid, "order created");

                WebhookOutcome::Created(order)
            }
            OrderOutcome::Duplicate(order) => {
                info!(session_id = %session.id, order_uuid = %order.uuid, "session already recorded");

                WebhookOutcome::Duplicate(order)
            }
        };

        Ok(outcome)
    }
}

#[async_trait]
pub trait WebhooksService: Send + Sync {
    /// Verify, parse and act on one vendor event delivery.
    async fn handle_event(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> Result<WebhookOutcome, WebhooksServiceError>;
}
