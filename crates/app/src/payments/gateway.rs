//! Payment gateway abstraction.

use std::collections::BTreeMap;

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

/// One purchasable line on the hosted payment page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLineItem {
    pub name: String,
    pub unit_amount: u64,
    pub quantity: u32,
}

/// Everything the vendor needs to open a hosted payment page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCheckoutSession {
    /// Lowercase ISO 4217 code.
    pub currency: String,
    pub line_items: Vec<SessionLineItem>,
    /// Session-level reduction in minor units, `0` for none.
    pub discount_amount: u64,
    pub customer_email: Option<String>,
    pub success_url: String,
    pub cancel_url: String,
    /// ISO 3166-1 alpha-2 codes the customer may ship to.
    pub shipping_countries: Vec<String>,
    pub metadata: BTreeMap<String, String>,
}

/// A session created by the vendor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Error)]
pub enum PaymentGatewayError {
    #[error("payment vendor request failed")]
    Http(#[from] reqwest::Error),

    #[error("payment vendor rejected the request ({status}): {message}")]
    Vendor { status: u16, message: String },

    #[error("unexpected payment vendor response: missing {0}")]
    InvalidResponse(&'static str),
}

#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open a hosted checkout session.
    async fn create_checkout_session(
        &self,
        session: NewCheckoutSession,
    ) -> Result<CheckoutSession, PaymentGatewayError>;
}
