//! Vendor event payloads.
//!
//! Only the fields needed to record an order are modelled; everything else in
//! the payload is ignored.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::domain::orders::data::ShippingAddress;

/// Event type that marks a finished hosted checkout.
pub const CHECKOUT_SESSION_COMPLETED: &str = "checkout.session.completed";

/// Payment status of a session whose money has been captured.
pub const PAYMENT_STATUS_PAID: &str = "paid";

/// Payment status of a session whose total was zero, so nothing was charged.
pub const PAYMENT_STATUS_NO_PAYMENT_REQUIRED: &str = "no_payment_required";

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(rename = "type")]
    pub kind: String,

    pub data: EventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    pub object: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionObject {
    pub id: String,

    #[serde(default)]
    pub payment_status: Option<String>,

    #[serde(default)]
    pub amount_total: Option<u64>,

    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default)]
    pub customer_email: Option<String>,

    #[serde(default)]
    pub customer_details: Option<CustomerDetails>,

    #[serde(default)]
    pub shipping_details: Option<ShippingDetails>,

    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl SessionObject {
    /// Nothing is left to collect: the money was captured, or the discount
    /// brought the total to zero.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(
            self.payment_status.as_deref(),
            Some(PAYMENT_STATUS_PAID | PAYMENT_STATUS_NO_PAYMENT_REQUIRED)
        )
    }

    /// Email from the collected customer details, falling back to the one
    /// passed when the session was created.
    #[must_use]
    pub fn email(&self) -> String {
        self.customer_details
            .as_ref()
            .and_then(|details| details.email.clone())
            .or_else(|| self.customer_email.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn name(&self) -> String {
        self.shipping_details
            .as_ref()
            .and_then(|shipping| shipping.name.clone())
            .or_else(|| {
                self.customer_details
                    .as_ref()
                    .and_then(|details| details.name.clone())
            })
            .unwrap_or_default()
    }

    /// Shipping address, or the billing address when no shipping step ran.
    #[must_use]
    pub fn shipping_address(&self) -> ShippingAddress {
        self.shipping_details
            .as_ref()
            .and_then(|shipping| shipping.address.as_ref())
            .or_else(|| {
                self.customer_details
                    .as_ref()
                    .and_then(|details| details.address.as_ref())
            })
            .map(VendorAddress::to_shipping_address)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomerDetails {
    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub address: Option<VendorAddress>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShippingDetails {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub address: Option<VendorAddress>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VendorAddress {
    #[serde(default)]
    pub line1: Option<String>,

    #[serde(default)]
    pub line2: Option<String>,

    #[serde(default)]
    pub city: Option<String>,

    #[serde(default)]
    pub postal_code: Option<String>,

    #[serde(default)]
    pub country: Option<String>,
}

impl VendorAddress {
    fn to_shipping_address(&self) -> ShippingAddress {
        ShippingAddress {
            line1: self.line1.clone().unwrap_or_default(),
            line2: self.line2.clone().unwrap_or_default(),
            city: self.city.clone().unwrap_or_default(),
            postal_code: self.postal_code.clone().unwrap_or_default(),
            country: self.country.clone().unwrap_or_default(),
        }
    }
}
