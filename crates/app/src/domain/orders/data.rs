//! Orders Data

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{
    orders::records::{OrderRecord, OrderUuid},
    products::records::ProductUuid,
    users::records::UserUuid,
};

/// Fulfilment progress of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl ShippingStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ShippingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown status: {0}")]
pub struct UnknownStatusError(pub String);

impl FromStr for ShippingStatus {
    type Err = UnknownStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownStatusError(other.to_string())),
        }
    }
}

/// Payment state recorded against an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    Refunded,
}

impl PaymentStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Refunded => "refunded",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "paid" => Ok(Self::Paid),
            "refunded" => Ok(Self::Refunded),
            other => Err(UnknownStatusError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShippingAddress {
    pub line1: String,
    pub line2: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// One purchased line as recorded in the checkout session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutLine {
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub unit_price: u64,
}

/// A paid checkout session, ready to become an order.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedCheckout {
    pub uuid: OrderUuid,
    pub session_id: String,
    pub user_uuid: Option<UserUuid>,
    pub customer_email: String,
    pub customer_name: String,
    pub shipping: ShippingAddress,
    pub currency: String,
    pub lines: Vec<CheckoutLine>,
    pub discount_code: Option<String>,
    /// Discount charged by the vendor, in minor units. When present it is
    /// used as-is instead of re-reading the code.
    pub discount_amount: Option<u64>,
}

/// Result of turning a checkout into an order.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderOutcome {
    /// A new order was stored.
    Created(OrderRecord),

    /// An order for the same session already existed and was left untouched.
    Duplicate(OrderRecord),
}

impl OrderOutcome {
    #[must_use]
    pub fn order(&self) -> &OrderRecord {
        match self {
            Self::Created(order) | Self::Duplicate(order) => order,
        }
    }

    #[must_use]
    pub fn into_order(self) -> OrderRecord {
        match self {
            Self::Created(order) | Self::Duplicate(order) => order,
        }
    }
}

/// Shipping Update Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingUpdate {
    pub status: ShippingStatus,
    pub tracking_number: Option<String>,
}
