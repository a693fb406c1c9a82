//! Order Handlers

pub(crate) mod delete;
pub(crate) mod index;
pub(crate) mod session;
pub(crate) mod shipping;
pub(crate) mod show;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rigenerato_app::domain::orders::{
    data::ShippingAddress,
    records::{OrderItemRecord, OrderRecord},
};

use crate::money::display_amount;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddressResponse {
    pub line1: String,
    pub line2: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl From<ShippingAddress> for AddressResponse {
    fn from(address: ShippingAddress) -> Self {
        AddressResponse {
            line1: address.line1,
            line2: address.line2,
            city: address.city,
            postal_code: address.postal_code,
            country: address.country,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    /// Cleared when the product has since been deleted
    pub product_uuid: Option<Uuid>,
    pub product_name: String,
    pub unit_price: u64,
    pub unit_price_display: String,
    pub quantity: u32,
    pub subtotal: u64,
    pub subtotal_display: String,
}

impl OrderItemResponse {
    fn new(item: OrderItemRecord, currency: &str) -> Self {
        OrderItemResponse {
            product_uuid: item.product_uuid.map(|uuid| uuid.into_uuid()),
            product_name: item.product_name,
            unit_price: item.unit_price,
            unit_price_display: display_amount(item.unit_price, currency),
            quantity: item.quantity,
            subtotal: item.subtotal,
            subtotal_display: display_amount(item.subtotal, currency),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub uuid: Uuid,
    pub session_id: String,
    pub user_uuid: Option<Uuid>,
    pub customer_email: String,
    pub customer_name: String,
    pub shipping_address: AddressResponse,
    pub currency: String,
    pub subtotal: u64,
    pub subtotal_display: String,
    pub discount_total: u64,
    pub discount_total_display: String,
    pub total: u64,
    pub total_display: String,
    pub discount_code: Option<String>,
    pub payment_status: String,
    pub shipping_status: String,
    pub tracking_number: Option<String>,
    pub items: Vec<OrderItemResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<OrderRecord> for OrderResponse {
    fn from(order: OrderRecord) -> Self {
        let currency = order.currency;

        OrderResponse {
            uuid: order.uuid.into_uuid(),
            session_id: order.session_id,
            user_uuid: order.user_uuid.map(|uuid| uuid.into_uuid()),
            customer_email: order.customer_email,
            customer_name: order.customer_name,
            shipping_address: order.shipping.into(),
            subtotal: order.subtotal,
            subtotal_display: display_amount(order.subtotal, &currency),
            discount_total: order.discount_total,
            discount_total_display: display_amount(order.discount_total, &currency),
            total: order.total,
            total_display: display_amount(order.total, &currency),
            discount_code: order.discount_code,
            payment_status: order.payment_status.as_str().to_string(),
            shipping_status: order.shipping_status.to_string(),
            tracking_number: order.tracking_number,
            items: order
                .items
                .into_iter()
                .map(|item| OrderItemResponse::new(item, &currency))
                .collect(),
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
            currency,
        }
    }
}
