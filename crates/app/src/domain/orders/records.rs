//! Order Records

use jiff::Timestamp;

use crate::{
    domain::{
        orders::data::{PaymentStatus, ShippingAddress, ShippingStatus},
        products::records::ProductUuid,
        users::records::UserUuid,
    },
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItemRecord>;

/// Order Record
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    pub session_id: String,
    pub user_uuid: Option<UserUuid>,
    pub customer_email: String,
    pub customer_name: String,
    pub shipping: ShippingAddress,
    pub currency: String,
    pub subtotal: u64,
    pub discount_total: u64,
    pub total: u64,
    pub discount_code: Option<String>,
    pub payment_status: PaymentStatus,
    pub shipping_status: ShippingStatus,
    pub tracking_number: Option<String>,
    pub items: Vec<OrderItemRecord>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Order Item Record. `product_uuid` is cleared if the product is later deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItemRecord {
    pub uuid: OrderItemUuid,
    pub order_uuid: OrderUuid,
    pub product_uuid: Option<ProductUuid>,
    pub product_name: String,
    pub unit_price: u64,
    pub quantity: u32,
    pub subtotal: u64,
    pub position: u32,
}
