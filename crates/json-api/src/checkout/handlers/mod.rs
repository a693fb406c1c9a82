//! Checkout Handlers

pub(crate) mod quote;
pub(crate) mod session;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rigenerato_app::domain::checkout::data::{CartItemRequest, CartRequest};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemBody {
    pub product_uuid: Uuid,
    pub quantity: u32,
}

fn into_cart(items: Vec<CartItemBody>, discount_code: Option<String>) -> CartRequest {
    CartRequest {
        items: items
            .into_iter()
            .map(|item| CartItemRequest {
                product_uuid: item.product_uuid.into(),
                quantity: item.quantity,
            })
            .collect(),
        discount_code: discount_code.filter(|code| !code.trim().is_empty()),
    }
}
