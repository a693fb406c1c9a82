//! Checkout Data

use rigenerato::pricing::Totals;

use crate::domain::{products::records::ProductUuid, users::records::UserUuid};

/// One requested line of a client-side cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartItemRequest {
    pub product_uuid: ProductUuid,
    pub quantity: u32,
}

/// A client-side cart submitted for pricing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartRequest {
    pub items: Vec<CartItemRequest>,
    pub discount_code: Option<String>,
}

/// A priced cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteLine {
    pub product_uuid: ProductUuid,
    pub name: String,
    pub unit_price: u64,
    pub quantity: u32,
    pub subtotal: u64,
}

/// A priced cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub lines: Vec<QuoteLine>,
    /// The applied code, normalised.
    pub discount_code: Option<String>,
    pub totals: Totals,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub cart: CartRequest,
    pub customer_email: Option<String>,
    pub user: Option<UserUuid>,
}

/// Where the hosted payment page sends the customer, and what it charges in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSettings {
    /// Lowercase ISO 4217 code.
    pub currency: String,
    pub success_url: String,
    pub cancel_url: String,
    pub shipping_countries: Vec<String>,
}

/// Placeholder the vendor replaces with the session id on redirect.
pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

impl CheckoutSettings {
    /// The success URL, with a `session_id` query parameter added unless the
    /// configured URL already carries the placeholder.
    #[must_use]
    pub fn success_url_with_session(&self) -> String {
        if self.success_url.contains(SESSION_ID_PLACEHOLDER) {
            return self.success_url.clone();
        }

        let separator = if self.success_url.contains('?') { '&' } else { '?' };

        format!(
            "{}{separator}session_id={SESSION_ID_PLACEHOLDER}",
            self.success_url
        )
    }
}
