//! Checkout service errors.

use rigenerato::pricing::PricingError;
use thiserror::Error;

use crate::{
    domain::{
        checkout::digest::DigestError, discounts::DiscountsServiceError,
        products::records::ProductUuid,
    },
    payments::PaymentGatewayError,
};

#[derive(Debug, Error)]
pub enum CheckoutServiceError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("invalid quantity for product {0}")]
    InvalidQuantity(ProductUuid),

    #[error("product {0} not found")]
    ProductNotFound(ProductUuid),

    #[error("product {0} is not for sale")]
    ProductUnavailable(ProductUuid),

    #[error("only {available} of product {product} in stock")]
    InsufficientStock { product: ProductUuid, available: u32 },

    #[error("discount code cannot be applied")]
    Discount(#[source] DiscountsServiceError),

    #[error("cart could not be priced")]
    Pricing(#[from] PricingError),

    #[error("cart could not be encoded")]
    Digest(#[from] DigestError),

    #[error("payment session could not be created")]
    Gateway(#[from] PaymentGatewayError),

    #[error("storage error")]
    Sql(#[from] sqlx::Error),
}
