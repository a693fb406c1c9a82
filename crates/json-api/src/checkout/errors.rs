//! Checkout Errors

use salvo::http::StatusError;
use tracing::error;

use rigenerato_app::domain::checkout::CheckoutServiceError;

use crate::discount_codes;

pub(crate) fn into_status_error(error: CheckoutServiceError) -> StatusError {
    match error {
        CheckoutServiceError::EmptyCart => StatusError::bad_request().brief("Cart is empty"),
        CheckoutServiceError::InvalidQuantity(product) => {
            StatusError::bad_request().brief(format!("Invalid quantity for product {product}"))
        }
        CheckoutServiceError::ProductNotFound(product) => {
            StatusError::not_found().brief(format!("Product {product} not found"))
        }
        CheckoutServiceError::ProductUnavailable(product) => {
            StatusError::conflict().brief(format!("Product {product} is not for sale"))
        }
        CheckoutServiceError::InsufficientStock { product, available } => StatusError::conflict()
            .brief(format!("Only {available} of product {product} left in stock")),
        CheckoutServiceError::Discount(source) => discount_codes::errors::into_status_error(source),
        CheckoutServiceError::Pricing(source) => {
            tracing::warn!("cart could not be priced: {source}");

            StatusError::bad_request().brief("Cart total is out of range")
        }
        CheckoutServiceError::Digest(source) => {
            error!("failed to encode cart digest: {source}");

            StatusError::internal_server_error()
        }
        CheckoutServiceError::Gateway(source) => {
            error!("payment gateway error: {source}");

            StatusError::bad_gateway().brief("Payment provider unavailable")
        }
        CheckoutServiceError::Sql(source) => {
            error!("checkout storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
