//! Discount Code Errors

use salvo::http::StatusError;
use tracing::error;

use rigenerato_app::domain::discounts::DiscountsServiceError;

pub(crate) fn into_status_error(error: DiscountsServiceError) -> StatusError {
    match error {
        DiscountsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Discount code already exists")
        }
        DiscountsServiceError::NotFound => {
            StatusError::not_found().brief("Discount code not found")
        }
        DiscountsServiceError::MissingRequiredData | DiscountsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid discount code payload")
        }
        DiscountsServiceError::Inactive => {
            StatusError::conflict().brief("Discount code is not active")
        }
        DiscountsServiceError::Expired => StatusError::conflict().brief("Discount code has expired"),
        DiscountsServiceError::Exhausted => {
            StatusError::conflict().brief("Discount code has been fully redeemed")
        }
        DiscountsServiceError::Sql(source) => {
            error!("discount code storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
