//! Show Discount Code Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    discount_codes::{errors::into_status_error, handlers::DiscountCodeResponse},
    extensions::*,
    state::State,
};

/// Show Discount Code Handler
#[endpoint(
    tags("discount-codes"),
    summary = "Show Discount Code",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Discount code found"),
        (status_code = StatusCode::NOT_FOUND, description = "Discount code not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<DiscountCodeResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let code = state
        .app
        .discounts
        .get_discount_code(uuid.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(DiscountCodeResponse::new(code, &state.currency)))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use rigenerato_app::domain::discounts::{DiscountsServiceError, records::DiscountCodeUuid};

    use crate::test_helpers::{Mocks, admin_service, make_discount_code};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        admin_service(
            mocks,
            Router::with_path("admin/discount-codes/{uuid}").get(handler),
        )
    }

    #[tokio::test]
    async fn test_show_discount_code() -> TestResult {
        let uuid = DiscountCodeUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .discounts
            .expect_get_discount_code()
            .once()
            .withf(move |code| *code == uuid)
            .return_once(move |_| Ok(make_discount_code(uuid)));

        let mut res = TestClient::get(format!("http://example.com/admin/discount-codes/{uuid}"))
            .send(&make_service(mocks))
            .await;

        let body: DiscountCodeResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.code, "SPRING10");
        assert_eq!(body.times_redeemed, 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_show_missing_code_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .discounts
            .expect_get_discount_code()
            .once()
            .return_once(|_| Err(DiscountsServiceError::NotFound));

        let res = TestClient::get(format!(
            "http://example.com/admin/discount-codes/{}",
            DiscountCodeUuid::new()
        ))
        .send(&make_service(mocks))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
