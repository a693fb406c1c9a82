//! Current User Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    state::State,
    users::{UserResponse, errors::into_status_error},
};

/// Current User Handler
#[endpoint(
    tags("auth"),
    summary = "Current User",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Signed-in user"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity_or_401()?;

    let user = state
        .app
        .users
        .get_user(identity.user)
        .await
        .map_err(into_status_error)?;

    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use rigenerato_app::domain::users::data::UserRole;

    use crate::test_helpers::{Mocks, TEST_CUSTOMER_UUID, customer_service, make_user};

    use super::*;

    #[tokio::test]
    async fn test_me_returns_signed_in_user() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .users
            .expect_get_user()
            .once()
            .withf(|user| *user == TEST_CUSTOMER_UUID)
            .return_once(|user| Ok(make_user(user, UserRole::Customer)));

        let service = customer_service(mocks, Router::with_path("auth/me").get(handler));

        let mut res = TestClient::get("http://example.com/auth/me")
            .send(&service)
            .await;

        let body: UserResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.uuid, TEST_CUSTOMER_UUID.into_uuid());
        assert_eq!(body.email, "dj@example.com");

        Ok(())
    }
}
