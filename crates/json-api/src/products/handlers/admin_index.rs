//! Admin Product Index Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};
use uuid::Uuid;

use rigenerato_app::domain::products::data::ProductFilter;

use crate::{
    extensions::*,
    products::{errors::into_status_error, handlers::ProductsResponse},
    state::State,
};

/// Admin Product Index Handler
///
/// Lists every product, drafts included.
#[endpoint(
    tags("products"),
    summary = "List All Products",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "All products"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    category: QueryParam<Uuid, false>,
    depot: &mut Depot,
) -> Result<Json<ProductsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let filter = ProductFilter {
        category: category.into_inner().map(Into::into),
        published_only: false,
    };

    let products = state
        .app
        .products
        .list_products(filter)
        .await
        .map_err(into_status_error)?;

    Ok(Json(ProductsResponse::new(products, &state.currency)))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use rigenerato_app::domain::products::records::ProductUuid;

    use crate::test_helpers::{Mocks, admin_service, make_product};

    use super::*;

    #[tokio::test]
    async fn test_admin_index_includes_drafts() -> TestResult {
        let uuid = ProductUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_list_products()
            .once()
            .withf(|filter| !filter.published_only && filter.category.is_none())
            .return_once(move |_| {
                let mut draft = make_product(uuid);

                draft.published = false;

                Ok(vec![draft])
            });

        let service = admin_service(mocks, Router::with_path("admin/products").get(handler));

        let mut res = TestClient::get("http://example.com/admin/products")
            .send(&service)
            .await;

        let body: ProductsResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(!body.products[0].published, "draft should be listed");

        Ok(())
    }
}
