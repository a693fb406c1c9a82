//! Product Index Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};
use uuid::Uuid;

use rigenerato_app::domain::products::data::ProductFilter;

use crate::{
    extensions::*,
    products::{errors::into_status_error, handlers::ProductsResponse},
    state::State,
};

/// Product Index Handler
///
/// Lists published products, newest first, optionally within one category.
#[endpoint(
    tags("products"),
    summary = "List Products",
    responses(
        (status_code = StatusCode::OK, description = "Published products"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    category: QueryParam<Uuid, false>,
    depot: &mut Depot,
) -> Result<Json<ProductsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let filter = ProductFilter::storefront(category.into_inner().map(Into::into));

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

    use rigenerato_app::domain::{categories::records::CategoryUuid, products::records::ProductUuid};

    use crate::test_helpers::{Mocks, make_product, public_service};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        public_service(mocks, Router::with_path("products").get(handler))
    }

    #[tokio::test]
    async fn test_index_lists_published_products() -> TestResult {
        let uuid = ProductUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_list_products()
            .once()
            .withf(|filter| *filter == ProductFilter::storefront(None))
            .return_once(move |_| Ok(vec![make_product(uuid)]));

        let mut res = TestClient::get("http://example.com/products")
            .send(&make_service(mocks))
            .await;

        let body: ProductsResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.products.len(), 1);
        assert_eq!(body.products[0].price, 149_900);
        assert_eq!(body.products[0].price_display, "€1.499,00");
        assert_eq!(body.products[0].condition, "excellent");
        assert_eq!(body.products[0].images.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_index_filters_by_category() -> TestResult {
        let category = CategoryUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_list_products()
            .once()
            .withf(move |filter| *filter == ProductFilter::storefront(Some(category)))
            .return_once(|_| Ok(vec![]));

        let mut res = TestClient::get(format!("http://example.com/products?category={category}"))
            .send(&make_service(mocks))
            .await;

        let body: ProductsResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.products.is_empty(), "expected no products");

        Ok(())
    }

    #[tokio::test]
    async fn test_index_rejects_malformed_category() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.products.expect_list_products().never();

        let res = TestClient::get("http://example.com/products?category=mixers")
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
