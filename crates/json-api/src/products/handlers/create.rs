//! Create Product Handler

use std::sync::Arc;

use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};

use rigenerato_app::domain::products::{data::NewProduct, records::ProductUuid};

use crate::{
    extensions::*,
    products::{
        errors::into_status_error,
        handlers::{ProductRequest, ProductResponse, parse_condition},
    },
    state::State,
};

impl TryFrom<ProductRequest> for NewProduct {
    type Error = StatusError;

    fn try_from(request: ProductRequest) -> Result<Self, Self::Error> {
        Ok(NewProduct {
            uuid: ProductUuid::new(),
            category_uuid: request.category_uuid.map(Into::into),
            condition: parse_condition(&request.condition)?,
            name: request.name,
            slug: request.slug,
            brand: request.brand,
            description: request.description,
            price: request.price,
            stock: request.stock,
            published: request.published,
        })
    }
}

/// Create Product Handler
#[endpoint(
    tags("products"),
    summary = "Create Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Product created"),
        (status_code = StatusCode::CONFLICT, description = "Slug already in use"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "products.create",
    skip(json, depot, res),
    fields(product_uuid = tracing::field::Empty, price = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<ProductRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let product = NewProduct::try_from(json.into_inner())?;

    let span = tracing::Span::current();

    span.record("product_uuid", tracing::field::display(product.uuid));
    span.record("price", product.price);

    let product = state
        .app
        .products
        .create_product(product)
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/admin/products/{}", product.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(ProductResponse::new(product, &state.currency)))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use testresult::TestResult;

    use rigenerato_app::domain::{
        categories::records::CategoryUuid,
        products::{ProductsServiceError, data::ProductCondition},
    };

    use crate::test_helpers::{Mocks, admin_service, make_product};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        admin_service(mocks, Router::with_path("admin/products").post(handler))
    }

    fn payload(category: Option<CategoryUuid>) -> Value {
        json!({
            "category_uuid": category.map(CategoryUuid::into_uuid),
            "name": "Pioneer DJM-900NXS2",
            "slug": "pioneer-djm-900nxs2",
            "brand": "Pioneer DJ",
            "condition": "excellent",
            "price": 149_900,
            "stock": 1,
            "published": true,
        })
    }

    #[tokio::test]
    async fn test_create_product_returns_201() -> TestResult {
        let category = CategoryUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_create_product()
            .once()
            .withf(move |new| {
                new.category_uuid == Some(category)
                    && new.condition == ProductCondition::Excellent
                    && new.price == 149_900
                    && new.stock == 1
                    && new.published
                    && new.description.is_empty()
            })
            .return_once(|new| Ok(make_product(new.uuid)));

        let mut res = TestClient::post("http://example.com/admin/products")
            .json(&payload(Some(category)))
            .send(&make_service(mocks))
            .await;

        let body: ProductResponse = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(
            location,
            Some(format!("/admin/products/{}", body.uuid).as_str())
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_create_with_unknown_condition_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.products.expect_create_product().never();

        let mut body = payload(None);

        body["condition"] = json!("mint");

        let res = TestClient::post("http://example.com/admin/products")
            .json(&body)
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_with_unknown_category_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_create_product()
            .once()
            .return_once(|_| Err(ProductsServiceError::InvalidReference));

        let res = TestClient::post("http://example.com/admin/products")
            .json(&payload(Some(CategoryUuid::new())))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_duplicate_slug_returns_409() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_create_product()
            .once()
            .return_once(|_| Err(ProductsServiceError::AlreadyExists));

        let res = TestClient::post("http://example.com/admin/products")
            .json(&payload(None))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
