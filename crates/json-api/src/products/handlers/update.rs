//! Update Product Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use rigenerato_app::domain::products::data::ProductUpdate;

use crate::{
    extensions::*,
    products::{
        errors::into_status_error,
        handlers::{ProductRequest, ProductResponse, parse_condition},
    },
    state::State,
};

impl TryFrom<ProductRequest> for ProductUpdate {
    type Error = StatusError;

    fn try_from(request: ProductRequest) -> Result<Self, Self::Error> {
        Ok(ProductUpdate {
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

/// Update Product Handler
///
/// Replaces every editable field. Images are managed separately.
#[endpoint(
    tags("products"),
    summary = "Update Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Product updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::CONFLICT, description = "Slug already in use"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "products.update",
    skip(uuid, json, depot),
    fields(product_uuid = tracing::field::Empty, price = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    json: JsonBody<ProductRequest>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let uuid = uuid.into_inner();
    let update = ProductUpdate::try_from(json.into_inner())?;

    let span = tracing::Span::current();

    span.record("product_uuid", tracing::field::display(uuid));
    span.record("price", update.price);

    let product = state
        .app
        .products
        .update_product(uuid.into(), update)
        .await
        .map_err(into_status_error)?;

    tracing::info!(product_uuid = %uuid, stock = product.stock, "updated product");

    Ok(Json(ProductResponse::new(product, &state.currency)))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use rigenerato_app::domain::products::{
        ProductsServiceError, data::ProductCondition, records::ProductUuid,
    };

    use crate::test_helpers::{Mocks, admin_service, make_product};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        admin_service(mocks, Router::with_path("admin/products/{uuid}").put(handler))
    }

    #[tokio::test]
    async fn test_update_product() -> TestResult {
        let uuid = ProductUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_update_product()
            .once()
            .withf(move |product, update| {
                *product == uuid
                    && *update
                        == ProductUpdate {
                            category_uuid: None,
                            name: "Pioneer DJM-900NXS2".to_string(),
                            slug: "pioneer-djm-900nxs2".to_string(),
                            brand: "Pioneer DJ".to_string(),
                            description: "Lievi segni d'uso".to_string(),
                            condition: ProductCondition::Good,
                            price: 129_900,
                            stock: 2,
                            published: true,
                        }
            })
            .return_once(move |_, update| {
                let mut product = make_product(uuid);

                product.price = update.price;
                product.stock = update.stock;

                Ok(product)
            });

        let mut res = TestClient::put(format!("http://example.com/admin/products/{uuid}"))
            .json(&json!({
                "name": "Pioneer DJM-900NXS2",
                "slug": "pioneer-djm-900nxs2",
                "brand": "Pioneer DJ",
                "description": "Lievi segni d'uso",
                "condition": "good",
                "price": 129_900,
                "stock": 2,
                "published": true,
            }))
            .send(&make_service(mocks))
            .await;

        let body: ProductResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.price, 129_900);
        assert_eq!(body.stock, 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_product_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_update_product()
            .once()
            .return_once(|_, _| Err(ProductsServiceError::NotFound));

        let res = TestClient::put(format!(
            "http://example.com/admin/products/{}",
            ProductUuid::new()
        ))
        .json(&json!({
            "name": "Numark NS7",
            "slug": "numark-ns7",
            "brand": "Numark",
            "condition": "fair",
            "price": 39_900,
        }))
        .send(&make_service(mocks))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_invalid_uuid_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.products.expect_update_product().never();

        let res = TestClient::put("http://example.com/admin/products/123")
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
