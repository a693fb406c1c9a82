//! Update Category Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use rigenerato_app::domain::categories::data::CategoryUpdate;

use crate::{
    categories::{
        errors::into_status_error,
        handlers::{CategoryRequest, CategoryResponse},
    },
    extensions::*,
    state::State,
};

impl From<CategoryRequest> for CategoryUpdate {
    fn from(request: CategoryRequest) -> Self {
        CategoryUpdate {
            name: request.name,
            slug: request.slug,
            description: request.description,
        }
    }
}

/// Update Category Handler
#[endpoint(
    tags("categories"),
    summary = "Update Category",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Category updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Category not found"),
        (status_code = StatusCode::CONFLICT, description = "Slug already in use"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    json: JsonBody<CategoryRequest>,
    depot: &mut Depot,
) -> Result<Json<CategoryResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let category = state
        .app
        .categories
        .update_category(uuid.into_inner().into(), json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(category.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use rigenerato_app::domain::categories::{CategoriesServiceError, records::CategoryUuid};

    use crate::test_helpers::{Mocks, admin_service, make_category};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        admin_service(
            mocks,
            Router::with_path("admin/categories/{uuid}").put(handler),
        )
    }

    #[tokio::test]
    async fn test_update_category() -> TestResult {
        let uuid = CategoryUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .categories
            .expect_update_category()
            .once()
            .withf(move |category, update| {
                *category == uuid
                    && *update
                        == CategoryUpdate {
                            name: "DJ Mixer".to_string(),
                            slug: "dj-mixer".to_string(),
                            description: "Usati garantiti".to_string(),
                        }
            })
            .return_once(move |_, update| {
                let mut category = make_category(uuid);

                category.name = update.name;
                category.slug = update.slug;

                Ok(category)
            });

        let mut res = TestClient::put(format!("http://example.com/admin/categories/{uuid}"))
            .json(&json!({
                "name": "DJ Mixer",
                "slug": "dj-mixer",
                "description": "Usati garantiti",
            }))
            .send(&make_service(mocks))
            .await;

        let body: CategoryResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.slug, "dj-mixer");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_category_returns_404() -> TestResult {
        let uuid = CategoryUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .categories
            .expect_update_category()
            .once()
            .return_once(|_, _| Err(CategoriesServiceError::NotFound));

        let res = TestClient::put(format!("http://example.com/admin/categories/{uuid}"))
            .json(&json!({ "name": "DJ Mixer", "slug": "dj-mixer" }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
