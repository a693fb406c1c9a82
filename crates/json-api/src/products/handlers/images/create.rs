//! Create Product Image Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rigenerato_app::domain::products::{data::NewProductImage, records::ProductImageUuid};

use crate::{
    extensions::*,
    products::{errors::into_status_error, handlers::ProductImageResponse},
    state::State,
};

/// Image reference. Files are hosted elsewhere.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateImageRequest {
    pub url: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub position: u32,
}

impl From<CreateImageRequest> for NewProductImage {
    fn from(request: CreateImageRequest) -> Self {
        NewProductImage {
            uuid: ProductImageUuid::new(),
            url: request.url,
            alt: request.alt,
            position: request.position,
        }
    }
}

/// Create Product Image Handler
#[endpoint(
    tags("products"),
    summary = "Add Product Image",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Image added"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    json: JsonBody<CreateImageRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ProductImageResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let product = uuid.into_inner();

    let image = state
        .app
        .products
        .add_image(product.into(), json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.add_header(
        LOCATION,
        format!("/admin/products/{product}/images/{}", image.uuid),
        true,
    )
    .or_500("failed to set location header")?
    .status_code(StatusCode::CREATED);

    Ok(Json(image.into()))
}
