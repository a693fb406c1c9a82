//! Set User Role Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rigenerato_app::domain::users::data::UserRole;

use crate::{
    extensions::*,
    state::State,
    users::{errors::into_status_error, handlers::UserResponse},
};

/// Set Role Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SetRoleRequest {
    /// `customer` or `admin`
    pub role: String,
}

/// Set User Role Handler
#[endpoint(
    tags("users"),
    summary = "Set User Role",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Role updated"),
        (status_code = StatusCode::NOT_FOUND, description = "User not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    json: JsonBody<SetRoleRequest>,
    depot: &mut Depot,
) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let uuid = uuid.into_inner();
    let role = json
        .into_inner()
        .role
        .parse::<UserRole>()
        .or_400("Unknown role")?;

    let user = state
        .app
        .users
        .set_role(uuid.into(), role)
        .await
        .map_err(into_status_error)?;

    tracing::info!(user_uuid = %uuid, role = %role, "changed user role");

    Ok(Json(user.into()))
}
