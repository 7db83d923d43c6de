use axum::extract::{Path, State};
use axum::{Json, http::StatusCode, response::IntoResponse};
use tracing::info;

use super::{ApiJson, BearerHeader, bearer};
use crate::{
    AppState,
    auth::{authenticate, require_role},
    error::ApiError,
    models::{MessageResponse, NewPlan, Plan, Role, RoleUpdate, User},
    validation::validate_plan,
};

#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses(
        (status = 200, description = "All users", body = [User]),
        (status = 403, description = "Caller is not an admin")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn list_users(
    State(state): State<AppState>,
    auth: BearerHeader,
) -> Result<impl IntoResponse, ApiError> {
    let (identity, _) = authenticate(&state, bearer(auth), None).await?;
    require_role(&identity, &[Role::Admin])?;

    Ok(Json(state.db.users().find_all().await?))
}

/// A body without `role` leaves the role unchanged.
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/role",
    params(("id" = String, Path, description = "User id")),
    request_body = RoleUpdate,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn update_user_role(
    State(state): State<AppState>,
    auth: BearerHeader,
    Path(id): Path<String>,
    body: Result<ApiJson<RoleUpdate>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let (identity, _) = authenticate(&state, bearer(auth), None).await?;
    require_role(&identity, &[Role::Admin])?;
    let ApiJson(body) = body?;

    let users = state.db.users();
    let not_found = || ApiError::NotFound("User not found".into());
    let current = users.find_by_id(&id).await?.ok_or_else(not_found)?;

    let role = body.role.unwrap_or(current.role);
    let updated = users.update_role(&id, role).await?.ok_or_else(not_found)?;
    info!(user_id = %id, role = role.as_str(), by = %identity.user_id, "user role updated");

    Ok(Json(updated))
}

#[utoipa::path(
    get,
    path = "/api/plans",
    responses((status = 200, description = "All membership plans", body = [Plan])),
    tag = "plans"
)]
pub async fn list_plans(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.db.plans().find_all().await?))
}

#[utoipa::path(
    post,
    path = "/api/admin/plans",
    request_body = NewPlan,
    responses(
        (status = 201, description = "Plan created", body = Plan),
        (status = 400, description = "Invalid plan"),
        (status = 403, description = "Caller is not an admin")
    ),
    security(("bearer_auth" = [])),
    tag = "plans"
)]
pub async fn create_plan(
    State(state): State<AppState>,
    auth: BearerHeader,
    body: Result<ApiJson<NewPlan>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let (identity, _) = authenticate(&state, bearer(auth), None).await?;
    require_role(&identity, &[Role::Admin])?;

    let ApiJson(body) = body?;
    let new = validate_plan(body)?;
    let plan = state.db.plans().create(&new).await?;
    info!(plan_id = %plan.id, name = %plan.name, "plan created");

    Ok((StatusCode::CREATED, Json(plan)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/plans/{id}",
    params(("id" = String, Path, description = "Plan id")),
    responses(
        (status = 200, description = "Plan removed", body = MessageResponse),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Plan not found")
    ),
    security(("bearer_auth" = [])),
    tag = "plans"
)]
pub async fn delete_plan(
    State(state): State<AppState>,
    auth: BearerHeader,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let (identity, _) = authenticate(&state, bearer(auth), None).await?;
    require_role(&identity, &[Role::Admin])?;

    if !state.db.plans().delete_by_id(&id).await? {
        return Err(ApiError::NotFound("Plan not found".into()));
    }
    Ok(Json(MessageResponse::new("Plan removed")))
}
