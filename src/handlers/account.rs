use axum::extract::State;
use axum::{Json, http::StatusCode, response::IntoResponse};
use tracing::info;

use super::{ApiJson, BearerHeader, bearer};
use crate::{
    AppState,
    auth::{authenticate, hash_password, issue_token, verify_password},
    error::ApiError,
    models::{AuthResponse, LoginRequest, RegisterRequest, Role, User, UserSummary},
    validation::{normalize_email, validate_registration},
};

/// A concurrent registration can pass the lookup and still hit the unique
/// email index on insert.
fn registration_error(err: sqlx::Error) -> ApiError {
    match err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            ApiError::BadRequest("User already exists".into())
        }
        other => other.into(),
    }
}

fn auth_response(state: &AppState, user: &User) -> Result<AuthResponse, ApiError> {
    Ok(AuthResponse {
        success: true,
        token: issue_token(&state.settings, &user.id)?,
        user: UserSummary::from(user),
    })
}

/// New accounts are always members; any role in the body is ignored.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (status = 400, description = "Invalid input or user already exists")
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let req = validate_registration(body)?;
    let users = state.db.users();

    if users.find_by_email(&req.email).await?.is_some() {
        return Err(ApiError::BadRequest("User already exists".into()));
    }

    let password_hash = hash_password(&state.settings, &req.password)?;
    let user = users
        .create(&req.name, &req.email, &password_hash, Role::Member)
        .await
        .map_err(registration_error)?;
    info!(user_id = %user.id, "user registered");

    Ok((StatusCode::CREATED, Json(auth_response(&state, &user)?)))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = normalize_email(&body.email);
    let invalid = || ApiError::Unauthorized("Invalid credentials".into());

    let user = state
        .db
        .users()
        .find_by_email(&email)
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&body.password, &user.password_hash)? {
        return Err(invalid());
    }

    Ok(Json(auth_response(&state, &user)?))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "The current user", body = User),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn me(
    State(state): State<AppState>,
    auth: BearerHeader,
) -> Result<impl IntoResponse, ApiError> {
    let (_, user) = authenticate(&state, bearer(auth), None).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "user": user,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_db;

    #[tokio::test]
    async fn test_duplicate_insert_maps_to_user_exists() {
        let users = test_db().await.users();
        users
            .create("First", "same@example.com", "hash", Role::Member)
            .await
            .unwrap();
        let err = users
            .create("Second", "same@example.com", "hash", Role::Member)
            .await
            .unwrap_err();

        assert!(matches!(
            registration_error(err),
            ApiError::BadRequest(msg) if msg == "User already exists"
        ));
    }

    #[test]
    fn test_other_storage_errors_stay_internal() {
        assert!(matches!(
            registration_error(sqlx::Error::PoolClosed),
            ApiError::Internal(_)
        ));
    }
}
