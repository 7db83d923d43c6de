pub mod account;
pub mod admin;
pub mod classes;

use axum::{Json, extract::FromRequest, extract::State, response::IntoResponse};
use axum_extra::extract::TypedHeader;
use axum_extra::headers::{Authorization, authorization::Bearer};

use crate::{AppState, error::ApiError};

pub(crate) type BearerHeader = Option<TypedHeader<Authorization<Bearer>>>;

/// `Json` whose rejections are reported as `{"message": ...}` bodies.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

pub(crate) fn bearer(auth: BearerHeader) -> Option<Authorization<Bearer>> {
    auth.map(|TypedHeader(a)| a)
}

#[utoipa::path(get, path = "/", tag = "service")]
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Gym Booking API",
        "endpoints": {
            "/api/auth": "Register, log in and inspect the current user",
            "/api/classes": "List, create and book classes",
            "/api/plans": "Membership plans",
            "/api/admin": "User and plan administration"
        }
    }))
}

#[utoipa::path(get, path = "/healthz/live", tag = "service")]
pub async fn healthz_live() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(
    get,
    path = "/healthz/ready",
    responses(
        (status = 200, description = "Storage reachable"),
        (status = 503, description = "Storage unreachable")
    ),
    tag = "service"
)]
pub async fn healthz_ready(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    state.db.ping().await.map_err(|err| {
        tracing::warn!(error = %err, "readiness check failed");
        ApiError::Unavailable("Storage unavailable".into())
    })?;
    Ok(Json(serde_json::json!({"status": "ok"})))
}
