use axum::extract::{Path, Query, State};
use axum::{Json, http::StatusCode, response::IntoResponse};

use super::{ApiJson, BearerHeader, bearer};
use crate::{
    AppState,
    auth::{authenticate, require_role},
    error::ApiError,
    models::{ClassSession, MessageResponse, NewClassSession, Role},
    validation::validate_class,
};

#[derive(Debug, serde::Deserialize)]
pub struct CalendarQuery {
    pub token: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/classes",
    responses((status = 200, description = "All classes, earliest first", body = [ClassSession])),
    tag = "classes"
)]
pub async fn list_classes(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.bookings.list_all().await?))
}

#[utoipa::path(
    post,
    path = "/api/classes",
    request_body = NewClassSession,
    responses(
        (status = 201, description = "Class created", body = ClassSession),
        (status = 400, description = "Invalid class"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Caller is neither admin nor trainer")
    ),
    security(("bearer_auth" = [])),
    tag = "classes"
)]
pub async fn create_class(
    State(state): State<AppState>,
    auth: BearerHeader,
    body: Result<ApiJson<NewClassSession>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let (identity, _) = authenticate(&state, bearer(auth), None).await?;
    require_role(&identity, &[Role::Admin, Role::Trainer])?;

    let ApiJson(body) = body?;
    let new = validate_class(body)?;
    let session = state.bookings.create(&new).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

#[utoipa::path(
    delete,
    path = "/api/classes/{id}",
    params(("id" = String, Path, description = "Class id")),
    responses(
        (status = 200, description = "Class removed", body = MessageResponse),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Class not found")
    ),
    security(("bearer_auth" = [])),
    tag = "classes"
)]
pub async fn delete_class(
    State(state): State<AppState>,
    auth: BearerHeader,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let (identity, _) = authenticate(&state, bearer(auth), None).await?;
    require_role(&identity, &[Role::Admin])?;

    state.bookings.delete(&id).await?;
    Ok(Json(MessageResponse::new("Class removed")))
}

#[utoipa::path(
    get,
    path = "/api/classes/mine",
    responses(
        (status = 200, description = "Classes the caller has booked", body = [ClassSession]),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "classes"
)]
pub async fn my_classes(
    State(state): State<AppState>,
    auth: BearerHeader,
) -> Result<impl IntoResponse, ApiError> {
    let (identity, _) = authenticate(&state, bearer(auth), None).await?;
    Ok(Json(state.bookings.list_for_user(&identity.user_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/classes/mine.ical",
    params(("token" = Option<String>, Query, description = "Authentication token (alternative to Bearer header)")),
    responses(
        (status = 200, description = "iCal file", content_type = "text/calendar"),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "classes"
)]
pub async fn my_classes_ical(
    State(state): State<AppState>,
    auth: BearerHeader,
    Query(query): Query<CalendarQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (identity, _) = authenticate(&state, bearer(auth), query.token.as_deref()).await?;

    let mut classes = state.bookings.list_for_user(&identity.user_id).await?;
    classes.sort_by(|a, b| a.start_time.cmp(&b.start_time));
    let body = state.exporter.generate(&classes);

    Ok((
        StatusCode::OK,
        [
            ("content-type", "text/calendar"),
            ("content-disposition", "attachment; filename=my_classes.ics"),
        ],
        body,
    ))
}

#[utoipa::path(
    post,
    path = "/api/classes/{id}/book",
    params(("id" = String, Path, description = "Class id")),
    responses(
        (status = 200, description = "Class booked successfully", body = MessageResponse),
        (status = 400, description = "Already booked, or class is full", body = MessageResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Class not found", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "classes"
)]
pub async fn book_class(
    State(state): State<AppState>,
    auth: BearerHeader,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let (identity, _) = authenticate(&state, bearer(auth), None).await?;
    state.bookings.book(&id, &identity.user_id).await?;
    Ok(Json(MessageResponse::new("Class booked successfully")))
}

#[utoipa::path(
    delete,
    path = "/api/classes/{id}/book",
    params(("id" = String, Path, description = "Class id")),
    responses(
        (status = 200, description = "Booking cancelled", body = MessageResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Class not found", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "classes"
)]
pub async fn cancel_booking(
    State(state): State<AppState>,
    auth: BearerHeader,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let (identity, _) = authenticate(&state, bearer(auth), None).await?;
    state.bookings.cancel(&id, &identity.user_id).await?;
    Ok(Json(MessageResponse::new("Booking cancelled")))
}
