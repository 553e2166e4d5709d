use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use warden_auth::{AuthError, CurrentUser, UserDirectory};

use crate::server::AppState;

#[derive(Serialize)]
pub struct StatusResponse<'a> {
    status: &'a str,
}

#[derive(Serialize)]
pub struct StatsResponse {
    users: usize,
}

pub async fn status() -> impl IntoResponse {
    (StatusCode::OK, Json(StatusResponse { status: "OK" }))
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AuthError> {
    let users = state.directory.count().await?;
    Ok(Json(StatsResponse { users }))
}

/// Always rejects with 401, for clients to exercise their error handling.
pub async fn unauthorized() -> AuthError {
    AuthError::Unauthorized
}

/// Always rejects with 403.
pub async fn forbidden() -> AuthError {
    AuthError::Forbidden
}

pub async fn list_users(State(state): State<AppState>) -> Result<Response, AuthError> {
    let users = state.directory.list().await?;
    Ok(Json(users).into_response())
}

/// The authenticated user, or 404 when the request is unauthenticated
/// (authentication disabled or an exempt path).
pub async fn current_user(user: Option<CurrentUser>) -> Response {
    match user {
        Some(CurrentUser(user)) => Json(user).into_response(),
        None => not_found().await,
    }
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AuthError> {
    Ok(match state.directory.get(&id).await? {
        Some(user) => Json(user).into_response(),
        None => not_found().await,
    })
}

pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response()
}
