use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
    Extension, Json,
};
use models::{User, UserList};
use serde::{Deserialize, Serialize};
use service::errors::ServiceError;
use service::user_service::{CreateUserInput, UpdateUserInput};
use tracing::debug;

use crate::errors::ApiError;
use crate::routes::AppState;

/// The user addressed by the path id, looked up once per request by
/// [`resolve_user`] and handed to the handler behind it.
#[derive(Clone, Debug)]
pub struct ResolvedUser(pub User);

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatedUser {
    pub user_id: String,
}

/// Middleware: load the store and look up `:id`; a miss answers with the
/// not-found error and the wrapped handler never runs. An id that cannot
/// be extracted (bad percent-encoding) gets the same error envelope.
pub async fn resolve_user(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Path(id) = path.map_err(|e| ServiceError::Validation(e.body_text()))?;
    let user = state.users.resolve(&id).await?;
    debug!(user_id = %user.id, "user resolved");
    req.extensions_mut().insert(ResolvedUser(user));
    Ok(next.run(req).await)
}

pub async fn search_users(State(state): State<AppState>) -> Result<Json<UserList>, ApiError> {
    let users = state.users.search().await?;
    Ok(Json(users))
}

pub async fn create_user(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreatedUser>), ApiError> {
    let user_id = state
        .users
        .create(|| CreateUserInput::from_json(&body))
        .await?;
    Ok((StatusCode::CREATED, Json(CreatedUser { user_id })))
}

pub async fn get_user(Extension(ResolvedUser(user)): Extension<ResolvedUser>) -> Json<User> {
    Json(user)
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(ResolvedUser(user)): Extension<ResolvedUser>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    state
        .users
        .update(user, || UpdateUserInput::from_json(&body))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(ResolvedUser(user)): Extension<ResolvedUser>,
) -> Result<StatusCode, ApiError> {
    state.users.delete(&user).await?;
    Ok(StatusCode::NO_CONTENT)
}
