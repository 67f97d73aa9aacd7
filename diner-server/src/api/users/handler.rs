//! User API Handlers

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use shared::models::{ADMIN_ROLE, DeleteResult, User, UserCreate};

use crate::auth::AuthContext;
use crate::core::ServerState;
use crate::db::repository::RepoError;
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct AdminCheck {
    pub admin: bool,
}

/// GET /users
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<User>>> {
    Ok(Json(state.stores.users.find_all().await?))
}

/// POST /users - 注册
///
/// An existing email answers `200 {message: "User already exists"}`.
pub async fn register(
    State(state): State<ServerState>,
    Json(user): Json<UserCreate>,
) -> AppResult<Response> {
    if user.email.trim().is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            "email is required",
        ));
    }

    match state.stores.users.insert(user).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, email = %user.email, "User registered");
            Ok(Json(user).into_response())
        }
        Err(RepoError::Duplicate(_)) => Ok(Json(MessageResponse {
            message: "User already exists",
        })
        .into_response()),
        Err(e) => Err(e.into()),
    }
}

/// GET /users/admin/{email}
///
/// Asking about another address answers `{admin: false}`.
pub async fn check_admin(auth: AuthContext, Path(email): Path<String>) -> Json<AdminCheck> {
    Json(AdminCheck {
        admin: auth.email == email && auth.is_admin(),
    })
}

/// PATCH /users/admin/{id} - 设为管理员
pub async fn promote(
    State(state): State<ServerState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> AppResult<Json<User>> {
    let user = state
        .stores
        .users
        .set_role(&id, ADMIN_ROLE)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound).with_detail("id", id.as_str()))?;

    crate::security_log!(
        "INFO",
        "admin_granted",
        user_id = user.id.clone(),
        by = auth.email.clone()
    );
    Ok(Json(user))
}

/// DELETE /users/{id}
pub async fn delete(
    State(state): State<ServerState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteResult>> {
    let deleted = state.stores.users.delete(&id).await?;
    if deleted {
        tracing::info!(user_id = %id, by = %auth.email, "User deleted");
    }
    Ok(Json(DeleteResult::count(usize::from(deleted))))
}
