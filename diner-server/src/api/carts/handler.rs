//! Cart API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{CartLine, CartLineCreate, DeleteResult};

use crate::auth::AuthContext;
use crate::core::ServerState;
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct CartQuery {
    email: Option<String>,
}

/// GET /carts?email= - 没有 email 时返回空列表
pub async fn list(
    State(state): State<ServerState>,
    auth: AuthContext,
    Query(query): Query<CartQuery>,
) -> AppResult<Json<Vec<CartLine>>> {
    let Some(email) = query.email.filter(|e| !e.is_empty()) else {
        return Ok(Json(Vec::new()));
    };
    auth.require_self(&email)?;

    let lines = state.stores.carts.find_by_email(&email).await?;
    Ok(Json(lines))
}

/// POST /carts
pub async fn create(
    State(state): State<ServerState>,
    auth: AuthContext,
    Json(line): Json<CartLineCreate>,
) -> AppResult<Json<CartLine>> {
    auth.require_self(&line.user_email)?;
    let line = state.stores.carts.insert(line).await?;
    tracing::debug!(cart_line = %line.id, email = %line.user_email, "Cart line added");
    Ok(Json(line))
}

/// DELETE /carts/{id} - 只删除调用者自己的行
pub async fn delete(
    State(state): State<ServerState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteResult>> {
    let deleted = state.stores.carts.delete_owned(&id, &auth.email).await?;
    Ok(Json(DeleteResult::count(usize::from(deleted))))
}
