//! Reconciliation API Handlers

use axum::{Json, extract::State};
use shared::models::{CartLine, DeleteResult};

use crate::auth::AuthContext;
use crate::core::ServerState;
use crate::utils::AppResult;

/// GET /reconciliation/unsettled
pub async fn unsettled(State(state): State<ServerState>) -> AppResult<Json<Vec<CartLine>>> {
    Ok(Json(state.reconciler.find_unsettled().await?))
}

/// POST /reconciliation/sweep
pub async fn sweep(
    State(state): State<ServerState>,
    auth: AuthContext,
) -> AppResult<Json<DeleteResult>> {
    let result = state.reconciler.sweep().await?;
    tracing::info!(admin = %auth.email, deleted = result.deleted_count, "Reconciliation sweep");
    Ok(Json(result))
}
