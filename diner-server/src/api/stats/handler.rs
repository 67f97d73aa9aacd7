//! Statistics API Handlers

use axum::{Json, extract::State};
use shared::models::{AdminStats, CategoryStat};

use crate::core::ServerState;
use crate::utils::AppResult;

/// GET /admin-stats
pub async fn admin_stats(State(state): State<ServerState>) -> AppResult<Json<AdminStats>> {
    Ok(Json(state.stats.admin_stats().await?))
}

/// GET /order-stats
pub async fn order_stats(State(state): State<ServerState>) -> AppResult<Json<Vec<CategoryStat>>> {
    Ok(Json(state.stats.order_stats_by_category().await?))
}
