//! Menu API Module
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /menus | GET | 菜单 | 无 |

use axum::{Json, Router, extract::State, routing::get};
use shared::models::MenuItem;

use crate::core::ServerState;
use crate::utils::AppResult;

pub fn router() -> Router<ServerState> {
    Router::new().route("/menus", get(list))
}

/// GET /menus
async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<MenuItem>>> {
    Ok(Json(state.stores.menus.find_all().await?))
}
