//! Review API Module
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /reviews | GET | 评价 | 无 |

use axum::{Json, Router, extract::State, routing::get};
use shared::models::Review;

use crate::core::ServerState;
use crate::utils::AppResult;

pub fn router() -> Router<ServerState> {
    Router::new().route("/reviews", get(list))
}

/// GET /reviews
async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Review>>> {
    Ok(Json(state.stores.reviews.find_all().await?))
}
