//! Reconciliation API Module
//!
//! Cart lines that outlived the payment settling them.
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /reconciliation/unsettled | GET | 列出残留购物车行 | 管理员 |
//! | /reconciliation/sweep | POST | 删除残留购物车行 | 管理员 |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/reconciliation/unsettled", get(handler::unsettled))
        .route("/reconciliation/sweep", post(handler::sweep))
        .layer(middleware::from_fn(require_admin))
}
