//! Statistics API Module
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /admin-stats | GET | 用户/菜品/订单数与营收 | 管理员 |
//! | /order-stats | GET | 按分类的销售统计 | 管理员 |

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/admin-stats", get(handler::admin_stats))
        .route("/order-stats", get(handler::order_stats))
        .layer(middleware::from_fn(require_admin))
}
