//! User API Module
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /users | GET | 全部用户 | 管理员 |
//! | /users | POST | 注册 (已存在时返回提示) | 无 |
//! | /users/admin/{email} | GET | 调用者是否管理员 | 登录 |
//! | /users/admin/{id} | PATCH | 设为管理员 | 管理员 |
//! | /users/{id} | DELETE | 删除用户 | 管理员 |

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, patch},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let open_routes = Router::new()
        .route("/users", axum::routing::post(handler::register))
        .route("/users/admin/{id}", get(handler::check_admin));

    let admin_routes = Router::new()
        .route("/users", get(handler::list))
        .route("/users/admin/{id}", patch(handler::promote))
        .route("/users/{id}", delete(handler::delete))
        .layer(middleware::from_fn(require_admin));

    open_routes.merge(admin_routes)
}
