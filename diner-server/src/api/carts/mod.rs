//! Cart API Module
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /carts?email= | GET | 本人的购物车 | 本人 |
//! | /carts | POST | 加入购物车 | 本人 |
//! | /carts/{id} | DELETE | 删除本人的购物车行 | 本人 |

mod handler;

use axum::{
    Router,
    routing::{delete, get},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/carts", get(handler::list).post(handler::create))
        .route("/carts/{id}", delete(handler::delete))
}
