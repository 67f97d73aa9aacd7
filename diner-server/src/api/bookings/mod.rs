//! Booking API Module
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /booking-options | GET | 某日某人数的空位 | 无 |
//! | /bookings | GET | 全部预订 | 管理员 |
//! | /bookings | POST | 提交预订 | 本人 |
//! | /bookings/{email} | GET | 用户的预订 | 本人 |
//! | /bookings/{id} | PATCH | 确认预订 | 管理员 |
//! | /bookings/{id}/cancel | PATCH | 取消预订 | 本人或管理员 |
//! | /bookings/{id} | DELETE | 删除预订 | 本人或管理员 |
//!
//! `/bookings/{email}` and `/bookings/{id}` share one path pattern; the
//! method decides how the segment is read.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, patch},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let user_routes = Router::new()
        .route("/booking-options", get(handler::booking_options))
        .route("/bookings", axum::routing::post(handler::create))
        .route(
            "/bookings/{id}",
            get(handler::list_by_email).delete(handler::delete),
        )
        .route("/bookings/{id}/cancel", patch(handler::cancel));

    let admin_routes = Router::new()
        .route("/bookings", get(handler::list))
        .route("/bookings/{id}", patch(handler::confirm))
        .layer(middleware::from_fn(require_admin));

    user_routes.merge(admin_routes)
}
