//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 令牌签发
//! - [`bookings`] - 预订与空位查询
//! - [`carts`] - 购物车
//! - [`payments`] - 支付与 payment intent
//! - [`stats`] - 管理统计
//! - [`reconciliation`] - 支付后残留购物车行
//! - [`users`] - 用户管理
//! - [`menus`] - 菜单
//! - [`reviews`] - 评价

pub mod auth;
pub mod bookings;
pub mod carts;
pub mod health;
pub mod menus;
pub mod payments;
pub mod reconciliation;
pub mod reviews;
pub mod stats;
pub mod users;

use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;

use crate::auth::require_auth;
use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};

/// HTTP 请求日志中间件
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();

    tracing::info!(target: "http_access", "{} {} {}", method, uri, status);

    response
}

/// Every route, still expecting state
pub fn routes() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(bookings::router())
        .merge(carts::router())
        .merge(payments::router())
        .merge(stats::router())
        .merge(reconciliation::router())
        .merge(users::router())
        .merge(menus::router())
        .merge(reviews::router())
}

/// Build the complete application
pub fn build_app(state: ServerState) -> Router {
    let timeout = state.config.request_timeout();
    routes()
        // require_auth 内部会跳过公共路由
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
        // Tower HTTP 中间件
        .layer(TimeoutLayer::new(timeout))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        // HTTP 请求日志中间件
        .layer(middleware::from_fn(log_request))
}
