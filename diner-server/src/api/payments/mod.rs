//! Payment API Module
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /create-payment-intent | POST | 创建 payment intent | 登录 |
//! | /payments | POST | 记录支付并清理购物车 | 本人 |

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/create-payment-intent", post(handler::create_intent))
        .route("/payments", post(handler::record))
}
