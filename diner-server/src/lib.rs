//! Diner Dynasty Server - 餐厅预订与点餐后端
//!
//! # 架构概述
//!
//! - **预订** (`reservations`): 空位计算、预订准入 (容量 + 每日上限)
//! - **支付** (`payments`): 支付记录与购物车清理对账、payment intent
//! - **统计** (`stats`): 管理后台统计
//! - **通知** (`notifications`): 支付后异步通知
//! - **数据库** (`db`): 嵌入式 SurrealDB 或内存存储
//! - **认证** (`auth`): JWT 认证
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! diner-server/src/
//! ├── core/           # 配置、状态、错误
//! ├── auth/           # JWT 认证、管理员校验
//! ├── api/            # HTTP 路由和处理器
//! ├── reservations/   # 空位与准入
//! ├── payments/       # 对账与支付网关
//! ├── stats/          # 统计
//! ├── notifications/  # 通知队列与 worker
//! ├── utils/          # 工具函数
//! └── db/             # 仓储层
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod notifications;
pub mod payments;
pub mod reservations;
pub mod stats;
pub mod utils;

// Re-export 公共类型
pub use api::build_app;
pub use auth::{AuthContext, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 加载 `.env` 并初始化日志
pub fn setup_environment() {
    dotenv::dotenv().ok();
    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    let json = std::env::var("LOG_JSON").is_ok_and(|v| v == "1" || v == "true");
    init_logger_with_file(log_level.as_deref(), json, log_dir.as_deref());
}

pub fn print_banner() {
    println!(
        r#"
    ____  _
   / __ \(_)___  ___  _____
  / / / / / __ \/ _ \/ ___/
 / /_/ / / / / /  __/ /
/_____/_/_/ /_/\___/_/
    ____                         __
   / __ \__  ______  ____ ______/ /___  __
  / / / / / / / __ \/ __ `/ ___/ __/ / / /
 / /_/ / /_/ / / / / /_/ (__  ) /_/ /_/ /
/_____/\__, /_/ /_/\__,_/____/\__/\__, /
      /____/                     /____/
    "#
    );
}
