//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] - 应用错误类型 (from shared::error)
//! - [`logger`] - 日志初始化
//! - [`time`] - 营业时区日期

pub mod error;
pub mod logger;
pub mod result;
pub mod time;

pub use error::{ApiResponse, AppError, ErrorCategory, ErrorCode};
pub use result::AppResult;
