//! 统一错误处理
//!
//! Re-exports the shared error-code system and wires repository errors
//! into it.
//!
//! # 使用示例
//!
//! ```ignore
//! // 返回错误
//! Err(AppError::new(ErrorCode::BookingNotFound))
//!
//! // 仓储错误自动转换
//! let bookings = state.bookings.find_by_email(&email).await?;
//! ```

pub use shared::error::{ApiResponse, AppError, ErrorCategory, ErrorCode};

use crate::db::repository::RepoError;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_error_mapping() {
        let err: AppError = RepoError::Database("connection reset".into()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(err.is_retryable());

        let err: AppError = RepoError::NotFound("booking:1".into()).into();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err: AppError = RepoError::Validation("bad id".into()).into();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
