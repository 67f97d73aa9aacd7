//! Token API Handlers

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult, ErrorCode};

/// 签发请求
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /jwt - 为邮箱签发令牌
///
/// The identity provider has already verified the address on the client.
pub async fn issue_token(
    State(state): State<ServerState>,
    Json(req): Json<TokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    let email = req.email.trim();
    if email.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            "email is required",
        ));
    }

    let token = state.jwt_service.generate_token(email).map_err(|e| {
        tracing::error!(error = %e, "Failed to generate token");
        AppError::internal("Failed to generate token")
    })?;

    tracing::info!(email = %email, "Token issued");
    Ok(Json(TokenResponse { token }))
}
