//! AuthContext Extractor
//!
//! Handlers take [`AuthContext`] as an argument. The context normally
//! comes from [`require_auth`](super::require_auth); otherwise the token
//! is validated here.

use axum::{
    extract::{FromRequestParts, MatchedPath},
    http::request::Parts,
};

use super::AuthContext;
use super::middleware::authenticate;
use crate::core::ServerState;
use crate::utils::AppError;

impl FromRequestParts<ServerState> for AuthContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Check if already extracted (from middleware)
        if let Some(auth) = parts.extensions.get::<AuthContext>() {
            return Ok(auth.clone());
        }

        let path = parts
            .extensions
            .get::<MatchedPath>()
            .map(|p| p.as_str().to_string())
            .unwrap_or_else(|| parts.uri.path().to_string());
        let auth = authenticate(state, &parts.headers, &path).await?;

        // Store in extensions for potential reuse
        parts.extensions.insert(auth.clone());
        Ok(auth)
    }
}
