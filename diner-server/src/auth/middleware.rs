//! 认证中间件
//!
//! 为 JWT 认证和授权提供 Axum 中间件

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use http::{HeaderMap, Method};

use crate::auth::{AuthContext, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::{AppError, ErrorCode};

/// Routes reachable without a token
const PUBLIC_ROUTES: &[(Method, &str)] = &[
    (Method::GET, "/"),
    (Method::GET, "/health"),
    (Method::POST, "/jwt"),
    (Method::GET, "/booking-options"),
    (Method::POST, "/users"),
    (Method::GET, "/menus"),
    (Method::GET, "/reviews"),
];

fn is_public_route(method: &Method, path: &str) -> bool {
    PUBLIC_ROUTES
        .iter()
        .any(|(m, p)| m == method && *p == path)
}

/// 认证中间件 - 要求用户登录
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT，查询一次角色，
/// 将 [`AuthContext`] 注入请求扩展。
///
/// # 跳过认证的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 未匹配的路由 (让它们正常返回 404)
/// - [`PUBLIC_ROUTES`]
///
/// # 错误处理
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无 Authorization 头 | 401 Unauthorized |
/// | 令牌过期 | 401 TokenExpired |
/// | 无效令牌 | 401 InvalidToken |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let Some(path) = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
    else {
        return Ok(next.run(req).await);
    };
    if is_public_route(req.method(), &path) {
        return Ok(next.run(req).await);
    }

    let auth = authenticate(&state, req.headers(), &path).await?;
    req.extensions_mut().insert(auth);
    Ok(next.run(req).await)
}

/// Verify the bearer token and resolve the caller's role
pub(crate) async fn authenticate(
    state: &ServerState,
    headers: &HeaderMap,
    path: &str,
) -> Result<AuthContext, AppError> {
    let auth_header = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", path = path.to_string());
            return Err(AppError::unauthorized());
        }
    };

    let claims = match state.jwt_service.validate_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                path = path.to_string()
            );
            return Err(match e {
                JwtError::ExpiredToken => AppError::token_expired(),
                _ => AppError::invalid_token("Invalid token"),
            });
        }
    };

    let role = state.stores.users.find_role(&claims.email).await?;
    Ok(AuthContext::new(claims.email, role))
}

/// 管理员中间件 - 要求管理员角色
///
/// 必须在 [`require_auth`] 之后运行。
///
/// # 错误
///
/// 非管理员返回 403 Forbidden
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let auth = req
        .extensions()
        .get::<AuthContext>()
        .ok_or_else(AppError::unauthorized)?;
    if !auth.is_admin() {
        security_log!(
            "WARN",
            "admin_required",
            email = auth.email.clone(),
            path = req.uri().path().to_string()
        );
        return Err(AppError::new(ErrorCode::AdminRequired));
    }

    Ok(next.run(req).await)
}
