//! JWT 令牌服务
//!
//! 处理 JWT 令牌的生成、验证和解析。

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};
use shared::models::ADMIN_ROLE;
use thiserror::Error;

use crate::utils::{AppError, AppResult};

/// Minimum accepted length of `JWT_SECRET`
const MIN_SECRET_LEN: usize = 32;

/// JWT 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// JWT 密钥 (应至少 32 字节)
    pub secret: String,
    /// 令牌过期时间 (分钟)
    pub expiration_minutes: i64,
    /// 令牌签发者
    pub issuer: String,
    /// 令牌受众
    pub audience: String,
    /// `true` when no usable `JWT_SECRET` was configured and a random
    /// per-process key is in use
    #[serde(skip)]
    pub ephemeral: bool,
}

impl JwtConfig {
    /// 从环境变量加载
    pub fn from_env() -> Self {
        let (secret, ephemeral) = match std::env::var("JWT_SECRET") {
            Ok(secret) if secret.len() >= MIN_SECRET_LEN => (secret, false),
            Ok(_) => {
                tracing::warn!(
                    "JWT_SECRET shorter than {} characters, using a temporary key",
                    MIN_SECRET_LEN
                );
                (generate_printable_secret(), true)
            }
            Err(_) => {
                tracing::warn!("JWT_SECRET not set, using a temporary key");
                (generate_printable_secret(), true)
            }
        };

        Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60), // 默认 1 小时
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "diner-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "diner-clients".to_string()),
            ephemeral,
        }
    }

    /// Fixed configuration, used by tests
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expiration_minutes: 60,
            issuer: "diner-server".to_string(),
            audience: "diner-clients".to_string(),
            ephemeral: false,
        }
    }
}

/// 生成可打印的随机密钥
pub fn generate_printable_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// 存储在令牌中的 JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 用户邮箱 (Subject)
    pub sub: String,
    pub email: String,
    /// 过期时间戳
    pub exp: i64,
    /// 签发时间戳
    pub iat: i64,
    /// 签发者
    pub iss: String,
    /// 受众
    pub aud: String,
}

/// JWT 错误
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),
}

/// JWT 令牌服务
#[derive(Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    /// 使用指定配置创建新的 JWT 服务
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 为用户生成新令牌
    pub fn generate_token(&self, email: &str) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: email.to_string(),
            email: email.to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// 验证并解码令牌
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// 从 Authorization 头提取令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

/// 当前请求的身份上下文
///
/// 由认证中间件创建：令牌验证一次，角色查询一次，之后注入请求扩展。
///
/// ```ignore
/// async fn handler(auth: AuthContext) -> AppResult<Json<()>> {
///     auth.require_self(&email)?;
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// 已验证的邮箱
    pub email: String,
    /// 用户目录中的角色
    pub role: Option<String>,
}

impl AuthContext {
    pub fn new(email: impl Into<String>, role: Option<String>) -> Self {
        Self {
            email: email.into(),
            role,
        }
    }

    /// 是否管理员
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some(ADMIN_ROLE)
    }

    /// Caller must be `email`
    pub fn require_self(&self, email: &str) -> AppResult<()> {
        if self.email == email {
            Ok(())
        } else {
            Err(AppError::identity_mismatch())
        }
    }

    /// Caller must own the resource or be an admin
    pub fn require_owner_or_admin(&self, owner: &str) -> AppResult<()> {
        if self.email == owner || self.is_admin() {
            Ok(())
        } else {
            Err(AppError::forbidden("Only the owner or an admin may do this"))
        }
    }
}
