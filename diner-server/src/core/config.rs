use std::path::PathBuf;
use std::time::Duration;

use crate::auth::JwtConfig;
use crate::core::{Result, ServerError};

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Embedded SurrealDB under `DATA_DIR`
    Surreal,
    /// Process-local maps, lost on exit
    Memory,
}

impl StoreBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "surreal" | "surrealdb" => Some(Self::Surreal),
            "memory" | "mem" => Some(Self::Memory),
            _ => None,
        }
    }
}

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 5000 | HTTP 服务端口 |
/// | DATA_DIR | ./data | 数据目录 |
/// | STORE_BACKEND | surreal | surreal \| memory |
/// | ENVIRONMENT | development | 运行环境 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | DAILY_BOOKING_LIMIT | 2 | 每人每天可创建的预订数 |
/// | BUSINESS_TZ | UTC | 营业时区 (IANA) |
/// | CAPACITY_CACHE_TTL_SECS | 30 | 座位配置缓存时长 |
/// | CAPACITY_SEED_FILE | - | 启动时导入的座位配置 JSON |
/// | NOTIFY_WEBHOOK_URL | - | 支付通知 webhook，未设置时写日志 |
/// | NOTIFY_QUEUE_SIZE | 256 | 通知队列容量 |
/// | NOTIFY_MAX_ATTEMPTS | 3 | 通知最大尝试次数 |
/// | PAYMENT_GATEWAY_SK | - | 支付网关密钥，未设置时禁用 payment intent |
/// | PAYMENT_GATEWAY_URL | https://api.stripe.com | 支付网关地址 |
/// | LOG_LEVEL / LOG_DIR / LOG_JSON | info / - / false | 日志, 由 `setup_environment` 读取 |
/// | JWT_SECRET 等 | - | 见 [`JwtConfig`] |
///
/// # 示例
///
/// ```ignore
/// DATA_DIR=/var/lib/diner HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub data_dir: PathBuf,
    pub store_backend: StoreBackend,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub request_timeout_ms: u64,
    pub daily_booking_limit: u32,
    pub business_tz: String,
    pub capacity_cache_ttl_secs: u64,
    pub capacity_seed_file: Option<PathBuf>,
    pub notify_webhook_url: Option<String>,
    pub notify_queue_size: usize,
    pub notify_max_attempts: u32,
    pub payment_gateway_sk: Option<String>,
    pub payment_gateway_url: String,
    /// JWT 认证配置
    pub jwt: JwtConfig,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let store_backend = match env_opt("STORE_BACKEND") {
            Some(v) => StoreBackend::parse(&v).unwrap_or_else(|| {
                tracing::warn!("Unknown STORE_BACKEND '{}', using surreal", v);
                StoreBackend::Surreal
            }),
            None => StoreBackend::Surreal,
        };

        Self {
            http_port: env_parse("HTTP_PORT", 5000),
            data_dir: env_opt("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./data")),
            store_backend,
            environment: env_opt("ENVIRONMENT").unwrap_or_else(|| "development".into()),
            request_timeout_ms: env_parse("REQUEST_TIMEOUT_MS", 30000),
            daily_booking_limit: env_parse("DAILY_BOOKING_LIMIT", 2),
            business_tz: env_opt("BUSINESS_TZ").unwrap_or_else(|| "UTC".into()),
            capacity_cache_ttl_secs: env_parse("CAPACITY_CACHE_TTL_SECS", 30),
            capacity_seed_file: env_opt("CAPACITY_SEED_FILE").map(PathBuf::from),
            notify_webhook_url: env_opt("NOTIFY_WEBHOOK_URL"),
            notify_queue_size: env_parse("NOTIFY_QUEUE_SIZE", 256),
            notify_max_attempts: env_parse("NOTIFY_MAX_ATTEMPTS", 3),
            payment_gateway_sk: env_opt("PAYMENT_GATEWAY_SK"),
            payment_gateway_url: env_opt("PAYMENT_GATEWAY_URL")
                .unwrap_or_else(|| crate::payments::gateway::DEFAULT_GATEWAY_URL.into()),
            jwt: JwtConfig::from_env(),
        }
    }

    /// In-memory configuration with fixed secrets, used by tests
    pub fn for_tests() -> Self {
        Self {
            http_port: 0,
            data_dir: PathBuf::from("./data"),
            store_backend: StoreBackend::Memory,
            environment: "test".into(),
            request_timeout_ms: 30000,
            daily_booking_limit: 2,
            business_tz: "UTC".into(),
            capacity_cache_ttl_secs: 0,
            capacity_seed_file: None,
            notify_webhook_url: None,
            notify_queue_size: 64,
            notify_max_attempts: 1,
            payment_gateway_sk: None,
            payment_gateway_url: crate::payments::gateway::DEFAULT_GATEWAY_URL.into(),
            jwt: JwtConfig::with_secret("test-secret-test-secret-test-secret-0123"),
        }
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.daily_booking_limit == 0 {
            return Err(ServerError::Config(
                "DAILY_BOOKING_LIMIT must be at least 1".into(),
            ));
        }
        if self.is_production() && self.jwt.ephemeral {
            return Err(ServerError::Config(
                "JWT_SECRET (at least 32 characters) must be set in production".into(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn capacity_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.capacity_cache_ttl_secs)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
