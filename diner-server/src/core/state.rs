use std::sync::Arc;
use std::time::Duration;

use chrono_tz::Tz;
use shared::models::CapacityOption;

use crate::auth::JwtService;
use crate::core::{Config, Result, ServerError, StoreBackend};
use crate::db::DbService;
use crate::db::repository::Stores;
use crate::notifications::{
    LogNotifier, NotificationQueue, NotificationWorker, Notifier, WebhookNotifier,
};
use crate::payments::{PaymentGateway, PaymentReconciler, StripeGateway};
use crate::reservations::{AdmissionController, AvailabilityService, CapacityCache};
use crate::stats::StatsAggregator;
use crate::utils::time::parse_tz;

/// First retry delay of the notification worker
const NOTIFY_BASE_DELAY: Duration = Duration::from_millis(500);

/// 服务器状态 - 持有所有服务的引用
///
/// ServerState 是 Clone 的，所有字段都使用 Arc 包装，
/// 克隆成本极低 (仅增加引用计数)。
///
/// # 字段说明
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 服务器配置 (不可变) |
/// | stores | 各实体仓储 |
/// | jwt_service | JWT 令牌服务 |
/// | capacity | 座位配置缓存 |
/// | availability | 空位计算 |
/// | admission | 预订准入控制 |
/// | reconciler | 支付对账 |
/// | stats | 管理统计 |
/// | gateway | 支付网关，未配置时为 None |
/// | tz | 营业时区 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub stores: Stores,
    pub jwt_service: Arc<JwtService>,
    pub capacity: Arc<CapacityCache>,
    pub availability: Arc<AvailabilityService>,
    pub admission: Arc<AdmissionController>,
    pub reconciler: Arc<PaymentReconciler>,
    pub stats: Arc<StatsAggregator>,
    pub gateway: Option<Arc<dyn PaymentGateway>>,
    pub tz: Tz,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按以下顺序初始化:
    /// 1. 打开存储 (SurrealDB 或内存)
    /// 2. 构建服务并启动通知 worker
    /// 3. 导入座位配置 (`CAPACITY_SEED_FILE`)
    pub async fn initialize(config: &Config) -> Result<Self> {
        let stores = match config.store_backend {
            StoreBackend::Surreal => {
                std::fs::create_dir_all(&config.data_dir)?;
                let db = DbService::new(&config.data_dir).await?;
                Stores::surreal(db.db)
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory store, data is lost on exit");
                Stores::memory()
            }
        };

        let notifier: Arc<dyn Notifier> = match &config.notify_webhook_url {
            Some(url) => Arc::new(WebhookNotifier::new(url.clone())),
            None => Arc::new(LogNotifier),
        };

        let mut state = Self::with_stores(config.clone(), stores, notifier);
        if let Some(secret_key) = &config.payment_gateway_sk {
            state = state.with_gateway(Arc::new(StripeGateway::new(
                config.payment_gateway_url.clone(),
                secret_key.clone(),
            )));
        } else {
            tracing::warn!("PAYMENT_GATEWAY_SK not set, payment intents are disabled");
        }

        if let Some(path) = &config.capacity_seed_file {
            state.seed_capacity(path).await?;
        }

        Ok(state)
    }

    /// Build every service over `stores` and spawn the notification worker
    ///
    /// Must be called inside a Tokio runtime.
    pub fn with_stores(config: Config, stores: Stores, notifier: Arc<dyn Notifier>) -> Self {
        let tz = parse_tz(&config.business_tz);
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        let capacity = Arc::new(CapacityCache::new(
            stores.capacity.clone(),
            config.capacity_cache_ttl(),
        ));
        let availability = Arc::new(AvailabilityService::new(
            capacity.clone(),
            stores.bookings.clone(),
        ));
        let admission = Arc::new(AdmissionController::new(
            stores.capacity.clone(),
            stores.bookings.clone(),
            config.daily_booking_limit,
        ));

        let (notifications, rx) = NotificationQueue::new(config.notify_queue_size);
        let worker = NotificationWorker::new(notifier, config.notify_max_attempts, NOTIFY_BASE_DELAY);
        tokio::spawn(worker.run(rx));

        let reconciler = Arc::new(PaymentReconciler::new(
            stores.carts.clone(),
            stores.payments.clone(),
            notifications,
            tz,
        ));
        let stats = Arc::new(StatsAggregator::new(stores.stats.clone()));

        Self {
            config: Arc::new(config),
            stores,
            jwt_service,
            capacity,
            availability,
            admission,
            reconciler,
            stats,
            gateway: None,
            tz,
        }
    }

    pub fn with_gateway(mut self, gateway: Arc<dyn PaymentGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Load `Vec<CapacityOption>` JSON and upsert every option
    async fn seed_capacity(&self, path: &std::path::Path) -> Result<()> {
        let raw = std::fs::read_to_string(path)?;
        let options: Vec<CapacityOption> = serde_json::from_str(&raw).map_err(|e| {
            ServerError::Config(format!("Invalid capacity seed {}: {}", path.display(), e))
        })?;
        let count = options.len();
        for option in options {
            self.capacity.store(option).await?;
        }
        tracing::info!(path = %path.display(), count, "Capacity catalog seeded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_seed_capacity_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"guests":2,"timeSlots":[{{"slot":"18:00","capacity":3}}]}}]"#
        )
        .unwrap();

        let mut config = Config::for_tests();
        config.capacity_seed_file = Some(file.path().to_path_buf());

        let state = ServerState::initialize(&config).await.unwrap();
        let option = state.capacity.get(2).await.unwrap().unwrap();
        assert_eq!(option.capacity_of("18:00"), Some(3));
        assert!(state.gateway.is_none());
    }

    #[tokio::test]
    async fn test_invalid_seed_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let mut config = Config::for_tests();
        config.capacity_seed_file = Some(file.path().to_path_buf());

        let result = ServerState::initialize(&config).await;
        assert!(matches!(result, Err(ServerError::Config(_))));
    }
}
