//! 通知后台 Worker
//!
//! 从 mpsc 通道消费通知任务，失败时按指数退避重试。
//! 通道关闭时自动退出。

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use super::{Notifier, PaymentNotification};

pub struct NotificationWorker {
    notifier: Arc<dyn Notifier>,
    max_attempts: u32,
    base_delay: Duration,
}

impl NotificationWorker {
    pub fn new(notifier: Arc<dyn Notifier>, max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            notifier,
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// 运行 worker（阻塞直到通道关闭）
    pub async fn run(self, mut rx: mpsc::Receiver<PaymentNotification>) {
        tracing::info!("Notification worker started");

        while let Some(job) = rx.recv().await {
            self.deliver(&job).await;
        }

        tracing::info!("Notification channel closed, worker stopping");
    }

    /// Returns whether delivery eventually succeeded
    async fn deliver(&self, job: &PaymentNotification) -> bool {
        for attempt in 1..=self.max_attempts {
            match self.notifier.send(job).await {
                Ok(()) => {
                    tracing::debug!(payment_id = %job.payment_id, attempt, "Notification delivered");
                    return true;
                }
                Err(e) if attempt < self.max_attempts => {
                    let delay = self.base_delay * 2u32.saturating_pow(attempt - 1);
                    tracing::warn!(
                        payment_id = %job.payment_id,
                        attempt,
                        error = %e,
                        "Notification failed, retrying in {:?}",
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    tracing::error!(
                        payment_id = %job.payment_id,
                        email = %job.email,
                        attempts = self.max_attempts,
                        error = %e,
                        "Notification abandoned"
                    );
                }
            }
        }
        false
    }
}
