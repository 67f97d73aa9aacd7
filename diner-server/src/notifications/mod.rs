//! 支付通知
//!
//! The reconciler enqueues a [`PaymentNotification`] after the payment
//! commits. A background [`NotificationWorker`] drains the queue and
//! delivers through a [`Notifier`], retrying on its own schedule.
//! Failures are logged and never reach the paying client.

pub mod notifier;
pub mod worker;

pub use notifier::{LogNotifier, Notifier, NotifyError, WebhookNotifier};
pub use worker::NotificationWorker;

use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::mpsc;

/// 通知任务
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentNotification {
    pub payment_id: String,
    pub email: String,
    pub transaction_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub date: String,
}

/// Sending half of the notification queue
#[derive(Clone, Debug)]
pub struct NotificationQueue {
    tx: mpsc::Sender<PaymentNotification>,
}

impl NotificationQueue {
    pub fn new(buffer_size: usize) -> (Self, mpsc::Receiver<PaymentNotification>) {
        let (tx, rx) = mpsc::channel(buffer_size.max(1));
        (Self { tx }, rx)
    }

    /// Fire-and-forget; a full or closed queue only logs
    pub fn enqueue(&self, job: PaymentNotification) {
        if let Err(e) = self.tx.try_send(job) {
            let (reason, job) = match e {
                mpsc::error::TrySendError::Full(job) => ("queue full", job),
                mpsc::error::TrySendError::Closed(job) => ("queue closed", job),
            };
            tracing::error!(
                payment_id = %job.payment_id,
                email = %job.email,
                reason,
                "Payment notification dropped"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(id: &str) -> PaymentNotification {
        PaymentNotification {
            payment_id: id.into(),
            email: "a@x.io".into(),
            transaction_id: "pi_1".into(),
            price: Decimal::new(1500, 2),
            date: "2024-01-01 12:00:00".into(),
        }
    }

    #[tokio::test]
    async fn test_enqueue_never_blocks_when_full() {
        let (queue, mut rx) = NotificationQueue::new(1);
        queue.enqueue(job("p1"));
        queue.enqueue(job("p2"));
        assert_eq!(rx.recv().await.unwrap().payment_id, "p1");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_enqueue_after_close_is_silent() {
        let (queue, rx) = NotificationQueue::new(4);
        drop(rx);
        queue.enqueue(job("p1"));
    }

    #[test]
    fn test_notification_body_shape() {
        let json = serde_json::to_value(job("p1")).unwrap();
        assert_eq!(json["paymentId"], "p1");
        assert_eq!(json["price"], 15.0);
    }
}
