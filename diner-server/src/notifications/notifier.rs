//! Notification delivery

use async_trait::async_trait;
use thiserror::Error;

use super::PaymentNotification;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notification transport failed: {0}")]
    Transport(String),

    #[error("Notification rejected with status {0}")]
    Rejected(u16),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &PaymentNotification) -> Result<(), NotifyError>;
}

/// Writes the notification to the log, used when no webhook is configured
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &PaymentNotification) -> Result<(), NotifyError> {
        tracing::info!(
            target: "notifications",
            payment_id = %notification.payment_id,
            email = %notification.email,
            price = %notification.price,
            "Payment confirmation"
        );
        Ok(())
    }
}

/// POSTs the notification as JSON to a webhook (mail relay etc.)
pub struct WebhookNotifier {
    url: String,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, notification: &PaymentNotification) -> Result<(), NotifyError> {
        let resp = self
            .client
            .post(&self.url)
            .json(notification)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(NotifyError::Rejected(resp.status().as_u16()));
        }
        Ok(())
    }
}
