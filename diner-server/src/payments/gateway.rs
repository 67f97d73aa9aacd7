//! Payment gateway proxy
//!
//! Creates a payment intent upstream and hands the client secret back to
//! the payer's client, which completes the charge before `/payments`.

use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;

use crate::utils::{AppError, AppResult, ErrorCode};

pub const DEFAULT_GATEWAY_URL: &str = "https://api.stripe.com";

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create an intent for `price` (major currency units), returning the
    /// opaque client secret
    async fn create_intent(&self, price: Decimal) -> AppResult<String>;
}

/// Amount in minor units (cents)
pub fn to_minor_units(price: Decimal) -> AppResult<i64> {
    if price <= Decimal::ZERO {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            "price must be positive",
        ));
    }
    (price * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(|| AppError::with_message(ErrorCode::InvalidAmount, "price out of range"))
}

#[derive(Debug, Deserialize)]
struct IntentResponse {
    client_secret: String,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorBody {
    error: GatewayErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

/// Stripe `POST /v1/payment_intents`
pub struct StripeGateway {
    base_url: String,
    secret_key: String,
    client: reqwest::Client,
}

impl StripeGateway {
    pub fn new(base_url: String, secret_key: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            secret_key,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_intent(&self, price: Decimal) -> AppResult<String> {
        let amount = to_minor_units(price)?;
        let form = [
            ("amount", amount.to_string()),
            ("currency", "usd".to_string()),
            ("payment_method_types[]", "card".to_string()),
        ];

        let resp = self
            .client
            .post(format!("{}/v1/payment_intents", self.base_url))
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await
            .map_err(|e| AppError::gateway(format!("Payment gateway unreachable: {}", e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let message = resp
                .json::<GatewayErrorBody>()
                .await
                .ok()
                .and_then(|b| b.error.message)
                .unwrap_or_else(|| status.to_string());
            tracing::warn!(status = %status, %message, "Payment intent rejected upstream");
            return Err(AppError::gateway(format!("Payment intent failed: {}", message))
                .with_detail("status", status.as_u16()));
        }

        let intent: IntentResponse = resp
            .json()
            .await
            .map_err(|e| AppError::gateway(format!("Invalid gateway response: {}", e)))?;
        Ok(intent.client_secret)
    }
}
