//! Payment Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Settled checkout (支付记录)
///
/// Append-only: created once per successful checkout, never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(alias = "uid")]
    pub id: String,
    #[serde(rename = "email")]
    pub user_email: String,
    pub transaction_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub quantity: u32,
    /// Cart lines this payment settles
    pub cart_items: Vec<String>,
    /// Menu items purchased (one entry per unit)
    pub menu_items: Vec<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Human-readable timestamp, e.g. `2024-01-01 18:30:00`
    pub date: String,
    /// Unix millis
    pub created_at: i64,
}

/// Checkout payload sent after the gateway confirmed the charge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    #[serde(rename = "email")]
    pub user_email: String,
    pub transaction_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub cart_items: Vec<String>,
    #[serde(default)]
    pub menu_items: Vec<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Identity of the inserted payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResult {
    pub acknowledged: bool,
    pub inserted_id: String,
}

/// Cart lines removed by a settlement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub removed_ids: Vec<String>,
}

impl DeleteResult {
    pub fn removed(ids: Vec<String>) -> Self {
        Self {
            acknowledged: true,
            deleted_count: ids.len(),
            removed_ids: ids,
        }
    }

    pub fn count(deleted_count: usize) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
            removed_ids: Vec::new(),
        }
    }
}

/// Response of `POST /payments`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub insert_result: InsertResult,
    pub deleted_result: DeleteResult,
}

/// Payment-intent request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntentRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// Client secret handed to the payer's browser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub client_secret: String,
}
