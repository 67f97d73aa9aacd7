//! Cart Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One line in a user's cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    #[serde(alias = "uid")]
    pub id: String,
    #[serde(rename = "email")]
    pub user_email: String,
    pub menu_item_id: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

/// Add-to-cart payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineCreate {
    #[serde(rename = "email")]
    pub user_email: String,
    pub menu_item_id: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}
