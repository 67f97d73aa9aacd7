//! Menu Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Menu item (菜品), read-only reference data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(alias = "uid")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub recipe: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}
