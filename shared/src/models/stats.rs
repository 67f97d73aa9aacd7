//! Statistics Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Dashboard counters (`GET /admin-stats`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminStats {
    pub users: u64,
    pub menus: u64,
    pub orders: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
}

/// Sales of one menu category (`GET /order-stats`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStat {
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub item_count: u64,
}
