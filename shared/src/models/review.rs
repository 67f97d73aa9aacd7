//! Review Model

use serde::{Deserialize, Serialize};

/// Customer review, read-only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(alias = "uid")]
    pub id: String,
    pub name: String,
    pub details: String,
    pub rating: f64,
    #[serde(default)]
    pub recipe: Option<String>,
}
