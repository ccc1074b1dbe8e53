use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-user cart aggregate computed by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub user_id: Uuid,
    pub cart_id: String,
    pub item_count: i64,
    pub total_price: f64,
}

impl CartSummary {
    /// Representation of a user without any cart rows
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            cart_id: String::new(),
            item_count: 0,
            total_price: 0.0,
        }
    }
}
