//! Store entity model and DTOs.

use flashpay_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A store row from the `stores` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Store {
    pub id: DbId,
    pub merchant_id: DbId,
    pub store_name: String,
    pub store_number: Option<i64>,
    /// Parent store for chains; `None` for a merchant's root store.
    pub parent_id: Option<DbId>,
    pub store_status: bool,
    pub store_address: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new store.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStore {
    pub merchant_id: DbId,
    pub store_name: String,
    pub store_number: Option<i64>,
    pub parent_id: Option<DbId>,
    /// Defaults to `true` (open) if omitted.
    pub store_status: Option<bool>,
    pub store_address: Option<String>,
}

impl CreateStore {
    /// Minimal store owned by `merchant_id`.
    pub fn named(merchant_id: DbId, store_name: impl Into<String>) -> Self {
        Self {
            merchant_id,
            store_name: store_name.into(),
            store_number: None,
            parent_id: None,
            store_status: None,
            store_address: None,
        }
    }
}
