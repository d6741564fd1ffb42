//! Store-to-staff binding model.

use flashpay_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `store_staff` association table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StoreStaff {
    pub id: DbId,
    pub store_id: DbId,
    pub staff_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for binding a staff member to a store.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CreateStoreStaff {
    pub store_id: DbId,
    pub staff_id: DbId,
}
