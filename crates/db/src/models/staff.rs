//! Staff entity model and DTOs.

use flashpay_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A staff row from the `staff` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Staff {
    pub id: DbId,
    pub merchant_id: DbId,
    /// Home store; assignment to stores is tracked in `store_staff`.
    pub store_id: Option<DbId>,
    pub full_name: Option<String>,
    pub position: Option<String>,
    pub username: String,
    pub mobile: String,
    pub staff_status: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new staff member.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStaff {
    pub merchant_id: DbId,
    pub store_id: Option<DbId>,
    pub full_name: Option<String>,
    pub position: Option<String>,
    pub username: String,
    pub mobile: String,
    /// Defaults to `true` (active) if omitted.
    pub staff_status: Option<bool>,
}
