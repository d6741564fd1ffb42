//! Repository for the `store_staff` association table.

use sqlx::PgConnection;

use crate::models::store_staff::{CreateStoreStaff, StoreStaff};

/// Provides insert operations for store/staff bindings.
pub struct StoreStaffRepo;

impl StoreStaffRepo {
    /// Insert a binding row. No duplicate check: binding the same pair twice
    /// produces two rows.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateStoreStaff,
    ) -> Result<StoreStaff, sqlx::Error> {
        sqlx::query_as::<_, StoreStaff>(
            "INSERT INTO store_staff (store_id, staff_id)
             VALUES ($1, $2)
             RETURNING id, store_id, staff_id, created_at, updated_at",
        )
        .bind(input.store_id)
        .bind(input.staff_id)
        .fetch_one(conn)
        .await
    }
}
