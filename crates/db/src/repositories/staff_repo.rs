//! Repository for the `staff` table.

use flashpay_core::types::DbId;
use sqlx::PgConnection;

use crate::models::staff::{CreateStaff, Staff};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, merchant_id, store_id, full_name, position, username, mobile, \
    staff_status, last_login_at, created_at, updated_at";

/// Provides CRUD operations for staff members.
pub struct StaffRepo;

impl StaffRepo {
    /// Insert a new staff member, returning the created row.
    ///
    /// If `staff_status` is `None` in the input, defaults to `true`.
    pub async fn create(conn: &mut PgConnection, input: &CreateStaff) -> Result<Staff, sqlx::Error> {
        let query = format!(
            "INSERT INTO staff (merchant_id, store_id, full_name, position, username, mobile, staff_status)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, true))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Staff>(&query)
            .bind(input.merchant_id)
            .bind(input.store_id)
            .bind(&input.full_name)
            .bind(&input.position)
            .bind(&input.username)
            .bind(&input.mobile)
            .bind(input.staff_status)
            .fetch_one(conn)
            .await
    }

    /// Find a staff member by internal ID.
    pub async fn find_by_id(conn: &mut PgConnection, id: DbId) -> Result<Option<Staff>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM staff WHERE id = $1");
        sqlx::query_as::<_, Staff>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Count staff of a merchant using a mobile number.
    pub async fn count_by_mobile(
        conn: &mut PgConnection,
        mobile: &str,
        merchant_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM staff WHERE mobile = $1 AND merchant_id = $2")
                .bind(mobile)
                .bind(merchant_id)
                .fetch_one(conn)
                .await?;
        Ok(count)
    }

    /// Count staff of a merchant using a username.
    pub async fn count_by_username(
        conn: &mut PgConnection,
        username: &str,
        merchant_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM staff WHERE username = $1 AND merchant_id = $2")
                .bind(username)
                .bind(merchant_id)
                .fetch_one(conn)
                .await?;
        Ok(count)
    }

    /// List all staff of a merchant, oldest first.
    pub async fn list_by_merchant(
        conn: &mut PgConnection,
        merchant_id: DbId,
    ) -> Result<Vec<Staff>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM staff WHERE merchant_id = $1 ORDER BY id");
        sqlx::query_as::<_, Staff>(&query)
            .bind(merchant_id)
            .fetch_all(conn)
            .await
    }

    /// List staff bound to a store through `store_staff`, oldest first.
    ///
    /// A staff member bound twice to the same store is listed once.
    pub async fn list_by_store(
        conn: &mut PgConnection,
        store_id: DbId,
    ) -> Result<Vec<Staff>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM staff
             WHERE id IN (SELECT staff_id FROM store_staff WHERE store_id = $1)
             ORDER BY id"
        );
        sqlx::query_as::<_, Staff>(&query)
            .bind(store_id)
            .fetch_all(conn)
            .await
    }
}
