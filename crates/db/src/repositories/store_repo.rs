//! Repository for the `stores` table.

use flashpay_core::types::DbId;
use sqlx::PgConnection;

use crate::models::store::{CreateStore, Store};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, merchant_id, store_name, store_number, parent_id, store_status, \
    store_address, created_at, updated_at";

/// Provides CRUD operations for stores.
pub struct StoreRepo;

impl StoreRepo {
    /// Insert a new store, returning the created row.
    ///
    /// If `store_status` is `None` in the input, defaults to `true`.
    pub async fn create(conn: &mut PgConnection, input: &CreateStore) -> Result<Store, sqlx::Error> {
        let query = format!(
            "INSERT INTO stores (merchant_id, store_name, store_number, parent_id, store_status, store_address)
             VALUES ($1, $2, $3, $4, COALESCE($5, true), $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Store>(&query)
            .bind(input.merchant_id)
            .bind(&input.store_name)
            .bind(input.store_number)
            .bind(input.parent_id)
            .bind(input.store_status)
            .bind(&input.store_address)
            .fetch_one(conn)
            .await
    }

    /// Find a store by its internal ID.
    pub async fn find_by_id(conn: &mut PgConnection, id: DbId) -> Result<Option<Store>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stores WHERE id = $1");
        sqlx::query_as::<_, Store>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List all stores owned by a merchant, oldest first.
    pub async fn list_by_merchant(
        conn: &mut PgConnection,
        merchant_id: DbId,
    ) -> Result<Vec<Store>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stores WHERE merchant_id = $1 ORDER BY id");
        sqlx::query_as::<_, Store>(&query)
            .bind(merchant_id)
            .fetch_all(conn)
            .await
    }
}
