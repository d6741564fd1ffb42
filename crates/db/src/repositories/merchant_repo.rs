//! Repository for the `merchants` table.

use flashpay_core::audit::StatusId;
use flashpay_core::types::DbId;
use sqlx::PgConnection;

use crate::models::merchant::{CreateMerchant, Merchant, MerchantDetails};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, tenant_id, mobile, username, password_hash, contact_name, \
    merchant_name, merchant_no, merchant_address, merchant_type, business_licenses_img, \
    id_card_front_img, id_card_after_img, contacts_address, audit_status, created_at, updated_at";

/// Provides CRUD operations for merchants.
pub struct MerchantRepo;

impl MerchantRepo {
    /// Insert a new merchant, returning the created row with its assigned ID.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateMerchant,
    ) -> Result<Merchant, sqlx::Error> {
        let query = format!(
            "INSERT INTO merchants (tenant_id, mobile, username, password_hash, contact_name, audit_status)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Merchant>(&query)
            .bind(input.tenant_id)
            .bind(&input.mobile)
            .bind(&input.username)
            .bind(&input.password_hash)
            .bind(&input.contact_name)
            .bind(input.audit_status)
            .fetch_one(conn)
            .await
    }

    /// Find a merchant by internal ID.
    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Merchant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM merchants WHERE id = $1");
        sqlx::query_as::<_, Merchant>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Find the merchant bound to a tenant.
    pub async fn find_by_tenant_id(
        conn: &mut PgConnection,
        tenant_id: DbId,
    ) -> Result<Option<Merchant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM merchants WHERE tenant_id = $1");
        sqlx::query_as::<_, Merchant>(&query)
            .bind(tenant_id)
            .fetch_optional(conn)
            .await
    }

    /// Count merchants registered with a mobile number.
    pub async fn count_by_mobile(conn: &mut PgConnection, mobile: &str) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM merchants WHERE mobile = $1")
            .bind(mobile)
            .fetch_one(conn)
            .await?;
        Ok(count)
    }

    /// Overwrite qualification details and set the audit status in one
    /// statement. Only non-`None` detail fields are applied; `tenant_id` is
    /// never touched.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_details(
        conn: &mut PgConnection,
        id: DbId,
        details: &MerchantDetails,
        audit_status: StatusId,
    ) -> Result<Option<Merchant>, sqlx::Error> {
        let query = format!(
            "UPDATE merchants SET
                merchant_name = COALESCE($2, merchant_name),
                merchant_no = COALESCE($3, merchant_no),
                merchant_address = COALESCE($4, merchant_address),
                merchant_type = COALESCE($5, merchant_type),
                business_licenses_img = COALESCE($6, business_licenses_img),
                id_card_front_img = COALESCE($7, id_card_front_img),
                id_card_after_img = COALESCE($8, id_card_after_img),
                username = COALESCE($9, username),
                contacts_address = COALESCE($10, contacts_address),
                audit_status = $11
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Merchant>(&query)
            .bind(id)
            .bind(&details.merchant_name)
            .bind(&details.merchant_no)
            .bind(&details.merchant_address)
            .bind(&details.merchant_type)
            .bind(&details.business_licenses_img)
            .bind(&details.id_card_front_img)
            .bind(&details.id_card_after_img)
            .bind(&details.username)
            .bind(&details.contacts_address)
            .bind(audit_status)
            .fetch_optional(conn)
            .await
    }

    /// Set only the audit status. Returns `None` if the merchant does not exist.
    pub async fn update_audit_status(
        conn: &mut PgConnection,
        id: DbId,
        audit_status: StatusId,
    ) -> Result<Option<Merchant>, sqlx::Error> {
        let query =
            format!("UPDATE merchants SET audit_status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Merchant>(&query)
            .bind(id)
            .bind(audit_status)
            .fetch_optional(conn)
            .await
    }
}
