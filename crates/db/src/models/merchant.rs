//! Merchant entity model and DTOs.

use flashpay_core::audit::{AuditStatus, StatusId};
use flashpay_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize, Serializer};
use sqlx::FromRow;

/// A merchant row from the `merchants` table.
///
/// `password_hash` is never serialized.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Merchant {
    pub id: DbId,
    pub tenant_id: DbId,
    pub mobile: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub contact_name: Option<String>,
    pub merchant_name: Option<String>,
    pub merchant_no: Option<String>,
    pub merchant_address: Option<String>,
    pub merchant_type: Option<String>,
    pub business_licenses_img: Option<String>,
    pub id_card_front_img: Option<String>,
    pub id_card_after_img: Option<String>,
    pub contacts_address: Option<String>,
    #[serde(serialize_with = "serialize_audit_status")]
    pub audit_status: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Merchant {
    /// Typed audit status. `None` only if the row holds an unknown id.
    pub fn audit_status(&self) -> Option<AuditStatus> {
        AuditStatus::from_id(self.audit_status)
    }
}

/// Serialize the SMALLINT status as its legacy string code (`"0"`..`"3"`).
fn serialize_audit_status<S: Serializer>(id: &StatusId, serializer: S) -> Result<S::Ok, S::Error> {
    match AuditStatus::from_id(*id) {
        Some(status) => status.serialize(serializer),
        None => serializer.serialize_str(&id.to_string()),
    }
}

/// DTO for inserting a merchant at registration time.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMerchant {
    pub tenant_id: DbId,
    pub mobile: String,
    pub username: String,
    pub password_hash: String,
    pub contact_name: Option<String>,
    pub audit_status: StatusId,
}

/// Qualification details submitted for audit. All fields are optional;
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MerchantDetails {
    pub merchant_name: Option<String>,
    pub merchant_no: Option<String>,
    pub merchant_address: Option<String>,
    pub merchant_type: Option<String>,
    pub business_licenses_img: Option<String>,
    pub id_card_front_img: Option<String>,
    pub id_card_after_img: Option<String>,
    pub username: Option<String>,
    pub contacts_address: Option<String>,
}
