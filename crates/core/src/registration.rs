//! Merchant registration input, defaults, and field validation.

use serde::Deserialize;

use crate::error::MerchantError;
use crate::validation::{validate_mobile, validate_password, validate_username};

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Tenant type code identifying this product line in the tenant service.
pub const DEFAULT_TENANT_TYPE_CODE: &str = "shanju-merchant";

/// Bundle (plan) assigned to newly provisioned merchant tenants.
pub const DEFAULT_BUNDLE_CODE: &str = "shanju-merchant";

/// Display name of the store created for every new merchant.
pub const DEFAULT_ROOT_STORE_NAME: &str = "根门店";

/// Product-line constants applied during registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationDefaults {
    pub tenant_type_code: String,
    pub bundle_code: String,
    pub root_store_name: String,
}

impl Default for RegistrationDefaults {
    fn default() -> Self {
        Self {
            tenant_type_code: DEFAULT_TENANT_TYPE_CODE.to_string(),
            bundle_code: DEFAULT_BUNDLE_CODE.to_string(),
            root_store_name: DEFAULT_ROOT_STORE_NAME.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Self-service registration request.
#[derive(Clone, Deserialize)]
pub struct RegisterMerchant {
    pub mobile: String,
    pub username: String,
    pub password: String,
    pub contact_name: Option<String>,
}

impl std::fmt::Debug for RegisterMerchant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterMerchant")
            .field("mobile", &self.mobile)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("contact_name", &self.contact_name)
            .finish()
    }
}

impl RegisterMerchant {
    /// Run the field checks in order; the first failure wins.
    ///
    /// Duplicate detection needs the record store and is done by the caller.
    pub fn validate(&self) -> Result<(), MerchantError> {
        validate_mobile(&self.mobile)?;
        validate_username(&self.username)?;
        validate_password(&self.password)?;
        Ok(())
    }
}

/// Field checks for a staff record: mobile present and well-formed, then
/// username present.
pub fn validate_staff_identity(mobile: &str, username: &str) -> Result<(), MerchantError> {
    validate_mobile(mobile)?;
    validate_username(username)?;
    Ok(())
}
