use crate::audit::AuditStatus;
use crate::types::DbId;

/// Business rejections raised by merchant onboarding operations.
///
/// Every variant is a rejected request: retrying without changing the input
/// yields the same outcome. Storage and transport failures are wrapped by the
/// service layer, not represented here.
#[derive(Debug, thiserror::Error)]
pub enum MerchantError {
    #[error("Mobile number is required")]
    MissingMobile,

    #[error("Mobile number format is invalid")]
    InvalidMobile,

    #[error("Username is required")]
    MissingUsername,

    #[error("Password is required")]
    MissingPassword,

    #[error("A merchant is already registered with this mobile number")]
    DuplicateRegistration,

    #[error("Tenant provisioning failed: {0}")]
    TenantProvisioningFailed(String),

    #[error("Tenant {tenant_id} already has a merchant")]
    TenantAlreadyHasMerchant { tenant_id: DbId },

    #[error("A staff member of this merchant already uses this mobile number")]
    DuplicateStaffMobile,

    #[error("A staff member of this merchant already uses this username")]
    DuplicateStaffUsername,

    #[error("Merchant not found: {id}")]
    MerchantNotFound { id: DbId },

    #[error("Audit cannot be reviewed while the merchant is {from}")]
    InvalidAuditTransition { from: AuditStatus },
}

impl MerchantError {
    /// Stable machine-readable code for field-level messages.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingMobile => "MISSING_MOBILE",
            Self::InvalidMobile => "INVALID_MOBILE",
            Self::MissingUsername => "MISSING_USERNAME",
            Self::MissingPassword => "MISSING_PASSWORD",
            Self::DuplicateRegistration => "DUPLICATE_REGISTRATION",
            Self::TenantProvisioningFailed(_) => "TENANT_PROVISIONING_FAILED",
            Self::TenantAlreadyHasMerchant { .. } => "TENANT_ALREADY_HAS_MERCHANT",
            Self::DuplicateStaffMobile => "DUPLICATE_STAFF_MOBILE",
            Self::DuplicateStaffUsername => "DUPLICATE_STAFF_USERNAME",
            Self::MerchantNotFound { .. } => "MERCHANT_NOT_FOUND",
            Self::InvalidAuditTransition { .. } => "INVALID_AUDIT_TRANSITION",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_identifiers() {
        assert_eq!(
            MerchantError::MerchantNotFound { id: 42 }.to_string(),
            "Merchant not found: 42"
        );
        assert_eq!(
            MerchantError::TenantAlreadyHasMerchant { tenant_id: 7 }.to_string(),
            "Tenant 7 already has a merchant"
        );
        assert_eq!(
            MerchantError::InvalidAuditTransition {
                from: AuditStatus::Approved
            }
            .to_string(),
            "Audit cannot be reviewed while the merchant is approved"
        );
    }

    #[test]
    fn provisioning_failure_keeps_reason() {
        let err = MerchantError::TenantProvisioningFailed("HTTP 503".into());
        assert_eq!(err.to_string(), "Tenant provisioning failed: HTTP 503");
        assert_eq!(err.code(), "TENANT_PROVISIONING_FAILED");
    }

    #[test]
    fn codes_are_distinct() {
        let errors = [
            MerchantError::MissingMobile,
            MerchantError::InvalidMobile,
            MerchantError::MissingUsername,
            MerchantError::MissingPassword,
            MerchantError::DuplicateRegistration,
            MerchantError::TenantProvisioningFailed(String::new()),
            MerchantError::TenantAlreadyHasMerchant { tenant_id: 1 },
            MerchantError::DuplicateStaffMobile,
            MerchantError::DuplicateStaffUsername,
            MerchantError::MerchantNotFound { id: 1 },
            MerchantError::InvalidAuditTransition {
                from: AuditStatus::Unapplied,
            },
        ];
        let mut codes: Vec<_> = errors.iter().map(MerchantError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }
}
