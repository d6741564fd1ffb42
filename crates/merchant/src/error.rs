use flashpay_core::error::MerchantError;
use flashpay_core::types::DbId;
use flashpay_db::StoreError;

/// Unique constraints that back the service's duplicate pre-checks.
pub const UQ_MERCHANTS_MOBILE: &str = "uq_merchants_mobile";
pub const UQ_MERCHANTS_TENANT_ID: &str = "uq_merchants_tenant_id";
pub const UQ_STAFF_MERCHANT_MOBILE: &str = "uq_staff_merchant_mobile";
pub const UQ_STAFF_MERCHANT_USERNAME: &str = "uq_staff_merchant_username";

/// Error returned by every [`MerchantService`](crate::MerchantService)
/// operation.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A business rejection.
    #[error(transparent)]
    Merchant(#[from] MerchantError),

    /// A record-store failure with no business meaning.
    #[error(transparent)]
    Store(StoreError),

    /// Hashing the merchant credential failed.
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// The business rejection, if this is one.
    pub fn as_merchant(&self) -> Option<&MerchantError> {
        match self {
            Self::Merchant(err) => Some(err),
            _ => None,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Merchant(err) => err.code(),
            Self::Store(_) => "STORE_ERROR",
            Self::PasswordHash(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<StoreError> for ServiceError {
    /// A unique violation that slipped past a pre-check maps onto the same
    /// rejection the pre-check would have raised.
    ///
    /// `uq_merchants_tenant_id` needs the tenant id and is mapped by the
    /// caller.
    fn from(err: StoreError) -> Self {
        if let StoreError::UniqueViolation { constraint } = &err {
            let rejection = match constraint.as_str() {
                UQ_MERCHANTS_MOBILE => Some(MerchantError::DuplicateRegistration),
                UQ_STAFF_MERCHANT_MOBILE => Some(MerchantError::DuplicateStaffMobile),
                UQ_STAFF_MERCHANT_USERNAME => Some(MerchantError::DuplicateStaffUsername),
                _ => None,
            };
            if let Some(rejection) = rejection {
                return Self::Merchant(rejection);
            }
        }
        Self::Store(err)
    }
}

/// Store error from the registration write or its commit. A
/// `uq_merchants_tenant_id` violation means another merchant claimed the
/// tenant after the in-transaction guard ran.
pub(crate) fn registration_store_error(err: StoreError, tenant_id: DbId) -> ServiceError {
    match err {
        StoreError::UniqueViolation { ref constraint } if constraint == UQ_MERCHANTS_TENANT_ID => {
            MerchantError::TenantAlreadyHasMerchant { tenant_id }.into()
        }
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn violation(constraint: &str) -> StoreError {
        StoreError::UniqueViolation {
            constraint: constraint.to_string(),
        }
    }

    #[test]
    fn known_constraints_map_to_rejections() {
        assert_matches!(
            ServiceError::from(violation(UQ_MERCHANTS_MOBILE)),
            ServiceError::Merchant(MerchantError::DuplicateRegistration)
        );
        assert_matches!(
            ServiceError::from(violation(UQ_STAFF_MERCHANT_MOBILE)),
            ServiceError::Merchant(MerchantError::DuplicateStaffMobile)
        );
        assert_matches!(
            ServiceError::from(violation(UQ_STAFF_MERCHANT_USERNAME)),
            ServiceError::Merchant(MerchantError::DuplicateStaffUsername)
        );
    }

    #[test]
    fn other_store_errors_pass_through() {
        assert_matches!(
            ServiceError::from(violation(UQ_MERCHANTS_TENANT_ID)),
            ServiceError::Store(StoreError::UniqueViolation { .. })
        );
        let err = ServiceError::from(StoreError::Database(sqlx::Error::RowNotFound));
        assert_eq!(err.code(), "STORE_ERROR");
        assert!(err.as_merchant().is_none());
    }

    #[test]
    fn tenant_conflict_during_registration_is_a_rejection() {
        assert_matches!(
            registration_store_error(violation(UQ_MERCHANTS_TENANT_ID), 42),
            ServiceError::Merchant(MerchantError::TenantAlreadyHasMerchant { tenant_id: 42 })
        );
        assert_matches!(
            registration_store_error(violation(UQ_MERCHANTS_MOBILE), 42),
            ServiceError::Merchant(MerchantError::DuplicateRegistration)
        );
        assert_matches!(
            registration_store_error(StoreError::Database(sqlx::Error::PoolTimedOut), 42),
            ServiceError::Store(StoreError::Database(_))
        );
    }

    #[test]
    fn merchant_errors_keep_their_code() {
        let err = ServiceError::from(MerchantError::MerchantNotFound { id: 9 });
        assert_eq!(err.code(), "MERCHANT_NOT_FOUND");
        assert_eq!(err.to_string(), "Merchant not found: 9");
    }
}
