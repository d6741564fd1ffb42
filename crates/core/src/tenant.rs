//! Contract for the remote tenant/account provisioning service.
//!
//! Registration calls [`TenantProvisioner::create_tenant_and_account`] once,
//! before any local write. The call is a remote side effect that cannot be
//! rolled back by the local database transaction.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// Request to create a tenant together with its administrator account.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTenantRequest {
    pub mobile: String,
    pub tenant_type_code: String,
    pub bundle_code: String,
    pub username: String,
    pub password: String,
    /// Display name of the tenant's administrator.
    pub name: String,
}

impl std::fmt::Debug for CreateTenantRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateTenantRequest")
            .field("mobile", &self.mobile)
            .field("tenant_type_code", &self.tenant_type_code)
            .field("bundle_code", &self.bundle_code)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .finish()
    }
}

/// Tenant returned by the provisioning service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionedTenant {
    pub id: DbId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tenant_type_code: Option<String>,
    #[serde(default)]
    pub bundle_code: Option<String>,
}

/// Failures talking to the provisioning service.
#[derive(Debug, thiserror::Error)]
pub enum TenantError {
    /// The request never produced a response (network, DNS, TLS, timeout).
    #[error("Tenant service request failed: {0}")]
    Request(String),

    /// The service answered with a non-2xx status.
    #[error("Tenant service rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// The service answered 2xx with a body that is not a tenant.
    #[error("Tenant service returned an unreadable response: {0}")]
    InvalidResponse(String),
}

/// Creates tenants and their administrator accounts.
///
/// `Ok(None)` means the service accepted the call but returned no tenant.
pub trait TenantProvisioner: Send + Sync {
    fn create_tenant_and_account(
        &self,
        request: &CreateTenantRequest,
    ) -> impl std::future::Future<Output = Result<Option<ProvisionedTenant>, TenantError>> + Send;
}
