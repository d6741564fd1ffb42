//! [`TenantProvisioner`] over HTTP.
//!
//! Sends `POST {base_url}/tenants` with a camelCase JSON body. A single
//! attempt is made; the request timeout is set on the client.

use std::time::Duration;

use flashpay_core::tenant::{
    CreateTenantRequest, ProvisionedTenant, TenantError, TenantProvisioner,
};

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for a tenant provisioning service instance.
#[derive(Debug, Clone)]
pub struct HttpTenantProvisioner {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTenantProvisioner {
    /// Create a client for the service at `base_url`, e.g.
    /// `http://tenant-service:8080`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TenantError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TenantError::Request(e.to_string()))?;
        Ok(Self::with_client(client, base_url))
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn tenants_url(&self) -> String {
        format!("{}/tenants", self.base_url)
    }
}

impl TenantProvisioner for HttpTenantProvisioner {
    async fn create_tenant_and_account(
        &self,
        request: &CreateTenantRequest,
    ) -> Result<Option<ProvisionedTenant>, TenantError> {
        let url = self.tenants_url();
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| TenantError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TenantError::Request(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(url, status = status.as_u16(), "Tenant service rejected request");
            return Err(TenantError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        parse_tenant_body(&body)
    }
}

/// Interpret a 2xx response body. Empty and `null` bodies mean no tenant
/// was returned.
pub fn parse_tenant_body(body: &str) -> Result<Option<ProvisionedTenant>, TenantError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    serde_json::from_str::<Option<ProvisionedTenant>>(trimmed)
        .map_err(|e| TenantError::InvalidResponse(e.to_string()))
}
