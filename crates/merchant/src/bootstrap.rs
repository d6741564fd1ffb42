//! Wiring of the Postgres record store and HTTP tenant client.

use flashpay_db::store::PgRecordStore;
use flashpay_tenant::HttpTenantProvisioner;

use crate::config::MerchantConfig;
use crate::MerchantService;

/// Production service type.
pub type PgMerchantService = MerchantService<PgRecordStore, HttpTenantProvisioner>;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Database connection failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Tenant client setup failed: {0}")]
    Tenant(#[from] flashpay_core::tenant::TenantError),
}

/// Connect to the database, verify it answers, and build the service.
pub async fn connect(config: &MerchantConfig) -> Result<PgMerchantService, BootstrapError> {
    let pool = flashpay_db::create_pool(&config.database_url, config.db_max_connections).await?;
    tracing::info!(max_connections = config.db_max_connections, "Database connection pool created");

    flashpay_db::health_check(&pool).await?;
    tracing::info!("Database health check passed");

    let provisioner =
        HttpTenantProvisioner::new(config.tenant_service_url.clone(), config.tenant_request_timeout)?;
    tracing::info!(url = %provisioner.base_url(), "Tenant client configured");

    Ok(MerchantService::with_defaults(
        PgRecordStore::new(pool),
        provisioner,
        config.registration.clone(),
    ))
}
