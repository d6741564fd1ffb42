use std::time::Duration;

use flashpay_core::registration::{
    RegistrationDefaults, DEFAULT_BUNDLE_CODE, DEFAULT_ROOT_STORE_NAME, DEFAULT_TENANT_TYPE_CODE,
};

/// Default maximum number of pooled database connections.
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 20;

/// Default tenant service request timeout in seconds.
pub const DEFAULT_TENANT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Errors raised while reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} must be a valid {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Merchant service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct MerchantConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    /// Base URL of the tenant provisioning service.
    pub tenant_service_url: String,
    pub tenant_request_timeout: Duration,
    pub registration: RegistrationDefaults,
}

impl MerchantConfig {
    /// Load configuration from the process environment, reading `.env` first
    /// if present.
    ///
    /// | Env Var                       | Default           |
    /// |-------------------------------|-------------------|
    /// | `DATABASE_URL`                | required          |
    /// | `DB_MAX_CONNECTIONS`          | `20`              |
    /// | `TENANT_SERVICE_URL`          | required          |
    /// | `TENANT_REQUEST_TIMEOUT_SECS` | `10`              |
    /// | `MERCHANT_TENANT_TYPE_CODE`   | `shanju-merchant` |
    /// | `MERCHANT_BUNDLE_CODE`        | `shanju-merchant` |
    /// | `MERCHANT_ROOT_STORE_NAME`    | `根门店`          |
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        let or_default = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let database_url = required("DATABASE_URL")?;
        let tenant_service_url = required("TENANT_SERVICE_URL")?;

        let db_max_connections = parse_or(
            &lookup,
            "DB_MAX_CONNECTIONS",
            "u32",
            DEFAULT_DB_MAX_CONNECTIONS,
        )?;
        let timeout_secs = parse_or(
            &lookup,
            "TENANT_REQUEST_TIMEOUT_SECS",
            "u64",
            DEFAULT_TENANT_REQUEST_TIMEOUT_SECS,
        )?;

        let registration = RegistrationDefaults {
            tenant_type_code: or_default("MERCHANT_TENANT_TYPE_CODE", DEFAULT_TENANT_TYPE_CODE),
            bundle_code: or_default("MERCHANT_BUNDLE_CODE", DEFAULT_BUNDLE_CODE),
            root_store_name: or_default("MERCHANT_ROOT_STORE_NAME", DEFAULT_ROOT_STORE_NAME),
        };

        Ok(Self {
            database_url,
            db_max_connections,
            tenant_service_url,
            tenant_request_timeout: Duration::from_secs(timeout_secs),
            registration,
        })
    }
}

fn parse_or<F, V>(
    lookup: &F,
    name: &'static str,
    expected: &'static str,
    default: V,
) -> Result<V, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    V: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value,
        }),
    }
}
