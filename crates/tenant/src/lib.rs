//! HTTP client for the remote tenant provisioning service.

pub mod client;

pub use client::HttpTenantProvisioner;
