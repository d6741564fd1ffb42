//! Merchant onboarding service.
//!
//! [`MerchantService`] orchestrates registration (remote tenant provisioning
//! followed by a local transaction creating the merchant, its root store, and
//! its administrator staff record), audit submission and review, and the
//! merchant/store/staff lookups.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod password;
pub mod service;

pub use error::ServiceError;
pub use service::MerchantService;
