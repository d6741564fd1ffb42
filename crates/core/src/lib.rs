//! Domain types and business rules for merchant onboarding.
//!
//! This crate has no I/O: it defines identifiers, the error taxonomy,
//! input validation, audit status rules, and the tenant provisioning
//! contract that the service layer drives.

pub mod audit;
pub mod error;
pub mod registration;
pub mod tenant;
pub mod types;
pub mod validation;
