//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&mut PgConnection` as the first argument, so the same
//! query runs on a pooled connection or inside a transaction.

pub mod merchant_repo;
pub mod staff_repo;
pub mod store_repo;
pub mod store_staff_repo;

pub use merchant_repo::MerchantRepo;
pub use staff_repo::StaffRepo;
pub use store_repo::StoreRepo;
pub use store_staff_repo::StoreStaffRepo;
