//! Record-store abstraction used by the merchant service.
//!
//! [`MerchantRecords`] is the per-entity CRUD and count surface.
//! A [`RecordStore`] hands out two kinds of handles implementing it:
//! an auto-commit session for single statements, and a [`UnitOfWork`]
//! whose writes become visible only on [`UnitOfWork::commit`].
//!
//! [`PgRecordStore`] backs both with a Postgres pool; the in-memory
//! variant lives in [`crate::memory`].

use std::future::Future;
use std::ops::DerefMut;

use flashpay_core::audit::StatusId;
use flashpay_core::types::DbId;
use sqlx::pool::PoolConnection;
use sqlx::{PgConnection, Postgres};

use crate::error::StoreError;
use crate::models::merchant::{CreateMerchant, Merchant, MerchantDetails};
use crate::models::staff::{CreateStaff, Staff};
use crate::models::store::{CreateStore, Store};
use crate::models::store_staff::{CreateStoreStaff, StoreStaff};
use crate::repositories::{MerchantRepo, StaffRepo, StoreRepo, StoreStaffRepo};
use crate::DbPool;

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// CRUD and conditional-count operations over merchants, stores, staff, and
/// store/staff bindings. Inserts return the stored row with its assigned ID.
pub trait MerchantRecords: Send {
    fn count_merchants_by_mobile(
        &mut self,
        mobile: &str,
    ) -> impl Future<Output = Result<i64, StoreError>> + Send;

    fn find_merchant_by_id(
        &mut self,
        id: DbId,
    ) -> impl Future<Output = Result<Option<Merchant>, StoreError>> + Send;

    fn find_merchant_by_tenant_id(
        &mut self,
        tenant_id: DbId,
    ) -> impl Future<Output = Result<Option<Merchant>, StoreError>> + Send;

    fn insert_merchant(
        &mut self,
        input: &CreateMerchant,
    ) -> impl Future<Output = Result<Merchant, StoreError>> + Send;

    /// Apply non-`None` details and set the audit status. `None` if missing.
    fn update_merchant_details(
        &mut self,
        id: DbId,
        details: &MerchantDetails,
        audit_status: StatusId,
    ) -> impl Future<Output = Result<Option<Merchant>, StoreError>> + Send;

    /// Set only the audit status. `None` if missing.
    fn update_merchant_audit_status(
        &mut self,
        id: DbId,
        audit_status: StatusId,
    ) -> impl Future<Output = Result<Option<Merchant>, StoreError>> + Send;

    fn insert_store(
        &mut self,
        input: &CreateStore,
    ) -> impl Future<Output = Result<Store, StoreError>> + Send;

    fn find_store_by_id(
        &mut self,
        id: DbId,
    ) -> impl Future<Output = Result<Option<Store>, StoreError>> + Send;

    fn list_stores_by_merchant(
        &mut self,
        merchant_id: DbId,
    ) -> impl Future<Output = Result<Vec<Store>, StoreError>> + Send;

    fn count_staff_by_mobile(
        &mut self,
        mobile: &str,
        merchant_id: DbId,
    ) -> impl Future<Output = Result<i64, StoreError>> + Send;

    fn count_staff_by_username(
        &mut self,
        username: &str,
        merchant_id: DbId,
    ) -> impl Future<Output = Result<i64, StoreError>> + Send;

    fn insert_staff(
        &mut self,
        input: &CreateStaff,
    ) -> impl Future<Output = Result<Staff, StoreError>> + Send;

    fn find_staff_by_id(
        &mut self,
        id: DbId,
    ) -> impl Future<Output = Result<Option<Staff>, StoreError>> + Send;

    fn list_staff_by_merchant(
        &mut self,
        merchant_id: DbId,
    ) -> impl Future<Output = Result<Vec<Staff>, StoreError>> + Send;

    fn list_staff_by_store(
        &mut self,
        store_id: DbId,
    ) -> impl Future<Output = Result<Vec<Staff>, StoreError>> + Send;

    fn insert_store_staff(
        &mut self,
        input: &CreateStoreStaff,
    ) -> impl Future<Output = Result<StoreStaff, StoreError>> + Send;
}

/// A transactional handle. Dropping it without committing discards its
/// writes.
pub trait UnitOfWork: MerchantRecords + Sized {
    fn commit(self) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn rollback(self) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Source of record-store handles.
pub trait RecordStore: Send + Sync {
    /// Auto-commit handle: every write is visible immediately.
    type Session: MerchantRecords;
    /// All-or-nothing handle.
    type Tx: UnitOfWork;

    fn session(&self) -> impl Future<Output = Result<Self::Session, StoreError>> + Send;

    fn begin(&self) -> impl Future<Output = Result<Self::Tx, StoreError>> + Send;
}

// ---------------------------------------------------------------------------
// Postgres
// ---------------------------------------------------------------------------

/// Postgres-backed record store.
#[derive(Debug, Clone)]
pub struct PgRecordStore {
    pool: DbPool,
}

impl PgRecordStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// A Postgres handle over either a pooled connection or an open transaction.
pub struct PgSession<C> {
    conn: C,
}

/// Auto-commit session on a pooled connection.
pub type PgPooledSession = PgSession<PoolConnection<Postgres>>;

/// Session inside an open transaction.
pub type PgTransactionSession = PgSession<sqlx::Transaction<'static, Postgres>>;

impl RecordStore for PgRecordStore {
    type Session = PgPooledSession;
    type Tx = PgTransactionSession;

    async fn session(&self) -> Result<Self::Session, StoreError> {
        let conn = self.pool.acquire().await?;
        Ok(PgSession { conn })
    }

    async fn begin(&self) -> Result<Self::Tx, StoreError> {
        let conn = self.pool.begin().await?;
        Ok(PgSession { conn })
    }
}

impl UnitOfWork for PgTransactionSession {
    async fn commit(self) -> Result<(), StoreError> {
        self.conn.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), StoreError> {
        self.conn.rollback().await?;
        Ok(())
    }
}

impl<C> MerchantRecords for PgSession<C>
where
    C: DerefMut<Target = PgConnection> + Send,
{
    async fn count_merchants_by_mobile(&mut self, mobile: &str) -> Result<i64, StoreError> {
        Ok(MerchantRepo::count_by_mobile(&mut self.conn, mobile).await?)
    }

    async fn find_merchant_by_id(&mut self, id: DbId) -> Result<Option<Merchant>, StoreError> {
        Ok(MerchantRepo::find_by_id(&mut self.conn, id).await?)
    }

    async fn find_merchant_by_tenant_id(
        &mut self,
        tenant_id: DbId,
    ) -> Result<Option<Merchant>, StoreError> {
        Ok(MerchantRepo::find_by_tenant_id(&mut self.conn, tenant_id).await?)
    }

    async fn insert_merchant(&mut self, input: &CreateMerchant) -> Result<Merchant, StoreError> {
        Ok(MerchantRepo::create(&mut self.conn, input).await?)
    }

    async fn update_merchant_details(
        &mut self,
        id: DbId,
        details: &MerchantDetails,
        audit_status: StatusId,
    ) -> Result<Option<Merchant>, StoreError> {
        Ok(MerchantRepo::update_details(&mut self.conn, id, details, audit_status).await?)
    }

    async fn update_merchant_audit_status(
        &mut self,
        id: DbId,
        audit_status: StatusId,
    ) -> Result<Option<Merchant>, StoreError> {
        Ok(MerchantRepo::update_audit_status(&mut self.conn, id, audit_status).await?)
    }

    async fn insert_store(&mut self, input: &CreateStore) -> Result<Store, StoreError> {
        Ok(StoreRepo::create(&mut self.conn, input).await?)
    }

    async fn find_store_by_id(&mut self, id: DbId) -> Result<Option<Store>, StoreError> {
        Ok(StoreRepo::find_by_id(&mut self.conn, id).await?)
    }

    async fn list_stores_by_merchant(&mut self, merchant_id: DbId) -> Result<Vec<Store>, StoreError> {
        Ok(StoreRepo::list_by_merchant(&mut self.conn, merchant_id).await?)
    }

    async fn count_staff_by_mobile(
        &mut self,
        mobile: &str,
        merchant_id: DbId,
    ) -> Result<i64, StoreError> {
        Ok(StaffRepo::count_by_mobile(&mut self.conn, mobile, merchant_id).await?)
    }

    async fn count_staff_by_username(
        &mut self,
        username: &str,
        merchant_id: DbId,
    ) -> Result<i64, StoreError> {
        Ok(StaffRepo::count_by_username(&mut self.conn, username, merchant_id).await?)
    }

    async fn insert_staff(&mut self, input: &CreateStaff) -> Result<Staff, StoreError> {
        Ok(StaffRepo::create(&mut self.conn, input).await?)
    }

    async fn find_staff_by_id(&mut self, id: DbId) -> Result<Option<Staff>, StoreError> {
        Ok(StaffRepo::find_by_id(&mut self.conn, id).await?)
    }

    async fn list_staff_by_merchant(&mut self, merchant_id: DbId) -> Result<Vec<Staff>, StoreError> {
        Ok(StaffRepo::list_by_merchant(&mut self.conn, merchant_id).await?)
    }

    async fn list_staff_by_store(&mut self, store_id: DbId) -> Result<Vec<Staff>, StoreError> {
        Ok(StaffRepo::list_by_store(&mut self.conn, store_id).await?)
    }

    async fn insert_store_staff(
        &mut self,
        input: &CreateStoreStaff,
    ) -> Result<StoreStaff, StoreError> {
        Ok(StoreStaffRepo::create(&mut self.conn, input).await?)
    }
}
