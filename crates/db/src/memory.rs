//! In-memory [`RecordStore`] for tests and local development.
//!
//! Mirrors the Postgres schema's `uq_*` constraints so duplicate writes fail
//! the same way. Child rows may reference ids that do not exist, as in the
//! schema.
//!
//! A transaction reads and writes a private copy of the tables and logs each
//! write. Commit replays the log against the live tables, re-checking unique
//! constraints, so writes committed meanwhile are kept. Ids come from one
//! shared counter and are never reused, like a Postgres sequence.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use flashpay_core::audit::StatusId;
use flashpay_core::types::{DbId, Timestamp};

use crate::error::StoreError;
use crate::models::merchant::{CreateMerchant, Merchant, MerchantDetails};
use crate::models::staff::{CreateStaff, Staff};
use crate::models::store::{CreateStore, Store};
use crate::models::store_staff::{CreateStoreStaff, StoreStaff};
use crate::store::{MerchantRecords, RecordStore, UnitOfWork};

/// Tables an insert failure can be injected into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Merchants,
    Stores,
    Staff,
    StoreStaff,
}

#[derive(Debug, Clone, Default)]
struct Tables {
    merchants: Vec<Merchant>,
    stores: Vec<Store>,
    staff: Vec<Staff>,
    store_staff: Vec<StoreStaff>,
}

#[derive(Debug, Default)]
struct MemoryState {
    tables: Tables,
    last_id: DbId,
    failing_table: Option<Table>,
}

/// One logged write. Inserts carry the finished row.
#[derive(Debug, Clone)]
enum Write {
    Merchant(Merchant),
    Store(Store),
    Staff(Staff),
    StoreStaff(StoreStaff),
    MerchantDetails {
        id: DbId,
        details: MerchantDetails,
        audit_status: StatusId,
    },
    MerchantAuditStatus {
        id: DbId,
        audit_status: StatusId,
    },
}

/// Shared in-memory record store. Cloning shares the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    state: Arc<Mutex<MemoryState>>,
}

fn lock(state: &Mutex<MemoryState>) -> MutexGuard<'_, MemoryState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent insert into `table` fail with a database error.
    pub fn fail_inserts_into(&self, table: Table) {
        lock(&self.state).failing_table = Some(table);
    }

    pub fn merchants(&self) -> Vec<Merchant> {
        lock(&self.state).tables.merchants.clone()
    }

    pub fn stores(&self) -> Vec<Store> {
        lock(&self.state).tables.stores.clone()
    }

    pub fn staff(&self) -> Vec<Staff> {
        lock(&self.state).tables.staff.clone()
    }

    pub fn store_staff(&self) -> Vec<StoreStaff> {
        lock(&self.state).tables.store_staff.clone()
    }
}

impl RecordStore for MemoryRecordStore {
    type Session = MemorySession;
    type Tx = MemorySession;

    async fn session(&self) -> Result<Self::Session, StoreError> {
        Ok(MemorySession {
            shared: Arc::clone(&self.state),
            pending: None,
        })
    }

    async fn begin(&self) -> Result<Self::Tx, StoreError> {
        let tables = lock(&self.state).tables.clone();
        Ok(MemorySession {
            shared: Arc::clone(&self.state),
            pending: Some(Pending {
                tables,
                log: Vec::new(),
            }),
        })
    }
}

struct Pending {
    tables: Tables,
    log: Vec<Write>,
}

/// Handle into a [`MemoryRecordStore`]. With pending state it behaves as a
/// transaction; without, writes go straight to the shared data.
pub struct MemorySession {
    shared: Arc<Mutex<MemoryState>>,
    pending: Option<Pending>,
}

impl MemorySession {
    fn read<R>(&self, f: impl FnOnce(&Tables) -> R) -> R {
        match &self.pending {
            Some(tx) => f(&tx.tables),
            None => f(&lock(&self.shared).tables),
        }
    }

    fn write(&mut self, write: Write) -> Result<(), StoreError> {
        match self.pending.as_mut() {
            Some(tx) => {
                tx.tables.apply(&write)?;
                tx.log.push(write);
                Ok(())
            }
            None => lock(&self.shared).tables.apply(&write),
        }
    }

    /// Take the next id for a row in `table`, honouring injected failures.
    fn allocate(&self, table: Table) -> Result<(DbId, Timestamp), StoreError> {
        let mut shared = lock(&self.shared);
        if shared.failing_table == Some(table) {
            return Err(injected_failure(table));
        }
        shared.last_id += 1;
        Ok((shared.last_id, chrono::Utc::now()))
    }

    fn merchant(&self, id: DbId) -> Option<Merchant> {
        self.read(|t| t.merchants.iter().find(|m| m.id == id).cloned())
    }
}

impl UnitOfWork for MemorySession {
    async fn commit(self) -> Result<(), StoreError> {
        let Some(tx) = self.pending else {
            return Ok(());
        };
        let mut shared = lock(&self.shared);
        let mut tables = shared.tables.clone();
        for write in &tx.log {
            tables.apply(write)?;
        }
        shared.tables = tables;
        Ok(())
    }

    async fn rollback(self) -> Result<(), StoreError> {
        Ok(())
    }
}

fn injected_failure(table: Table) -> StoreError {
    StoreError::Database(sqlx::Error::Protocol(format!(
        "injected insert failure on {table:?}"
    )))
}

fn unique_violation(constraint: &str) -> StoreError {
    StoreError::UniqueViolation {
        constraint: constraint.to_string(),
    }
}

fn overwrite(field: &mut Option<String>, value: &Option<String>) {
    if value.is_some() {
        field.clone_from(value);
    }
}

impl Tables {
    fn apply(&mut self, write: &Write) -> Result<(), StoreError> {
        match write {
            Write::Merchant(merchant) => {
                if self.merchants.iter().any(|m| m.mobile == merchant.mobile) {
                    return Err(unique_violation("uq_merchants_mobile"));
                }
                if self.merchants.iter().any(|m| m.tenant_id == merchant.tenant_id) {
                    return Err(unique_violation("uq_merchants_tenant_id"));
                }
                self.merchants.push(merchant.clone());
            }
            Write::Store(store) => self.stores.push(store.clone()),
            Write::Staff(staff) => {
                let colleagues: Vec<&Staff> = self
                    .staff
                    .iter()
                    .filter(|s| s.merchant_id == staff.merchant_id)
                    .collect();
                if colleagues.iter().any(|s| s.mobile == staff.mobile) {
                    return Err(unique_violation("uq_staff_merchant_mobile"));
                }
                if colleagues.iter().any(|s| s.username == staff.username) {
                    return Err(unique_violation("uq_staff_merchant_username"));
                }
                self.staff.push(staff.clone());
            }
            Write::StoreStaff(binding) => self.store_staff.push(binding.clone()),
            Write::MerchantDetails {
                id,
                details,
                audit_status,
            } => self.update_merchant(*id, |m| {
                overwrite(&mut m.merchant_name, &details.merchant_name);
                overwrite(&mut m.merchant_no, &details.merchant_no);
                overwrite(&mut m.merchant_address, &details.merchant_address);
                overwrite(&mut m.merchant_type, &details.merchant_type);
                overwrite(&mut m.business_licenses_img, &details.business_licenses_img);
                overwrite(&mut m.id_card_front_img, &details.id_card_front_img);
                overwrite(&mut m.id_card_after_img, &details.id_card_after_img);
                overwrite(&mut m.contacts_address, &details.contacts_address);
                if let Some(username) = &details.username {
                    m.username.clone_from(username);
                }
                m.audit_status = *audit_status;
            }),
            Write::MerchantAuditStatus { id, audit_status } => {
                self.update_merchant(*id, |m| m.audit_status = *audit_status)
            }
        }
        Ok(())
    }

    fn update_merchant(&mut self, id: DbId, apply: impl FnOnce(&mut Merchant)) {
        if let Some(merchant) = self.merchants.iter_mut().find(|m| m.id == id) {
            apply(merchant);
            merchant.updated_at = chrono::Utc::now();
        }
    }

    fn staff_by_store(&self, store_id: DbId) -> Vec<Staff> {
        self.staff
            .iter()
            .filter(|s| {
                self.store_staff
                    .iter()
                    .any(|b| b.store_id == store_id && b.staff_id == s.id)
            })
            .cloned()
            .collect()
    }
}

fn count(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

impl MerchantRecords for MemorySession {
    async fn count_merchants_by_mobile(&mut self, mobile: &str) -> Result<i64, StoreError> {
        Ok(self.read(|t| count(t.merchants.iter().filter(|m| m.mobile == mobile).count())))
    }

    async fn find_merchant_by_id(&mut self, id: DbId) -> Result<Option<Merchant>, StoreError> {
        Ok(self.merchant(id))
    }

    async fn find_merchant_by_tenant_id(
        &mut self,
        tenant_id: DbId,
    ) -> Result<Option<Merchant>, StoreError> {
        Ok(self.read(|t| t.merchants.iter().find(|m| m.tenant_id == tenant_id).cloned()))
    }

    async fn insert_merchant(&mut self, input: &CreateMerchant) -> Result<Merchant, StoreError> {
        let (id, now) = self.allocate(Table::Merchants)?;
        let merchant = Merchant {
            id,
            tenant_id: input.tenant_id,
            mobile: input.mobile.clone(),
            username: input.username.clone(),
            password_hash: input.password_hash.clone(),
            contact_name: input.contact_name.clone(),
            merchant_name: None,
            merchant_no: None,
            merchant_address: None,
            merchant_type: None,
            business_licenses_img: None,
            id_card_front_img: None,
            id_card_after_img: None,
            contacts_address: None,
            audit_status: input.audit_status,
            created_at: now,
            updated_at: now,
        };
        self.write(Write::Merchant(merchant.clone()))?;
        Ok(merchant)
    }

    async fn update_merchant_details(
        &mut self,
        id: DbId,
        details: &MerchantDetails,
        audit_status: StatusId,
    ) -> Result<Option<Merchant>, StoreError> {
        self.write(Write::MerchantDetails {
            id,
            details: details.clone(),
            audit_status,
        })?;
        Ok(self.merchant(id))
    }

    async fn update_merchant_audit_status(
        &mut self,
        id: DbId,
        audit_status: StatusId,
    ) -> Result<Option<Merchant>, StoreError> {
        self.write(Write::MerchantAuditStatus { id, audit_status })?;
        Ok(self.merchant(id))
    }

    async fn insert_store(&mut self, input: &CreateStore) -> Result<Store, StoreError> {
        let (id, now) = self.allocate(Table::Stores)?;
        let store = Store {
            id,
            merchant_id: input.merchant_id,
            store_name: input.store_name.clone(),
            store_number: input.store_number,
            parent_id: input.parent_id,
            store_status: input.store_status.unwrap_or(true),
            store_address: input.store_address.clone(),
            created_at: now,
            updated_at: now,
        };
        self.write(Write::Store(store.clone()))?;
        Ok(store)
    }

    async fn find_store_by_id(&mut self, id: DbId) -> Result<Option<Store>, StoreError> {
        Ok(self.read(|t| t.stores.iter().find(|st| st.id == id).cloned()))
    }

    async fn list_stores_by_merchant(&mut self, merchant_id: DbId) -> Result<Vec<Store>, StoreError> {
        Ok(self.read(|t| {
            t.stores
                .iter()
                .filter(|st| st.merchant_id == merchant_id)
                .cloned()
                .collect()
        }))
    }

    async fn count_staff_by_mobile(
        &mut self,
        mobile: &str,
        merchant_id: DbId,
    ) -> Result<i64, StoreError> {
        Ok(self.read(|t| {
            count(
                t.staff
                    .iter()
                    .filter(|st| st.mobile == mobile && st.merchant_id == merchant_id)
                    .count(),
            )
        }))
    }

    async fn count_staff_by_username(
        &mut self,
        username: &str,
        merchant_id: DbId,
    ) -> Result<i64, StoreError> {
        Ok(self.read(|t| {
            count(
                t.staff
                    .iter()
                    .filter(|st| st.username == username && st.merchant_id == merchant_id)
                    .count(),
            )
        }))
    }

    async fn insert_staff(&mut self, input: &CreateStaff) -> Result<Staff, StoreError> {
        let (id, now) = self.allocate(Table::Staff)?;
        let staff = Staff {
            id,
            merchant_id: input.merchant_id,
            store_id: input.store_id,
            full_name: input.full_name.clone(),
            position: input.position.clone(),
            username: input.username.clone(),
            mobile: input.mobile.clone(),
            staff_status: input.staff_status.unwrap_or(true),
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };
        self.write(Write::Staff(staff.clone()))?;
        Ok(staff)
    }

    async fn find_staff_by_id(&mut self, id: DbId) -> Result<Option<Staff>, StoreError> {
        Ok(self.read(|t| t.staff.iter().find(|st| st.id == id).cloned()))
    }

    async fn list_staff_by_merchant(&mut self, merchant_id: DbId) -> Result<Vec<Staff>, StoreError> {
        Ok(self.read(|t| {
            t.staff
                .iter()
                .filter(|st| st.merchant_id == merchant_id)
                .cloned()
                .collect()
        }))
    }

    async fn list_staff_by_store(&mut self, store_id: DbId) -> Result<Vec<Staff>, StoreError> {
        Ok(self.read(|t| t.staff_by_store(store_id)))
    }

    async fn insert_store_staff(
        &mut self,
        input: &CreateStoreStaff,
    ) -> Result<StoreStaff, StoreError> {
        let (id, now) = self.allocate(Table::StoreStaff)?;
        let binding = StoreStaff {
            id,
            store_id: input.store_id,
            staff_id: input.staff_id,
            created_at: now,
            updated_at: now,
        };
        self.write(Write::StoreStaff(binding.clone()))?;
        Ok(binding)
    }
}
