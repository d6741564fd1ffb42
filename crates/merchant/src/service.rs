//! Merchant onboarding orchestrator.

use flashpay_core::audit::AuditStatus;
use flashpay_core::error::MerchantError;
use flashpay_core::registration::{validate_staff_identity, RegisterMerchant, RegistrationDefaults};
use flashpay_core::tenant::{CreateTenantRequest, ProvisionedTenant, TenantProvisioner};
use flashpay_core::types::DbId;
use flashpay_db::models::merchant::{CreateMerchant, Merchant, MerchantDetails};
use flashpay_db::models::staff::{CreateStaff, Staff};
use flashpay_db::models::store::{CreateStore, Store};
use flashpay_db::models::store_staff::{CreateStoreStaff, StoreStaff};
use flashpay_db::store::{MerchantRecords, RecordStore, UnitOfWork};

use crate::error::{registration_store_error, ServiceResult};
use crate::password::hash_password_blocking;

/// Merchant, store, and staff operations over a record store and a tenant
/// provisioning service.
pub struct MerchantService<S, T> {
    store: S,
    provisioner: T,
    defaults: RegistrationDefaults,
}

impl<S, T> MerchantService<S, T>
where
    S: RecordStore,
    T: TenantProvisioner,
{
    pub fn new(store: S, provisioner: T) -> Self {
        Self::with_defaults(store, provisioner, RegistrationDefaults::default())
    }

    pub fn with_defaults(store: S, provisioner: T, defaults: RegistrationDefaults) -> Self {
        Self {
            store,
            provisioner,
            defaults,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn defaults(&self) -> &RegistrationDefaults {
        &self.defaults
    }

    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    /// Register a merchant.
    ///
    /// Validates the request, rejects an already registered mobile, hashes
    /// the credential, then provisions a tenant and administrator account
    /// remotely. The merchant, its root store, its administrator staff record,
    /// and the store binding are written in one transaction. A tenant
    /// provisioned before a failed transaction is left in place and logged.
    #[tracing::instrument(skip_all, fields(mobile = %input.mobile, username = %input.username))]
    pub async fn register_merchant(&self, input: &RegisterMerchant) -> ServiceResult<Merchant> {
        if let Err(err) = input.validate() {
            tracing::debug!(code = err.code(), "Registration rejected");
            return Err(err.into());
        }

        let mut session = self.store.session().await?;
        if session.count_merchants_by_mobile(&input.mobile).await? > 0 {
            tracing::debug!("Mobile already registered");
            return Err(MerchantError::DuplicateRegistration.into());
        }
        drop(session);

        let password_hash = hash_password_blocking(&input.password).await?;
        let tenant = self.provision_tenant(input).await?;

        match self.persist_registration(tenant.id, input, password_hash).await {
            Ok(merchant) => {
                tracing::info!(
                    merchant_id = merchant.id,
                    tenant_id = merchant.tenant_id,
                    "Merchant registered"
                );
                Ok(merchant)
            }
            Err(err) => {
                tracing::warn!(
                    tenant_id = tenant.id,
                    error = %err,
                    "Local registration failed after tenant was provisioned; tenant left orphaned"
                );
                Err(err)
            }
        }
    }

    async fn provision_tenant(&self, input: &RegisterMerchant) -> ServiceResult<ProvisionedTenant> {
        let request = CreateTenantRequest {
            mobile: input.mobile.clone(),
            tenant_type_code: self.defaults.tenant_type_code.clone(),
            bundle_code: self.defaults.bundle_code.clone(),
            username: input.username.clone(),
            password: input.password.clone(),
            name: input.username.clone(),
        };

        match self.provisioner.create_tenant_and_account(&request).await {
            Ok(Some(tenant)) => Ok(tenant),
            Ok(None) => {
                tracing::error!("Tenant service returned no tenant");
                Err(MerchantError::TenantProvisioningFailed("no tenant returned".into()).into())
            }
            Err(err) => {
                tracing::error!(error = %err, "Tenant provisioning failed");
                Err(MerchantError::TenantProvisioningFailed(err.to_string()).into())
            }
        }
    }

    async fn persist_registration(
        &self,
        tenant_id: DbId,
        input: &RegisterMerchant,
        password_hash: String,
    ) -> ServiceResult<Merchant> {
        let mut tx = self.store.begin().await?;
        match write_registration(&mut tx, &self.defaults, tenant_id, input, password_hash).await {
            Ok(merchant) => {
                tx.commit()
                    .await
                    .map_err(|err| registration_store_error(err, tenant_id))?;
                Ok(merchant)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(error = %rollback_err, "Registration rollback failed");
                }
                Err(err)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Staff and stores
    // -----------------------------------------------------------------------

    /// Create a staff member after the identity and per-merchant uniqueness
    /// checks.
    #[tracing::instrument(skip_all, fields(merchant_id = input.merchant_id, store_id = ?input.store_id))]
    pub async fn create_staff(&self, input: &CreateStaff) -> ServiceResult<Staff> {
        let mut session = self.store.session().await?;
        let staff = create_staff_in(&mut session, input).await?;
        tracing::info!(staff_id = staff.id, "Staff created");
        Ok(staff)
    }

    /// Create a store. No validation is applied.
    #[tracing::instrument(skip_all, fields(merchant_id = input.merchant_id))]
    pub async fn create_store(&self, input: &CreateStore) -> ServiceResult<Store> {
        let mut session = self.store.session().await?;
        let store = session.insert_store(input).await?;
        tracing::info!(store_id = store.id, "Store created");
        Ok(store)
    }

    /// Associate a staff member with a store. Neither id is checked.
    #[tracing::instrument(skip(self))]
    pub async fn bind_staff_to_store(&self, store_id: DbId, staff_id: DbId) -> ServiceResult<StoreStaff> {
        let mut session = self.store.session().await?;
        let binding = session
            .insert_store_staff(&CreateStoreStaff { store_id, staff_id })
            .await?;
        Ok(binding)
    }

    // -----------------------------------------------------------------------
    // Audit
    // -----------------------------------------------------------------------

    /// Submit qualification details for audit.
    ///
    /// Overwrites the supplied detail fields and sets the status to applied
    /// whatever the current status is. The tenant binding is never changed.
    #[tracing::instrument(skip(self, details))]
    pub async fn submit_for_audit(
        &self,
        merchant_id: DbId,
        details: &MerchantDetails,
    ) -> ServiceResult<Merchant> {
        let mut session = self.store.session().await?;
        let Some(current) = session.find_merchant_by_id(merchant_id).await? else {
            tracing::debug!("Audit submitted for unknown merchant");
            return Err(MerchantError::MerchantNotFound { id: merchant_id }.into());
        };

        let merchant = session
            .update_merchant_details(merchant_id, details, AuditStatus::Applied.id())
            .await?
            .ok_or(MerchantError::MerchantNotFound { id: merchant_id })?;

        tracing::info!(
            from = current.audit_status,
            to = merchant.audit_status,
            "Merchant submitted for audit"
        );
        Ok(merchant)
    }

    /// Record an operator's decision on a pending application.
    #[tracing::instrument(skip(self))]
    pub async fn review_merchant(&self, merchant_id: DbId, approved: bool) -> ServiceResult<Merchant> {
        let mut session = self.store.session().await?;
        let current = session
            .find_merchant_by_id(merchant_id)
            .await?
            .ok_or(MerchantError::MerchantNotFound { id: merchant_id })?;

        // Unknown stored ids are treated as unapplied.
        let from = current.audit_status().unwrap_or(AuditStatus::Unapplied);
        let to = match from.review(approved) {
            Ok(to) => to,
            Err(err) => {
                tracing::debug!(%from, "Review rejected");
                return Err(err.into());
            }
        };

        let merchant = session
            .update_merchant_audit_status(merchant_id, to.id())
            .await?
            .ok_or(MerchantError::MerchantNotFound { id: merchant_id })?;

        tracing::info!(%from, %to, "Merchant audit reviewed");
        Ok(merchant)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    #[tracing::instrument(skip(self))]
    pub async fn get_merchant_by_id(&self, id: DbId) -> ServiceResult<Option<Merchant>> {
        let mut session = self.store.session().await?;
        Ok(session.find_merchant_by_id(id).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_merchant_by_tenant_id(&self, tenant_id: DbId) -> ServiceResult<Option<Merchant>> {
        let mut session = self.store.session().await?;
        Ok(session.find_merchant_by_tenant_id(tenant_id).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_store_by_id(&self, id: DbId) -> ServiceResult<Option<Store>> {
        let mut session = self.store.session().await?;
        Ok(session.find_store_by_id(id).await?)
    }

    /// Stores owned by a merchant, ordered by id.
    #[tracing::instrument(skip(self))]
    pub async fn list_stores_by_merchant(&self, merchant_id: DbId) -> ServiceResult<Vec<Store>> {
        let mut session = self.store.session().await?;
        Ok(session.list_stores_by_merchant(merchant_id).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_staff_by_id(&self, id: DbId) -> ServiceResult<Option<Staff>> {
        let mut session = self.store.session().await?;
        Ok(session.find_staff_by_id(id).await?)
    }

    /// Staff of a merchant, ordered by id.
    #[tracing::instrument(skip(self))]
    pub async fn list_staff_by_merchant(&self, merchant_id: DbId) -> ServiceResult<Vec<Staff>> {
        let mut session = self.store.session().await?;
        Ok(session.list_staff_by_merchant(merchant_id).await?)
    }

    /// Staff bound to a store through store/staff bindings.
    #[tracing::instrument(skip(self))]
    pub async fn list_staff_by_store(&self, store_id: DbId) -> ServiceResult<Vec<Staff>> {
        let mut session = self.store.session().await?;
        Ok(session.list_staff_by_store(store_id).await?)
    }
}

// ---------------------------------------------------------------------------
// Record-level steps, shared by the auto-commit and transactional paths
// ---------------------------------------------------------------------------

/// Tenant guard through store binding. Runs on the registration transaction.
async fn write_registration<R: MerchantRecords>(
    records: &mut R,
    defaults: &RegistrationDefaults,
    tenant_id: DbId,
    input: &RegisterMerchant,
    password_hash: String,
) -> ServiceResult<Merchant> {
    if records.find_merchant_by_tenant_id(tenant_id).await?.is_some() {
        return Err(MerchantError::TenantAlreadyHasMerchant { tenant_id }.into());
    }

    let merchant = records
        .insert_merchant(&CreateMerchant {
            tenant_id,
            mobile: input.mobile.clone(),
            username: input.username.clone(),
            password_hash,
            contact_name: input.contact_name.clone(),
            audit_status: AuditStatus::Unapplied.id(),
        })
        .await
        .map_err(|err| registration_store_error(err, tenant_id))?;

    let root_store = records
        .insert_store(&CreateStore::named(merchant.id, defaults.root_store_name.clone()))
        .await?;

    let admin = create_staff_in(
        records,
        &CreateStaff {
            merchant_id: merchant.id,
            store_id: Some(root_store.id),
            full_name: None,
            position: None,
            username: merchant.username.clone(),
            mobile: merchant.mobile.clone(),
            staff_status: None,
        },
    )
    .await?;

    records
        .insert_store_staff(&CreateStoreStaff {
            store_id: root_store.id,
            staff_id: admin.id,
        })
        .await?;

    Ok(merchant)
}

async fn create_staff_in<R: MerchantRecords>(records: &mut R, input: &CreateStaff) -> ServiceResult<Staff> {
    if let Err(err) = validate_staff_identity(&input.mobile, &input.username) {
        tracing::debug!(code = err.code(), "Staff rejected");
        return Err(err.into());
    }

    if records
        .count_staff_by_mobile(&input.mobile, input.merchant_id)
        .await?
        > 0
    {
        return Err(MerchantError::DuplicateStaffMobile.into());
    }
    if records
        .count_staff_by_username(&input.username, input.merchant_id)
        .await?
        > 0
    {
        return Err(MerchantError::DuplicateStaffUsername.into());
    }

    Ok(records.insert_staff(input).await?)
}
