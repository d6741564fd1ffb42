//! Registration flow against the in-memory record store.

mod common;

use assert_matches::assert_matches;
use common::{registration, service, tenant};
use flashpay_core::audit::AuditStatus;
use flashpay_core::error::MerchantError;
use flashpay_core::tenant::TenantError;
use flashpay_db::memory::Table;
use flashpay_db::store::{MerchantRecords, RecordStore};
use flashpay_merchant::password::verify_password;
use flashpay_merchant::ServiceError;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn blank_mobile_is_rejected_without_side_effects() {
    let (service, store, provisioner) = service();

    let err = service
        .register_merchant(&registration("  ", "alice", "pw"))
        .await
        .unwrap_err();

    assert_matches!(err, ServiceError::Merchant(MerchantError::MissingMobile));
    assert_eq!(provisioner.call_count(), 0);
    assert!(store.merchants().is_empty());
}

#[tokio::test]
async fn field_checks_run_in_order() {
    let (service, _, provisioner) = service();

    let err = service
        .register_merchant(&registration("12345", "", ""))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Merchant(MerchantError::InvalidMobile));

    let err = service
        .register_merchant(&registration("13800138000", " ", ""))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Merchant(MerchantError::MissingUsername));

    let err = service
        .register_merchant(&registration("13800138000", "alice", ""))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Merchant(MerchantError::MissingPassword));

    assert_eq!(provisioner.call_count(), 0);
}

#[tokio::test]
async fn registered_mobile_is_rejected_before_provisioning() {
    let (service, _, provisioner) = service();
    service
        .register_merchant(&registration("13800138000", "alice", "pw"))
        .await
        .unwrap();
    assert_eq!(provisioner.call_count(), 1);

    let err = service
        .register_merchant(&registration("13800138000", "bob", "pw"))
        .await
        .unwrap_err();

    assert_matches!(err, ServiceError::Merchant(MerchantError::DuplicateRegistration));
    assert_eq!(provisioner.call_count(), 1);
}

// ---------------------------------------------------------------------------
// Provisioning
// ---------------------------------------------------------------------------

#[tokio::test]
async fn provisioning_error_persists_nothing() {
    let (service, store, provisioner) = service();
    provisioner.push(Err(TenantError::Rejected {
        status: 500,
        body: "boom".into(),
    }));

    let err = service
        .register_merchant(&registration("13800138000", "alice", "pw"))
        .await
        .unwrap_err();

    assert_matches!(err, ServiceError::Merchant(MerchantError::TenantProvisioningFailed(_)));
    assert!(store.merchants().is_empty());
    assert!(store.stores().is_empty());
    assert!(store.staff().is_empty());
    assert!(store.store_staff().is_empty());
}

#[tokio::test]
async fn absent_tenant_is_provisioning_failure() {
    let (service, store, provisioner) = service();
    provisioner.push(Ok(None));

    let err = service
        .register_merchant(&registration("13800138000", "alice", "pw"))
        .await
        .unwrap_err();

    assert_matches!(err, ServiceError::Merchant(MerchantError::TenantProvisioningFailed(_)));
    assert!(store.merchants().is_empty());
}

#[tokio::test]
async fn provisioning_request_carries_product_line_codes() {
    let (service, _, provisioner) = service();
    service
        .register_merchant(&registration("13800138000", "alice", "pw"))
        .await
        .unwrap();

    let requests = provisioner.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.mobile, "13800138000");
    assert_eq!(request.tenant_type_code, "shanju-merchant");
    assert_eq!(request.bundle_code, "shanju-merchant");
    assert_eq!(request.username, "alice");
    assert_eq!(request.password, "pw");
    assert_eq!(request.name, "alice");
}

#[tokio::test]
async fn tenant_already_bound_to_a_merchant_is_rejected() {
    let (service, store, provisioner) = service();
    provisioner.push_tenant(7);
    service
        .register_merchant(&registration("13800138000", "alice", "pw"))
        .await
        .unwrap();

    provisioner.push(Ok(Some(tenant(7))));
    let err = service
        .register_merchant(&registration("13900139000", "bob", "pw"))
        .await
        .unwrap_err();

    assert_matches!(
        err,
        ServiceError::Merchant(MerchantError::TenantAlreadyHasMerchant { tenant_id: 7 })
    );
    assert_eq!(store.merchants().len(), 1);
    assert_eq!(store.stores().len(), 1);
}

// ---------------------------------------------------------------------------
// Success
// ---------------------------------------------------------------------------

#[tokio::test]
async fn registration_creates_merchant_root_store_and_admin() {
    let (service, store, provisioner) = service();
    provisioner.push_tenant(42);

    let mut input = registration("13800138000", "alice", "s3cret");
    input.contact_name = Some("Alice Zhang".into());
    let merchant = service.register_merchant(&input).await.unwrap();

    assert!(merchant.id > 0);
    assert_eq!(merchant.tenant_id, 42);
    assert_eq!(merchant.audit_status(), Some(AuditStatus::Unapplied));
    assert_eq!(merchant.contact_name.as_deref(), Some("Alice Zhang"));
    assert_ne!(merchant.password_hash, "s3cret");
    assert!(verify_password("s3cret", &merchant.password_hash).unwrap());

    let stores = store.stores();
    assert_eq!(stores.len(), 1);
    let root = &stores[0];
    assert_eq!(root.store_name, "根门店");
    assert_eq!(root.merchant_id, merchant.id);

    let staff = store.staff();
    assert_eq!(staff.len(), 1);
    let admin = &staff[0];
    assert_eq!(admin.merchant_id, merchant.id);
    assert_eq!(admin.mobile, "13800138000");
    assert_eq!(admin.username, "alice");
    assert_eq!(admin.store_id, Some(root.id));

    let bindings = store.store_staff();
    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings[0].store_id, root.id);
    assert_eq!(bindings[0].staff_id, admin.id);

    let found = service.get_merchant_by_tenant_id(42).await.unwrap().unwrap();
    assert_eq!(found.id, merchant.id);
}

#[tokio::test]
async fn registered_merchant_serializes_without_password() {
    let (service, _, _) = service();
    let merchant = service
        .register_merchant(&registration("13800138000", "alice", "pw"))
        .await
        .unwrap();

    let json = serde_json::to_value(&merchant).unwrap();
    assert!(json.get("password_hash").is_none());
    assert_eq!(json["audit_status"], "0");
}

// ---------------------------------------------------------------------------
// Atomicity
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failure_after_merchant_insert_rolls_back_everything() {
    let (service, store, provisioner) = service();
    store.fail_inserts_into(Table::StoreStaff);

    let err = service
        .register_merchant(&registration("13800138000", "alice", "pw"))
        .await
        .unwrap_err();

    assert_matches!(err, ServiceError::Store(_));
    // The tenant was provisioned; local writes were not kept.
    assert_eq!(provisioner.call_count(), 1);
    assert!(store.merchants().is_empty());
    assert!(store.stores().is_empty());
    assert!(store.staff().is_empty());

    let mut session = store.session().await.unwrap();
    assert_eq!(session.count_merchants_by_mobile("13800138000").await.unwrap(), 0);
}

#[tokio::test]
async fn root_store_failure_leaves_no_merchant() {
    let (service, store, _) = service();
    store.fail_inserts_into(Table::Stores);

    let result = service
        .register_merchant(&registration("13800138000", "alice", "pw"))
        .await;

    assert!(result.is_err());
    assert!(store.merchants().is_empty());
}

#[tokio::test]
async fn custom_root_store_name_is_used() {
    use flashpay_core::registration::RegistrationDefaults;
    use flashpay_db::memory::MemoryRecordStore;
    use flashpay_merchant::MerchantService;

    let store = MemoryRecordStore::new();
    let defaults = RegistrationDefaults {
        root_store_name: "HQ".into(),
        ..Default::default()
    };
    let service =
        MerchantService::with_defaults(store.clone(), common::ScriptedProvisioner::default(), defaults);

    service
        .register_merchant(&registration("13800138000", "alice", "pw"))
        .await
        .unwrap();

    assert_eq!(store.stores()[0].store_name, "HQ");
}
