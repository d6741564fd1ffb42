#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use flashpay_core::registration::RegisterMerchant;
use flashpay_core::tenant::{CreateTenantRequest, ProvisionedTenant, TenantError, TenantProvisioner};
use flashpay_db::memory::MemoryRecordStore;
use flashpay_db::models::staff::CreateStaff;
use flashpay_merchant::MerchantService;

pub type TestService = MerchantService<MemoryRecordStore, ScriptedProvisioner>;

type Outcome = Result<Option<ProvisionedTenant>, TenantError>;

/// Provisioner that replays scripted outcomes and records every request.
///
/// With no script left it provisions tenants with increasing ids starting
/// at 1000. Clones share the script and request log.
#[derive(Clone, Default)]
pub struct ScriptedProvisioner {
    script: Arc<Mutex<VecDeque<Outcome>>>,
    requests: Arc<Mutex<Vec<CreateTenantRequest>>>,
}

impl ScriptedProvisioner {
    pub fn push(&self, outcome: Outcome) {
        self.script.lock().unwrap().push_back(outcome);
    }

    pub fn push_tenant(&self, id: i64) {
        self.push(Ok(Some(tenant(id))));
    }

    pub fn requests(&self) -> Vec<CreateTenantRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl TenantProvisioner for ScriptedProvisioner {
    async fn create_tenant_and_account(&self, request: &CreateTenantRequest) -> Outcome {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len()
        };
        let scripted = self.script.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| Ok(Some(tenant(999 + call as i64))))
    }
}

pub fn tenant(id: i64) -> ProvisionedTenant {
    ProvisionedTenant {
        id,
        name: None,
        tenant_type_code: None,
        bundle_code: None,
    }
}

/// Service over a fresh in-memory store; returns handles for inspection.
pub fn service() -> (TestService, MemoryRecordStore, ScriptedProvisioner) {
    let store = MemoryRecordStore::new();
    let provisioner = ScriptedProvisioner::default();
    let service = MerchantService::new(store.clone(), provisioner.clone());
    (service, store, provisioner)
}

pub fn registration(mobile: &str, username: &str, password: &str) -> RegisterMerchant {
    RegisterMerchant {
        mobile: mobile.to_string(),
        username: username.to_string(),
        password: password.to_string(),
        contact_name: None,
    }
}

pub fn staff(merchant_id: i64, mobile: &str, username: &str) -> CreateStaff {
    CreateStaff {
        merchant_id,
        store_id: None,
        full_name: None,
        position: None,
        username: username.to_string(),
        mobile: mobile.to_string(),
        staff_status: None,
    }
}
