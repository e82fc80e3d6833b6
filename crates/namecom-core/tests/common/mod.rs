//! Test doubles and common utilities for lifecycle contract tests
//!
//! `MockNameCom` is an in-memory stand-in for the name.com API that records
//! every outbound call so tests can assert on call order and payloads.

#![allow(dead_code)]

use async_trait::async_trait;
use namecom_core::error::{Error, Result};
use namecom_core::traits::{
    DeleteDnssecRequest, DeleteRecordRequest, Dnssec, Domain, GetDnssecRequest, GetDomainRequest,
    GetRecordRequest, NameComApi, Record, SetNameserversRequest,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// One recorded outbound call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateRecord(Record),
    GetRecord { zone: String, id: i32 },
    UpdateRecord(Record),
    DeleteRecord { zone: String, id: i32 },
    SetNameservers { zone: String, nameservers: Vec<String> },
    GetDomain { zone: String },
    CreateDnssec(Dnssec),
    GetDnssec { zone: String, digest: String },
    DeleteDnssec { zone: String, digest: String },
}

impl Call {
    /// Operation name as used in error messages
    pub fn operation(&self) -> &'static str {
        match self {
            Call::CreateRecord(_) => "CreateRecord",
            Call::GetRecord { .. } => "GetRecord",
            Call::UpdateRecord(_) => "UpdateRecord",
            Call::DeleteRecord { .. } => "DeleteRecord",
            Call::SetNameservers { .. } => "SetNameservers",
            Call::GetDomain { .. } => "GetDomain",
            Call::CreateDnssec(_) => "CreateDNSSEC",
            Call::GetDnssec { .. } => "GetDNSSEC",
            Call::DeleteDnssec { .. } => "DeleteDNSSEC",
        }
    }
}

#[derive(Default)]
struct Store {
    records: HashMap<(String, i32), Record>,
    domains: HashMap<String, Vec<String>>,
    dnssec: HashMap<(String, String), Dnssec>,
}

/// In-memory name.com API that tracks calls
#[derive(Clone)]
pub struct MockNameCom {
    store: Arc<Mutex<Store>>,
    calls: Arc<Mutex<Vec<Call>>>,
    call_count: Arc<AtomicUsize>,
    next_id: Arc<AtomicI32>,
    /// Operation name that fails with a transient error
    fail_on: Arc<Mutex<Option<&'static str>>>,
    /// Server-side default TTL applied when a record is created without one
    pub default_ttl: u32,
}

impl MockNameCom {
    pub fn new() -> Self {
        Self {
            store: Arc::new(Mutex::new(Store::default())),
            calls: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(AtomicUsize::new(0)),
            next_id: Arc::new(AtomicI32::new(1000)),
            fail_on: Arc::new(Mutex::new(None)),
            default_ttl: 300,
        }
    }

    /// Register a domain with the given nameservers
    pub fn with_domain<I, S>(self, zone: &str, nameservers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.store.lock().unwrap().domains.insert(
            zone.to_string(),
            nameservers.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Seed an existing record
    pub fn with_record(self, record: Record) -> Self {
        self.store
            .lock()
            .unwrap()
            .records
            .insert((record.domain_name.clone(), record.id), record);
        self
    }

    /// Seed an existing DS record
    pub fn with_dnssec(self, dnssec: Dnssec) -> Self {
        self.store
            .lock()
            .unwrap()
            .dnssec
            .insert((dnssec.domain_name.clone(), dnssec.digest.clone()), dnssec);
        self
    }

    /// Make the named operation fail with a transient error
    pub fn fail_on(&self, operation: &'static str) {
        *self.fail_on.lock().unwrap() = Some(operation);
    }

    /// All calls so far, in order
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Operation names of all calls so far, in order
    pub fn operations(&self) -> Vec<&'static str> {
        self.calls().iter().map(Call::operation).collect()
    }

    /// Number of outbound calls made
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Current nameservers of a zone
    pub fn nameservers(&self, zone: &str) -> Option<Vec<String>> {
        self.store.lock().unwrap().domains.get(zone).cloned()
    }

    /// Number of stored records
    pub fn record_count(&self) -> usize {
        self.store.lock().unwrap().records.len()
    }

    /// Whether a DS record exists
    pub fn has_dnssec(&self, zone: &str, digest: &str) -> bool {
        self.store
            .lock()
            .unwrap()
            .dnssec
            .contains_key(&(zone.to_string(), digest.to_string()))
    }

    /// Remove a record behind the provider's back
    pub fn remove_record(&self, zone: &str, id: i32) {
        self.store
            .lock()
            .unwrap()
            .records
            .remove(&(zone.to_string(), id));
    }

    fn record(&self, call: Call) -> Result<()> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        let operation = call.operation();
        self.calls.lock().unwrap().push(call);

        if *self.fail_on.lock().unwrap() == Some(operation) {
            return Err(Error::provider("mock", "server error (transient): 503"));
        }
        Ok(())
    }

    fn fqdn(record: &Record) -> String {
        if record.host.is_empty() {
            format!("{}.", record.domain_name)
        } else {
            format!("{}.{}.", record.host, record.domain_name)
        }
    }
}

impl Default for MockNameCom {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NameComApi for MockNameCom {
    async fn create_record(&self, record: &Record) -> Result<Record> {
        self.record(Call::CreateRecord(record.clone()))?;

        let mut created = record.clone();
        created.id = self.next_id.fetch_add(1, Ordering::SeqCst);
        created.fqdn = Self::fqdn(&created);
        if created.ttl == 0 {
            created.ttl = self.default_ttl;
        }

        self.store
            .lock()
            .unwrap()
            .records
            .insert((created.domain_name.clone(), created.id), created.clone());
        Ok(created)
    }

    async fn get_record(&self, request: &GetRecordRequest) -> Result<Record> {
        self.record(Call::GetRecord {
            zone: request.domain_name.clone(),
            id: request.id,
        })?;

        self.store
            .lock()
            .unwrap()
            .records
            .get(&(request.domain_name.clone(), request.id))
            .cloned()
            .ok_or_else(|| Error::not_found(format!("record {}", request.id)))
    }

    async fn update_record(&self, record: &Record) -> Result<Record> {
        self.record(Call::UpdateRecord(record.clone()))?;

        let mut store = self.store.lock().unwrap();
        let key = (record.domain_name.clone(), record.id);
        let existing = store
            .records
            .get(&key)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("record {}", record.id)))?;

        let mut updated = record.clone();
        updated.fqdn = Self::fqdn(&updated);
        if updated.ttl == 0 {
            updated.ttl = existing.ttl;
        }
        store.records.insert(key, updated.clone());
        Ok(updated)
    }

    async fn delete_record(&self, request: &DeleteRecordRequest) -> Result<()> {
        self.record(Call::DeleteRecord {
            zone: request.domain_name.clone(),
            id: request.id,
        })?;

        self.store
            .lock()
            .unwrap()
            .records
            .remove(&(request.domain_name.clone(), request.id))
            .map(|_| ())
            .ok_or_else(|| Error::not_found(format!("record {}", request.id)))
    }

    async fn set_nameservers(&self, request: &SetNameserversRequest) -> Result<Domain> {
        self.record(Call::SetNameservers {
            zone: request.domain_name.clone(),
            nameservers: request.nameservers.clone(),
        })?;

        let mut store = self.store.lock().unwrap();
        let zone = request.domain_name.to_lowercase();
        let entry = store
            .domains
            .get_mut(&zone)
            .ok_or_else(|| Error::not_found(format!("domain {}", zone)))?;

        // the registry canonicalizes nameservers to lower case
        *entry = request
            .nameservers
            .iter()
            .map(|ns| ns.to_lowercase())
            .collect();

        Ok(Domain {
            domain_name: zone,
            nameservers: entry.clone(),
        })
    }

    async fn get_domain(&self, request: &GetDomainRequest) -> Result<Domain> {
        self.record(Call::GetDomain {
            zone: request.domain_name.clone(),
        })?;

        self.store
            .lock()
            .unwrap()
            .domains
            .get(&request.domain_name)
            .map(|nameservers| Domain {
                domain_name: request.domain_name.clone(),
                nameservers: nameservers.clone(),
            })
            .ok_or_else(|| Error::not_found(format!("domain {}", request.domain_name)))
    }

    async fn create_dnssec(&self, dnssec: &Dnssec) -> Result<Dnssec> {
        self.record(Call::CreateDnssec(dnssec.clone()))?;

        self.store.lock().unwrap().dnssec.insert(
            (dnssec.domain_name.clone(), dnssec.digest.clone()),
            dnssec.clone(),
        );
        // the real API echoes back very little on create
        Ok(Dnssec {
            domain_name: dnssec.domain_name.clone(),
            ..Default::default()
        })
    }

    async fn get_dnssec(&self, request: &GetDnssecRequest) -> Result<Dnssec> {
        self.record(Call::GetDnssec {
            zone: request.domain_name.clone(),
            digest: request.digest.clone(),
        })?;

        self.store
            .lock()
            .unwrap()
            .dnssec
            .get(&(request.domain_name.clone(), request.digest.clone()))
            .cloned()
            .ok_or_else(|| Error::not_found(format!("dnssec {}", request.digest)))
    }

    async fn delete_dnssec(&self, request: &DeleteDnssecRequest) -> Result<()> {
        self.record(Call::DeleteDnssec {
            zone: request.domain_name.clone(),
            digest: request.digest.clone(),
        })?;

        self.store
            .lock()
            .unwrap()
            .dnssec
            .remove(&(request.domain_name.clone(), request.digest.clone()))
            .map(|_| ())
            .ok_or_else(|| Error::not_found(format!("dnssec {}", request.digest)))
    }

    fn client_name(&self) -> &'static str {
        "mock"
    }
}

/// Wrap a mock for handing to resource adapters
pub fn shared(api: &MockNameCom) -> Arc<dyn NameComApi> {
    Arc::new(api.clone())
}
