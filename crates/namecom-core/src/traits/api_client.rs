// # name.com API Client Trait
//
// Defines the outbound interface to the name.com v4 REST API together with
// the wire types it exchanges.
//
// ## Implementations
//
// - HTTP: `namecom-client` crate
// - Tests: in-memory doubles under `tests/common`
//
// ## Usage
//
// ```rust,ignore
// use namecom_core::traits::{NameComApi, GetRecordRequest};
//
// async fn lookup(api: &dyn NameComApi) -> namecom_core::Result<()> {
//     let record = api
//         .get_record(&GetRecordRequest { domain_name: "example.com".into(), id: 42 })
//         .await?;
//     println!("{} -> {}", record.fqdn, record.answer);
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

fn is_zero_i32(v: &i32) -> bool {
    *v == 0
}

fn is_zero_u32(v: &u32) -> bool {
    *v == 0
}

/// A DNS record as exchanged with the API
///
/// Zero `id`, `ttl` and `priority` and an empty `fqdn` are omitted on the
/// wire so the server applies its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Server-assigned record id
    #[serde(default, skip_serializing_if = "is_zero_i32")]
    pub id: i32,
    /// Zone the record belongs to
    #[serde(default)]
    pub domain_name: String,
    /// Host label relative to the zone; empty for the apex
    #[serde(default)]
    pub host: String,
    /// Server-computed fully qualified name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub fqdn: String,
    /// Upper-case record type
    #[serde(rename = "type", default)]
    pub record_type: String,
    /// Record answer
    #[serde(default)]
    pub answer: String,
    /// TTL in seconds
    #[serde(default, skip_serializing_if = "is_zero_u32")]
    pub ttl: u32,
    /// Priority for MX and SRV records
    #[serde(default, skip_serializing_if = "is_zero_u32")]
    pub priority: u32,
}

/// Lookup key for a single record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetRecordRequest {
    /// Zone the record belongs to
    pub domain_name: String,
    /// Server-assigned record id
    pub id: i32,
}

/// Deletion key for a single record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRecordRequest {
    /// Zone the record belongs to
    pub domain_name: String,
    /// Server-assigned record id
    pub id: i32,
}

/// Full-replace nameserver assignment for a zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetNameserversRequest {
    /// Zone to update (carried in the URL, not the body)
    #[serde(skip)]
    pub domain_name: String,
    /// Complete desired nameserver list
    pub nameservers: Vec<String>,
}

/// Lookup key for a domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetDomainRequest {
    /// Zone to fetch
    pub domain_name: String,
}

/// A registered domain
///
/// Only the fields the provider consumes are modelled; everything else in
/// the response is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    /// Canonical zone name
    pub domain_name: String,
    /// Authoritative nameservers in server order
    #[serde(default)]
    pub nameservers: Vec<String>,
}

/// A DS record registered for DNSSEC
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dnssec {
    /// Zone the DS record belongs to
    pub domain_name: String,
    /// Key tag of the DNSKEY this record validates
    pub key_tag: i32,
    /// Signing algorithm number
    pub algorithm: i32,
    /// Digest algorithm number
    pub digest_type: i32,
    /// Digest of the DNSKEY
    pub digest: String,
}

/// Lookup key for a DS record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetDnssecRequest {
    /// Zone the DS record belongs to
    pub domain_name: String,
    /// Digest identifying the DS record
    pub digest: String,
}

/// Deletion key for a DS record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteDnssecRequest {
    /// Zone the DS record belongs to
    pub domain_name: String,
    /// Digest identifying the DS record
    pub digest: String,
}

/// Trait for name.com API client implementations
///
/// # Trust Level: Untrusted
///
/// Clients perform exactly one API call per method invocation. They do not
/// retry, back off, or cache; every failure is returned to the caller, which
/// tags it with the operation name.
///
/// A missing remote entity must be reported as [`crate::Error::NotFound`] so
/// that Read paths can tell "gone" apart from transient failures.
#[async_trait]
pub trait NameComApi: Send + Sync {
    /// `CreateRecord`: create a record, returning it with its assigned id
    async fn create_record(&self, record: &Record) -> Result<Record, crate::Error>;

    /// `GetRecord`: fetch a record by zone and id
    async fn get_record(&self, request: &GetRecordRequest) -> Result<Record, crate::Error>;

    /// `UpdateRecord`: replace a record's fields in place (keyed by `record.id`)
    async fn update_record(&self, record: &Record) -> Result<Record, crate::Error>;

    /// `DeleteRecord`: remove a record
    async fn delete_record(&self, request: &DeleteRecordRequest) -> Result<(), crate::Error>;

    /// `SetNameservers`: replace the zone's complete nameserver list
    async fn set_nameservers(
        &self,
        request: &SetNameserversRequest,
    ) -> Result<Domain, crate::Error>;

    /// `GetDomain`: fetch the domain including its nameservers
    async fn get_domain(&self, request: &GetDomainRequest) -> Result<Domain, crate::Error>;

    /// `CreateDNSSEC`: register a DS record
    async fn create_dnssec(&self, dnssec: &Dnssec) -> Result<Dnssec, crate::Error>;

    /// `GetDNSSEC`: fetch a DS record by zone and digest
    async fn get_dnssec(&self, request: &GetDnssecRequest) -> Result<Dnssec, crate::Error>;

    /// `DeleteDNSSEC`: remove a DS record by zone and digest
    async fn delete_dnssec(&self, request: &DeleteDnssecRequest) -> Result<(), crate::Error>;

    /// Get the client name (for logging/debugging)
    fn client_name(&self) -> &'static str;
}

/// Helper trait for constructing API clients from configuration
pub trait NameComApiFactory: Send + Sync {
    /// Create a NameComApi instance from provider configuration
    fn create(
        &self,
        config: &crate::config::ProviderConfig,
    ) -> Result<Box<dyn NameComApi>, crate::Error>;
}
