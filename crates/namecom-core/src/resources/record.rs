//! `namecom_record`: a single DNS resource record
//!
//! The host label is stored as `"@"` for the zone apex in state and as the
//! empty string on the wire. Priority only carries meaning for MX and SRV
//! records; for every other type it is ignored when planning.
//!
//! Identifier: the decimal record id. Import identifier: `"zone/id"`.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::split_import_id;
use crate::traits::{
    Attribute, AttributeType, DeleteRecordRequest, GetRecordRequest, NameComApi, Plan, Record,
    Resource, ResourceSchema,
};
use crate::{Error, Result};

/// Display form of the zone apex
pub const APEX_HOST: &str = "@";

/// Supported record types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RecordType {
    /// IPv4 address
    A,
    /// IPv6 address
    Aaaa,
    /// Apex alias
    Aname,
    /// Canonical name
    Cname,
    /// Mail exchanger
    Mx,
    /// Nameserver delegation
    Ns,
    /// Service locator
    Srv,
    /// Free-form text
    Txt,
}

impl RecordType {
    /// All supported types
    pub const ALL: [RecordType; 8] = [
        RecordType::A,
        RecordType::Aaaa,
        RecordType::Aname,
        RecordType::Cname,
        RecordType::Mx,
        RecordType::Ns,
        RecordType::Srv,
        RecordType::Txt,
    ];

    /// Upper-case wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Aname => "ANAME",
            RecordType::Cname => "CNAME",
            RecordType::Mx => "MX",
            RecordType::Ns => "NS",
            RecordType::Srv => "SRV",
            RecordType::Txt => "TXT",
        }
    }

    /// Whether `priority` is meaningful for this type
    pub fn uses_priority(&self) -> bool {
        matches!(self, RecordType::Mx | RecordType::Srv)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = Error;

    /// Case-insensitive parse
    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        RecordType::ALL
            .into_iter()
            .find(|t| t.as_str() == upper)
            .ok_or_else(|| {
                Error::invalid_input(format!(
                    "expected type to be one of A, AAAA, ANAME, CNAME, MX, NS, SRV, TXT, got {:?}",
                    s
                ))
            })
    }
}

impl TryFrom<String> for RecordType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<RecordType> for String {
    fn from(value: RecordType) -> Self {
        value.as_str().to_string()
    }
}

fn apex() -> String {
    APEX_HOST.to_string()
}

/// State of a `namecom_record` resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordState {
    /// Decimal record id; absent until created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Zone the record belongs to
    pub zone: String,
    /// Host label relative to the zone; `"@"` for the apex
    #[serde(default = "apex")]
    pub host: String,
    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Record answer; for SRV `"{weight} {port} {target}"`
    pub answer: String,
    /// TTL in seconds; 0 lets the server choose
    #[serde(default)]
    pub ttl: u32,
    /// Priority for MX and SRV records
    #[serde(default)]
    pub priority: u32,
    /// Server-computed fully qualified name
    #[serde(default)]
    pub fqdn: String,
}

impl RecordState {
    /// Configuration for a new record at `host` in `zone`
    pub fn new(
        zone: impl Into<String>,
        host: impl Into<String>,
        record_type: RecordType,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            zone: zone.into(),
            host: host.into(),
            record_type,
            answer: answer.into(),
            ttl: 0,
            priority: 0,
            fqdn: String::new(),
        }
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Canonical form used for every equality check
    ///
    /// Apex host is `"@"`, and priority is zeroed for types that ignore it.
    pub fn normalized(&self) -> Self {
        let mut normalized = self.clone();
        normalized.host = display_host(&self.host);
        if !self.record_type.uses_priority() {
            normalized.priority = 0;
        }
        normalized
    }
}

/// State form of a host: empty becomes `"@"`
pub fn display_host(host: &str) -> String {
    if host.is_empty() {
        apex()
    } else {
        host.to_string()
    }
}

/// Wire form of a host: `"@"` becomes empty
pub fn wire_host(host: &str) -> String {
    if host == APEX_HOST {
        String::new()
    } else {
        host.to_string()
    }
}

/// Parse a state identifier into a record id
pub fn record_id(id: &str) -> Result<i32> {
    id.parse::<i32>().map_err(|e| {
        Error::identifier_format(format!(
            "Error parsing RecordID {:?}, should be int32: {}",
            id, e
        ))
    })
}

/// Map configuration to an API request
pub fn to_request(state: &RecordState) -> Record {
    Record {
        id: 0,
        domain_name: state.zone.clone(),
        host: wire_host(&state.host),
        fqdn: String::new(),
        record_type: state.record_type.as_str().to_string(),
        answer: state.answer.clone(),
        // zero is omitted on the wire
        ttl: state.ttl,
        priority: state.priority,
    }
}

/// Map an API response back to state
///
/// Every field comes from the response; the remote side is authoritative.
pub fn from_response(record: &Record) -> Result<RecordState> {
    let record_type = record
        .record_type
        .parse::<RecordType>()
        .map_err(|e| Error::field_assignment("type", e.to_string()))?;

    Ok(RecordState {
        id: Some(record.id.to_string()),
        zone: record.domain_name.clone(),
        host: display_host(&record.host),
        record_type,
        answer: record.answer.clone(),
        ttl: record.ttl,
        priority: record.priority,
        fqdn: record.fqdn.clone(),
    })
}

/// Plan a record change on normalized forms
pub fn plan(prior: &RecordState, proposed: &RecordState) -> Plan {
    if prior.zone != proposed.zone {
        return Plan::Replace;
    }

    let prior = prior.normalized();
    let mut proposed = proposed.normalized();

    // computed attributes carry over from prior state
    proposed.id.clone_from(&prior.id);
    proposed.fqdn.clone_from(&prior.fqdn);
    if proposed.ttl == 0 {
        proposed.ttl = prior.ttl;
    }

    if prior == proposed {
        Plan::NoChange
    } else {
        Plan::Update
    }
}

/// Lifecycle adapter for `namecom_record`
pub struct RecordResource {
    api: Arc<dyn NameComApi>,
}

impl RecordResource {
    /// Create a new adapter over the given API client
    pub fn new(api: Arc<dyn NameComApi>) -> Self {
        Self { api }
    }

    async fn fetch(&self, zone: &str, id: i32) -> Result<Record> {
        debug!("Fetching record {} in zone {}", id, zone);
        self.api
            .get_record(&GetRecordRequest {
                domain_name: zone.to_string(),
                id,
            })
            .await
            .map_err(|e| Error::remote("GetRecord", e))
    }
}

fn state_id(state: &RecordState) -> Result<i32> {
    record_id(state.id.as_deref().unwrap_or_default())
}

#[async_trait]
impl Resource for RecordResource {
    type State = RecordState;

    fn type_name(&self) -> &'static str {
        "namecom_record"
    }

    fn schema(&self) -> ResourceSchema {
        ResourceSchema {
            type_name: self.type_name(),
            updatable: true,
            attributes: vec![
                Attribute::required(
                    "zone",
                    AttributeType::String,
                    "Zone is the domain name that the record belongs to.",
                )
                .force_new(),
                Attribute::optional(
                    "host",
                    AttributeType::String,
                    "Host is the hostname relative to the zone.",
                )
                .with_default(APEX_HOST),
                Attribute::computed(
                    "fqdn",
                    AttributeType::String,
                    "FQDN is the Fully Qualified Domain Name.",
                ),
                Attribute::required(
                    "type",
                    AttributeType::String,
                    "Type is one of the following: A, AAAA, ANAME, CNAME, MX, NS, SRV, or TXT.",
                ),
                Attribute::required(
                    "answer",
                    AttributeType::String,
                    "Answer is either the IP address for A or AAAA records; the target for \
                     ANAME, CNAME, MX, or NS records; the text for TXT records. For SRV \
                     records, answer has the following format: \"{weight} {port} {target}\" \
                     e.g. \"1 5061 sip.example.org\".",
                ),
                Attribute::optional(
                    "ttl",
                    AttributeType::Int,
                    "TTL is the time this record can be cached for in seconds. Minimum TTL \
                     is 300, or 5 minutes.",
                )
                .and_computed(),
                Attribute::optional(
                    "priority",
                    AttributeType::Int,
                    "Priority is only required for MX and SRV records, it is ignored for all \
                     others.",
                ),
            ],
        }
    }

    fn plan(&self, prior: &RecordState, proposed: &RecordState) -> Plan {
        plan(prior, proposed)
    }

    async fn create(&self, planned: RecordState) -> Result<RecordState> {
        let request = to_request(&planned);
        debug!(?request, "Mapped record create request");

        let created = self
            .api
            .create_record(&request)
            .await
            .map_err(|e| Error::remote("CreateRecord", e))?;

        let state = from_response(&created)?;
        info!(
            "Created {} record {} in zone {} (id {})",
            state.record_type, state.host, state.zone, created.id
        );
        Ok(state)
    }

    async fn read(&self, current: RecordState) -> Result<Option<RecordState>> {
        let id = state_id(&current)?;

        match self.fetch(&current.zone, id).await {
            Ok(record) => from_response(&record).map(Some),
            Err(e) if e.is_not_found() => {
                warn!(
                    "Record {} in zone {} no longer exists, dropping from state",
                    id, current.zone
                );
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn update(&self, prior: RecordState, planned: RecordState) -> Result<RecordState> {
        let id = state_id(&prior)?;

        let mut request = to_request(&planned);
        request.id = id;
        request.domain_name.clone_from(&prior.zone);
        debug!(?request, "Mapped record update request");

        let updated = self
            .api
            .update_record(&request)
            .await
            .map_err(|e| Error::remote("UpdateRecord", e))?;

        info!("Updated record {} in zone {}", id, prior.zone);
        from_response(&updated)
    }

    async fn delete(&self, current: &mut RecordState) -> Result<()> {
        let id = state_id(current)?;

        self.api
            .delete_record(&DeleteRecordRequest {
                domain_name: current.zone.clone(),
                id,
            })
            .await
            .map_err(|e| Error::remote("DeleteRecord", e))?;

        info!("Deleted record {} in zone {}", id, current.zone);
        current.id = None;
        Ok(())
    }

    async fn import(&self, id: &str) -> Result<Vec<RecordState>> {
        let (zone, raw_id) = split_import_id(id, "DomainName/RecordID")?;
        let record_id = record_id(raw_id)?;

        let record = self.fetch(zone, record_id).await?;
        let state = from_response(&record)?;

        info!("Imported record {} from zone {}", record_id, zone);
        Ok(vec![state])
    }
}
