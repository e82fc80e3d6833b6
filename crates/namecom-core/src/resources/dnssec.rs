//! `namecom_dnssec`: a DS record registered for DNSSEC validation
//!
//! The remote side keys DS records by (zone, digest) and offers no update, so
//! every attribute forces replacement. Create sets the identifier to the zone
//! and then reads the entry back by (zone, digest).
//!
//! Import identifier: `"zone/digest"`.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::split_import_id;
use crate::traits::{
    Attribute, AttributeType, DeleteDnssecRequest, Dnssec, GetDnssecRequest, NameComApi, Plan,
    Resource, ResourceSchema,
};
use crate::{Error, Result};

/// State of a `namecom_dnssec` resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnssecState {
    /// Zone name; absent until created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Zone the DS record belongs to
    pub zone: String,
    /// Key tag of the DNSKEY RR that validates this signature
    pub key_tag: i32,
    /// Algorithm used for signing
    pub algorithm: i32,
    /// Algorithm used to create the digest
    pub digest_type: i32,
    /// Digest of the DNSKEY RR registered with the registry
    pub digest: String,
}

impl DnssecState {
    /// Configuration for a DS record
    pub fn new(
        zone: impl Into<String>,
        key_tag: i32,
        algorithm: i32,
        digest_type: i32,
        digest: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            zone: zone.into(),
            key_tag,
            algorithm,
            digest_type,
            digest: digest.into(),
        }
    }

    /// The (zone, digest) lookup key; both must be present
    fn key(&self) -> Result<(&str, &str)> {
        if self.zone.is_empty() {
            return Err(Error::missing_precondition("Error getting zone"));
        }
        if self.digest.is_empty() {
            return Err(Error::missing_precondition("Error getting digest"));
        }
        Ok((&self.zone, &self.digest))
    }
}

/// Map configuration to an API request
pub fn to_request(state: &DnssecState) -> Dnssec {
    Dnssec {
        domain_name: state.zone.clone(),
        key_tag: state.key_tag,
        algorithm: state.algorithm,
        digest_type: state.digest_type,
        digest: state.digest.clone(),
    }
}

/// Map an API response onto state, keeping the identifier
pub fn from_response(id: Option<String>, dnssec: &Dnssec) -> DnssecState {
    DnssecState {
        id,
        zone: dnssec.domain_name.clone(),
        key_tag: dnssec.key_tag,
        algorithm: dnssec.algorithm,
        digest_type: dnssec.digest_type,
        digest: dnssec.digest.clone(),
    }
}

/// Plan a DS record change: any difference replaces
pub fn plan(prior: &DnssecState, proposed: &DnssecState) -> Plan {
    if to_request(prior) == to_request(proposed) {
        Plan::NoChange
    } else {
        Plan::Replace
    }
}

/// Lifecycle adapter for `namecom_dnssec`
pub struct DnssecResource {
    api: Arc<dyn NameComApi>,
}

impl DnssecResource {
    /// Create a new adapter over the given API client
    pub fn new(api: Arc<dyn NameComApi>) -> Self {
        Self { api }
    }

    async fn fetch(&self, zone: &str, digest: &str) -> Result<Dnssec> {
        debug!("Fetching DNSSEC entry {} in zone {}", digest, zone);
        self.api
            .get_dnssec(&GetDnssecRequest {
                domain_name: zone.to_string(),
                digest: digest.to_string(),
            })
            .await
            .map_err(|e| Error::remote("GetDNSSEC", e))
    }
}

#[async_trait]
impl Resource for DnssecResource {
    type State = DnssecState;

    fn type_name(&self) -> &'static str {
        "namecom_dnssec"
    }

    fn schema(&self) -> ResourceSchema {
        ResourceSchema {
            type_name: self.type_name(),
            updatable: false,
            attributes: vec![
                Attribute::required(
                    "zone",
                    AttributeType::String,
                    "Zone is the domain name that the DNSSEC belongs to.",
                )
                .force_new(),
                Attribute::required(
                    "key_tag",
                    AttributeType::Int,
                    "KeyTag contains the key tag value of the DNSKEY RR that validates this \
                     signature.",
                )
                .force_new(),
                Attribute::required(
                    "algorithm",
                    AttributeType::Int,
                    "Algorithm is an integer identifying the algorithm used for signing.",
                )
                .force_new(),
                Attribute::required(
                    "digest_type",
                    AttributeType::Int,
                    "DigestType is an integer identifying the algorithm used to create the \
                     digest.",
                )
                .force_new(),
                Attribute::required(
                    "digest",
                    AttributeType::String,
                    "Digest is a digest of the DNSKEY RR that is registered with the registry.",
                )
                .force_new(),
            ],
        }
    }

    fn plan(&self, prior: &DnssecState, proposed: &DnssecState) -> Plan {
        plan(prior, proposed)
    }

    async fn create(&self, planned: DnssecState) -> Result<DnssecState> {
        // the read-back key must exist before anything is created remotely
        let (zone, digest) = planned.key()?;

        let request = to_request(&planned);
        debug!(?request, "Mapped DNSSEC create request");

        self.api
            .create_dnssec(&request)
            .await
            .map_err(|e| Error::remote("CreateDNSSEC", e))?;

        info!("Created DNSSEC entry {} in zone {}", digest, zone);

        // the read-back is authoritative, not the create response
        let dnssec = self.fetch(zone, digest).await?;
        Ok(from_response(Some(zone.to_string()), &dnssec))
    }

    async fn read(&self, current: DnssecState) -> Result<Option<DnssecState>> {
        let (zone, digest) = current.key()?;

        match self.fetch(zone, digest).await {
            Ok(dnssec) => Ok(Some(from_response(current.id.clone(), &dnssec))),
            Err(e) if e.is_not_found() => {
                warn!(
                    "DNSSEC entry {} in zone {} no longer exists, dropping from state",
                    digest, zone
                );
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn update(&self, _prior: DnssecState, _planned: DnssecState) -> Result<DnssecState> {
        Err(Error::invalid_input(
            "namecom_dnssec cannot be updated in place; every attribute forces replacement",
        ))
    }

    async fn delete(&self, current: &mut DnssecState) -> Result<()> {
        let (zone, digest) = current.key()?;
        let request = DeleteDnssecRequest {
            domain_name: zone.to_string(),
            digest: digest.to_string(),
        };

        self.api
            .delete_dnssec(&request)
            .await
            .map_err(|e| Error::remote("DeleteDNSSEC", e))?;

        info!(
            "Deleted DNSSEC entry {} in zone {}",
            request.digest, request.domain_name
        );
        current.id = None;
        Ok(())
    }

    async fn import(&self, id: &str) -> Result<Vec<DnssecState>> {
        let (zone, digest) = split_import_id(id, "Zone/Digest")?;

        let dnssec = self.fetch(zone, digest).await?;

        info!("Imported DNSSEC entry {} from zone {}", digest, zone);
        Ok(vec![from_response(Some(zone.to_string()), &dnssec)])
    }
}
