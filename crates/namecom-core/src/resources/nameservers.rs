//! `namecom_nameservers`: the authoritative nameserver list of a zone
//!
//! Every Create and Update resends the complete list; there is no partial
//! add or remove. Delete never removes anything remotely, it resets the zone
//! to [`DEFAULT_NAMESERVERS`].
//!
//! Identifier and import identifier: the bare zone name.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::traits::{
    Attribute, AttributeType, Domain, GetDomainRequest, NameComApi, Plan, Resource,
    ResourceSchema, SetNameserversRequest,
};
use crate::{Error, Result};

/// Nameservers a zone is reset to when the resource is deleted
pub const DEFAULT_NAMESERVERS: [&str; 4] = [
    "ns1.name.com",
    "ns2.name.com",
    "ns3.name.com",
    "ns4.name.com",
];

/// State of a `namecom_nameservers` resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameserversState {
    /// Zone name; absent until created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Zone to set the nameservers for
    pub zone: String,
    /// Complete ordered nameserver list
    pub nameservers: Vec<String>,
}

impl NameserversState {
    /// Configuration for `zone` with the given nameservers
    pub fn new<I, S>(zone: impl Into<String>, nameservers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: None,
            zone: zone.into(),
            nameservers: nameservers.into_iter().map(Into::into).collect(),
        }
    }

    /// Zone used for remote calls: the identifier when set, else the zone
    fn lookup_zone(&self) -> &str {
        match self.id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => &self.zone,
        }
    }
}

/// Map configuration to a full-replace request
pub fn to_request(state: &NameserversState) -> SetNameserversRequest {
    SetNameserversRequest {
        domain_name: state.zone.clone(),
        nameservers: state.nameservers.clone(),
    }
}

/// Map a domain response to state, adopting the remote zone name as identifier
pub fn from_domain(domain: &Domain) -> NameserversState {
    NameserversState {
        id: Some(domain.domain_name.clone()),
        zone: domain.domain_name.clone(),
        nameservers: domain.nameservers.clone(),
    }
}

/// Plan a nameserver change
///
/// A different zone replaces the resource so the old zone is reset to the
/// defaults; the list itself is compared in order.
pub fn plan(prior: &NameserversState, proposed: &NameserversState) -> Plan {
    if prior.zone != proposed.zone {
        Plan::Replace
    } else if prior.nameservers != proposed.nameservers {
        Plan::Update
    } else {
        Plan::NoChange
    }
}

/// Lifecycle adapter for `namecom_nameservers`
pub struct NameserversResource {
    api: Arc<dyn NameComApi>,
}

impl NameserversResource {
    /// Create a new adapter over the given API client
    pub fn new(api: Arc<dyn NameComApi>) -> Self {
        Self { api }
    }

    /// Set (used for both Create and Update)
    async fn set(&self, planned: &NameserversState) -> Result<NameserversState> {
        let request = to_request(planned);
        debug!(?request, "Mapped set nameservers request");

        let domain = self
            .api
            .set_nameservers(&request)
            .await
            .map_err(|e| Error::remote("SetNameservers", e))?;

        info!(
            "Set {} nameservers for zone {}",
            domain.nameservers.len(),
            domain.domain_name
        );
        Ok(from_domain(&domain))
    }

    async fn fetch(&self, zone: &str) -> Result<Domain> {
        debug!("Fetching domain {}", zone);
        self.api
            .get_domain(&GetDomainRequest {
                domain_name: zone.to_string(),
            })
            .await
            .map_err(|e| Error::remote("GetDomain", e))
    }
}

#[async_trait]
impl Resource for NameserversResource {
    type State = NameserversState;

    fn type_name(&self) -> &'static str {
        "namecom_nameservers"
    }

    fn schema(&self) -> ResourceSchema {
        ResourceSchema {
            type_name: self.type_name(),
            updatable: true,
            attributes: vec![
                Attribute::required(
                    "zone",
                    AttributeType::String,
                    "Zone is the domain name to set the nameservers for.",
                ),
                Attribute::required(
                    "nameservers",
                    AttributeType::StringList,
                    "Nameservers is a list of the nameservers to set. Nameservers should \
                     already be set up and hosting the zone properly as some registries will \
                     verify before allowing the change.",
                ),
            ],
        }
    }

    fn plan(&self, prior: &NameserversState, proposed: &NameserversState) -> Plan {
        plan(prior, proposed)
    }

    async fn create(&self, planned: NameserversState) -> Result<NameserversState> {
        self.set(&planned).await
    }

    async fn read(&self, current: NameserversState) -> Result<Option<NameserversState>> {
        let zone = current.lookup_zone().to_string();

        match self.fetch(&zone).await {
            Ok(domain) => {
                // only the nameserver list is taken from the domain
                let mut state = current;
                state.nameservers = domain.nameservers;
                Ok(Some(state))
            }
            Err(e) if e.is_not_found() => {
                warn!("Domain {} no longer exists, dropping from state", zone);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn update(
        &self,
        _prior: NameserversState,
        planned: NameserversState,
    ) -> Result<NameserversState> {
        self.set(&planned).await
    }

    async fn delete(&self, current: &mut NameserversState) -> Result<()> {
        let request = SetNameserversRequest {
            domain_name: current.lookup_zone().to_string(),
            nameservers: DEFAULT_NAMESERVERS.iter().map(|ns| ns.to_string()).collect(),
        };

        self.api
            .set_nameservers(&request)
            .await
            .map_err(|e| Error::remote("SetNameservers", e))?;

        info!(
            "Reset zone {} to default nameservers",
            request.domain_name
        );
        current.id = None;
        Ok(())
    }

    async fn import(&self, id: &str) -> Result<Vec<NameserversState>> {
        if id.is_empty() || id.contains('/') {
            return Err(Error::identifier_format(format!(
                "invalid id {:?} specified, should be a bare zone name for import",
                id
            )));
        }

        let domain = self.fetch(id).await?;
        info!("Imported nameservers for zone {}", domain.domain_name);
        Ok(vec![from_domain(&domain)])
    }
}
