// # name.com API Client
//
// This crate provides the HTTP implementation of `NameComApi` against the
// name.com v4 REST API.
//
// ## Behaviour
//
// - One HTTP request per trait call; no retry, backoff or caching
// - HTTP Basic authentication with the account username and API token
// - Fixed request timeout (30 seconds)
// - Status mapping: 401/403 → Authentication, 404 → NotFound,
//   429 → RateLimited, 5xx → transient provider error
//
// ## Security Requirements
//
// - API token NEVER appears in logs or Debug output
// - Construction fails fast if username or token is empty
//
// ## API Reference
//
// - name.com API v4: https://www.name.com/api-docs
// - Records: `/v4/domains/{domain}/records[/{id}]`
// - Nameservers: POST `/v4/domains/{domain}:setNameservers`
// - Domain: GET `/v4/domains/{domain}`
// - DNSSEC: `/v4/domains/{domain}/dnssec[/{digest}]`

use async_trait::async_trait;
use namecom_core::config::ProviderConfig;
use namecom_core::traits::{
    DeleteDnssecRequest, DeleteRecordRequest, Dnssec, Domain, GetDnssecRequest, GetDomainRequest,
    GetRecordRequest, NameComApi, NameComApiFactory, Record, SetNameserversRequest,
};
use namecom_core::{Error, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent sent with every request
const USER_AGENT: &str = concat!("namecom-provider/", env!("CARGO_PKG_VERSION"));

/// Error body returned by the API on failure
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
    #[serde(default)]
    details: String,
}

impl ApiErrorBody {
    fn describe(self) -> String {
        if self.details.is_empty() {
            self.message
        } else {
            format!("{} ({})", self.message, self.details)
        }
    }
}

/// name.com API client
///
/// # Trust Level: Untrusted
///
/// This client is isolated, stateless, and single-shot. Failures are returned
/// untouched; the lifecycle layer tags them with the operation name.
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the API token.
pub struct NameComClient {
    /// Account username
    username: String,

    /// API token
    /// ⚠️ NEVER log this value
    token: String,

    /// API base URL without the `/v4` suffix
    base_url: String,

    /// Parsed base URL that request paths are appended to
    endpoint: reqwest::Url,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for NameComClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NameComClient")
            .field("username", &self.username)
            .field("token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl NameComClient {
    /// Create a new client against `base_url`
    ///
    /// # Security
    ///
    /// The API token will NEVER be logged or displayed in error messages.
    pub fn new(
        username: impl Into<String>,
        token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        let username = username.into();
        let token = token.into();

        if username.is_empty() {
            return Err(Error::config("name.com API username cannot be empty"));
        }
        if token.is_empty() {
            return Err(Error::config("name.com API token cannot be empty"));
        }

        let base_url = base_url.into().trim_end_matches('/').to_string();
        let endpoint = reqwest::Url::parse(&base_url)
            .map_err(|e| Error::config(format!("Invalid API base URL {:?}: {}", base_url, e)))?;
        if endpoint.cannot_be_a_base() {
            return Err(Error::config(format!(
                "Invalid API base URL {:?}: not a hierarchical URL",
                base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            username,
            token,
            base_url,
            endpoint,
            client,
        })
    }

    /// Create a client from provider configuration
    ///
    /// The `test` flag selects the sandbox endpoint.
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        config.validate()?;
        if config.test {
            tracing::warn!("name.com client using the TEST API endpoint");
        }
        Self::new(&config.username, &config.token, config.base_url())
    }

    /// The base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build `{base}/v4/{segments..}`, percent-encoding each segment
    ///
    /// A `/` inside a zone or digest stays part of its segment.
    fn url(&self, segments: &[&str]) -> Result<reqwest::Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| Error::config("API base URL cannot carry a path"))?
            .pop_if_empty()
            .push("v4")
            .extend(segments);
        Ok(url)
    }

    /// Send a request and map non-success statuses to errors
    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        what: &str,
    ) -> Result<reqwest::Response> {
        let response = request
            .basic_auth(&self.username, Some(&self.token))
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(ApiErrorBody::describe)
            .unwrap_or(body);

        tracing::debug!("{} returned {}: {}", what, status, message);

        // Map HTTP status codes to specific errors
        Err(match status.as_u16() {
            401 | 403 => Error::auth(format!(
                "Invalid username/token or insufficient permissions. Status: {}",
                status
            )),
            404 => Error::not_found(format!("{}: {}", what, message)),
            429 => Error::rate_limited(format!(
                "Rate limit exceeded. Please retry later. Status: {}",
                status
            )),
            500..=599 => Error::provider(
                "namecom",
                format!("name.com server error (transient): {} - {}", status, message),
            ),
            _ => Error::provider(
                "namecom",
                format!("{} failed: {} - {}", what, status, message),
            ),
        })
    }

    async fn json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        what: &str,
    ) -> Result<T> {
        self.execute(request, what)
            .await?
            .json::<T>()
            .await
            .map_err(|e| Error::provider("namecom", format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl NameComApi for NameComClient {
    async fn create_record(&self, record: &Record) -> Result<Record> {
        tracing::debug!("POST record in zone {}", record.domain_name);
        let url = self.url(&["domains", record.domain_name.as_str(), "records"])?;
        self.json(self.client.post(url).json(record), "CreateRecord")
            .await
    }

    async fn get_record(&self, request: &GetRecordRequest) -> Result<Record> {
        let id = request.id.to_string();
        let url = self.url(&["domains", request.domain_name.as_str(), "records", id.as_str()])?;
        self.json(self.client.get(url), "GetRecord").await
    }

    async fn update_record(&self, record: &Record) -> Result<Record> {
        tracing::debug!("PUT record {} in zone {}", record.id, record.domain_name);
        let id = record.id.to_string();
        let url = self.url(&["domains", record.domain_name.as_str(), "records", id.as_str()])?;
        self.json(self.client.put(url).json(record), "UpdateRecord")
            .await
    }

    async fn delete_record(&self, request: &DeleteRecordRequest) -> Result<()> {
        let id = request.id.to_string();
        let url = self.url(&["domains", request.domain_name.as_str(), "records", id.as_str()])?;
        self.execute(self.client.delete(url), "DeleteRecord")
            .await
            .map(|_| ())
    }

    async fn set_nameservers(&self, request: &SetNameserversRequest) -> Result<Domain> {
        tracing::debug!(
            "Setting {} nameservers for zone {}",
            request.nameservers.len(),
            request.domain_name
        );
        let action = format!("{}:setNameservers", request.domain_name);
        let url = self.url(&["domains", action.as_str()])?;
        self.json(self.client.post(url).json(request), "SetNameservers")
            .await
    }

    async fn get_domain(&self, request: &GetDomainRequest) -> Result<Domain> {
        let url = self.url(&["domains", request.domain_name.as_str()])?;
        self.json(self.client.get(url), "GetDomain").await
    }

    async fn create_dnssec(&self, dnssec: &Dnssec) -> Result<Dnssec> {
        let url = self.url(&["domains", dnssec.domain_name.as_str(), "dnssec"])?;
        self.json(self.client.post(url).json(dnssec), "CreateDNSSEC")
            .await
    }

    async fn get_dnssec(&self, request: &GetDnssecRequest) -> Result<Dnssec> {
        let url = self.url(&[
            "domains",
            request.domain_name.as_str(),
            "dnssec",
            request.digest.as_str(),
        ])?;
        self.json(self.client.get(url), "GetDNSSEC").await
    }

    async fn delete_dnssec(&self, request: &DeleteDnssecRequest) -> Result<()> {
        let url = self.url(&[
            "domains",
            request.domain_name.as_str(),
            "dnssec",
            request.digest.as_str(),
        ])?;
        self.execute(self.client.delete(url), "DeleteDNSSEC")
            .await
            .map(|_| ())
    }

    fn client_name(&self) -> &'static str {
        "namecom"
    }
}

/// Factory for creating name.com API clients
pub struct NameComClientFactory;

impl NameComApiFactory for NameComClientFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn NameComApi>> {
        Ok(Box::new(NameComClient::from_config(config)?))
    }
}
