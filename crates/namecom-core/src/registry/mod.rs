//! Resource registry
//!
//! The registry maps resource type names to lifecycle adapters, so a host
//! boundary that only sees `(type name, JSON state)` pairs can drive the
//! typed adapters without hardcoded if-else chains.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use namecom_core::ResourceRegistry;
//!
//! let registry = ResourceRegistry::with_builtin(api);
//! let state = registry
//!     .create("namecom_record", serde_json::json!({
//!         "zone": "example.com",
//!         "host": "www",
//!         "type": "A",
//!         "answer": "10.0.0.1",
//!     }))
//!     .await?;
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::resources::{DnssecResource, NameserversResource, RecordResource};
use crate::traits::{NameComApi, Plan, Resource, ResourceSchema};

/// Object-safe view of a [`Resource`] over JSON states
///
/// Implemented for every [`Resource`]; states are decoded into the typed
/// state before reaching the adapter and encoded again on the way out.
#[async_trait]
pub trait DynResource: Send + Sync {
    /// Resource type name
    fn type_name(&self) -> &'static str;

    /// Attribute schema
    fn schema(&self) -> ResourceSchema;

    /// Plan on JSON states
    fn plan(&self, prior: Value, proposed: Value) -> Result<Plan>;

    /// Create from JSON configuration
    async fn create(&self, planned: Value) -> Result<Value>;

    /// Refresh a JSON state; `None` when the resource is gone
    async fn read(&self, current: Value) -> Result<Option<Value>>;

    /// Update from JSON prior state and configuration
    async fn update(&self, prior: Value, planned: Value) -> Result<Value>;

    /// Delete; returns the state with its identifier cleared
    async fn delete(&self, current: Value) -> Result<Value>;

    /// Import by identifier
    async fn import(&self, id: &str) -> Result<Vec<Value>>;
}

fn decode<S: DeserializeOwned>(type_name: &str, value: Value) -> Result<S> {
    serde_json::from_value(value)
        .map_err(|e| Error::invalid_input(format!("invalid {} state: {}", type_name, e)))
}

fn encode<S: Serialize>(state: &S) -> Result<Value> {
    serde_json::to_value(state).map_err(|e| Error::field_assignment("state", e.to_string()))
}

#[async_trait]
impl<R: Resource> DynResource for R {
    fn type_name(&self) -> &'static str {
        Resource::type_name(self)
    }

    fn schema(&self) -> ResourceSchema {
        Resource::schema(self)
    }

    fn plan(&self, prior: Value, proposed: Value) -> Result<Plan> {
        let name = Resource::type_name(self);
        let prior: R::State = decode(name, prior)?;
        let proposed: R::State = decode(name, proposed)?;
        Ok(Resource::plan(self, &prior, &proposed))
    }

    async fn create(&self, planned: Value) -> Result<Value> {
        let planned = decode(Resource::type_name(self), planned)?;
        encode(&Resource::create(self, planned).await?)
    }

    async fn read(&self, current: Value) -> Result<Option<Value>> {
        let current = decode(Resource::type_name(self), current)?;
        match Resource::read(self, current).await? {
            Some(state) => encode(&state).map(Some),
            None => Ok(None),
        }
    }

    async fn update(&self, prior: Value, planned: Value) -> Result<Value> {
        let name = Resource::type_name(self);
        let prior = decode(name, prior)?;
        let planned = decode(name, planned)?;
        encode(&Resource::update(self, prior, planned).await?)
    }

    async fn delete(&self, current: Value) -> Result<Value> {
        let mut current: R::State = decode(Resource::type_name(self), current)?;
        Resource::delete(self, &mut current).await?;
        encode(&current)
    }

    async fn import(&self, id: &str) -> Result<Vec<Value>> {
        Resource::import(self, id)
            .await?
            .iter()
            .map(encode)
            .collect()
    }
}

/// Registry of resource types for dispatch by type name
#[derive(Default)]
pub struct ResourceRegistry {
    /// Registered adapters keyed by type name
    resources: BTreeMap<&'static str, Box<dyn DynResource>>,
}

impl ResourceRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the three name.com resource types registered
    pub fn with_builtin(api: Arc<dyn NameComApi>) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(RecordResource::new(Arc::clone(&api))));
        registry.register(Box::new(NameserversResource::new(Arc::clone(&api))));
        registry.register(Box::new(DnssecResource::new(api)));
        registry
    }

    /// Register a resource adapter under its type name
    ///
    /// A later registration with the same name replaces the earlier one.
    pub fn register(&mut self, resource: Box<dyn DynResource>) {
        let name = resource.type_name();
        if self.resources.insert(name, resource).is_some() {
            tracing::warn!("Replaced resource registration for {}", name);
        }
    }

    /// Check if a resource type is registered
    pub fn has_resource(&self, type_name: &str) -> bool {
        self.resources.contains_key(type_name)
    }

    /// List registered resource type names
    pub fn list_resources(&self) -> Vec<&'static str> {
        self.resources.keys().copied().collect()
    }

    /// Schemas of all registered resource types
    pub fn schemas(&self) -> Vec<ResourceSchema> {
        self.resources.values().map(|r| r.schema()).collect()
    }

    fn get(&self, type_name: &str) -> Result<&dyn DynResource> {
        self.resources
            .get(type_name)
            .map(|r| r.as_ref())
            .ok_or_else(|| Error::config(format!("Unknown resource type: {}", type_name)))
    }

    /// Plan a change for `type_name`
    pub fn plan(&self, type_name: &str, prior: Value, proposed: Value) -> Result<Plan> {
        self.get(type_name)?.plan(prior, proposed)
    }

    /// Create a resource of `type_name`
    pub async fn create(&self, type_name: &str, planned: Value) -> Result<Value> {
        self.get(type_name)?.create(planned).await
    }

    /// Refresh a resource of `type_name`
    pub async fn read(&self, type_name: &str, current: Value) -> Result<Option<Value>> {
        self.get(type_name)?.read(current).await
    }

    /// Update a resource of `type_name` in place
    pub async fn update(&self, type_name: &str, prior: Value, planned: Value) -> Result<Value> {
        self.get(type_name)?.update(prior, planned).await
    }

    /// Delete a resource of `type_name`
    pub async fn delete(&self, type_name: &str, current: Value) -> Result<Value> {
        self.get(type_name)?.delete(current).await
    }

    /// Import a resource of `type_name` by identifier
    pub async fn import(&self, type_name: &str, id: &str) -> Result<Vec<Value>> {
        self.get(type_name)?.import(id).await
    }
}
