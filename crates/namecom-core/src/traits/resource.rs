// # Resource Trait
//
// Defines the lifecycle contract every managed resource type implements:
// Create, Read, Update, Delete and Import, plus plan-time diffing against
// normalized state.
//
// ## Implementations
//
// - `namecom_record`: [`crate::resources::RecordResource`]
// - `namecom_nameservers`: [`crate::resources::NameserversResource`]
// - `namecom_dnssec`: [`crate::resources::DnssecResource`]

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Outcome of comparing prior state with proposed configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    /// Normalized forms are equal; no API call is needed
    NoChange,
    /// The resource can be changed in place
    Update,
    /// An immutable attribute changed; destroy and recreate
    Replace,
}

/// Value type of a schema attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    /// UTF-8 string
    String,
    /// Integer
    Int,
    /// Boolean
    Bool,
    /// Ordered list of strings
    StringList,
}

/// One attribute of a resource schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    /// Attribute name as seen by configuration
    pub name: &'static str,
    /// Value type
    pub kind: AttributeType,
    /// Must be set in configuration
    pub required: bool,
    /// Filled in by the remote side when not configured
    pub computed: bool,
    /// Changing this attribute forces replacement
    pub force_new: bool,
    /// Default applied when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'static str>,
    /// Human-readable description
    pub description: &'static str,
}

impl Attribute {
    /// A required attribute
    pub fn required(name: &'static str, kind: AttributeType, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: true,
            computed: false,
            force_new: false,
            default: None,
            description,
        }
    }

    /// An optional attribute
    pub fn optional(name: &'static str, kind: AttributeType, description: &'static str) -> Self {
        Self {
            required: false,
            ..Self::required(name, kind, description)
        }
    }

    /// A read-only attribute set by the remote side
    pub fn computed(name: &'static str, kind: AttributeType, description: &'static str) -> Self {
        Self {
            computed: true,
            ..Self::optional(name, kind, description)
        }
    }

    /// Mark the attribute as forcing replacement on change
    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    /// Mark an optional attribute as also computed
    pub fn and_computed(mut self) -> Self {
        self.computed = true;
        self
    }

    /// Set the default value
    pub fn with_default(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }
}

/// Schema of one resource type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceSchema {
    /// Resource type name (e.g. "namecom_record")
    pub type_name: &'static str,
    /// Whether the resource supports in-place update
    pub updatable: bool,
    /// Attributes in declaration order
    pub attributes: Vec<Attribute>,
}

impl ResourceSchema {
    /// Look up an attribute by name
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// Trait for managed resource types
///
/// Each implementation owns the field mapping between its typed state and the
/// API wire types, and performs at most the round trips its operation needs.
/// None of the methods retry; every failure is returned to the caller.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Strongly-typed resource state
    type State: Serialize + DeserializeOwned + Clone + Send + Sync + 'static;

    /// Resource type name (e.g. "namecom_record")
    fn type_name(&self) -> &'static str;

    /// Attribute schema of this resource type
    fn schema(&self) -> ResourceSchema;

    /// Compare prior state against proposed configuration
    ///
    /// Comparison happens on normalized forms so that representation-only
    /// differences never produce an update.
    fn plan(&self, prior: &Self::State, proposed: &Self::State) -> Plan;

    /// Create the resource and return the authoritative state
    async fn create(&self, planned: Self::State) -> Result<Self::State, crate::Error>;

    /// Refresh state from the remote side
    ///
    /// Returns `Ok(None)` when the resource no longer exists.
    async fn read(&self, current: Self::State) -> Result<Option<Self::State>, crate::Error>;

    /// Apply planned changes in place
    async fn update(
        &self,
        prior: Self::State,
        planned: Self::State,
    ) -> Result<Self::State, crate::Error>;

    /// Remove the resource; clears the state identifier on success
    async fn delete(&self, current: &mut Self::State) -> Result<(), crate::Error>;

    /// Adopt an existing remote resource by import identifier
    async fn import(&self, id: &str) -> Result<Vec<Self::State>, crate::Error>;
}
