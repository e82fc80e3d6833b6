// # namecom-core
//
// Core library for the name.com Terraform resources.
//
// ## Architecture Overview
//
// This library provides the mapping and lifecycle logic between declared
// resource state and the name.com API:
// - **NameComApi**: Trait for the outbound API client (one call per method)
// - **Resource**: Trait for the Create/Read/Update/Delete/Import lifecycle
// - **resources**: Typed state, field mappers and plan normalization for
//   `namecom_record`, `namecom_nameservers` and `namecom_dnssec`
// - **ResourceRegistry**: Dispatch by resource type name over JSON states
// - **ProviderConfig**: Credentials and endpoint selection
//
// ## Design Principles
//
// 1. **Typed state**: Every resource kind has its own struct; mapping is
//    explicit and field-by-field
// 2. **Normalize before compare**: Host `"@"`/empty and ignored priorities are
//    folded away before any diff
// 3. **Single-shot**: No retries, no caching; every failure reaches the caller
//    tagged with the operation that failed
// 4. **Library-First**: The host protocol lives outside this crate

pub mod config;
pub mod error;
pub mod registry;
pub mod resources;
pub mod traits;

// Re-export core types for convenience
pub use config::ProviderConfig;
pub use error::{Error, Result};
pub use registry::{DynResource, ResourceRegistry};
pub use resources::{
    DnssecResource, DnssecState, NameserversResource, NameserversState, RecordResource,
    RecordState, RecordType,
};
pub use traits::{NameComApi, NameComApiFactory, Plan, Resource, ResourceSchema};
