//! Core traits for the namecom provider
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`NameComApi`]: Outbound calls to the name.com API
//! - [`Resource`]: Lifecycle of one managed resource type

pub mod api_client;
pub mod resource;

pub use api_client::{
    DeleteDnssecRequest, DeleteRecordRequest, Dnssec, Domain, GetDnssecRequest, GetDomainRequest,
    GetRecordRequest, NameComApi, NameComApiFactory, Record, SetNameserversRequest,
};
pub use resource::{Attribute, AttributeType, Plan, Resource, ResourceSchema};
