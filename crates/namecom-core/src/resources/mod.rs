// # Resource Implementations
//
// Typed state, field mapping and lifecycle for each managed resource type.

pub mod dnssec;
pub mod nameservers;
pub mod record;

pub use dnssec::{DnssecResource, DnssecState};
pub use nameservers::{DEFAULT_NAMESERVERS, NameserversResource, NameserversState};
pub use record::{RecordResource, RecordState, RecordType, record_id};

use crate::{Error, Result};

/// Split a composite import identifier on the first `/`
///
/// Both halves must be non-empty. `expected` names the format in the error
/// message (e.g. "Zone/RecordID").
pub fn split_import_id<'a>(id: &'a str, expected: &str) -> Result<(&'a str, &'a str)> {
    match id.split_once('/') {
        Some((left, right)) if !left.is_empty() && !right.is_empty() => Ok((left, right)),
        _ => Err(Error::identifier_format(format!(
            "invalid id {:?} specified, should be in format \"{}\" for import",
            id, expected
        ))),
    }
}
