//! Lifecycle Contract Test: namecom_record
//!
//! Constraints verified:
//! - Create adopts the server-assigned id and server-computed fields
//! - Read drops a vanished record instead of failing; other errors propagate
//! - Update keys on the stored id and trusts the response
//! - Delete clears the identifier
//! - Import parses "zone/id" and populates exactly as Read
//! - Failures carry the outbound operation name

mod common;

use common::*;
use namecom_core::traits::{Plan, Record, Resource};
use namecom_core::{Error, RecordResource, RecordState, RecordType};
use tokio_test::{assert_err, assert_ok};

fn existing(id: i32, host: &str) -> Record {
    Record {
        id,
        domain_name: "example.com".into(),
        host: host.into(),
        fqdn: "example.com.".into(),
        record_type: "A".into(),
        answer: "10.0.0.1".into(),
        ttl: 300,
        priority: 0,
    }
}

#[tokio::test]
async fn create_adopts_remote_id_and_computed_fields() {
    let api = MockNameCom::new();
    let resource = RecordResource::new(shared(&api));

    let planned = RecordState::new("example.com", "@", RecordType::A, "10.0.0.1");
    let state = assert_ok!(resource.create(planned).await);

    assert_eq!(state.id.as_deref(), Some("1000"));
    assert_eq!(state.host, "@");
    assert_eq!(state.fqdn, "example.com.");
    assert_eq!(state.ttl, 300, "server default TTL is authoritative");

    // request went out with the apex normalized and no ttl/priority
    match &api.calls()[0] {
        Call::CreateRecord(request) => {
            assert_eq!(request.host, "");
            assert_eq!(request.record_type, "A");
            assert_eq!(request.ttl, 0);
            assert_eq!(request.priority, 0);
        }
        other => panic!("unexpected call {:?}", other),
    }
    assert_eq!(api.call_count(), 1);
}

#[tokio::test]
async fn create_failure_is_tagged() {
    let api = MockNameCom::new();
    api.fail_on("CreateRecord");
    let resource = RecordResource::new(shared(&api));

    let planned = RecordState::new("example.com", "www", RecordType::Txt, "hello");
    let err = assert_err!(resource.create(planned).await);

    assert_eq!(err.operation(), Some("CreateRecord"));
    assert_eq!(api.record_count(), 0);
}

#[tokio::test]
async fn read_refreshes_from_remote() {
    let api = MockNameCom::new().with_record(existing(42, ""));
    let resource = RecordResource::new(shared(&api));

    let mut current = RecordState::new("example.com", "@", RecordType::A, "stale");
    current.id = Some("42".into());

    let state = assert_ok!(resource.read(current).await).expect("record exists");
    assert_eq!(state.answer, "10.0.0.1");
    assert_eq!(state.host, "@");
    assert_eq!(
        api.calls(),
        vec![Call::GetRecord {
            zone: "example.com".into(),
            id: 42
        }]
    );
}

#[tokio::test]
async fn read_drops_vanished_record() {
    let api = MockNameCom::new();
    let resource = RecordResource::new(shared(&api));

    let mut current = RecordState::new("example.com", "www", RecordType::A, "10.0.0.1");
    current.id = Some("7".into());

    assert_eq!(assert_ok!(resource.read(current).await), None);
}

#[tokio::test]
async fn read_propagates_transient_failure() {
    let api = MockNameCom::new().with_record(existing(42, "www"));
    api.fail_on("GetRecord");
    let resource = RecordResource::new(shared(&api));

    let mut current = RecordState::new("example.com", "www", RecordType::A, "10.0.0.1");
    current.id = Some("42".into());

    let err = assert_err!(resource.read(current).await);
    assert_eq!(err.operation(), Some("GetRecord"));
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn read_rejects_non_numeric_id_without_calling_remote() {
    let api = MockNameCom::new();
    let resource = RecordResource::new(shared(&api));

    let mut current = RecordState::new("example.com", "www", RecordType::A, "10.0.0.1");
    current.id = Some("abc".into());

    let err = assert_err!(resource.read(current).await);
    assert!(matches!(err, Error::IdentifierFormat(_)));
    assert_eq!(api.call_count(), 0);
}

#[tokio::test]
async fn update_uses_stored_id_and_response() {
    let api = MockNameCom::new().with_record(existing(42, "www"));
    let resource = RecordResource::new(shared(&api));

    let mut prior = RecordState::new("example.com", "www", RecordType::A, "10.0.0.1").with_ttl(300);
    prior.id = Some("42".into());
    let planned = RecordState::new("example.com", "www", RecordType::A, "10.0.0.2");

    let state = assert_ok!(resource.update(prior, planned).await);

    assert_eq!(state.id.as_deref(), Some("42"));
    assert_eq!(state.answer, "10.0.0.2");
    assert_eq!(state.fqdn, "www.example.com.");
    assert_eq!(state.ttl, 300, "omitted ttl keeps the server value");

    match &api.calls()[0] {
        Call::UpdateRecord(request) => {
            assert_eq!(request.id, 42);
            assert_eq!(request.domain_name, "example.com");
        }
        other => panic!("unexpected call {:?}", other),
    }
}

#[tokio::test]
async fn delete_clears_identifier() {
    let api = MockNameCom::new().with_record(existing(42, "www"));
    let resource = RecordResource::new(shared(&api));

    let mut state = RecordState::new("example.com", "www", RecordType::A, "10.0.0.1");
    state.id = Some("42".into());

    assert_ok!(resource.delete(&mut state).await);
    assert_eq!(state.id, None);
    assert_eq!(api.record_count(), 0);
    assert_eq!(api.operations(), vec!["DeleteRecord"]);
}

#[tokio::test]
async fn delete_failure_keeps_identifier() {
    let api = MockNameCom::new().with_record(existing(42, "www"));
    api.fail_on("DeleteRecord");
    let resource = RecordResource::new(shared(&api));

    let mut state = RecordState::new("example.com", "www", RecordType::A, "10.0.0.1");
    state.id = Some("42".into());

    let err = assert_err!(resource.delete(&mut state).await);
    assert_eq!(err.operation(), Some("DeleteRecord"));
    assert_eq!(state.id.as_deref(), Some("42"));
}

#[tokio::test]
async fn import_by_zone_and_id() {
    let api = MockNameCom::new().with_record(existing(42, ""));
    let resource = RecordResource::new(shared(&api));

    let states = assert_ok!(resource.import("example.com/42").await);
    assert_eq!(states.len(), 1);
    assert_eq!(states[0].zone, "example.com");
    assert_eq!(states[0].id.as_deref(), Some("42"));
    assert_eq!(states[0].host, "@");
    assert_eq!(
        api.calls(),
        vec![Call::GetRecord {
            zone: "example.com".into(),
            id: 42
        }]
    );
}

#[tokio::test]
async fn import_rejects_malformed_identifiers() {
    let api = MockNameCom::new();
    let resource = RecordResource::new(shared(&api));

    for id in ["example.com", "example.com/", "/42", "example.com/abc"] {
        let err = assert_err!(resource.import(id).await);
        assert!(matches!(err, Error::IdentifierFormat(_)), "{id}");
    }
    assert_eq!(api.call_count(), 0);
}

#[tokio::test]
async fn normalized_state_plans_no_change_after_refresh() {
    let api = MockNameCom::new();
    let resource = RecordResource::new(shared(&api));

    let config = RecordState::new("example.com", "", RecordType::Cname, "target.example.net")
        .with_priority(5);
    let created = assert_ok!(resource.create(config.clone()).await);
    let refreshed = assert_ok!(resource.read(created).await).expect("record exists");

    assert_eq!(resource.plan(&refreshed, &config), Plan::NoChange);
}
