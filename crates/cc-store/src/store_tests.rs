use super::*;
use crate::storage::{FileStorage, MemoryStorage};
use chrono::{Duration, TimeZone};
use tempfile::tempdir;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap()
}

fn stored_json(analytics: bool, marketing: bool, ts: DateTime<Utc>, version: &str) -> String {
    format!(
        r#"{{"essential":true,"analytics":{analytics},"marketing":{marketing},"timestamp":"{}","schemaVersion":"{version}"}}"#,
        ts.to_rfc3339()
    )
}

#[test]
fn test_load_fresh_profile_is_absent() {
    let store = ConsentStore::new(MemoryStorage::new());
    assert_eq!(store.load(now()), LoadOutcome::Absent);
}

#[test]
fn test_save_then_load_round_trip() {
    let mut store = ConsentStore::new(MemoryStorage::new());
    let saved = store.save(ConsentDecision::new(true, false), now()).unwrap();
    assert_eq!(saved.timestamp, now());
    assert_eq!(saved.schema_version, "1.0");

    let loaded = store.load(now() + Duration::days(3)).into_record().unwrap();
    assert!(loaded.essential());
    assert!(loaded.analytics);
    assert!(!loaded.marketing);
}

#[test]
fn test_save_overwrites_single_entry() {
    let mut store = ConsentStore::new(MemoryStorage::new());
    store.save(ConsentDecision::new(true, true), now()).unwrap();
    store
        .save(ConsentDecision::new(false, false), now() + Duration::hours(1))
        .unwrap();

    assert_eq!(store.storage().len(), 1);
    let loaded = store.load(now() + Duration::hours(2)).into_record().unwrap();
    assert_eq!(loaded.decision(), ConsentDecision::default());
    assert_eq!(loaded.timestamp, now() + Duration::hours(1));
}

#[test]
fn test_saved_json_shape() {
    let mut store = ConsentStore::new(MemoryStorage::new());
    store.save(ConsentDecision::new(false, true), now()).unwrap();
    let raw = store.storage().raw("cookie_consent").unwrap();
    let value: serde_json::Value = serde_json::from_str(raw).unwrap();
    assert_eq!(value["essential"], true);
    assert_eq!(value["analytics"], false);
    assert_eq!(value["marketing"], true);
    assert_eq!(value["timestamp"], "2024-09-01T08:00:00.000Z");
    assert_eq!(value["schemaVersion"], "1.0");
}

#[test]
fn test_record_181_days_old_is_invalid_regardless_of_choice() {
    for analytics in [true, false] {
        let raw = stored_json(analytics, true, now() - Duration::days(181), "1.0");
        let store = ConsentStore::new(MemoryStorage::new().with_entry("cookie_consent", &raw));
        let outcome = store.load(now());
        assert!(matches!(
            outcome,
            LoadOutcome::Invalid(ConsentError::Expired { age_days: 181, .. })
        ));
        assert!(outcome.into_record().is_none());
    }
}

#[test]
fn test_version_mismatch_is_invalid() {
    let raw = stored_json(true, true, now() - Duration::days(1), "0.9");
    let store = ConsentStore::new(MemoryStorage::new().with_entry("cookie_consent", &raw));
    assert!(matches!(
        store.load(now()),
        LoadOutcome::Invalid(ConsentError::VersionMismatch { .. })
    ));
}

#[test]
fn test_schema_bump_invalidates_previous_saves() {
    let mut old = ConsentStore::new(MemoryStorage::new());
    old.save(ConsentDecision::new(true, true), now()).unwrap();
    let storage = old.storage().clone();

    let bumped = ConsentStore::with_settings(
        storage,
        "cookie_consent",
        ValidityWindow::new("1.1", 180),
    );
    assert!(!bumped.load(now()).is_found());
}

#[test]
fn test_malformed_json_is_invalid() {
    let store = ConsentStore::new(MemoryStorage::new().with_entry("cookie_consent", "{not json"));
    assert!(matches!(
        store.load(now()),
        LoadOutcome::Invalid(ConsentError::MalformedRecord(_))
    ));
}

#[test]
fn test_unexpected_shape_is_invalid() {
    let store = ConsentStore::new(
        MemoryStorage::new().with_entry("cookie_consent", r#"{"analytics":"yes"}"#),
    );
    assert!(matches!(
        store.load(now()),
        LoadOutcome::Invalid(ConsentError::MalformedRecord(_))
    ));
}

#[test]
fn test_read_failure_is_invalid_not_panic() {
    let store = ConsentStore::new(MemoryStorage::new().failing_reads());
    assert!(matches!(
        store.load(now()),
        LoadOutcome::Invalid(ConsentError::StorageUnavailable { op: "read", .. })
    ));
}

#[test]
fn test_write_failure_is_reported() {
    let mut store = ConsentStore::new(MemoryStorage::new().failing_writes());
    let err = store
        .save(ConsentDecision::new(true, true), now())
        .unwrap_err();
    assert!(matches!(err, ConsentError::StorageUnavailable { op: "write", .. }));
    assert_eq!(store.load(now()), LoadOutcome::Absent);
}

#[test]
fn test_custom_key_is_used() {
    let mut store = ConsentStore::with_settings(
        MemoryStorage::new(),
        "site_consent",
        ValidityWindow::default(),
    );
    store.save(ConsentDecision::new(true, false), now()).unwrap();
    assert!(store.storage().raw("site_consent").is_some());
    assert!(store.storage().raw("cookie_consent").is_none());
}

#[test]
fn test_file_backed_round_trip() {
    let dir = tempdir().unwrap();
    let mut store = ConsentStore::new(FileStorage::new(dir.path()));
    store.save(ConsentDecision::new(false, true), now()).unwrap();

    let reopened = ConsentStore::new(FileStorage::new(dir.path()));
    let record = reopened.load(now() + Duration::days(10)).into_record().unwrap();
    assert_eq!(record.decision(), ConsentDecision::new(false, true));
}
