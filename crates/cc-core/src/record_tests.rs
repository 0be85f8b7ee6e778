use super::*;
use chrono::TimeZone;

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

fn record_at(ts: DateTime<Utc>, analytics: bool, marketing: bool) -> ConsentRecord {
    ConsentRecord::new(
        ConsentDecision::new(analytics, marketing),
        ts,
        CONSENT_SCHEMA_VERSION,
    )
}

// ── Decisions ───────────────────────────────────────────────────

#[test]
fn test_default_decision_only_grants_essential() {
    let decision = ConsentDecision::default();
    assert!(decision.essential());
    assert!(!decision.analytics);
    assert!(!decision.marketing);
}

#[test]
fn test_merge_keeps_unspecified_fields() {
    let decision = ConsentDecision::new(true, false);
    let merged = decision.merge(&DecisionPatch {
        marketing: Some(true),
        ..Default::default()
    });
    assert_eq!(merged, ConsentDecision::new(true, true));
}

#[test]
fn test_merge_ignores_essential_revocation() {
    let patch = DecisionPatch {
        analytics: Some(true),
        marketing: None,
        essential: Some(false),
    };
    assert!(patch.attempts_essential_revocation());
    let merged = ConsentDecision::default().merge(&patch);
    assert!(merged.essential());
    assert!(merged.analytics);
}

#[test]
fn test_is_granted_by_category() {
    let decision = ConsentDecision::new(false, true);
    assert!(decision.is_granted(Category::Essential));
    assert!(!decision.is_granted(Category::Analytics));
    assert!(decision.is_granted(Category::Marketing));
}

#[test]
fn test_decision_deserialize_forces_essential() {
    let decision: ConsentDecision =
        serde_json::from_str(r#"{"essential":false,"analytics":true,"marketing":false}"#).unwrap();
    assert!(decision.essential());
    assert!(decision.analytics);
}

// ── Transitions ─────────────────────────────────────────────────

#[test]
fn test_accept_all_grants_everything() {
    let patch = Transition::AcceptAll.patch();
    assert_eq!(patch.analytics, Some(true));
    assert_eq!(patch.marketing, Some(true));
    assert_eq!(patch.essential, None);
}

#[test]
fn test_reject_non_essential_refuses_optional() {
    let merged = ConsentDecision::new(true, true).merge(&Transition::RejectNonEssential.patch());
    assert_eq!(merged, ConsentDecision::default());
}

#[test]
fn test_custom_save_uses_selections_verbatim() {
    let selections = Selections {
        analytics: false,
        marketing: true,
    };
    let merged = ConsentDecision::new(true, false).merge(&Transition::CustomSave(selections).patch());
    assert_eq!(merged, ConsentDecision::new(false, true));
}

#[test]
fn test_selections_default_to_off() {
    assert_eq!(
        Selections::default(),
        Selections {
            analytics: false,
            marketing: false
        }
    );
}

// ── Record serialization ────────────────────────────────────────

#[test]
fn test_record_serializes_with_camel_case_and_millis() {
    let record = record_at(at(2024, 5, 1), true, false);
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["essential"], true);
    assert_eq!(json["analytics"], true);
    assert_eq!(json["marketing"], false);
    assert_eq!(json["timestamp"], "2024-05-01T12:00:00.000Z");
    assert_eq!(json["schemaVersion"], "1.0");
}

#[test]
fn test_record_parses_browser_written_json() {
    let raw = r#"{"essential":true,"analytics":false,"marketing":true,"timestamp":"2024-05-01T12:00:00.123Z","schemaVersion":"1.0"}"#;
    let record: ConsentRecord = serde_json::from_str(raw).unwrap();
    assert!(record.essential());
    assert!(!record.analytics);
    assert!(record.marketing);
    assert_eq!(record.schema_version, "1.0");
}

#[test]
fn test_record_with_essential_false_is_coerced() {
    let raw = r#"{"essential":false,"analytics":false,"marketing":false,"timestamp":"2024-05-01T12:00:00Z","schemaVersion":"1.0"}"#;
    let record: ConsentRecord = serde_json::from_str(raw).unwrap();
    assert!(record.essential());
}

#[test]
fn test_record_missing_field_fails_to_parse() {
    let raw = r#"{"essential":true,"marketing":false,"timestamp":"2024-05-01T12:00:00Z","schemaVersion":"1.0"}"#;
    assert!(serde_json::from_str::<ConsentRecord>(raw).is_err());
}

#[test]
fn test_record_with_bad_timestamp_fails_to_parse() {
    let raw = r#"{"essential":true,"analytics":true,"marketing":false,"timestamp":"yesterday","schemaVersion":"1.0"}"#;
    assert!(serde_json::from_str::<ConsentRecord>(raw).is_err());
}

// ── Validity window ─────────────────────────────────────────────

#[test]
fn test_recent_record_is_valid() {
    let window = ValidityWindow::default();
    let record = record_at(at(2024, 1, 1), true, true);
    assert!(window.check(&record, at(2024, 1, 11)).is_ok());
}

#[test]
fn test_record_181_days_old_is_expired() {
    let window = ValidityWindow::default();
    let now = at(2024, 9, 1);
    let record = record_at(now - Duration::days(181), true, true);
    assert_eq!(
        window.check(&record, now),
        Err(ConsentError::Expired {
            age_days: 181,
            limit_days: 180
        })
    );
}

#[test]
fn test_record_exactly_at_limit_is_expired() {
    let window = ValidityWindow::default();
    let now = at(2024, 9, 1);
    let record = record_at(now - Duration::days(180), false, false);
    assert!(window.check(&record, now).is_err());
    let fresh = record_at(now - Duration::days(180) + Duration::seconds(1), false, false);
    assert!(window.check(&fresh, now).is_ok());
}

#[test]
fn test_version_mismatch_rejects_recent_record() {
    let window = ValidityWindow::new("2.0", 180);
    let record = record_at(at(2024, 1, 1), true, false);
    let err = window.check(&record, at(2024, 1, 2)).unwrap_err();
    assert_eq!(
        err,
        ConsentError::VersionMismatch {
            found: "1.0".into(),
            expected: "2.0".into()
        }
    );
}

#[test]
fn test_future_timestamp_counts_as_valid() {
    let window = ValidityWindow::default();
    let record = record_at(at(2024, 6, 1), true, false);
    assert!(window.check(&record, at(2024, 5, 1)).is_ok());
}
