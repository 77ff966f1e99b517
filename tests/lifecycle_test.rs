mod common;

use audit_flow::domain::audit::AuditStatus;
use audit_flow::domain::error::AuditError;
use audit_flow::domain::store::AuditStore;
use audit_flow::domain::template::TemplateInput;
use audit_flow::domain::user::UserRole;
use audit_flow::infra::memory::InMemoryStore;
use audit_flow::services::{lifecycle, reconciliation, templates};
use common::*;

// ── 1. status_follows_audit_window ─────────────────────────────────────────

#[test]
fn status_follows_audit_window() {
    let start = Some(date(2025, 3, 10));
    let end = Some(date(2025, 3, 14));

    assert_eq!(
        AuditStatus::derive(start, end, false, date(2025, 3, 9)),
        AuditStatus::Preparation
    );
    assert_eq!(
        AuditStatus::derive(start, end, false, date(2025, 3, 10)),
        AuditStatus::OnSite
    );
    assert_eq!(
        AuditStatus::derive(start, end, false, date(2025, 3, 14)),
        AuditStatus::OnSite
    );
    assert_eq!(
        AuditStatus::derive(start, end, false, date(2025, 3, 15)),
        AuditStatus::Monitoring
    );
    assert_eq!(
        AuditStatus::derive(start, end, true, date(2025, 3, 12)),
        AuditStatus::Closed
    );
}

// ── 2. missing_dates_mean_preparation ──────────────────────────────────────

#[test]
fn missing_dates_mean_preparation() {
    let today = date(2025, 6, 1);
    assert_eq!(
        AuditStatus::derive(None, None, false, today),
        AuditStatus::Preparation
    );
    assert_eq!(
        AuditStatus::derive(Some(date(2025, 1, 1)), None, false, today),
        AuditStatus::Preparation
    );
    assert_eq!(AuditStatus::derive(None, None, true, today), AuditStatus::Closed);
}

// ── 3. generated_reference_skips_gaps ──────────────────────────────────────

#[test]
fn generated_reference_skips_gaps() {
    let existing = [aref("2025AUD001"), aref("2025AUD003")];
    let next = lifecycle::generate_reference(existing.iter(), 2025);
    assert_eq!(next.as_str(), "2025AUD004");
}

// ── 4. generated_reference_ignores_other_years ─────────────────────────────

#[test]
fn generated_reference_ignores_other_years() {
    let existing = [aref("2024AUD009"), aref("LEGACY-7"), aref("2025AUDX")];
    let next = lifecycle::generate_reference(existing.iter(), 2025);
    assert_eq!(next.as_str(), "2025AUD001");
}

// ── 5. create_without_reference_generates_one ──────────────────────────────

#[tokio::test]
async fn create_without_reference_generates_one() {
    let store = InMemoryStore::new();
    create_audit(&store, "2025AUD001", "compliance").await;
    create_audit(&store, "2025AUD003", "compliance").await;

    let audit = lifecycle::create_audit(
        &store,
        audit_input(None, "Base maintenance", "product"),
        now(),
    )
    .await
    .unwrap();
    assert_eq!(audit.reference.as_str(), "2025AUD004");
    assert_eq!(store.list_audits().await.unwrap().len(), 3);
}

// ── 6. duplicate_reference_rejected ────────────────────────────────────────

#[tokio::test]
async fn duplicate_reference_rejected() {
    let store = InMemoryStore::new();
    create_audit(&store, "2025AUD001", "compliance").await;

    let err = lifecycle::create_audit(
        &store,
        audit_input(Some("2025AUD001"), "Again", "process"),
        now(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AuditError::DuplicateReference(ref r) if r == "2025AUD001"));
    assert_eq!(store.list_audits().await.unwrap().len(), 1);
}

// ── 7. create_validates_required_fields ────────────────────────────────────

#[tokio::test]
async fn create_validates_required_fields() {
    let store = InMemoryStore::new();

    let missing_name = lifecycle::create_audit(&store, audit_input(None, " ", "compliance"), now())
        .await
        .unwrap_err();
    assert!(matches!(missing_name, AuditError::Validation(_)));

    let bad_type = lifecycle::create_audit(&store, audit_input(None, "Audit", "annual"), now())
        .await
        .unwrap_err();
    assert!(matches!(bad_type, AuditError::Validation(_)));

    let mut reversed = audit_input(None, "Audit", "compliance");
    reversed.start_date = Some(date(2025, 5, 10));
    reversed.end_date = Some(date(2025, 5, 1));
    let err = lifecycle::create_audit(&store, reversed, now())
        .await
        .unwrap_err();
    assert!(matches!(err, AuditError::Validation(_)));

    assert!(store.list_audits().await.unwrap().is_empty());
}

// ── 8. template_fills_empty_fields_once ────────────────────────────────────

#[tokio::test]
async fn template_fills_empty_fields_once() {
    let store = InMemoryStore::new();
    templates::save_template(
        &store,
        "compliance".try_into().unwrap(),
        TemplateInput {
            objective: "Confirm Part-145 compliance".into(),
            scope: "All hangars".into(),
            introduction: "Annual review".into(),
        },
    )
    .await
    .unwrap();

    let mut input = audit_input(Some("2025AUD010"), "Hangar audit", "compliance");
    input.scope = "Hangar 2 only".into();
    let audit = lifecycle::create_audit(&store, input, now()).await.unwrap();
    assert!(audit.template_applied);
    assert_eq!(audit.objective, "Confirm Part-145 compliance");
    assert_eq!(audit.scope, "Hangar 2 only");
    assert_eq!(audit.introduction, "Annual review");

    // Clearing a field later does not pull the template back in.
    let mut edit = audit_input(None, "Hangar audit", "compliance");
    edit.scope = "Hangar 2 only".into();
    let updated = lifecycle::update_audit(&store, &audit.reference, edit, now())
        .await
        .unwrap();
    assert_eq!(updated.objective, "");
    assert_eq!(updated.introduction, "");
}

// ── 9. update_keeps_identity_and_closed_marker ─────────────────────────────

#[tokio::test]
async fn update_keeps_identity_and_closed_marker() {
    let store = InMemoryStore::new();
    let audit = create_audit(&store, "2025AUD002", "process").await;
    lifecycle::mark_report_generated(&store, &audit.reference, now())
        .await
        .unwrap();

    let mut input = audit_input(Some("2025AUD002"), "Renamed", "process");
    input.start_date = Some(date(2025, 7, 1));
    input.end_date = Some(date(2025, 7, 3));
    let updated = lifecycle::update_audit(&store, &audit.reference, input, now())
        .await
        .unwrap();

    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.created_at, audit.created_at);
    assert!(updated.is_closed());
    assert_eq!(updated.status(date(2025, 6, 1)), AuditStatus::Closed);
}

// ── 10. update_rejects_reference_change ────────────────────────────────────

#[tokio::test]
async fn update_rejects_reference_change() {
    let store = InMemoryStore::new();
    let audit = create_audit(&store, "2025AUD002", "process").await;

    let err = lifecycle::update_audit(
        &store,
        &audit.reference,
        audit_input(Some("2025AUD099"), "Renamed", "process"),
        now(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AuditError::Validation(_)));
}

// ── 11. update_missing_audit_not_found ─────────────────────────────────────

#[tokio::test]
async fn update_missing_audit_not_found() {
    let store = InMemoryStore::new();
    let err = lifecycle::update_audit(
        &store,
        &aref("2025AUD050"),
        audit_input(None, "Ghost", "product"),
        now(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AuditError::NotFound(_)));
}

// ── 12. delete_cascades_to_findings ────────────────────────────────────────

#[tokio::test]
async fn delete_cascades_to_findings() {
    let store = InMemoryStore::new();
    let audit = create_audit(&store, "2025AUD001", "product").await;
    let other = create_audit(&store, "2025AUD002", "product").await;

    store
        .insert_findings(&[
            historical("2025AUD001", "p-1", "Old issue", 2023),
            historical("2025AUD002", "p-1", "Kept", 2023),
        ])
        .await
        .unwrap();
    reconciliation::save_responses(
        &store,
        &audit,
        responses(&[("p-2", finding_response("Records incomplete"))]),
        2025,
    )
    .await
    .unwrap();

    assert!(lifecycle::delete_audit(&store, &audit.reference).await.unwrap());
    assert!(store.get_audit(&audit.reference).await.unwrap().is_none());
    assert!(store.findings_for_audit(&audit.reference).await.unwrap().is_empty());
    assert_eq!(store.findings_for_audit(&other.reference).await.unwrap().len(), 1);

    assert!(!lifecycle::delete_audit(&store, &audit.reference).await.unwrap());
}

// ── 13. assignment_is_deduplicated ─────────────────────────────────────────

#[tokio::test]
async fn assignment_is_deduplicated() {
    let store = InMemoryStore::new();
    let audit = create_audit(&store, "2025AUD001", "compliance").await;
    let lead = create_user(&store, "jdoe", UserRole::LeadAuditor).await;

    lifecycle::assign_user(&store, &audit.reference, lead.id, now())
        .await
        .unwrap();
    let audit = lifecycle::assign_user(&store, &audit.reference, lead.id, now())
        .await
        .unwrap();
    assert_eq!(audit.assigned_users.len(), 1);
    assert_eq!(audit.assigned_users[0].username, "jdoe");

    let audit = lifecycle::remove_assigned_user(&store, &audit.reference, lead.id, now())
        .await
        .unwrap();
    assert!(audit.assigned_users.is_empty());
}

// ── 14. assign_unknown_user_not_found ──────────────────────────────────────

#[tokio::test]
async fn assign_unknown_user_not_found() {
    let store = InMemoryStore::new();
    let audit = create_audit(&store, "2025AUD001", "compliance").await;
    let err = lifecycle::assign_user(&store, &audit.reference, uuid::Uuid::now_v7(), now())
        .await
        .unwrap_err();
    assert!(matches!(err, AuditError::NotFound(_)));
}

// ── 15. report_marker_is_set_once ──────────────────────────────────────────

#[tokio::test]
async fn report_marker_is_set_once() {
    let store = InMemoryStore::new();
    let audit = create_audit(&store, "2025AUD001", "unannounced").await;

    let first = lifecycle::mark_report_generated(&store, &audit.reference, now())
        .await
        .unwrap();
    let later = now() + chrono::Duration::days(3);
    let second = lifecycle::mark_report_generated(&store, &audit.reference, later)
        .await
        .unwrap();

    assert_eq!(first.report_generated_at, Some(now()));
    assert_eq!(second.report_generated_at, Some(now()));
}
