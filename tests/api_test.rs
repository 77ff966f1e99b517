use audit_flow::{AppState, app, config::AppConfig, infra::memory::InMemoryStore};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

fn test_app() -> Router {
    app(AppState::new(InMemoryStore::new()), &AppConfig::default())
}

async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    content_type: &str,
    body: String,
) -> (StatusCode, HeaderMap, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let body = body.map(|b| b.to_string()).unwrap_or_default();
    let (status, _, text) = send_raw(app, method, uri, "application/json", body).await;
    let value = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    };
    (status, value)
}

// ── 1. health_and_catalog ──────────────────────────────────────────────────

#[tokio::test]
async fn health_and_catalog() {
    let app = test_app();

    let (status, _, body) = send_raw(&app, Method::GET, "/health", "text/plain", String::new()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");

    let (status, types) = send(&app, Method::GET, "/audit-types", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(types.as_array().unwrap().len(), 5);

    let (_, checklist) = send(&app, Method::GET, "/audit-types/product/checklist", None).await;
    assert_eq!(checklist.as_array().unwrap().len(), 5);
    assert_eq!(checklist[0]["id"], "p-1");

    let (_, unknown) = send(&app, Method::GET, "/audit-types/annual/checklist", None).await;
    assert_eq!(unknown, json!([]));
}

// ── 2. create_and_fetch_audit ──────────────────────────────────────────────

#[tokio::test]
async fn create_and_fetch_audit() {
    let app = test_app();

    let (status, created) = send(
        &app,
        Method::POST,
        "/audits",
        Some(json!({
            "reference": "2025AUD001",
            "name": "Line station review",
            "type": "compliance",
            "start_date": "2025-03-10",
            "end_date": "2025-03-14"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["reference"], "2025AUD001");
    assert_eq!(created["type"], "compliance");
    assert!(created["status"].is_string());

    let (status, fetched) = send(&app, Method::GET, "/audits/2025AUD001", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Line station review");

    let (status, list) = send(&app, Method::GET, "/audits", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
}

// ── 3. duplicate_reference_is_conflict ─────────────────────────────────────

#[tokio::test]
async fn duplicate_reference_is_conflict() {
    let app = test_app();
    let body = json!({"reference": "2025AUD001", "name": "A", "type": "product"});

    send(&app, Method::POST, "/audits", Some(body.clone())).await;
    let (status, error) = send(&app, Method::POST, "/audits", Some(body)).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["error_code"], "duplicate_reference");
}

// ── 4. validation_and_missing_audit ────────────────────────────────────────

#[tokio::test]
async fn validation_and_missing_audit() {
    let app = test_app();

    let (status, error) = send(
        &app,
        Method::POST,
        "/audits",
        Some(json!({"name": "", "type": "product"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["error_code"], "validation_error");

    let (status, error) = send(&app, Method::GET, "/audits/2025AUD404", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["error_code"], "not_found");

    let (status, _) = send(&app, Method::DELETE, "/audits/2025AUD404", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── 5. responses_complete_and_report ───────────────────────────────────────

#[tokio::test]
async fn responses_complete_and_report() {
    let app = test_app();
    send(
        &app,
        Method::POST,
        "/audits",
        Some(json!({"reference": "2025AUD001", "name": "Base", "type": "product"})),
    )
    .await;

    let (status, error) = send(
        &app,
        Method::POST,
        "/audits/2025AUD001/complete",
        Some(json!({"p-1": {"has_finding": true, "finding": ""}})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["error_code"], "incomplete_checklist");

    let (status, completed) = send(
        &app,
        Method::POST,
        "/audits/2025AUD001/complete",
        Some(json!({
            "p-1": {"has_finding": true, "finding": "Unsigned CRS"},
            "p-2": {"has_finding": true, "finding": "Records gap"}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(completed["saved"], 5);
    assert_eq!(completed["summary"]["percentage"], 40);

    let (_, loaded) = send(&app, Method::GET, "/audits/2025AUD001/responses", None).await;
    assert_eq!(loaded["responses"]["p-1"]["finding"], "Unsigned CRS");

    let (status, report) = send(&app, Method::POST, "/audits/2025AUD001/report", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["summary"]["finding_count"], 2);

    let (_, audit) = send(&app, Method::GET, "/audits/2025AUD001", None).await;
    assert_eq!(audit["status"], "Closed");
}

// ── 6. checklist_export_is_attachment ──────────────────────────────────────

#[tokio::test]
async fn checklist_export_is_attachment() {
    let app = test_app();
    send(
        &app,
        Method::POST,
        "/audits",
        Some(json!({"reference": "2025AUD001", "name": "Base", "type": "product"})),
    )
    .await;
    send(
        &app,
        Method::PUT,
        "/audits/2025AUD001/responses",
        Some(json!({"p-2": {"has_finding": true, "finding": "He said \"ok\""}})),
    )
    .await;

    let (status, headers, body) = send_raw(
        &app,
        Method::GET,
        "/audits/2025AUD001/export/checklist",
        "text/plain",
        String::new(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.starts_with("attachment; filename=\"2025AUD001_checklist_"));
    assert!(body.contains(r#""He said ""ok""""#));
}

// ── 7. import_rejects_bad_csv ──────────────────────────────────────────────

#[tokio::test]
async fn import_rejects_bad_csv() {
    let app = test_app();
    let csv = "auditRef,checklistItemId,finding,observation,year\n2025AUD001,p-1,Short\n";

    let (status, _, body) = send_raw(
        &app,
        Method::POST,
        "/findings/import",
        "text/csv",
        csv.to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let error: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(error["error_code"], "parse_error");
    assert_eq!(error["details"]["line"], 2);
}

// ── 8. users_and_assignment ────────────────────────────────────────────────

#[tokio::test]
async fn users_and_assignment() {
    let app = test_app();
    send(
        &app,
        Method::POST,
        "/audits",
        Some(json!({"reference": "2025AUD001", "name": "Base", "type": "process"})),
    )
    .await;

    let (status, user) = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({"username": "jdoe", "role": "Lead Auditor", "password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["is_admin"], false);
    assert!(user.get("password").is_none());
    let user_id = user["id"].as_str().unwrap().to_string();

    let (status, audit) = send(
        &app,
        Method::POST,
        "/audits/2025AUD001/assigned-users",
        Some(json!({"user_id": user_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(audit["assigned_users"][0]["username"], "jdoe");

    let uri = format!("/audits/2025AUD001/assigned-users/{user_id}");
    let (_, audit) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(audit["assigned_users"], json!([]));

    let (status, _) = send(&app, Method::DELETE, &format!("/users/{user_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

// ── 9. templates_apply_to_new_audits ───────────────────────────────────────

#[tokio::test]
async fn templates_apply_to_new_audits() {
    let app = test_app();

    let (status, _) = send(
        &app,
        Method::PUT,
        "/templates/unannounced",
        Some(json!({"objective": "Spot check", "scope": "Night shift"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, created) = send(
        &app,
        Method::POST,
        "/audits",
        Some(json!({"name": "Night visit", "type": "unannounced"})),
    )
    .await;
    assert_eq!(created["objective"], "Spot check");
    assert_eq!(created["scope"], "Night shift");
    assert_eq!(created["template_applied"], true);

    let (status, _) = send(&app, Method::DELETE, "/templates/unannounced", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::DELETE, "/templates/unannounced", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
