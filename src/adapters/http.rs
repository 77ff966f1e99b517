use {
    crate::{
        AppState,
        adapters::api_errors::ApiError,
        domain::{
            audit::{AuditInput, AuditView},
            checklist::{AuditType, ChecklistItem, checklist_for},
            finding::Responses,
            id::AuditRef,
            template::{AuditTemplate, TemplateInput},
            user::{UserInput, UserView},
        },
        services::{
            csv_import, lifecycle, reconciliation,
            report::{self, ExportKind, GeneratedReport, ReportSummary},
            templates, users,
        },
    },
    axum::{
        Json, Router,
        extract::{Path, State},
        http::{StatusCode, header},
        response::{IntoResponse, Response},
        routing::{delete, get, post, put},
    },
    chrono::{Datelike, Utc},
    serde::{Deserialize, Serialize},
    uuid::Uuid,
};

type ApiResult<T> = Result<T, ApiError>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/audit-types", get(list_audit_types))
        .route("/audit-types/{audit_type}/checklist", get(get_checklist))
        .route("/audits", get(list_audits).post(create_audit))
        .route("/audits/next-reference", get(next_reference))
        .route(
            "/audits/{reference}",
            get(get_audit).put(update_audit).delete(delete_audit),
        )
        .route("/audits/{reference}/assigned-users", post(assign_user))
        .route(
            "/audits/{reference}/assigned-users/{user_id}",
            delete(remove_assigned_user),
        )
        .route(
            "/audits/{reference}/responses",
            get(get_responses).put(save_responses),
        )
        .route("/audits/{reference}/complete", post(complete_checklist))
        .route("/audits/{reference}/report", post(generate_report))
        .route("/audits/{reference}/export/checklist", get(export_checklist))
        .route("/audits/{reference}/export/report", post(export_report))
        .route("/findings/import", post(import_findings))
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", put(update_user).delete(delete_user))
        .route("/templates", get(list_templates))
        .route(
            "/templates/{audit_type}",
            put(save_template).delete(delete_template),
        )
        .with_state(state)
}

fn audit_ref(raw: String) -> ApiResult<AuditRef> {
    Ok(AuditRef::new(raw)?)
}

fn audit_type(raw: &str) -> ApiResult<AuditType> {
    Ok(AuditType::try_from(raw)?)
}

fn csv_attachment(file_name: String, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
        .into_response()
}

// ── Catalog ────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct AuditTypeInfo {
    #[serde(rename = "type")]
    audit_type: AuditType,
    title: &'static str,
    item_count: usize,
}

async fn list_audit_types() -> Json<Vec<AuditTypeInfo>> {
    Json(
        AuditType::ALL
            .iter()
            .map(|t| AuditTypeInfo {
                audit_type: *t,
                title: t.title(),
                item_count: t.checklist().len(),
            })
            .collect(),
    )
}

async fn get_checklist(Path(audit_type): Path<String>) -> Json<&'static [ChecklistItem]> {
    Json(checklist_for(&audit_type))
}

// ── Audits ─────────────────────────────────────────────────────────────────

async fn list_audits(State(state): State<AppState>) -> ApiResult<Json<Vec<AuditView>>> {
    let today = Utc::now().date_naive();
    let audits = state.store.list_audits().await?;
    Ok(Json(audits.iter().map(|a| a.view(today)).collect()))
}

#[derive(Serialize)]
struct NextReference {
    reference: AuditRef,
}

async fn next_reference(State(state): State<AppState>) -> ApiResult<Json<NextReference>> {
    let reference = lifecycle::next_reference(state.store.as_ref(), Utc::now().year()).await?;
    Ok(Json(NextReference { reference }))
}

async fn create_audit(
    State(state): State<AppState>,
    Json(input): Json<AuditInput>,
) -> ApiResult<(StatusCode, Json<AuditView>)> {
    let now = Utc::now();
    let audit = lifecycle::create_audit(state.store.as_ref(), input, now).await?;
    Ok((StatusCode::CREATED, Json(audit.view(now.date_naive()))))
}

async fn get_audit(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> ApiResult<Json<AuditView>> {
    let reference = audit_ref(reference)?;
    let audit = lifecycle::require_audit(state.store.as_ref(), &reference).await?;
    Ok(Json(audit.view(Utc::now().date_naive())))
}

async fn update_audit(
    State(state): State<AppState>,
    Path(reference): Path<String>,
    Json(input): Json<AuditInput>,
) -> ApiResult<Json<AuditView>> {
    let reference = audit_ref(reference)?;
    let now = Utc::now();
    let audit = lifecycle::update_audit(state.store.as_ref(), &reference, input, now).await?;
    Ok(Json(audit.view(now.date_naive())))
}

async fn delete_audit(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> ApiResult<StatusCode> {
    let reference = audit_ref(reference)?;
    if lifecycle::delete_audit(state.store.as_ref(), &reference).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Ok(StatusCode::NOT_FOUND)
    }
}

#[derive(Deserialize)]
struct AssignUserRequest {
    user_id: Uuid,
}

async fn assign_user(
    State(state): State<AppState>,
    Path(reference): Path<String>,
    Json(request): Json<AssignUserRequest>,
) -> ApiResult<Json<AuditView>> {
    let reference = audit_ref(reference)?;
    let now = Utc::now();
    let audit =
        lifecycle::assign_user(state.store.as_ref(), &reference, request.user_id, now).await?;
    Ok(Json(audit.view(now.date_naive())))
}

async fn remove_assigned_user(
    State(state): State<AppState>,
    Path((reference, user_id)): Path<(String, Uuid)>,
) -> ApiResult<Json<AuditView>> {
    let reference = audit_ref(reference)?;
    let now = Utc::now();
    let audit =
        lifecycle::remove_assigned_user(state.store.as_ref(), &reference, user_id, now).await?;
    Ok(Json(audit.view(now.date_naive())))
}

// ── Checklist responses ────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChecklistResponses {
    audit_ref: AuditRef,
    items: &'static [ChecklistItem],
    responses: Responses,
}

async fn get_responses(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> ApiResult<Json<ChecklistResponses>> {
    let reference = audit_ref(reference)?;
    let audit = lifecycle::require_audit(state.store.as_ref(), &reference).await?;
    let responses = reconciliation::load_responses(state.store.as_ref(), &audit).await?;
    Ok(Json(ChecklistResponses {
        items: audit.audit_type.checklist(),
        audit_ref: audit.reference,
        responses,
    }))
}

#[derive(Serialize)]
struct SavedResponses {
    saved: usize,
}

async fn save_responses(
    State(state): State<AppState>,
    Path(reference): Path<String>,
    Json(responses): Json<Responses>,
) -> ApiResult<Json<SavedResponses>> {
    let reference = audit_ref(reference)?;
    let audit = lifecycle::require_audit(state.store.as_ref(), &reference).await?;
    let saved =
        reconciliation::save_responses(state.store.as_ref(), &audit, responses, Utc::now().year())
            .await?;
    Ok(Json(SavedResponses { saved: saved.len() }))
}

#[derive(Serialize)]
struct CompletedChecklist {
    saved: usize,
    summary: ReportSummary,
}

async fn complete_checklist(
    State(state): State<AppState>,
    Path(reference): Path<String>,
    Json(responses): Json<Responses>,
) -> ApiResult<Json<CompletedChecklist>> {
    let reference = audit_ref(reference)?;
    let audit = lifecycle::require_audit(state.store.as_ref(), &reference).await?;
    let saved = reconciliation::complete_checklist(
        state.store.as_ref(),
        &audit,
        responses,
        Utc::now().year(),
    )
    .await?;
    let responses = reconciliation::load_responses(state.store.as_ref(), &audit).await?;
    Ok(Json(CompletedChecklist {
        saved: saved.len(),
        summary: report::summarize(audit.audit_type.checklist(), &responses),
    }))
}

// ── Reports and exports ────────────────────────────────────────────────────

async fn generate_report(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> ApiResult<Json<GeneratedReport>> {
    let reference = audit_ref(reference)?;
    let generated = report::generate_report(state.store.as_ref(), &reference, Utc::now()).await?;
    Ok(Json(generated))
}

async fn export_checklist(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> ApiResult<Response> {
    let reference = audit_ref(reference)?;
    let audit = lifecycle::require_audit(state.store.as_ref(), &reference).await?;
    let body = report::checklist_export(state.store.as_ref(), &audit).await?;
    let file_name = report::export_file_name(
        audit.reference.as_str(),
        ExportKind::Checklist,
        Utc::now().date_naive(),
    );
    tracing::info!(audit_ref = %audit.reference, file_name = %file_name, "checklist exported");
    Ok(csv_attachment(file_name, body))
}

#[derive(Deserialize, Default)]
struct ReportExportRequest {
    #[serde(default)]
    summary_text: Option<String>,
}

async fn export_report(
    State(state): State<AppState>,
    Path(reference): Path<String>,
    request: Option<Json<ReportExportRequest>>,
) -> ApiResult<Response> {
    let reference = audit_ref(reference)?;
    let request = request.map(|Json(r)| r).unwrap_or_default();
    let audit = lifecycle::require_audit(state.store.as_ref(), &reference).await?;
    let body = report::report_export(
        state.store.as_ref(),
        &audit,
        request.summary_text.as_deref(),
    )
    .await?;
    let file_name = report::export_file_name(
        audit.reference.as_str(),
        ExportKind::Report,
        Utc::now().date_naive(),
    );
    tracing::info!(audit_ref = %audit.reference, file_name = %file_name, "report exported");
    Ok(csv_attachment(file_name, body))
}

// ── Historical findings ────────────────────────────────────────────────────

#[derive(Serialize)]
struct ImportResult {
    imported: usize,
}

async fn import_findings(
    State(state): State<AppState>,
    body: String,
) -> ApiResult<Json<ImportResult>> {
    let imported = csv_import::import_historical(state.store.as_ref(), &body).await?;
    Ok(Json(ImportResult { imported }))
}

// ── Users ──────────────────────────────────────────────────────────────────

async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserView>>> {
    let users = state.store.list_users().await?;
    Ok(Json(users.iter().map(|u| u.view()).collect()))
}

async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<UserInput>,
) -> ApiResult<(StatusCode, Json<UserView>)> {
    let user = users::create_user(state.store.as_ref(), input).await?;
    Ok((StatusCode::CREATED, Json(user.view())))
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UserInput>,
) -> ApiResult<Json<UserView>> {
    let user = users::update_user(state.store.as_ref(), id, input).await?;
    Ok(Json(user.view()))
}

async fn delete_user(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    if users::delete_user(state.store.as_ref(), id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Ok(StatusCode::NOT_FOUND)
    }
}

// ── Templates ──────────────────────────────────────────────────────────────

async fn list_templates(State(state): State<AppState>) -> ApiResult<Json<Vec<AuditTemplate>>> {
    Ok(Json(state.store.list_templates().await?))
}

async fn save_template(
    State(state): State<AppState>,
    Path(raw_type): Path<String>,
    Json(input): Json<TemplateInput>,
) -> ApiResult<Json<AuditTemplate>> {
    let template =
        templates::save_template(state.store.as_ref(), audit_type(&raw_type)?, input).await?;
    Ok(Json(template))
}

async fn delete_template(
    State(state): State<AppState>,
    Path(raw_type): Path<String>,
) -> ApiResult<StatusCode> {
    if templates::delete_template(state.store.as_ref(), audit_type(&raw_type)?).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Ok(StatusCode::NOT_FOUND)
    }
}
