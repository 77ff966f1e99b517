use {
    crate::domain::{
        audit::Audit,
        checklist::ChecklistItem,
        error::AuditError,
        finding::{ResponseState, Responses},
        id::AuditRef,
        store::AuditStore,
    },
    crate::services::{lifecycle, reconciliation},
    chrono::{DateTime, NaiveDate, Utc},
    serde::Serialize,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub compliant_count: usize,
    pub finding_count: usize,
    /// Share of items with a finding, rounded half-up to a whole percent.
    pub percentage: u32,
}

fn response<'a>(responses: &'a Responses, item: &ChecklistItem) -> Option<&'a ResponseState> {
    responses.get(item.id)
}

fn has_finding(responses: &Responses, item: &ChecklistItem) -> bool {
    response(responses, item).is_some_and(|r| r.has_finding)
}

pub fn summarize(items: &[ChecklistItem], responses: &Responses) -> ReportSummary {
    let total = items.len();
    let finding_count = items.iter().filter(|i| has_finding(responses, i)).count();
    let percentage = if total == 0 {
        0
    } else {
        ((finding_count * 100 + total / 2) / total) as u32
    };

    ReportSummary {
        compliant_count: total - finding_count,
        finding_count,
        percentage,
    }
}

/// Initial executive-summary draft. The user may rewrite it freely.
pub fn render_summary_text(
    audit_ref: &AuditRef,
    audit_name: &str,
    finding_count: usize,
    compliant_count: usize,
) -> String {
    let name = if audit_name.trim().is_empty() {
        "Unknown"
    } else {
        audit_name
    };
    let focus = if finding_count > 0 {
        "the identified non-compliant areas"
    } else {
        "no significant areas"
    };
    format!(
        "Audit {audit_ref} ({name}) identified {compliant_count} compliant and \
         {finding_count} non-compliant areas. Key findings include issues related to {focus}."
    )
}

/// Quote a CSV field, doubling embedded quotes.
pub fn csv_field(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

fn compliance_label(has_finding: bool) -> &'static str {
    if has_finding { "Non-compliant" } else { "Compliant" }
}

pub fn export_checklist(
    audit_ref: &AuditRef,
    audit_name: &str,
    items: &[ChecklistItem],
    responses: &Responses,
) -> String {
    let mut out = format!(
        "Audit Reference: {audit_ref}\nAudit Name: {audit_name}\n\n\
         Clause,Objective,Description,Compliance Status,Finding,Observation"
    );

    for item in items {
        let state = response(responses, item);
        let finding = state.map(|s| s.finding.as_str()).unwrap_or("");
        let observation = state.map(|s| s.observation.as_str()).unwrap_or("");
        let row = [
            csv_field(item.clause),
            csv_field(item.objective),
            csv_field(item.description),
            csv_field(compliance_label(has_finding(responses, item))),
            csv_field(finding),
            csv_field(observation),
        ];
        out.push('\n');
        out.push_str(&row.join(","));
    }
    out
}

pub fn export_report(
    audit_ref: &AuditRef,
    audit_name: &str,
    summary_text: &str,
    items: &[ChecklistItem],
    responses: &Responses,
) -> String {
    let summary = summarize(items, responses);
    let mut out = format!(
        "Audit Report\n\nReference: {audit_ref}\nName: {audit_name}\n\n\
         Executive Summary:\n{summary_text}\n\n\
         Compliance Overview:\n\
         Finding Rate: {}%\n\
         Compliant Items: {}\n\
         Non-compliant Items: {}\n\n",
        summary.percentage, summary.compliant_count, summary.finding_count,
    );

    out.push_str("Non-compliant Areas:\n\n");
    for item in items.iter().filter(|i| has_finding(responses, i)) {
        let finding = response(responses, item)
            .map(|r| r.finding.as_str())
            .filter(|f| !f.trim().is_empty())
            .unwrap_or("No details provided");
        out.push_str(&format!(
            "Clause: {}\nObjective: {}\nFinding: {finding}\n\n",
            item.clause, item.objective
        ));
    }

    out.push_str("Compliant Areas:\n\n");
    for item in items.iter().filter(|i| !has_finding(responses, i)) {
        out.push_str(&format!(
            "Clause: {}\nObjective: {}\n",
            item.clause, item.objective
        ));
        if let Some(observation) = response(responses, item)
            .map(|r| r.observation.as_str())
            .filter(|o| !o.is_empty())
        {
            out.push_str(&format!("Observation: {observation}\n"));
        }
        out.push('\n');
    }

    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Checklist,
    Report,
}

impl ExportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checklist => "checklist",
            Self::Report => "report",
        }
    }
}

/// `{identifier}_{kind}_{YYYY-MM-DD}.csv`
pub fn export_file_name(identifier: &str, kind: ExportKind, date: NaiveDate) -> String {
    format!("{identifier}_{}_{}.csv", kind.as_str(), date.format("%Y-%m-%d"))
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedReport {
    pub audit_ref: AuditRef,
    pub summary: ReportSummary,
    pub summary_text: String,
}

/// Summarize the audit's saved responses and close the audit. Closing
/// happens once; regenerating later only recomputes the numbers.
pub async fn generate_report(
    store: &dyn AuditStore,
    reference: &AuditRef,
    now: DateTime<Utc>,
) -> Result<GeneratedReport, AuditError> {
    let audit = lifecycle::require_audit(store, reference).await?;
    let responses = reconciliation::load_responses(store, &audit).await?;
    let summary = summarize(audit.audit_type.checklist(), &responses);
    let summary_text = render_summary_text(
        &audit.reference,
        &audit.name,
        summary.finding_count,
        summary.compliant_count,
    );

    lifecycle::mark_report_generated(store, reference, now).await?;
    tracing::info!(
        audit_ref = %reference,
        findings = summary.finding_count,
        percentage = summary.percentage,
        "report generated"
    );

    Ok(GeneratedReport {
        audit_ref: audit.reference,
        summary,
        summary_text,
    })
}

/// Checklist export of the audit's current responses.
pub async fn checklist_export(
    store: &dyn AuditStore,
    audit: &Audit,
) -> Result<String, AuditError> {
    let responses = reconciliation::load_responses(store, audit).await?;
    Ok(export_checklist(
        &audit.reference,
        &audit.name,
        audit.audit_type.checklist(),
        &responses,
    ))
}

/// Report export; `summary_text` is the user's edited summary, or the
/// generated draft when absent.
pub async fn report_export(
    store: &dyn AuditStore,
    audit: &Audit,
    summary_text: Option<&str>,
) -> Result<String, AuditError> {
    let items = audit.audit_type.checklist();
    let responses = reconciliation::load_responses(store, audit).await?;
    let draft;
    let summary_text = match summary_text {
        Some(text) => text,
        None => {
            let summary = summarize(items, &responses);
            draft = render_summary_text(
                &audit.reference,
                &audit.name,
                summary.finding_count,
                summary.compliant_count,
            );
            &draft
        }
    };
    Ok(export_report(
        &audit.reference,
        &audit.name,
        summary_text,
        items,
        &responses,
    ))
}
