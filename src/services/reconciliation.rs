use {
    crate::domain::{
        audit::Audit,
        checklist::{ChecklistItem, clause_requires_staff_info},
        error::AuditError,
        finding::{Finding, ResponseState, Responses, StaffAttribution},
        id::AuditRef,
        store::AuditStore,
    },
    std::collections::BTreeMap,
    uuid::Uuid,
};

fn default_response(item: &ChecklistItem) -> ResponseState {
    ResponseState {
        staff: clause_requires_staff_info(item.clause).then(StaffAttribution::default),
        ..ResponseState::default()
    }
}

/// Empty response for every checklist item.
pub fn initialize_responses(items: &[ChecklistItem]) -> Responses {
    items
        .iter()
        .map(|item| (item.id.to_string(), default_response(item)))
        .collect()
}

/// Provenance prefix put in front of a historical finding's text.
pub fn historical_tag(year: i32) -> String {
    format!("[Historical {year}] ")
}

/// Seed responses with findings from earlier audit cycles.
///
/// Findings for item ids missing from `responses` are dropped. When several
/// findings target one item, only one is applied: the highest year wins, and
/// within a year the later one in `historical` wins. Text that already
/// carries its tag is not tagged again, so re-merging the same findings is a
/// no-op.
pub fn merge_historical(mut responses: Responses, historical: &[Finding]) -> Responses {
    let mut winners: BTreeMap<&str, &Finding> = BTreeMap::new();
    for finding in historical.iter().filter(|f| f.is_historical) {
        match winners.get(finding.checklist_item_id.as_str()) {
            Some(current) if current.year > finding.year => {}
            _ => {
                winners.insert(finding.checklist_item_id.as_str(), finding);
            }
        }
    }

    for finding in winners.into_values() {
        let Some(entry) = responses.get_mut(&finding.checklist_item_id) else {
            tracing::debug!(
                checklist_item_id = %finding.checklist_item_id,
                "historical finding for item not in checklist, dropped"
            );
            continue;
        };

        let tag = historical_tag(finding.year);
        entry.finding = if finding.finding.starts_with(&tag) {
            finding.finding.clone()
        } else {
            format!("{tag}{}", finding.finding)
        };
        if entry.observation.is_empty() {
            entry.observation = finding.observation.clone();
        }
        entry.historical_year = Some(finding.year);
    }

    responses
}

/// Flatten responses into one live finding per checklist item.
pub fn reconcile_for_save(audit_ref: &AuditRef, responses: &Responses, year: i32) -> Vec<Finding> {
    responses
        .iter()
        .map(|(item_id, state)| Finding {
            id: Uuid::now_v7(),
            audit_ref: audit_ref.clone(),
            checklist_item_id: item_id.clone(),
            has_finding: state.has_finding,
            finding: state.finding.clone(),
            observation: state.observation.clone(),
            year,
            is_historical: false,
            staff: state.staff.clone(),
        })
        .collect()
}

/// Clauses of required items flagged with a finding but no finding text.
pub fn incomplete_items(items: &[ChecklistItem], responses: &Responses) -> Vec<String> {
    items
        .iter()
        .filter(|item| item.required)
        .filter(|item| {
            responses
                .get(item.id)
                .is_some_and(|r| r.has_finding && r.finding.trim().is_empty())
        })
        .map(|item| item.clause.to_string())
        .collect()
}

pub fn validate_completion(items: &[ChecklistItem], responses: &Responses) -> Result<(), AuditError> {
    let missing = incomplete_items(items, responses);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AuditError::IncompleteChecklist(missing))
    }
}

/// Restrict submitted responses to the checklist: unknown item ids are
/// dropped, missing items get their default response.
pub fn normalize_responses(items: &[ChecklistItem], mut submitted: Responses) -> Responses {
    items
        .iter()
        .map(|item| {
            let state = submitted
                .remove(item.id)
                .unwrap_or_else(|| default_response(item));
            (item.id.to_string(), state)
        })
        .collect()
}

/// Rebuild the working responses of an audit: catalog defaults, then the
/// audit's historical findings, then its saved live findings on top.
pub async fn load_responses(store: &dyn AuditStore, audit: &Audit) -> Result<Responses, AuditError> {
    let items = audit.audit_type.checklist();
    let findings = store.findings_for_audit(&audit.reference).await?;
    let (historical, live): (Vec<Finding>, Vec<Finding>) =
        findings.into_iter().partition(|f| f.is_historical);

    let mut responses = merge_historical(initialize_responses(items), &historical);

    for finding in live {
        if let Some(entry) = responses.get_mut(&finding.checklist_item_id) {
            let staff = finding.staff.or_else(|| entry.staff.take());
            *entry = ResponseState {
                has_finding: finding.has_finding,
                finding: finding.finding,
                observation: finding.observation,
                staff,
                historical_year: None,
            };
        }
    }

    Ok(responses)
}

/// Persist responses as the audit's live findings, replacing any saved
/// before. Historical findings are kept.
pub async fn save_responses(
    store: &dyn AuditStore,
    audit: &Audit,
    responses: Responses,
    year: i32,
) -> Result<Vec<Finding>, AuditError> {
    let responses = normalize_responses(audit.audit_type.checklist(), responses);
    let findings = reconcile_for_save(&audit.reference, &responses, year);
    store
        .replace_live_findings(&audit.reference, &findings)
        .await?;
    tracing::info!(audit_ref = %audit.reference, count = findings.len(), "responses saved");
    Ok(findings)
}

/// Validate a finished checklist, then save it.
pub async fn complete_checklist(
    store: &dyn AuditStore,
    audit: &Audit,
    responses: Responses,
    year: i32,
) -> Result<Vec<Finding>, AuditError> {
    let items = audit.audit_type.checklist();
    let responses = normalize_responses(items, responses);
    if let Err(e) = validate_completion(items, &responses) {
        tracing::warn!(audit_ref = %audit.reference, error = %e, "checklist completion rejected");
        return Err(e);
    }
    save_responses(store, audit, responses, year).await
}
