use {
    crate::domain::{
        audit::{Audit, AuditInput},
        checklist::AuditType,
        error::AuditError,
        id::AuditRef,
        store::AuditStore,
    },
    chrono::{DateTime, Datelike, Utc},
    std::collections::BTreeSet,
    uuid::Uuid,
};

/// Next free `{year}AUD{seq:03}` reference: one past the highest sequence
/// already used for `year`.
pub fn generate_reference<'a>(
    existing: impl IntoIterator<Item = &'a AuditRef>,
    year: i32,
) -> AuditRef {
    let existing: BTreeSet<&AuditRef> = existing.into_iter().collect();
    let max = existing
        .iter()
        .filter_map(|r| r.sequence_for_year(year))
        .max()
        .unwrap_or(0);

    let mut next = max.saturating_add(1);
    loop {
        let candidate = AuditRef::from_parts(year, next);
        if !existing.contains(&candidate) {
            return candidate;
        }
        next = next.saturating_add(1);
    }
}

pub fn is_reference_unique<'a>(
    reference: &AuditRef,
    existing: impl IntoIterator<Item = &'a AuditRef>,
) -> bool {
    existing.into_iter().all(|r| r != reference)
}

fn required(value: &str, field: &str) -> Result<(), AuditError> {
    if value.trim().is_empty() {
        return Err(AuditError::Validation(format!("{field} is required")));
    }
    Ok(())
}

fn validate_fields(input: &AuditInput) -> Result<AuditType, AuditError> {
    required(&input.name, "name")?;
    required(&input.audit_type, "type")?;
    let audit_type = AuditType::try_from(input.audit_type.as_str())?;

    if let (Some(start), Some(end)) = (input.start_date, input.end_date) {
        if end < start {
            return Err(AuditError::Validation(format!(
                "end date {end} is before start date {start}"
            )));
        }
    }
    Ok(audit_type)
}

pub async fn next_reference(store: &dyn AuditStore, year: i32) -> Result<AuditRef, AuditError> {
    let audits = store.list_audits().await?;
    Ok(generate_reference(audits.iter().map(|a| &a.reference), year))
}

/// Load an audit, treating an unknown reference as a hard miss.
pub async fn require_audit(store: &dyn AuditStore, reference: &AuditRef) -> Result<Audit, AuditError> {
    store
        .get_audit(reference)
        .await?
        .ok_or_else(|| AuditError::NotFound(format!("audit {reference}")))
}

/// Validate and persist a new audit. A blank reference is replaced by a
/// generated one for the year of `now`.
pub async fn create_audit(
    store: &dyn AuditStore,
    input: AuditInput,
    now: DateTime<Utc>,
) -> Result<Audit, AuditError> {
    let audit_type = validate_fields(&input)?;
    let existing = store.list_audits().await?;
    let existing_refs: Vec<&AuditRef> = existing.iter().map(|a| &a.reference).collect();

    let reference = match input.reference.as_deref().map(str::trim) {
        Some(r) if !r.is_empty() => AuditRef::new(r)?,
        _ => generate_reference(existing_refs.iter().copied(), now.year()),
    };

    if !is_reference_unique(&reference, existing_refs.iter().copied()) {
        tracing::warn!(audit_ref = %reference, "rejected duplicate audit reference");
        return Err(AuditError::DuplicateReference(reference.into_inner()));
    }

    let mut audit = Audit {
        reference,
        name: input.name.trim().to_string(),
        audit_type,
        description: input.description,
        start_date: input.start_date,
        end_date: input.end_date,
        report_generated_at: None,
        assigned_users: Vec::new(),
        objective: input.objective,
        scope: input.scope,
        introduction: input.introduction,
        template_applied: false,
        created_at: now,
        updated_at: now,
    };

    if let Some(template) = store.get_template(audit_type).await? {
        audit.apply_template(&template);
    }

    store.upsert_audit(&audit).await?;
    tracing::info!(audit_ref = %audit.reference, audit_type = %audit.audit_type, "audit created");
    Ok(audit)
}

/// Apply edited fields to an existing audit. The reference, creation time,
/// assignments and the `Closed` marker are preserved.
pub async fn update_audit(
    store: &dyn AuditStore,
    reference: &AuditRef,
    input: AuditInput,
    now: DateTime<Utc>,
) -> Result<Audit, AuditError> {
    let audit_type = validate_fields(&input)?;
    if let Some(submitted) = input.reference.as_deref().map(str::trim) {
        if !submitted.is_empty() && submitted != reference.as_str() {
            return Err(AuditError::Validation(format!(
                "audit reference cannot change from {reference} to {submitted}"
            )));
        }
    }

    let mut audit = require_audit(store, reference).await?;
    if audit.audit_type != audit_type {
        // A new type means a different template may apply.
        audit.template_applied = false;
    }
    audit.name = input.name.trim().to_string();
    audit.audit_type = audit_type;
    audit.description = input.description;
    audit.start_date = input.start_date;
    audit.end_date = input.end_date;
    audit.objective = input.objective;
    audit.scope = input.scope;
    audit.introduction = input.introduction;
    audit.updated_at = now;

    if !audit.template_applied {
        if let Some(template) = store.get_template(audit_type).await? {
            audit.apply_template(&template);
        }
    }

    store.upsert_audit(&audit).await?;
    tracing::info!(audit_ref = %audit.reference, "audit updated");
    Ok(audit)
}

/// Delete an audit and, through the store, all of its findings.
pub async fn delete_audit(store: &dyn AuditStore, reference: &AuditRef) -> Result<bool, AuditError> {
    let removed = store.delete_audit(reference).await?;
    if removed {
        tracing::info!(audit_ref = %reference, "audit deleted with its findings");
    }
    Ok(removed)
}

pub async fn assign_user(
    store: &dyn AuditStore,
    reference: &AuditRef,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Audit, AuditError> {
    let mut audit = require_audit(store, reference).await?;
    let user = store
        .get_user(user_id)
        .await?
        .ok_or_else(|| AuditError::NotFound(format!("user {user_id}")))?;

    if audit.assign(user.assignment()) {
        audit.updated_at = now;
        store.upsert_audit(&audit).await?;
        tracing::info!(audit_ref = %reference, user_id = %user_id, "user assigned");
    }
    Ok(audit)
}

pub async fn remove_assigned_user(
    store: &dyn AuditStore,
    reference: &AuditRef,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Audit, AuditError> {
    let mut audit = require_audit(store, reference).await?;
    if audit.unassign(user_id) {
        audit.updated_at = now;
        store.upsert_audit(&audit).await?;
        tracing::info!(audit_ref = %reference, user_id = %user_id, "user unassigned");
    }
    Ok(audit)
}

/// Record that a report was generated. Only the first call changes the
/// audit; later calls return it untouched.
pub async fn mark_report_generated(
    store: &dyn AuditStore,
    reference: &AuditRef,
    now: DateTime<Utc>,
) -> Result<Audit, AuditError> {
    let mut audit = require_audit(store, reference).await?;
    if audit.mark_report_generated(now) {
        audit.updated_at = now;
        store.upsert_audit(&audit).await?;
        tracing::info!(audit_ref = %reference, "audit closed after report generation");
    }
    Ok(audit)
}
