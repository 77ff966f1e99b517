use crate::domain::{
    checklist::AuditType,
    error::AuditError,
    store::AuditStore,
    template::{AuditTemplate, TemplateInput},
};

pub async fn save_template(
    store: &dyn AuditStore,
    audit_type: AuditType,
    input: TemplateInput,
) -> Result<AuditTemplate, AuditError> {
    let template = AuditTemplate {
        audit_type,
        objective: input.objective,
        scope: input.scope,
        introduction: input.introduction,
    };
    store.upsert_template(&template).await?;
    tracing::info!(audit_type = %audit_type, "audit template saved");
    Ok(template)
}

pub async fn delete_template(store: &dyn AuditStore, audit_type: AuditType) -> Result<bool, AuditError> {
    let removed = store.delete_template(audit_type).await?;
    if removed {
        tracing::info!(audit_type = %audit_type, "audit template deleted");
    }
    Ok(removed)
}
