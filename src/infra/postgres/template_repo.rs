use {
    crate::domain::{checklist::AuditType, error::AuditError, template::AuditTemplate},
    sqlx::{PgPool, types::Json},
};

pub async fn list(pool: &PgPool) -> Result<Vec<AuditTemplate>, AuditError> {
    let rows = sqlx::query_scalar::<_, Json<AuditTemplate>>(
        "SELECT body FROM audit_templates ORDER BY audit_type",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|Json(template)| template).collect())
}

pub async fn get(pool: &PgPool, audit_type: AuditType) -> Result<Option<AuditTemplate>, AuditError> {
    let row = sqlx::query_scalar::<_, Json<AuditTemplate>>(
        "SELECT body FROM audit_templates WHERE audit_type = $1",
    )
    .bind(audit_type.as_str())
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|Json(template)| template))
}

pub async fn upsert(pool: &PgPool, template: &AuditTemplate) -> Result<(), AuditError> {
    sqlx::query(
        r#"
        INSERT INTO audit_templates (audit_type, body)
        VALUES ($1, $2)
        ON CONFLICT (audit_type) DO UPDATE SET body = EXCLUDED.body
        "#,
    )
    .bind(template.audit_type.as_str())
    .bind(Json(template))
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete(pool: &PgPool, audit_type: AuditType) -> Result<bool, AuditError> {
    let result = sqlx::query("DELETE FROM audit_templates WHERE audit_type = $1")
        .bind(audit_type.as_str())
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
