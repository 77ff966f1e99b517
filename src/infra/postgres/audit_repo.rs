use {
    crate::domain::{audit::Audit, error::AuditError, id::AuditRef},
    sqlx::{PgPool, types::Json},
};

pub async fn list(pool: &PgPool) -> Result<Vec<Audit>, AuditError> {
    let rows = sqlx::query_scalar::<_, Json<Audit>>("SELECT body FROM audits ORDER BY reference")
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|Json(audit)| audit).collect())
}

pub async fn get(pool: &PgPool, reference: &AuditRef) -> Result<Option<Audit>, AuditError> {
    let row = sqlx::query_scalar::<_, Json<Audit>>("SELECT body FROM audits WHERE reference = $1")
        .bind(reference.as_str())
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|Json(audit)| audit))
}

pub async fn upsert(pool: &PgPool, audit: &Audit) -> Result<(), AuditError> {
    sqlx::query(
        r#"
        INSERT INTO audits (reference, body, created_at, updated_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (reference) DO UPDATE
        SET body = EXCLUDED.body, updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(audit.reference.as_str())
    .bind(Json(audit))
    .bind(audit.created_at)
    .bind(audit.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Delete the audit and cascade to its findings in one transaction.
pub async fn delete(pool: &PgPool, reference: &AuditRef) -> Result<bool, AuditError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM findings WHERE audit_ref = $1")
        .bind(reference.as_str())
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM audits WHERE reference = $1")
        .bind(reference.as_str())
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(result.rows_affected() > 0)
}
