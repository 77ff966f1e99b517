use {
    crate::domain::{error::AuditError, finding::Finding, id::AuditRef},
    sqlx::{PgPool, types::Json},
};

pub async fn for_audit(pool: &PgPool, reference: &AuditRef) -> Result<Vec<Finding>, AuditError> {
    let rows = sqlx::query_scalar::<_, Json<Finding>>(
        "SELECT body FROM findings WHERE audit_ref = $1 ORDER BY seq",
    )
    .bind(reference.as_str())
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|Json(finding)| finding).collect())
}

async fn insert_one(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    finding: &Finding,
) -> Result<(), AuditError> {
    sqlx::query(
        r#"
        INSERT INTO findings (id, audit_ref, checklist_item_id, year, is_historical, body)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(finding.id)
    .bind(finding.audit_ref.as_str())
    .bind(&finding.checklist_item_id)
    .bind(finding.year)
    .bind(finding.is_historical)
    .bind(Json(finding))
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Insert a batch atomically: either every finding lands or none does.
pub async fn insert_all(pool: &PgPool, findings: &[Finding]) -> Result<(), AuditError> {
    let mut tx = pool.begin().await?;
    for finding in findings {
        insert_one(&mut tx, finding).await?;
    }
    tx.commit().await?;
    Ok(())
}

/// Swap the live findings of one audit for `findings`.
pub async fn replace_live(
    pool: &PgPool,
    reference: &AuditRef,
    findings: &[Finding],
) -> Result<(), AuditError> {
    let mut tx = pool.begin().await?;

    let removed = sqlx::query("DELETE FROM findings WHERE audit_ref = $1 AND NOT is_historical")
        .bind(reference.as_str())
        .execute(&mut *tx)
        .await?
        .rows_affected();

    for finding in findings {
        insert_one(&mut tx, finding).await?;
    }

    tx.commit().await?;
    tracing::debug!(audit_ref = %reference, removed, inserted = findings.len(), "live findings replaced");
    Ok(())
}
