use {
    crate::domain::{error::AuditError, user::User},
    sqlx::{PgPool, types::Json},
    uuid::Uuid,
};

pub async fn list(pool: &PgPool) -> Result<Vec<User>, AuditError> {
    let rows = sqlx::query_scalar::<_, Json<User>>("SELECT body FROM users ORDER BY username")
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|Json(user)| user).collect())
}

pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<User>, AuditError> {
    let row = sqlx::query_scalar::<_, Json<User>>("SELECT body FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|Json(user)| user))
}

pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, AuditError> {
    let row = sqlx::query_scalar::<_, Json<User>>("SELECT body FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|Json(user)| user))
}

pub async fn upsert(pool: &PgPool, user: &User) -> Result<(), AuditError> {
    sqlx::query(
        r#"
        INSERT INTO users (id, username, body)
        VALUES ($1, $2, $3)
        ON CONFLICT (id) DO UPDATE
        SET username = EXCLUDED.username, body = EXCLUDED.body
        "#,
    )
    .bind(user.id)
    .bind(&user.username)
    .bind(Json(user))
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, AuditError> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
