use {
    crate::domain::{
        error::AuditError,
        store::AuditStore,
        user::{User, UserInput},
    },
    uuid::Uuid,
};

fn validate_username(username: &str) -> Result<String, AuditError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AuditError::Validation("username is required".into()));
    }
    Ok(username.to_string())
}

async fn ensure_username_free(
    store: &dyn AuditStore,
    username: &str,
    except: Option<Uuid>,
) -> Result<(), AuditError> {
    match store.find_user_by_username(username).await? {
        Some(other) if Some(other.id) != except => Err(AuditError::Validation(format!(
            "username already taken: {username}"
        ))),
        _ => Ok(()),
    }
}

pub async fn create_user(store: &dyn AuditStore, input: UserInput) -> Result<User, AuditError> {
    let username = validate_username(&input.username)?;
    if input.password.is_empty() {
        return Err(AuditError::Validation("password is required".into()));
    }
    ensure_username_free(store, &username, None).await?;

    let user = User {
        id: Uuid::now_v7(),
        username,
        role: input.role,
        password: input.password,
    };
    store.upsert_user(&user).await?;
    tracing::info!(user_id = %user.id, role = %user.role, "user created");
    Ok(user)
}

/// Update username and role. An empty password keeps the current one.
pub async fn update_user(
    store: &dyn AuditStore,
    id: Uuid,
    input: UserInput,
) -> Result<User, AuditError> {
    let username = validate_username(&input.username)?;
    let mut user = store
        .get_user(id)
        .await?
        .ok_or_else(|| AuditError::NotFound(format!("user {id}")))?;
    ensure_username_free(store, &username, Some(id)).await?;

    user.username = username;
    user.role = input.role;
    if !input.password.is_empty() {
        user.password = input.password;
    }
    store.upsert_user(&user).await?;
    tracing::info!(user_id = %id, "user updated");
    Ok(user)
}

pub async fn delete_user(store: &dyn AuditStore, id: Uuid) -> Result<bool, AuditError> {
    let removed = store.delete_user(id).await?;
    if removed {
        tracing::info!(user_id = %id, "user deleted");
    }
    Ok(removed)
}
