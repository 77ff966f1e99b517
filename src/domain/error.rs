use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("validation: {0}")]
    Validation(String),

    #[error("audit reference already exists: {0}")]
    DuplicateReference(String),

    #[error("incomplete checklist, findings missing for: {}", .0.join(", "))]
    IncompleteChecklist(Vec<String>),

    #[error("invalid CSV format at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}
