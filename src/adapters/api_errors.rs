use crate::domain::error::AuditError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Newtype so the domain error can become an axum response.
pub struct ApiError(pub AuditError);

impl From<AuditError> for ApiError {
    fn from(err: AuditError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, details) = match &self.0 {
            AuditError::Validation(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                serde_json::Value::Null,
            ),
            AuditError::DuplicateReference(reference) => (
                StatusCode::CONFLICT,
                "duplicate_reference",
                serde_json::json!({ "reference": reference }),
            ),
            AuditError::IncompleteChecklist(clauses) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "incomplete_checklist",
                serde_json::json!({ "clauses": clauses }),
            ),
            AuditError::Parse { line, .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "parse_error",
                serde_json::json!({ "line": line }),
            ),
            AuditError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", serde_json::Value::Null),
            AuditError::Database(err) => {
                tracing::error!("database error: {err}");
                return internal_error();
            }
            AuditError::Serialization(err) => {
                tracing::error!("serialization error: {err}");
                return internal_error();
            }
        };

        let body = serde_json::json!({
            "error_code": error_code,
            "message": self.0.to_string(),
            "details": details,
        });

        (status, Json(body)).into_response()
    }
}

fn internal_error() -> Response {
    let body = serde_json::json!({
        "error_code": "internal_error",
        "message": "internal error",
        "details": serde_json::Value::Null,
    });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
