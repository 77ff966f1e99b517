use derive_more::Display;
use serde::{Deserialize, Serialize};

use super::error::AuditError;

/// Human-assigned audit reference (`2025AUD001`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditRef(String);

impl AuditRef {
    pub fn new(reference: impl Into<String>) -> Result<Self, AuditError> {
        let reference = reference.into().trim().to_string();
        if reference.is_empty() {
            return Err(AuditError::Validation("audit reference is required".into()));
        }
        if reference.contains(['/', ',', '"']) {
            return Err(AuditError::Validation(format!(
                "audit reference contains reserved characters: {reference}"
            )));
        }
        Ok(Self(reference))
    }

    /// Builds the canonical `{year}AUD{seq:03}` form.
    pub fn from_parts(year: i32, sequence: u32) -> Self {
        Self(format!("{year}AUD{sequence:03}"))
    }

    /// Numeric suffix when this reference follows the `{year}AUD{digits}` pattern.
    pub fn sequence_for_year(&self, year: i32) -> Option<u32> {
        let digits = self.0.strip_prefix(&format!("{year}AUD"))?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}
