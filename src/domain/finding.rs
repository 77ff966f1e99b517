use {
    super::id::AuditRef,
    serde::{Deserialize, Serialize},
    std::collections::BTreeMap,
    uuid::Uuid,
};

/// Checklist responses keyed by checklist item id.
pub type Responses = BTreeMap<String, ResponseState>;

/// Staff details recorded against personnel-related clauses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffAttribution {
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub scope: String,
}

/// A finding recorded against one checklist item of one audit.
///
/// Live findings (`is_historical == false`) are produced from checklist
/// responses, one per item. Historical findings come from CSV imports of
/// earlier audit cycles and may coexist across years.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub id: Uuid,
    pub audit_ref: AuditRef,
    pub checklist_item_id: String,
    #[serde(default)]
    pub has_finding: bool,
    #[serde(default)]
    pub finding: String,
    #[serde(default)]
    pub observation: String,
    pub year: i32,
    pub is_historical: bool,
    #[serde(default)]
    pub staff: Option<StaffAttribution>,
}

impl Finding {
    pub fn historical(
        audit_ref: AuditRef,
        checklist_item_id: impl Into<String>,
        finding: impl Into<String>,
        observation: impl Into<String>,
        year: i32,
    ) -> Self {
        let finding = finding.into();
        Self {
            id: Uuid::now_v7(),
            audit_ref,
            checklist_item_id: checklist_item_id.into(),
            has_finding: !finding.trim().is_empty(),
            finding,
            observation: observation.into(),
            year,
            is_historical: true,
            staff: None,
        }
    }
}

/// Working state of one checklist item while the audit is being completed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseState {
    #[serde(default)]
    pub has_finding: bool,
    #[serde(default)]
    pub finding: String,
    #[serde(default)]
    pub observation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff: Option<StaffAttribution>,
    /// Year of the historical finding this entry was seeded from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historical_year: Option<i32>,
}
