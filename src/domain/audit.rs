use {
    super::checklist::AuditType,
    super::id::AuditRef,
    super::template::AuditTemplate,
    super::user::AssignedUser,
    chrono::{DateTime, NaiveDate, Utc},
    serde::{Deserialize, Serialize},
    std::fmt,
    uuid::Uuid,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditStatus {
    Preparation,
    #[serde(rename = "On-Site")]
    OnSite,
    Monitoring,
    Closed,
}

impl AuditStatus {
    /// Status from the audit window and the report-generated marker.
    ///
    /// `Closed` wins over any dates. Without both dates the audit is still in
    /// preparation; otherwise `today` is placed against the inclusive
    /// `[start, end]` window.
    pub fn derive(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        report_generated: bool,
        today: NaiveDate,
    ) -> Self {
        if report_generated {
            return Self::Closed;
        }
        match (start, end) {
            (Some(start), Some(end)) => {
                if today < start {
                    Self::Preparation
                } else if today <= end {
                    Self::OnSite
                } else {
                    Self::Monitoring
                }
            }
            _ => Self::Preparation,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Preparation => "Preparation",
            Self::OnSite => "On-Site",
            Self::Monitoring => "Monitoring",
            Self::Closed => "Closed",
        }
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Persisted audit record. Status is not stored; see [`Audit::status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audit {
    pub reference: AuditRef,
    pub name: String,
    #[serde(rename = "type")]
    pub audit_type: AuditType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub report_generated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assigned_users: Vec<AssignedUser>,
    #[serde(default)]
    pub objective: String,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub introduction: String,
    /// Set once the type's template has been copied in, so it never reapplies.
    #[serde(default)]
    pub template_applied: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Audit {
    pub fn status(&self, today: NaiveDate) -> AuditStatus {
        AuditStatus::derive(
            self.start_date,
            self.end_date,
            self.report_generated_at.is_some(),
            today,
        )
    }

    pub fn is_closed(&self) -> bool {
        self.report_generated_at.is_some()
    }

    /// Sets the `Closed` marker. Returns `false` when it was already set;
    /// the original timestamp is kept.
    pub fn mark_report_generated(&mut self, now: DateTime<Utc>) -> bool {
        if self.report_generated_at.is_some() {
            return false;
        }
        self.report_generated_at = Some(now);
        true
    }

    /// Adds the user unless an assignment with the same id exists.
    pub fn assign(&mut self, user: AssignedUser) -> bool {
        if self.assigned_users.iter().any(|u| u.id == user.id) {
            return false;
        }
        self.assigned_users.push(user);
        true
    }

    pub fn unassign(&mut self, user_id: Uuid) -> bool {
        let before = self.assigned_users.len();
        self.assigned_users.retain(|u| u.id != user_id);
        self.assigned_users.len() != before
    }

    /// Fills empty narrative fields from the template, at most once per
    /// audit. Fields the audit already carries are left alone. Returns
    /// `false` when the template was already applied or is for another type.
    pub fn apply_template(&mut self, template: &AuditTemplate) -> bool {
        if self.template_applied || template.audit_type != self.audit_type {
            return false;
        }
        for (field, default) in [
            (&mut self.objective, &template.objective),
            (&mut self.scope, &template.scope),
            (&mut self.introduction, &template.introduction),
        ] {
            if field.trim().is_empty() {
                field.clone_from(default);
            }
        }
        self.template_applied = true;
        true
    }

    pub fn view(&self, today: NaiveDate) -> AuditView {
        AuditView {
            status: self.status(today),
            audit: self.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditView {
    #[serde(flatten)]
    pub audit: Audit,
    pub status: AuditStatus,
}

/// Editable audit fields as submitted by an administrator. A missing
/// reference on create asks for a generated one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditInput {
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub audit_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub objective: String,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub introduction: String,
}
