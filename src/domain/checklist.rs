use {
    super::error::AuditError,
    serde::{Deserialize, Serialize},
    std::fmt,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditType {
    Compliance,
    Product,
    Process,
    Unannounced,
    Unscheduled,
}

impl AuditType {
    pub const ALL: [AuditType; 5] = [
        Self::Compliance,
        Self::Product,
        Self::Process,
        Self::Unannounced,
        Self::Unscheduled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compliance => "compliance",
            Self::Product => "product",
            Self::Process => "process",
            Self::Unannounced => "unannounced",
            Self::Unscheduled => "unscheduled",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Compliance => "Compliance Audit",
            Self::Product => "Product Audit",
            Self::Process => "Process Audit",
            Self::Unannounced => "Unannounced Audit",
            Self::Unscheduled => "Unscheduled Audit",
        }
    }

    pub fn checklist(&self) -> &'static [ChecklistItem] {
        match self {
            Self::Compliance => COMPLIANCE,
            Self::Product => PRODUCT,
            Self::Process => PROCESS,
            Self::Unannounced => UNANNOUNCED,
            Self::Unscheduled => UNSCHEDULED,
        }
    }
}

impl fmt::Display for AuditType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for AuditType {
    type Error = AuditError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "compliance" => Ok(Self::Compliance),
            "product" => Ok(Self::Product),
            "process" => Ok(Self::Process),
            "unannounced" => Ok(Self::Unannounced),
            "unscheduled" => Ok(Self::Unscheduled),
            other => Err(AuditError::Validation(format!("unknown audit type: {other}"))),
        }
    }
}

/// One regulatory clause evaluated during an audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistItem {
    pub id: &'static str,
    pub clause: &'static str,
    pub objective: &'static str,
    pub description: &'static str,
    pub required: bool,
}

/// Catalog lookup by raw type name. Unknown types yield an empty checklist.
pub fn checklist_for(audit_type: &str) -> &'static [ChecklistItem] {
    AuditType::try_from(audit_type)
        .map(|t| t.checklist())
        .unwrap_or_default()
}

/// Clause codes whose responses carry staff attribution (number, name, scope).
const STAFF_CLAUSES: [&str; 2] = ["145.A.30", "145.A.35"];

pub fn clause_requires_staff_info(clause: &str) -> bool {
    clause
        .split_whitespace()
        .next()
        .is_some_and(|code| STAFF_CLAUSES.contains(&code))
}

const fn item(
    id: &'static str,
    clause: &'static str,
    objective: &'static str,
    description: &'static str,
) -> ChecklistItem {
    ChecklistItem {
        id,
        clause,
        objective,
        description,
        required: true,
    }
}

static COMPLIANCE: &[ChecklistItem] = &[
    item(
        "c-1",
        "145.A.10 Scope",
        "Verify organization's scope of approval",
        "Assess if the organization operates within its defined and approved scope.",
    ),
    item(
        "c-2",
        "145.A.15 Application",
        "Verify application compliance",
        "Confirm that the organization has submitted the correct application forms and documentation.",
    ),
    item(
        "c-3",
        "145.A.20 Terms of Approval",
        "Verify terms of approval",
        "Check that the organization operates within the terms of its approval.",
    ),
    item(
        "c-4",
        "145.A.25 Facility Requirements",
        "Verify facility compliance",
        "Assess if facilities meet the requirements for the work performed.",
    ),
    item(
        "c-5",
        "145.A.30 Personnel Requirements",
        "Verify personnel qualifications",
        "Review personnel qualifications, experience, and training records.",
    ),
    item(
        "c-6",
        "145.A.35 Certifying Staff",
        "Verify certifying staff compliance",
        "Check that certifying staff are properly qualified and authorized.",
    ),
    item(
        "c-7",
        "145.A.40 Equipment and Tools",
        "Verify equipment and tools",
        "Validate that equipment and tools are appropriate, calibrated and maintained.",
    ),
    item(
        "c-8",
        "145.A.42 Components",
        "Verify component management",
        "Review procedures for accepting and classifying components.",
    ),
    item(
        "c-9",
        "145.A.45 Maintenance Data",
        "Verify maintenance data",
        "Check that appropriate and current maintenance data is available and used.",
    ),
    item(
        "c-10",
        "145.A.47 Production Planning",
        "Verify production planning",
        "Assess the effectiveness of production planning procedures.",
    ),
];

static PRODUCT: &[ChecklistItem] = &[
    item(
        "p-1",
        "145.A.50 Certification of Maintenance",
        "Verify maintenance certification",
        "Check that maintenance is properly certified with appropriate documentation.",
    ),
    item(
        "p-2",
        "145.A.55 Maintenance Records",
        "Verify maintenance records",
        "Review maintenance records for completeness and retention.",
    ),
    item(
        "p-3",
        "145.A.60 Occurrence Reporting",
        "Verify occurrence reporting",
        "Assess the reporting of occurrences that seriously hazard aircraft.",
    ),
    item(
        "p-4",
        "145.A.65 Safety and Quality Policy",
        "Verify safety and quality policy",
        "Review the organization's safety and quality policy and procedures.",
    ),
    item(
        "p-5",
        "145.A.70 Maintenance Organization Exposition",
        "Verify MOE compliance",
        "Check that the Maintenance Organization Exposition is current and followed.",
    ),
];

static PROCESS: &[ChecklistItem] = &[
    item(
        "pr-1",
        "145.A.75 Privileges of the Organization",
        "Verify organizational privileges",
        "Assess if the organization operates within its privileges.",
    ),
    item(
        "pr-2",
        "145.A.80 Limitations on the Organization",
        "Verify organizational limitations",
        "Check that the organization respects its limitations.",
    ),
    item(
        "pr-3",
        "145.A.85 Changes to the Organization",
        "Verify change management",
        "Review procedures for notifying the authority of changes.",
    ),
    item(
        "pr-4",
        "145.A.90 Continued Validity",
        "Verify continued validity",
        "Assess continued validity of organization approval.",
    ),
    item(
        "pr-5",
        "145.A.95 Findings",
        "Verify findings management",
        "Review how the organization deals with findings.",
    ),
];

static UNANNOUNCED: &[ChecklistItem] = &[
    item(
        "u-1",
        "145.A.100 Revocation, Suspension and Limitation",
        "Verify compliance status",
        "Assess risks of approval revocation, suspension or limitation.",
    ),
    item(
        "u-2",
        "145.A.105 Access",
        "Verify authority access",
        "Check that the organization provides appropriate authority access.",
    ),
    item(
        "u-3",
        "145.A.110 Exemptions",
        "Verify exemption management",
        "Review procedures for obtaining and managing exemptions.",
    ),
    item(
        "u-4",
        "145.A.115 Compliance Monitoring",
        "Verify compliance monitoring",
        "Assess effectiveness of compliance monitoring system.",
    ),
    item(
        "u-5",
        "145.A.120 Means of Compliance",
        "Verify means of compliance",
        "Check that the organization uses approved means of compliance.",
    ),
];

static UNSCHEDULED: &[ChecklistItem] = &[
    item(
        "us-1",
        "145.A.140 Immediate Safety Measures",
        "Verify safety response",
        "Assess ability to respond to immediate safety threats.",
    ),
    item(
        "us-2",
        "145.A.155 Personnel Behavior",
        "Verify personnel behavior",
        "Review policies regarding personnel behavior and discipline.",
    ),
    item(
        "us-3",
        "145.A.165 Facility Security",
        "Verify facility security",
        "Check physical and logical security of facilities.",
    ),
    item(
        "us-4",
        "145.A.180 Record Protection",
        "Verify record protection",
        "Assess measures to protect records from alteration and damage.",
    ),
    item(
        "us-5",
        "145.A.205 SMS Implementation",
        "Verify SMS implementation",
        "Review implementation of Safety Management System requirements.",
    ),
];
