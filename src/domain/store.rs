use {
    super::audit::Audit,
    super::checklist::AuditType,
    super::error::AuditError,
    super::finding::Finding,
    super::id::AuditRef,
    super::template::AuditTemplate,
    super::user::User,
    std::{future::Future, pin::Pin},
    uuid::Uuid,
};

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, AuditError>> + Send + 'a>>;

/// Persistence for audits, findings, users and templates.
///
/// Every upsert must round-trip: loading a record after saving it returns an
/// equal value. Multi-record writes (`insert_findings`,
/// `replace_live_findings`, `delete_audit`) are all-or-nothing.
pub trait AuditStore: Send + Sync {
    fn list_audits(&self) -> StoreFuture<'_, Vec<Audit>>;

    fn get_audit<'a>(&'a self, reference: &'a AuditRef) -> StoreFuture<'a, Option<Audit>>;

    fn upsert_audit<'a>(&'a self, audit: &'a Audit) -> StoreFuture<'a, ()>;

    /// Removes the audit together with all of its findings.
    /// Returns `false` if no audit had that reference.
    fn delete_audit<'a>(&'a self, reference: &'a AuditRef) -> StoreFuture<'a, bool>;

    /// Live and historical findings of one audit, in insertion order.
    fn findings_for_audit<'a>(&'a self, reference: &'a AuditRef)
    -> StoreFuture<'a, Vec<Finding>>;

    fn insert_findings<'a>(&'a self, findings: &'a [Finding]) -> StoreFuture<'a, ()>;

    /// Deletes every live finding of the audit, then inserts `findings`.
    /// Historical findings are untouched.
    fn replace_live_findings<'a>(
        &'a self,
        reference: &'a AuditRef,
        findings: &'a [Finding],
    ) -> StoreFuture<'a, ()>;

    fn list_users(&self) -> StoreFuture<'_, Vec<User>>;

    fn get_user(&self, id: Uuid) -> StoreFuture<'_, Option<User>>;

    fn find_user_by_username<'a>(&'a self, username: &'a str) -> StoreFuture<'a, Option<User>>;

    fn upsert_user<'a>(&'a self, user: &'a User) -> StoreFuture<'a, ()>;

    fn delete_user(&self, id: Uuid) -> StoreFuture<'_, bool>;

    fn list_templates(&self) -> StoreFuture<'_, Vec<AuditTemplate>>;

    fn get_template(&self, audit_type: AuditType) -> StoreFuture<'_, Option<AuditTemplate>>;

    fn upsert_template<'a>(&'a self, template: &'a AuditTemplate) -> StoreFuture<'a, ()>;

    fn delete_template(&self, audit_type: AuditType) -> StoreFuture<'_, bool>;
}
