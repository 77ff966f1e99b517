pub mod audit_repo;
pub mod finding_repo;
pub mod template_repo;
pub mod user_repo;

use {
    crate::domain::{
        audit::Audit,
        checklist::AuditType,
        finding::Finding,
        id::AuditRef,
        store::{AuditStore, StoreFuture},
        template::AuditTemplate,
        user::User,
    },
    sqlx::PgPool,
    uuid::Uuid,
};

/// PostgreSQL-backed store. Records are kept as JSONB documents next to the
/// few columns the queries filter on.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

impl AuditStore for PgStore {
    fn list_audits(&self) -> StoreFuture<'_, Vec<Audit>> {
        Box::pin(audit_repo::list(&self.pool))
    }

    fn get_audit<'a>(&'a self, reference: &'a AuditRef) -> StoreFuture<'a, Option<Audit>> {
        Box::pin(audit_repo::get(&self.pool, reference))
    }

    fn upsert_audit<'a>(&'a self, audit: &'a Audit) -> StoreFuture<'a, ()> {
        Box::pin(audit_repo::upsert(&self.pool, audit))
    }

    fn delete_audit<'a>(&'a self, reference: &'a AuditRef) -> StoreFuture<'a, bool> {
        Box::pin(audit_repo::delete(&self.pool, reference))
    }

    fn findings_for_audit<'a>(
        &'a self,
        reference: &'a AuditRef,
    ) -> StoreFuture<'a, Vec<Finding>> {
        Box::pin(finding_repo::for_audit(&self.pool, reference))
    }

    fn insert_findings<'a>(&'a self, findings: &'a [Finding]) -> StoreFuture<'a, ()> {
        Box::pin(finding_repo::insert_all(&self.pool, findings))
    }

    fn replace_live_findings<'a>(
        &'a self,
        reference: &'a AuditRef,
        findings: &'a [Finding],
    ) -> StoreFuture<'a, ()> {
        Box::pin(finding_repo::replace_live(&self.pool, reference, findings))
    }

    fn list_users(&self) -> StoreFuture<'_, Vec<User>> {
        Box::pin(user_repo::list(&self.pool))
    }

    fn get_user(&self, id: Uuid) -> StoreFuture<'_, Option<User>> {
        Box::pin(user_repo::get(&self.pool, id))
    }

    fn find_user_by_username<'a>(&'a self, username: &'a str) -> StoreFuture<'a, Option<User>> {
        Box::pin(user_repo::find_by_username(&self.pool, username))
    }

    fn upsert_user<'a>(&'a self, user: &'a User) -> StoreFuture<'a, ()> {
        Box::pin(user_repo::upsert(&self.pool, user))
    }

    fn delete_user(&self, id: Uuid) -> StoreFuture<'_, bool> {
        Box::pin(user_repo::delete(&self.pool, id))
    }

    fn list_templates(&self) -> StoreFuture<'_, Vec<AuditTemplate>> {
        Box::pin(template_repo::list(&self.pool))
    }

    fn get_template(&self, audit_type: AuditType) -> StoreFuture<'_, Option<AuditTemplate>> {
        Box::pin(template_repo::get(&self.pool, audit_type))
    }

    fn upsert_template<'a>(&'a self, template: &'a AuditTemplate) -> StoreFuture<'a, ()> {
        Box::pin(template_repo::upsert(&self.pool, template))
    }

    fn delete_template(&self, audit_type: AuditType) -> StoreFuture<'_, bool> {
        Box::pin(template_repo::delete(&self.pool, audit_type))
    }
}
