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
    std::collections::BTreeMap,
    tokio::sync::RwLock,
    uuid::Uuid,
};

#[derive(Default)]
struct State {
    audits: BTreeMap<AuditRef, Audit>,
    findings: Vec<Finding>,
    users: BTreeMap<Uuid, User>,
    templates: BTreeMap<AuditType, AuditTemplate>,
}

/// Process-local store. Used by the tests and when no database is configured.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuditStore for InMemoryStore {
    fn list_audits(&self) -> StoreFuture<'_, Vec<Audit>> {
        Box::pin(async move { Ok(self.state.read().await.audits.values().cloned().collect()) })
    }

    fn get_audit<'a>(&'a self, reference: &'a AuditRef) -> StoreFuture<'a, Option<Audit>> {
        Box::pin(async move { Ok(self.state.read().await.audits.get(reference).cloned()) })
    }

    fn upsert_audit<'a>(&'a self, audit: &'a Audit) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            self.state
                .write()
                .await
                .audits
                .insert(audit.reference.clone(), audit.clone());
            Ok(())
        })
    }

    fn delete_audit<'a>(&'a self, reference: &'a AuditRef) -> StoreFuture<'a, bool> {
        Box::pin(async move {
            let mut state = self.state.write().await;
            let removed = state.audits.remove(reference).is_some();
            state.findings.retain(|f| &f.audit_ref != reference);
            Ok(removed)
        })
    }

    fn findings_for_audit<'a>(
        &'a self,
        reference: &'a AuditRef,
    ) -> StoreFuture<'a, Vec<Finding>> {
        Box::pin(async move {
            Ok(self
                .state
                .read()
                .await
                .findings
                .iter()
                .filter(|f| &f.audit_ref == reference)
                .cloned()
                .collect())
        })
    }

    fn insert_findings<'a>(&'a self, findings: &'a [Finding]) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            self.state
                .write()
                .await
                .findings
                .extend_from_slice(findings);
            Ok(())
        })
    }

    fn replace_live_findings<'a>(
        &'a self,
        reference: &'a AuditRef,
        findings: &'a [Finding],
    ) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let mut state = self.state.write().await;
            state
                .findings
                .retain(|f| &f.audit_ref != reference || f.is_historical);
            state.findings.extend_from_slice(findings);
            Ok(())
        })
    }

    fn list_users(&self) -> StoreFuture<'_, Vec<User>> {
        Box::pin(async move { Ok(self.state.read().await.users.values().cloned().collect()) })
    }

    fn get_user(&self, id: Uuid) -> StoreFuture<'_, Option<User>> {
        Box::pin(async move { Ok(self.state.read().await.users.get(&id).cloned()) })
    }

    fn find_user_by_username<'a>(&'a self, username: &'a str) -> StoreFuture<'a, Option<User>> {
        Box::pin(async move {
            Ok(self
                .state
                .read()
                .await
                .users
                .values()
                .find(|u| u.username == username)
                .cloned())
        })
    }

    fn upsert_user<'a>(&'a self, user: &'a User) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            self.state.write().await.users.insert(user.id, user.clone());
            Ok(())
        })
    }

    fn delete_user(&self, id: Uuid) -> StoreFuture<'_, bool> {
        Box::pin(async move { Ok(self.state.write().await.users.remove(&id).is_some()) })
    }

    fn list_templates(&self) -> StoreFuture<'_, Vec<AuditTemplate>> {
        Box::pin(async move {
            Ok(self
                .state
                .read()
                .await
                .templates
                .values()
                .cloned()
                .collect())
        })
    }

    fn get_template(&self, audit_type: AuditType) -> StoreFuture<'_, Option<AuditTemplate>> {
        Box::pin(async move { Ok(self.state.read().await.templates.get(&audit_type).cloned()) })
    }

    fn upsert_template<'a>(&'a self, template: &'a AuditTemplate) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            self.state
                .write()
                .await
                .templates
                .insert(template.audit_type, template.clone());
            Ok(())
        })
    }

    fn delete_template(&self, audit_type: AuditType) -> StoreFuture<'_, bool> {
        Box::pin(async move {
            Ok(self
                .state
                .write()
                .await
                .templates
                .remove(&audit_type)
                .is_some())
        })
    }
}
