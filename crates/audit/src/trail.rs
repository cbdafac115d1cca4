//! Read-only view over an [`AuditStore`].

use bastion_core::{AuditRecordId, InfraError};

use crate::{AuditLogRecord, AuditOperation, AuditStore, PageRequest};

/// Finder-only handle for callers that inspect history.
///
/// It wraps the same store the [`AuditRecorder`](crate::AuditRecorder)
/// writes to but has no `append`, so the recorder stays the only writer.
#[derive(Debug, Clone)]
pub struct AuditTrail<S> {
    store: S,
}

impl<S> AuditTrail<S>
where
    S: AuditStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn find_by_entity(
        &self,
        entity_type: &str,
        entity_id: &str,
    ) -> Result<Vec<AuditLogRecord>, InfraError> {
        self.store.find_by_entity(entity_type, entity_id).await
    }

    pub async fn find_by_actor(&self, actor_id: &str) -> Result<Vec<AuditLogRecord>, InfraError> {
        self.store.find_by_actor(actor_id).await
    }

    pub async fn find_by_operation(
        &self,
        operation: AuditOperation,
    ) -> Result<Vec<AuditLogRecord>, InfraError> {
        self.store.find_by_operation(operation).await
    }

    pub async fn find_all(&self, page: PageRequest) -> Result<Vec<AuditLogRecord>, InfraError> {
        self.store.find_all(page).await
    }

    pub async fn find_by_id(
        &self,
        id: AuditRecordId,
    ) -> Result<Option<AuditLogRecord>, InfraError> {
        self.store.find_by_id(id).await
    }
}
