use std::sync::RwLock;

use async_trait::async_trait;

use bastion_audit::{AuditLogRecord, AuditOperation, AuditStore, NewAuditRecord, PageRequest};
use bastion_core::{AuditRecordId, InfraError};

/// In-memory append-only audit store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryAuditStore {
    records: RwLock<Vec<AuditLogRecord>>,
}

impl InMemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Matching records, newest first (timestamp, then time-ordered id).
    fn select(
        &self,
        keep: impl Fn(&AuditLogRecord) -> bool,
    ) -> Result<Vec<AuditLogRecord>, InfraError> {
        let records = self
            .records
            .read()
            .map_err(|_| InfraError::storage("lock poisoned"))?;

        let mut selected: Vec<AuditLogRecord> =
            records.iter().filter(|r| keep(r)).cloned().collect();
        selected.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| b.id.cmp(&a.id)));
        Ok(selected)
    }
}

#[async_trait]
impl AuditStore for InMemoryAuditStore {
    async fn append(&self, record: NewAuditRecord) -> Result<AuditLogRecord, InfraError> {
        let stored = record.into_record();

        let mut records = self
            .records
            .write()
            .map_err(|_| InfraError::storage("lock poisoned"))?;

        if records.iter().any(|r| r.id == stored.id) {
            return Err(InfraError::integrity(format!(
                "audit record {} already exists",
                stored.id
            )));
        }
        records.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_entity(
        &self,
        entity_type: &str,
        entity_id: &str,
    ) -> Result<Vec<AuditLogRecord>, InfraError> {
        self.select(|r| r.entity_type == entity_type && r.entity_id == entity_id)
    }

    async fn find_by_actor(&self, actor_id: &str) -> Result<Vec<AuditLogRecord>, InfraError> {
        self.select(|r| r.actor_id.as_deref() == Some(actor_id))
    }

    async fn find_by_operation(
        &self,
        operation: AuditOperation,
    ) -> Result<Vec<AuditLogRecord>, InfraError> {
        self.select(|r| r.operation == operation)
    }

    async fn find_all(&self, page: PageRequest) -> Result<Vec<AuditLogRecord>, InfraError> {
        Ok(self
            .select(|_| true)?
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect())
    }

    async fn find_by_id(&self, id: AuditRecordId) -> Result<Option<AuditLogRecord>, InfraError> {
        Ok(self.select(|r| r.id == id)?.into_iter().next())
    }
}
