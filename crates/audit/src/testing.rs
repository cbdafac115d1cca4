//! Fake stores shared by the unit tests of this crate.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use bastion_core::{AuditRecordId, InfraError};

use crate::{AuditLogRecord, AuditOperation, AuditStore, NewAuditRecord, PageRequest};

/// Keeps appended records in a vector and counts append calls.
#[derive(Debug, Default)]
pub struct RecordingStore {
    records: Mutex<Vec<AuditLogRecord>>,
    appends: AtomicUsize,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn appends(&self) -> usize {
        self.appends.load(Ordering::SeqCst)
    }

    fn newest_first(&self, keep: impl Fn(&AuditLogRecord) -> bool) -> Vec<AuditLogRecord> {
        let records = self.records.lock().unwrap();
        records.iter().rev().filter(|r| keep(r)).cloned().collect()
    }
}

#[async_trait]
impl AuditStore for RecordingStore {
    async fn append(&self, record: NewAuditRecord) -> Result<AuditLogRecord, InfraError> {
        self.appends.fetch_add(1, Ordering::SeqCst);
        let stored = record.into_record();
        self.records.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn find_by_entity(
        &self,
        entity_type: &str,
        entity_id: &str,
    ) -> Result<Vec<AuditLogRecord>, InfraError> {
        Ok(self.newest_first(|r| r.entity_type == entity_type && r.entity_id == entity_id))
    }

    async fn find_by_actor(&self, actor_id: &str) -> Result<Vec<AuditLogRecord>, InfraError> {
        Ok(self.newest_first(|r| r.actor_id.as_deref() == Some(actor_id)))
    }

    async fn find_by_operation(
        &self,
        operation: AuditOperation,
    ) -> Result<Vec<AuditLogRecord>, InfraError> {
        Ok(self.newest_first(|r| r.operation == operation))
    }

    async fn find_all(&self, page: PageRequest) -> Result<Vec<AuditLogRecord>, InfraError> {
        Ok(self
            .newest_first(|_| true)
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect())
    }

    async fn find_by_id(&self, id: AuditRecordId) -> Result<Option<AuditLogRecord>, InfraError> {
        Ok(self.newest_first(|r| r.id == id).into_iter().next())
    }
}

/// Rejects every write like an unreachable database would.
#[derive(Debug, Default)]
pub struct FailingStore;

#[async_trait]
impl AuditStore for FailingStore {
    async fn append(&self, _record: NewAuditRecord) -> Result<AuditLogRecord, InfraError> {
        Err(InfraError::storage("disk full"))
    }

    async fn find_by_entity(&self, _: &str, _: &str) -> Result<Vec<AuditLogRecord>, InfraError> {
        Err(InfraError::storage("disk full"))
    }

    async fn find_by_actor(&self, _: &str) -> Result<Vec<AuditLogRecord>, InfraError> {
        Err(InfraError::storage("disk full"))
    }

    async fn find_by_operation(
        &self,
        _: AuditOperation,
    ) -> Result<Vec<AuditLogRecord>, InfraError> {
        Err(InfraError::storage("disk full"))
    }

    async fn find_all(&self, _: PageRequest) -> Result<Vec<AuditLogRecord>, InfraError> {
        Err(InfraError::storage("disk full"))
    }

    async fn find_by_id(&self, _: AuditRecordId) -> Result<Option<AuditLogRecord>, InfraError> {
        Err(InfraError::storage("disk full"))
    }
}
