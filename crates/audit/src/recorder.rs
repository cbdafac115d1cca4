//! Audit recorder: one immutable record per completed mutation.

use serde_json::Value as JsonValue;
use tracing::instrument;

use crate::{AuditDescriptor, AuditError, AuditLogRecord, AuditOperation, AuditStore};

/// Builds and persists audit records through an [`AuditStore`].
///
/// ## Caller contract
///
/// - Snapshots (`old_values`, `new_values`, `metadata`) are written as given.
///   The recorder cannot know which fields are sensitive for an arbitrary
///   entity type, so callers strip credentials, tokens and secrets first.
/// - For a faithful before/after pair, fetch the old state before mutating
///   and log after the mutation, within the same call sequence.
///
/// ## Failures
///
/// Blank `entity_type`, `entity_id` or `actor_id` fail with
/// [`AuditError::Validation`] before the store is touched. Store failures are
/// returned as [`AuditError::Store`] and never swallowed; callers who want
/// best-effort logging must catch at their own layer.
#[derive(Debug, Clone)]
pub struct AuditRecorder<S> {
    store: S,
}

impl<S> AuditRecorder<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S> AuditRecorder<S>
where
    S: AuditStore,
{
    /// Generic entry point; every helper below delegates here.
    #[instrument(
        skip(self, descriptor),
        fields(
            operation = %descriptor.operation,
            entity_type = %descriptor.entity_type.trim(),
        ),
        err
    )]
    pub async fn log(&self, descriptor: AuditDescriptor) -> Result<AuditLogRecord, AuditError> {
        let record = descriptor.validate()?;
        let stored = self.store.append(record).await?;
        tracing::debug!(audit_id = %stored.id, "audit record appended");
        Ok(stored)
    }

    pub async fn log_create(
        &self,
        entity_type: &str,
        entity_id: &str,
        actor_id: &str,
        new_values: JsonValue,
        metadata: Option<JsonValue>,
    ) -> Result<AuditLogRecord, AuditError> {
        self.log(
            AuditDescriptor::new(AuditOperation::Create, entity_type, entity_id, actor_id)
                .with_new_values(new_values)
                .with_metadata(metadata),
        )
        .await
    }

    pub async fn log_update(
        &self,
        entity_type: &str,
        entity_id: &str,
        actor_id: &str,
        old_values: JsonValue,
        new_values: JsonValue,
        metadata: Option<JsonValue>,
    ) -> Result<AuditLogRecord, AuditError> {
        self.log(
            AuditDescriptor::new(AuditOperation::Update, entity_type, entity_id, actor_id)
                .with_old_values(old_values)
                .with_new_values(new_values)
                .with_metadata(metadata),
        )
        .await
    }

    pub async fn log_delete(
        &self,
        entity_type: &str,
        entity_id: &str,
        actor_id: &str,
        old_values: JsonValue,
        metadata: Option<JsonValue>,
    ) -> Result<AuditLogRecord, AuditError> {
        self.log(
            AuditDescriptor::new(AuditOperation::Delete, entity_type, entity_id, actor_id)
                .with_old_values(old_values)
                .with_metadata(metadata),
        )
        .await
    }

    pub async fn log_restore(
        &self,
        entity_type: &str,
        entity_id: &str,
        actor_id: &str,
        new_values: JsonValue,
        metadata: Option<JsonValue>,
    ) -> Result<AuditLogRecord, AuditError> {
        self.log(
            AuditDescriptor::new(AuditOperation::Restore, entity_type, entity_id, actor_id)
                .with_new_values(new_values)
                .with_metadata(metadata),
        )
        .await
    }

    /// Access to sensitive data only; not meant for general query logging.
    pub async fn log_read(
        &self,
        entity_type: &str,
        entity_id: &str,
        actor_id: &str,
        metadata: Option<JsonValue>,
    ) -> Result<AuditLogRecord, AuditError> {
        self.log(
            AuditDescriptor::new(AuditOperation::Read, entity_type, entity_id, actor_id)
                .with_metadata(metadata),
        )
        .await
    }
}
