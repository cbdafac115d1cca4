//! Audit log record model.

use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use bastion_core::{AuditRecordId, DomainError};

/// Kind of operation an audit record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditOperation {
    Create,
    Update,
    Delete,
    Restore,
    Read,
}

impl AuditOperation {
    pub const ALL: [AuditOperation; 5] = [
        AuditOperation::Create,
        AuditOperation::Update,
        AuditOperation::Delete,
        AuditOperation::Restore,
        AuditOperation::Read,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuditOperation::Create => "CREATE",
            AuditOperation::Update => "UPDATE",
            AuditOperation::Delete => "DELETE",
            AuditOperation::Restore => "RESTORE",
            AuditOperation::Read => "READ",
        }
    }

    /// Drops the snapshots this operation kind never carries.
    ///
    /// | op      | old_values | new_values |
    /// |---------|------------|------------|
    /// | CREATE  | none       | kept       |
    /// | UPDATE  | kept       | kept       |
    /// | DELETE  | kept       | none       |
    /// | RESTORE | none       | kept       |
    /// | READ    | none       | none       |
    pub fn shape(
        &self,
        old_values: Option<JsonValue>,
        new_values: Option<JsonValue>,
    ) -> (Option<JsonValue>, Option<JsonValue>) {
        match self {
            AuditOperation::Create | AuditOperation::Restore => (None, new_values),
            AuditOperation::Update => (old_values, new_values),
            AuditOperation::Delete => (old_values, None),
            AuditOperation::Read => (None, None),
        }
    }
}

impl core::fmt::Display for AuditOperation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditOperation {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AuditOperation::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::validation(format!("unknown audit operation '{s}'")))
    }
}

/// One historical fact about a mutation. Immutable once stored.
///
/// `actor_id` is always set at creation. It may later read as `None` when the
/// referenced principal has been permanently erased elsewhere; the record
/// itself is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogRecord {
    pub id: AuditRecordId,
    pub operation: AuditOperation,
    pub entity_type: String,
    pub entity_id: String,
    pub actor_id: Option<String>,
    pub old_values: Option<JsonValue>,
    pub new_values: Option<JsonValue>,
    pub metadata: Option<JsonValue>,
    pub timestamp: DateTime<Utc>,
}

/// Validated input to [`AuditStore::append`](crate::AuditStore::append).
///
/// Only [`AuditDescriptor::validate`] builds one, so every value reaching a
/// store has non-blank identifying fields and snapshots shaped for its
/// operation. The store assigns `id` and `timestamp`.
///
/// ```compile_fail
/// use bastion_audit::{AuditOperation, NewAuditRecord};
///
/// let raw = NewAuditRecord {
///     id: None,
///     timestamp: None,
///     operation: AuditOperation::Create,
///     entity_type: "   ".into(),
///     entity_id: String::new(),
///     actor_id: String::new(),
///     old_values: None,
///     new_values: None,
///     metadata: None,
/// };
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditRecord {
    id: Option<AuditRecordId>,
    timestamp: Option<DateTime<Utc>>,
    operation: AuditOperation,
    entity_type: String,
    entity_id: String,
    actor_id: String,
    old_values: Option<JsonValue>,
    new_values: Option<JsonValue>,
    metadata: Option<JsonValue>,
}

impl NewAuditRecord {
    pub fn operation(&self) -> AuditOperation {
        self.operation
    }

    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    pub fn actor_id(&self) -> &str {
        &self.actor_id
    }

    /// Pins the generated fields so store tests can exercise id reuse and ordering.
    #[cfg(any(test, feature = "test-util"))]
    pub fn with_id(mut self, id: AuditRecordId) -> Self {
        self.id = Some(id);
        self
    }

    #[cfg(any(test, feature = "test-util"))]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Fills in the generated fields and produces the stored shape.
    pub fn into_record(self) -> AuditLogRecord {
        AuditLogRecord {
            id: self.id.unwrap_or_default(),
            operation: self.operation,
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            actor_id: Some(self.actor_id),
            old_values: self.old_values,
            new_values: self.new_values,
            metadata: self.metadata,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
        }
    }
}

/// Raw operation descriptor handed to [`AuditRecorder::log`](crate::AuditRecorder::log).
///
/// Snapshots must already be stripped of secrets by the caller; see
/// [`sanitize`](crate::sanitize).
#[derive(Debug, Clone, PartialEq)]
pub struct AuditDescriptor {
    pub operation: AuditOperation,
    pub entity_type: String,
    pub entity_id: String,
    pub actor_id: String,
    pub old_values: Option<JsonValue>,
    pub new_values: Option<JsonValue>,
    pub metadata: Option<JsonValue>,
}

impl AuditDescriptor {
    pub fn new(
        operation: AuditOperation,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
        actor_id: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
            actor_id: actor_id.into(),
            old_values: None,
            new_values: None,
            metadata: None,
        }
    }

    pub fn with_old_values(mut self, values: JsonValue) -> Self {
        self.old_values = Some(values);
        self
    }

    pub fn with_new_values(mut self, values: JsonValue) -> Self {
        self.new_values = Some(values);
        self
    }

    pub fn with_metadata(mut self, metadata: Option<JsonValue>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Trims and checks the identifying fields, then shapes the snapshots
    /// for the operation kind.
    ///
    /// `entity_type`, `entity_id` and `actor_id` are the only validated fields.
    pub fn validate(self) -> Result<NewAuditRecord, DomainError> {
        let entity_type = required("entity_type", &self.entity_type)?;
        let entity_id = required("entity_id", &self.entity_id)?;
        let actor_id = required("actor_id", &self.actor_id)?;
        let (old_values, new_values) = self.operation.shape(self.old_values, self.new_values);

        Ok(NewAuditRecord {
            id: None,
            timestamp: None,
            operation: self.operation,
            entity_type,
            entity_id,
            actor_id,
            old_values,
            new_values,
            metadata: self.metadata,
        })
    }
}

fn required(field: &str, value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}
