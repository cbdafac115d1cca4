//! Append-only audit store boundary.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use bastion_core::{AuditRecordId, InfraError};

use crate::{AuditLogRecord, AuditOperation, NewAuditRecord};

/// Page bounds for [`AuditStore::find_all`], clamped at construction.
///
/// - missing, non-numeric or non-positive `limit` → [`PageRequest::DEFAULT_LIMIT`]
/// - `limit` above [`PageRequest::MAX_LIMIT`] → `MAX_LIMIT`
/// - missing, non-numeric or negative `offset` → 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    limit: u32,
    offset: u64,
}

impl PageRequest {
    pub const DEFAULT_LIMIT: u32 = 100;
    pub const MAX_LIMIT: u32 = 1000;

    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        let limit = match limit {
            Some(l) if l > 0 => l.min(Self::MAX_LIMIT as i64) as u32,
            _ => Self::DEFAULT_LIMIT,
        };
        let offset = offset.filter(|o| *o > 0).unwrap_or(0) as u64;
        Self { limit, offset }
    }

    /// Same policy for raw query-string values.
    pub fn parse(limit: Option<&str>, offset: Option<&str>) -> Self {
        Self::new(
            limit.and_then(|l| l.trim().parse().ok()),
            offset.and_then(|o| o.trim().parse().ok()),
        )
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Durable, append-only storage of audit records.
///
/// `append` is the only write. There is deliberately no update or delete
/// method, not even for internal use. All finders return records newest first.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Assigns `id` / `timestamp` when unset, writes once, returns the stored record.
    async fn append(&self, record: NewAuditRecord) -> Result<AuditLogRecord, InfraError>;

    async fn find_by_entity(
        &self,
        entity_type: &str,
        entity_id: &str,
    ) -> Result<Vec<AuditLogRecord>, InfraError>;

    async fn find_by_actor(&self, actor_id: &str) -> Result<Vec<AuditLogRecord>, InfraError>;

    async fn find_by_operation(
        &self,
        operation: AuditOperation,
    ) -> Result<Vec<AuditLogRecord>, InfraError>;

    async fn find_all(&self, page: PageRequest) -> Result<Vec<AuditLogRecord>, InfraError>;

    async fn find_by_id(&self, id: AuditRecordId) -> Result<Option<AuditLogRecord>, InfraError>;
}

#[async_trait]
impl<S> AuditStore for Arc<S>
where
    S: AuditStore + ?Sized,
{
    async fn append(&self, record: NewAuditRecord) -> Result<AuditLogRecord, InfraError> {
        (**self).append(record).await
    }

    async fn find_by_entity(
        &self,
        entity_type: &str,
        entity_id: &str,
    ) -> Result<Vec<AuditLogRecord>, InfraError> {
        (**self).find_by_entity(entity_type, entity_id).await
    }

    async fn find_by_actor(&self, actor_id: &str) -> Result<Vec<AuditLogRecord>, InfraError> {
        (**self).find_by_actor(actor_id).await
    }

    async fn find_by_operation(
        &self,
        operation: AuditOperation,
    ) -> Result<Vec<AuditLogRecord>, InfraError> {
        (**self).find_by_operation(operation).await
    }

    async fn find_all(&self, page: PageRequest) -> Result<Vec<AuditLogRecord>, InfraError> {
        (**self).find_all(page).await
    }

    async fn find_by_id(&self, id: AuditRecordId) -> Result<Option<AuditLogRecord>, InfraError> {
        (**self).find_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_is_clamped_to_ceiling() {
        assert_eq!(PageRequest::new(Some(5000), None).limit(), 1000);
        assert_eq!(PageRequest::new(Some(100_000), Some(0)).limit(), 1000);
    }

    #[test]
    fn invalid_limits_fall_back_to_default() {
        assert_eq!(PageRequest::new(Some(-5), None).limit(), 100);
        assert_eq!(PageRequest::new(Some(0), None).limit(), 100);
        assert_eq!(PageRequest::new(None, None).limit(), 100);
        assert_eq!(PageRequest::parse(Some("ten"), None).limit(), 100);
        assert_eq!(PageRequest::parse(Some(" 25 "), None).limit(), 25);
    }

    #[test]
    fn offsets_are_never_negative() {
        assert_eq!(PageRequest::new(None, Some(-3)).offset(), 0);
        assert_eq!(PageRequest::parse(None, Some("x")).offset(), 0);
        assert_eq!(PageRequest::new(None, Some(40)).offset(), 40);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: any caller-supplied limit yields a page size in 1..=MAX_LIMIT.
            #[test]
            fn page_size_is_always_bounded(
                limit in any::<Option<i64>>(),
                offset in any::<Option<i64>>(),
            ) {
                let page = PageRequest::new(limit, offset);
                prop_assert!(page.limit() >= 1);
                prop_assert!(page.limit() <= PageRequest::MAX_LIMIT);
                if let Some(l) = limit {
                    if (1..=PageRequest::MAX_LIMIT as i64).contains(&l) {
                        prop_assert_eq!(page.limit() as i64, l);
                    }
                }
            }

            /// Property: arbitrary text never panics and never exceeds the ceiling.
            #[test]
            fn parsing_text_is_total(limit in ".{0,12}", offset in ".{0,12}") {
                let page = PageRequest::parse(Some(&limit), Some(&offset));
                prop_assert!(page.limit() >= 1 && page.limit() <= PageRequest::MAX_LIMIT);
            }
        }
    }
}
