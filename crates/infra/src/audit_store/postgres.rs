//! Postgres-backed audit store.
//!
//! Persists into `audit_logs`:
//!
//! | column | type |
//! |--------|------|
//! | `id` | `uuid` primary key |
//! | `operation` | `text` (`CREATE`, `UPDATE`, `DELETE`, `RESTORE`, `READ`) |
//! | `entity_type` | `text` |
//! | `entity_id` | `text` |
//! | `actor_id` | `text NULL` (nulled when the principal is erased) |
//! | `old_values` | `jsonb NULL` |
//! | `new_values` | `jsonb NULL` |
//! | `metadata` | `jsonb NULL` |
//! | `timestamp` | `timestamptz` |
//!
//! Only INSERT and SELECT statements are issued from here.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::instrument;

use bastion_audit::{AuditLogRecord, AuditOperation, AuditStore, NewAuditRecord, PageRequest};
use bastion_core::{AuditRecordId, InfraError};

use crate::db::map_sqlx_error;

const SELECT_COLUMNS: &str = r#"
    SELECT
        id,
        operation,
        entity_type,
        entity_id,
        actor_id,
        old_values,
        new_values,
        metadata,
        "timestamp"
    FROM audit_logs
"#;

const NEWEST_FIRST: &str = r#"ORDER BY "timestamp" DESC, id DESC"#;

#[derive(Debug, Clone)]
pub struct PostgresAuditStore {
    pool: Arc<PgPool>,
}

impl PostgresAuditStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl AuditStore for PostgresAuditStore {
    #[instrument(
        skip(self, record),
        fields(operation = %record.operation(), entity_type = %record.entity_type()),
        err
    )]
    async fn append(&self, record: NewAuditRecord) -> Result<AuditLogRecord, InfraError> {
        let stored = record.into_record();

        sqlx::query(
            r#"
            INSERT INTO audit_logs (
                id,
                operation,
                entity_type,
                entity_id,
                actor_id,
                old_values,
                new_values,
                metadata,
                "timestamp"
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(stored.id.as_uuid())
        .bind(stored.operation.as_str())
        .bind(&stored.entity_type)
        .bind(&stored.entity_id)
        .bind(stored.actor_id.as_deref())
        .bind(&stored.old_values)
        .bind(&stored.new_values)
        .bind(&stored.metadata)
        .bind(stored.timestamp)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("append_audit_record", e))?;

        Ok(stored)
    }

    #[instrument(skip(self), err)]
    async fn find_by_entity(
        &self,
        entity_type: &str,
        entity_id: &str,
    ) -> Result<Vec<AuditLogRecord>, InfraError> {
        let sql =
            format!("{SELECT_COLUMNS} WHERE entity_type = $1 AND entity_id = $2 {NEWEST_FIRST}");
        let rows = sqlx::query(&sql)
            .bind(entity_type)
            .bind(entity_id)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_entity", e))?;
        decode_rows(&rows)
    }

    #[instrument(skip(self), err)]
    async fn find_by_actor(&self, actor_id: &str) -> Result<Vec<AuditLogRecord>, InfraError> {
        let sql = format!("{SELECT_COLUMNS} WHERE actor_id = $1 {NEWEST_FIRST}");
        let rows = sqlx::query(&sql)
            .bind(actor_id)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_actor", e))?;
        decode_rows(&rows)
    }

    #[instrument(skip(self), fields(operation = %operation), err)]
    async fn find_by_operation(
        &self,
        operation: AuditOperation,
    ) -> Result<Vec<AuditLogRecord>, InfraError> {
        let sql = format!("{SELECT_COLUMNS} WHERE operation = $1 {NEWEST_FIRST}");
        let rows = sqlx::query(&sql)
            .bind(operation.as_str())
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_operation", e))?;
        decode_rows(&rows)
    }

    #[instrument(skip(self), fields(limit = page.limit(), offset = page.offset()), err)]
    async fn find_all(&self, page: PageRequest) -> Result<Vec<AuditLogRecord>, InfraError> {
        let sql = format!("{SELECT_COLUMNS} {NEWEST_FIRST} LIMIT $1 OFFSET $2");
        let rows = sqlx::query(&sql)
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_all", e))?;
        decode_rows(&rows)
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn find_by_id(&self, id: AuditRecordId) -> Result<Option<AuditLogRecord>, InfraError> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = $1 LIMIT 1");
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_id", e))?;
        row.as_ref().map(record_from_row).transpose()
    }
}

fn decode_rows(rows: &[sqlx::postgres::PgRow]) -> Result<Vec<AuditLogRecord>, InfraError> {
    rows.iter().map(record_from_row).collect()
}

fn record_from_row(row: &sqlx::postgres::PgRow) -> Result<AuditLogRecord, InfraError> {
    let decode = |e: sqlx::Error| map_sqlx_error("decode_audit_record", e);

    let operation: String = row.try_get("operation").map_err(decode)?;
    let operation = operation
        .parse::<AuditOperation>()
        .map_err(|e| InfraError::decode(e.to_string()))?;

    Ok(AuditLogRecord {
        id: AuditRecordId::from_uuid(row.try_get("id").map_err(decode)?),
        operation,
        entity_type: row.try_get("entity_type").map_err(decode)?,
        entity_id: row.try_get("entity_id").map_err(decode)?,
        actor_id: row.try_get("actor_id").map_err(decode)?,
        old_values: row.try_get("old_values").map_err(decode)?,
        new_values: row.try_get("new_values").map_err(decode)?,
        metadata: row.try_get("metadata").map_err(decode)?,
        timestamp: row.try_get::<DateTime<Utc>, _>("timestamp").map_err(decode)?,
    })
}
