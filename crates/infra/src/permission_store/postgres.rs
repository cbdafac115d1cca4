//! Postgres-backed permission store (read side).
//!
//! Expected tables: `groups`, `roles`, `permissions`, `role_permissions`,
//! `user_roles`, each soft-deletable row carrying `deleted_at timestamptz NULL`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::instrument;

use bastion_auth::{Permission, PermissionStore};
use bastion_core::{InfraError, PermissionId, UserId};

use crate::db::map_sqlx_error;

/// Resolves a user's permissions with a single join.
///
/// Rows are not deduplicated in SQL: a permission granted through two roles
/// comes back twice and the resolver collapses it.
#[derive(Debug, Clone)]
pub struct PostgresPermissionStore {
    pool: Arc<PgPool>,
}

impl PostgresPermissionStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl PermissionStore for PostgresPermissionStore {
    #[instrument(skip(self), fields(user_id = %user_id), err)]
    async fn user_permissions(&self, user_id: &UserId) -> Result<Vec<Permission>, InfraError> {
        let rows = sqlx::query(
            r#"
            SELECT
                p.id,
                p.name,
                p.resource,
                p.action,
                p.description,
                p.created_at,
                p.updated_at,
                p.deleted_at
            FROM user_roles ur
            JOIN roles r ON r.id = ur.role_id AND r.deleted_at IS NULL
            JOIN groups g ON g.id = r.group_id AND g.deleted_at IS NULL
            JOIN role_permissions rp ON rp.role_id = r.id
            JOIN permissions p ON p.id = rp.permission_id AND p.deleted_at IS NULL
            WHERE ur.user_id = $1
            "#,
        )
        .bind(user_id.as_str())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("user_permissions", e))?;

        rows.iter()
            .map(|row| {
                permission_from_row(row)
                    .map_err(|e| map_sqlx_error("decode_permission", e))
            })
            .collect()
    }
}

fn permission_from_row(row: &sqlx::postgres::PgRow) -> Result<Permission, sqlx::Error> {
    Ok(Permission {
        id: PermissionId::from_uuid(row.try_get("id")?),
        name: row.try_get("name")?,
        resource: row.try_get("resource")?,
        action: row.try_get("action")?,
        description: row.try_get("description")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
        deleted_at: row.try_get::<Option<DateTime<Utc>>, _>("deleted_at")?,
    })
}
