//! Composition root: wires the guard and recorder over the configured stores.

use std::sync::Arc;

use anyhow::Context;

use bastion_audit::{AuditRecorder, AuditStore, AuditTrail};
use bastion_auth::{PermissionGuard, PermissionStore};

use crate::audit_store::{InMemoryAuditStore, PostgresAuditStore};
use crate::config::{StorageBackend, StorageConfig};
use crate::db;
use crate::permission_store::{InMemoryPermissionStore, PostgresPermissionStore};

pub type DynPermissionStore = Arc<dyn PermissionStore>;
pub type DynAuditStore = Arc<dyn AuditStore>;

/// Process-wide services, built once at startup and passed down explicitly.
///
/// The audit store is reachable only through `recorder` (writes) and
/// `trail` (reads).
#[derive(Clone)]
pub struct Services {
    pub guard: PermissionGuard<DynPermissionStore>,
    pub recorder: AuditRecorder<DynAuditStore>,
    pub trail: AuditTrail<DynAuditStore>,
}

impl Services {
    pub fn new(permissions: DynPermissionStore, audit: DynAuditStore) -> Self {
        Self {
            guard: PermissionGuard::from_store(permissions),
            recorder: AuditRecorder::new(Arc::clone(&audit)),
            trail: AuditTrail::new(audit),
        }
    }

    /// In-memory wiring (dev/test). The permission store is returned as well so
    /// callers can seed groups, roles and grants.
    pub fn in_memory() -> (Self, Arc<InMemoryPermissionStore>) {
        let permissions = Arc::new(InMemoryPermissionStore::new());
        let audit: DynAuditStore = Arc::new(InMemoryAuditStore::new());
        (Self::new(permissions.clone(), audit), permissions)
    }

    pub async fn from_config(config: &StorageConfig) -> anyhow::Result<Self> {
        match &config.backend {
            StorageBackend::InMemory => {
                tracing::info!("using in-memory permission and audit stores");
                Ok(Self::in_memory().0)
            }
            StorageBackend::Postgres {
                database_url,
                max_connections,
            } => {
                let pool = db::connect(database_url, *max_connections)
                    .await
                    .context("failed to connect to Postgres")?;
                tracing::info!(max_connections, "using Postgres permission and audit stores");

                Ok(Self::new(
                    Arc::new(PostgresPermissionStore::new(pool.clone())),
                    Arc::new(PostgresAuditStore::new(pool)),
                ))
            }
        }
    }
}
