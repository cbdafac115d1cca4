//! Fake stores shared by the unit tests of this crate.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use bastion_core::{InfraError, UserId};

use crate::{Permission, PermissionStore};

/// Returns a fixed permission list per user and counts every call.
#[derive(Debug, Default)]
pub struct StubStore {
    grants: HashMap<UserId, Vec<Permission>>,
    calls: AtomicUsize,
}

impl StubStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_grants(mut self, user: &str, permissions: Vec<Permission>) -> Self {
        self.grants.insert(UserId::from(user), permissions);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PermissionStore for StubStore {
    async fn user_permissions(&self, user_id: &UserId) -> Result<Vec<Permission>, InfraError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.grants.get(user_id).cloned().unwrap_or_default())
    }
}

/// Always fails like an unreachable database would.
#[derive(Debug, Default)]
pub struct FailingStore {
    calls: AtomicUsize,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PermissionStore for FailingStore {
    async fn user_permissions(&self, _user_id: &UserId) -> Result<Vec<Permission>, InfraError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(InfraError::storage("connection refused"))
    }
}
