//! Permission resolution: user → roles → permissions.

use std::collections::{HashMap, HashSet};

use tracing::instrument;

use bastion_core::{InfraError, UserId};

use crate::{Permission, PermissionCheck, PermissionStore};

/// Stateless query service answering "does this user hold (resource, action)?".
///
/// ## Uniform-time evaluation
///
/// Every check loads the user's complete permission set (one store call,
/// whatever the outcome) and scans all of it. The scan never exits early, so
/// its cost depends on the size of the set and not on whether or where a match
/// occurs, or whether the user exists at all.
///
/// String equality itself is ordinary comparison and the store round-trip still
/// scales with the amount of data, so this is a partial mitigation against
/// timing probes rather than a constant-time guarantee.
///
/// ## Errors
///
/// Unknown users, users without roles and roles without permissions resolve to
/// an empty set. Only [`InfraError`]s from the store are returned, unmodified.
#[derive(Debug, Clone)]
pub struct PermissionResolver<S> {
    store: S,
}

impl<S> PermissionResolver<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S> PermissionResolver<S>
where
    S: PermissionStore,
{
    /// Every permission the user holds through any role, each permission once.
    #[instrument(level = "debug", skip(self), fields(user_id = %user_id))]
    pub async fn user_permissions(&self, user_id: &UserId) -> Result<Vec<Permission>, InfraError> {
        let reachable = self.store.user_permissions(user_id).await?;
        Ok(dedup_by_identity(reachable))
    }

    pub async fn has_permission(
        &self,
        user_id: &UserId,
        resource: &str,
        action: &str,
    ) -> Result<bool, InfraError> {
        let permissions = self.user_permissions(user_id).await?;
        Ok(grants_uniformly(&permissions, resource, action))
    }

    /// Batch form: one fetch of the permission set, then one full scan per check.
    ///
    /// Keys are `"resource:action"`; repeated checks collapse onto one key.
    pub async fn has_permissions(
        &self,
        user_id: &UserId,
        checks: &[PermissionCheck],
    ) -> Result<HashMap<String, bool>, InfraError> {
        let permissions = self.user_permissions(user_id).await?;

        let mut results = HashMap::with_capacity(checks.len());
        for check in checks {
            let granted = grants_uniformly(&permissions, &check.resource, &check.action);
            results.insert(check.key(), granted);
        }
        Ok(results)
    }
}

/// Keeps the first occurrence of each permission id.
fn dedup_by_identity(permissions: Vec<Permission>) -> Vec<Permission> {
    let mut seen = HashSet::with_capacity(permissions.len());
    permissions
        .into_iter()
        .filter(|p| seen.insert(p.id))
        .collect()
}

fn grants_uniformly(permissions: &[Permission], resource: &str, action: &str) -> bool {
    scan_all(permissions, |permission| permission.matches(resource, action))
}

/// Evaluates `matches` on every item exactly once and ORs the results
/// without short-circuit.
fn scan_all<T>(items: &[T], mut matches: impl FnMut(&T) -> bool) -> bool {
    let mut found = false;
    for item in items {
        // black_box keeps the optimizer from turning the OR into an early exit.
        found = std::hint::black_box(found | matches(item));
    }
    found
}
