//! Enforcement façade used at the command boundary.
//!
//! Wraps the [`PermissionResolver`] with fail-closed semantics: any failure of
//! the resolver is logged to the diagnostic channel and turned into a denial.

use std::collections::HashMap;

use thiserror::Error;

use bastion_core::{PublicFailure, ToPublicFailure, UserId};

use crate::{Permission, PermissionCheck, PermissionResolver, PermissionStore};

/// The single authorization failure.
///
/// It carries no resource, action or actor, so callers (and attackers) cannot
/// tell a wrong resource name from a missing role or an unknown user.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthzError {
    #[error("Forbidden")]
    Forbidden,
}

impl ToPublicFailure for AuthzError {
    fn to_public_failure(&self) -> PublicFailure {
        PublicFailure::FORBIDDEN
    }
}

/// Fail-closed permission guard.
///
/// - `check` / `check_multiple` / `user_permissions` never return errors
/// - `require` fails with [`AuthzError::Forbidden`] and nothing else
/// - `has_all` / `has_any` answer `false` for an empty check list without
///   touching the resolver
#[derive(Debug, Clone)]
pub struct PermissionGuard<S> {
    resolver: PermissionResolver<S>,
}

impl<S> PermissionGuard<S> {
    pub fn new(resolver: PermissionResolver<S>) -> Self {
        Self { resolver }
    }

    pub fn from_store(store: S) -> Self {
        Self::new(PermissionResolver::new(store))
    }

    pub fn resolver(&self) -> &PermissionResolver<S> {
        &self.resolver
    }
}

impl<S> PermissionGuard<S>
where
    S: PermissionStore,
{
    pub async fn check(&self, actor_id: &UserId, resource: &str, action: &str) -> bool {
        match self.resolver.has_permission(actor_id, resource, action).await {
            Ok(granted) => granted,
            Err(err) => {
                tracing::error!(error = %err, "permission check failed; denying");
                false
            }
        }
    }

    pub async fn require(
        &self,
        actor_id: &UserId,
        resource: &str,
        action: &str,
    ) -> Result<(), AuthzError> {
        if self.check(actor_id, resource, action).await {
            Ok(())
        } else {
            Err(AuthzError::Forbidden)
        }
    }

    /// Per-key results; on failure every requested key maps to `false`.
    pub async fn check_multiple(
        &self,
        actor_id: &UserId,
        checks: &[PermissionCheck],
    ) -> HashMap<String, bool> {
        match self.resolver.has_permissions(actor_id, checks).await {
            Ok(results) => results,
            Err(err) => {
                tracing::error!(
                    error = %err,
                    checks = checks.len(),
                    "batch permission check failed; denying all"
                );
                checks.iter().map(|c| (c.key(), false)).collect()
            }
        }
    }

    /// `true` iff every check is granted. An empty list is never authorized.
    pub async fn has_all(&self, actor_id: &UserId, checks: &[PermissionCheck]) -> bool {
        if checks.is_empty() {
            return false;
        }
        let results = self.check_multiple(actor_id, checks).await;
        !results.is_empty() && results.values().all(|granted| *granted)
    }

    /// `true` iff at least one check is granted. An empty list is never authorized.
    pub async fn has_any(&self, actor_id: &UserId, checks: &[PermissionCheck]) -> bool {
        if checks.is_empty() {
            return false;
        }
        let results = self.check_multiple(actor_id, checks).await;
        results.values().any(|granted| *granted)
    }

    /// Full resolved set, for presentation in already-trusted contexts.
    ///
    /// This discloses more than point checks do; prefer `check`/`require`.
    /// Empty on failure.
    pub async fn user_permissions(&self, actor_id: &UserId) -> Vec<Permission> {
        match self.resolver.user_permissions(actor_id).await {
            Ok(permissions) => permissions,
            Err(err) => {
                tracing::error!(error = %err, "permission listing failed; returning empty set");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::testing::{FailingStore, StubStore};

    fn actor(id: &str) -> UserId {
        UserId::from(id)
    }

    fn guard_with_read() -> PermissionGuard<StubStore> {
        PermissionGuard::from_store(StubStore::new().with_grants(
            "actor-1",
            vec![Permission::new("users.read", "users", "read")],
        ))
    }

    #[tokio::test]
    async fn check_and_require_follow_the_resolver() {
        let guard = guard_with_read();
        assert!(guard.check(&actor("actor-1"), "users", "read").await);
        assert!(!guard.check(&actor("actor-1"), "users", "write").await);
        assert_eq!(guard.require(&actor("actor-1"), "users", "read").await, Ok(()));
    }

    #[tokio::test]
    async fn denial_message_is_generic() {
        let guard = guard_with_read();
        let err = guard
            .require(&actor("actor-without-permissions"), "users", "write")
            .await
            .unwrap_err();

        assert_eq!(err, AuthzError::Forbidden);
        let message = err.to_string();
        assert_eq!(message, "Forbidden");
        assert!(!message.contains("users"));
        assert!(!message.contains("write"));
        assert!(!message.contains("actor"));
    }

    #[tokio::test]
    async fn resolver_failure_fails_closed() {
        let store = Arc::new(FailingStore::new());
        let guard = PermissionGuard::from_store(Arc::clone(&store));

        assert!(!guard.check(&actor("actor-1"), "users", "read").await);
        assert_eq!(store.calls(), 1);
        assert_eq!(
            guard.require(&actor("actor-1"), "users", "read").await,
            Err(AuthzError::Forbidden)
        );
        assert!(guard.user_permissions(&actor("actor-1")).await.is_empty());

        let checks = vec![
            PermissionCheck::new("users", "read"),
            PermissionCheck::new("users", "write"),
        ];
        let results = guard.check_multiple(&actor("actor-1"), &checks).await;
        assert_eq!(results.len(), 2);
        assert!(results.values().all(|granted| !granted));
        assert!(!guard.has_any(&actor("actor-1"), &checks).await);
        assert!(!guard.has_all(&actor("actor-1"), &checks).await);
        assert_eq!(store.calls(), 6);
    }

    #[tokio::test]
    async fn empty_check_lists_are_denied_without_resolving() {
        let store = Arc::new(StubStore::new());
        let guard = PermissionGuard::from_store(Arc::clone(&store));

        assert!(!guard.has_all(&actor("actor-1"), &[]).await);
        assert!(!guard.has_any(&actor("actor-1"), &[]).await);
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn combinators_aggregate_batch_results() {
        let guard = guard_with_read();
        let mixed = vec![
            PermissionCheck::new("users", "read"),
            PermissionCheck::new("users", "write"),
        ];
        let only_read = vec![PermissionCheck::new("users", "read")];

        assert!(guard.has_any(&actor("actor-1"), &mixed).await);
        assert!(!guard.has_all(&actor("actor-1"), &mixed).await);
        assert!(guard.has_all(&actor("actor-1"), &only_read).await);
    }

    #[test]
    fn forbidden_maps_to_generic_public_failure() {
        let public = AuthzError::Forbidden.to_public_failure();
        assert_eq!(public.status, 403);
        assert_eq!(public.message, "Forbidden");
    }
}
