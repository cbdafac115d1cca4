//! Read boundary over the permission data (groups, roles, permissions, links).

use std::sync::Arc;

use async_trait::async_trait;

use bastion_core::{InfraError, UserId};

use crate::Permission;

/// Permission data access used by the resolver.
///
/// ## Contract
///
/// `user_permissions` returns every permission reachable from the user through
/// its role memberships:
/// - soft-deleted roles and permissions are excluded
/// - roles whose group is soft-deleted are excluded (group deletion cascades)
/// - the user record itself is not checked for liveness
/// - a user with no roles, or an unknown user, yields an empty list, never an error
///
/// The list may contain the same permission more than once (reachable via
/// several roles, or duplicated link rows). Deduplication is the resolver's job.
///
/// Only infrastructure failures are reported as errors.
#[async_trait]
pub trait PermissionStore: Send + Sync {
    async fn user_permissions(&self, user_id: &UserId) -> Result<Vec<Permission>, InfraError>;
}

#[async_trait]
impl<S> PermissionStore for Arc<S>
where
    S: PermissionStore + ?Sized,
{
    async fn user_permissions(&self, user_id: &UserId) -> Result<Vec<Permission>, InfraError> {
        (**self).user_permissions(user_id).await
    }
}
