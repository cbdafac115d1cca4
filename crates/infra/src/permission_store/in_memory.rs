use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;

use bastion_auth::{Group, Permission, PermissionStore, Role, RolePermission, UserRole};
use bastion_core::{GroupId, InfraError, PermissionId, RoleId, SoftDeletable, UserId};

#[derive(Debug, Default)]
struct Tables {
    groups: HashMap<GroupId, Group>,
    roles: HashMap<RoleId, Role>,
    permissions: HashMap<PermissionId, Permission>,
    role_permissions: Vec<RolePermission>,
    user_roles: Vec<UserRole>,
}

impl Tables {
    fn role_is_live(&self, role: &Role) -> bool {
        role.is_live()
            && self
                .groups
                .get(&role.group_id)
                .is_some_and(|g| g.is_live())
    }
}

/// In-memory permission store.
///
/// Intended for tests/dev. Enforces the referential rules of the schema
/// (roles point at live groups, links point at existing rows) but, like the
/// schema, does not deduplicate link rows.
#[derive(Debug, Default)]
pub struct InMemoryPermissionStore {
    tables: RwLock<Tables>,
}

impl InMemoryPermissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, InfraError> {
        self.tables
            .read()
            .map_err(|_| InfraError::storage("lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, InfraError> {
        self.tables
            .write()
            .map_err(|_| InfraError::storage("lock poisoned"))
    }

    pub fn create_group(&self, group: Group) -> Result<Group, InfraError> {
        let mut tables = self.write()?;
        if tables.groups.values().any(|g| g.name == group.name) {
            return Err(InfraError::integrity(format!(
                "group name '{}' already exists",
                group.name
            )));
        }
        tables.groups.insert(group.id, group.clone());
        Ok(group)
    }

    /// Rejects roles whose group is missing or soft-deleted.
    pub fn create_role(&self, role: Role) -> Result<Role, InfraError> {
        let mut tables = self.write()?;
        match tables.groups.get(&role.group_id) {
            Some(group) if group.is_live() => {}
            _ => {
                return Err(InfraError::integrity(format!(
                    "role '{}' references unknown or deleted group {}",
                    role.name, role.group_id
                )));
            }
        }
        tables.roles.insert(role.id, role.clone());
        Ok(role)
    }

    /// `name` is unique. A second name for an existing (resource, action)
    /// pair is accepted but logged.
    pub fn create_permission(&self, permission: Permission) -> Result<Permission, InfraError> {
        let mut tables = self.write()?;
        if tables.permissions.values().any(|p| p.name == permission.name) {
            return Err(InfraError::integrity(format!(
                "permission name '{}' already exists",
                permission.name
            )));
        }
        if let Some(existing) = tables
            .permissions
            .values()
            .find(|p| p.resource == permission.resource && p.action == permission.action)
        {
            tracing::warn!(
                existing = %existing.name,
                duplicate = %permission.name,
                pair = %permission.key(),
                "permission pair registered under a second name"
            );
        }
        tables.permissions.insert(permission.id, permission.clone());
        Ok(permission)
    }

    pub fn grant_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> Result<RolePermission, InfraError> {
        let mut tables = self.write()?;
        if !tables.roles.contains_key(&role_id) {
            return Err(InfraError::integrity(format!("unknown role {role_id}")));
        }
        if !tables.permissions.contains_key(&permission_id) {
            return Err(InfraError::integrity(format!("unknown permission {permission_id}")));
        }
        let link = RolePermission::new(role_id, permission_id);
        tables.role_permissions.push(link.clone());
        Ok(link)
    }

    /// Hard-deletes every matching link row. Returns how many were removed.
    pub fn revoke_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> Result<usize, InfraError> {
        let mut tables = self.write()?;
        let before = tables.role_permissions.len();
        tables
            .role_permissions
            .retain(|l| !(l.role_id == role_id && l.permission_id == permission_id));
        Ok(before - tables.role_permissions.len())
    }

    pub fn assign_role(&self, user_id: UserId, role_id: RoleId) -> Result<UserRole, InfraError> {
        let mut tables = self.write()?;
        if !tables.roles.contains_key(&role_id) {
            return Err(InfraError::integrity(format!("unknown role {role_id}")));
        }
        let link = UserRole::new(user_id, role_id);
        tables.user_roles.push(link.clone());
        Ok(link)
    }

    /// Hard-deletes every matching link row. Returns how many were removed.
    pub fn unassign_role(&self, user_id: &UserId, role_id: RoleId) -> Result<usize, InfraError> {
        let mut tables = self.write()?;
        let before = tables.user_roles.len();
        tables
            .user_roles
            .retain(|l| !(&l.user_id == user_id && l.role_id == role_id));
        Ok(before - tables.user_roles.len())
    }

    /// Soft-deletes the group and, by cascade, every role in it.
    pub fn soft_delete_group(&self, group_id: GroupId) -> Result<(), InfraError> {
        let mut tables = self.write()?;
        let now = Utc::now();
        let group = tables
            .groups
            .get_mut(&group_id)
            .ok_or_else(|| InfraError::integrity(format!("unknown group {group_id}")))?;
        group.deleted_at.get_or_insert(now);
        group.updated_at = now;

        for role in tables.roles.values_mut().filter(|r| r.group_id == group_id) {
            role.deleted_at.get_or_insert(now);
            role.updated_at = now;
        }
        Ok(())
    }

    pub fn soft_delete_role(&self, role_id: RoleId) -> Result<(), InfraError> {
        let mut tables = self.write()?;
        let now = Utc::now();
        let role = tables
            .roles
            .get_mut(&role_id)
            .ok_or_else(|| InfraError::integrity(format!("unknown role {role_id}")))?;
        role.deleted_at.get_or_insert(now);
        role.updated_at = now;
        Ok(())
    }

    pub fn soft_delete_permission(&self, permission_id: PermissionId) -> Result<(), InfraError> {
        let mut tables = self.write()?;
        let now = Utc::now();
        let permission = tables
            .permissions
            .get_mut(&permission_id)
            .ok_or_else(|| InfraError::integrity(format!("unknown permission {permission_id}")))?;
        permission.deleted_at.get_or_insert(now);
        permission.updated_at = now;
        Ok(())
    }
}

#[async_trait]
impl PermissionStore for InMemoryPermissionStore {
    async fn user_permissions(&self, user_id: &UserId) -> Result<Vec<Permission>, InfraError> {
        let tables = self.read()?;

        let mut reachable = Vec::new();
        for membership in tables.user_roles.iter().filter(|l| &l.user_id == user_id) {
            let Some(role) = tables.roles.get(&membership.role_id) else {
                continue;
            };
            if !tables.role_is_live(role) {
                continue;
            }
            for grant in tables.role_permissions.iter().filter(|l| l.role_id == role.id) {
                if let Some(permission) = tables.permissions.get(&grant.permission_id) {
                    if permission.is_live() {
                        reachable.push(permission.clone());
                    }
                }
            }
        }
        Ok(reachable)
    }
}
