//! `bastion-auth`: role-based permission resolution and enforcement.
//!
//! This crate is decoupled from HTTP and from any concrete storage: the
//! resolver reads through the [`PermissionStore`] trait and the guard wraps
//! the resolver with fail-closed semantics.

pub mod guard;
pub mod permissions;
pub mod resolver;
pub mod roles;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use guard::{AuthzError, PermissionGuard};
pub use permissions::{Permission, PermissionCheck};
pub use resolver::PermissionResolver;
pub use roles::{Group, Role, RolePermission, UserRole};
pub use store::PermissionStore;
