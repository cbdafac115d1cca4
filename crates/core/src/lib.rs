//! `bastion-core`: shared building blocks for the permission and audit crates.
//!
//! This crate contains identifiers, error types and the entity lifecycle
//! traits. It performs no IO.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::SoftDeletable;
pub use error::{DomainError, InfraError, PublicFailure, ToPublicFailure};
pub use id::{AuditRecordId, GroupId, LinkId, PermissionId, RoleId, UserId};
