//! Soft-delete lifecycle shared by groups, roles and permissions.

use chrono::{DateTime, Utc};

/// An entity that is logically removed by stamping a deletion time instead of
/// being physically erased.
pub trait SoftDeletable {
    fn deleted_at(&self) -> Option<DateTime<Utc>>;

    /// `true` until the entity has been soft-deleted.
    fn is_live(&self) -> bool {
        self.deleted_at().is_none()
    }
}
