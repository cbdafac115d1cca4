//! Concrete [`PermissionStore`](bastion_auth::PermissionStore) backends.

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryPermissionStore;
pub use postgres::PostgresPermissionStore;
