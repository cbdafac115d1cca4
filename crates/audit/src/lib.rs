//! `bastion-audit`: append-only audit trail of mutations.
//!
//! The [`AuditRecorder`] builds one immutable [`AuditLogRecord`] per completed
//! operation and writes it through an [`AuditStore`]. Neither exposes any way
//! to change or remove a record once appended.

pub mod error;
pub mod record;
pub mod recorder;
pub mod sanitize;
pub mod store;
pub mod trail;

#[cfg(test)]
pub(crate) mod testing;

pub use error::AuditError;
pub use record::{AuditDescriptor, AuditLogRecord, AuditOperation, NewAuditRecord};
pub use recorder::AuditRecorder;
pub use store::{AuditStore, PageRequest};
pub use trail::AuditTrail;
